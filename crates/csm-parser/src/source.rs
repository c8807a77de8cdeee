//! Per-file parsing entry point

use crate::bootstrap::BootstrapParser;
use crate::capability::imports_any_module;
use crate::context::ContextDetector;
use crate::declaration::DeclarationParser;
use crate::error::ParseError;
use crate::settings::DetectorSettings;
use crate::syntax::ParsedSource;
use csm_model::{BootstrapDeclaration, ContextKind, DIBinding, Declaration, HandlerDeclaration};
use std::collections::HashSet;
use std::path::Path;

/// Entities found in one source file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFile {
    /// Declarations, names unique
    pub declarations: Vec<Declaration>,
    /// Handlers configured by bootstrap calls
    pub handlers: Vec<HandlerDeclaration>,
    /// Bootstrap calls
    pub bootstraps: Vec<BootstrapDeclaration>,
    /// DI bindings from all bootstrap calls
    pub bindings: Vec<DIBinding>,
    /// Non-fatal findings
    pub warnings: Vec<String>,
}

impl ParsedFile {
    /// Nothing recognised
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty() && self.handlers.is_empty() && self.bootstraps.is_empty()
    }
}

/// Runs the declaration and bootstrap parsers over one file
#[derive(Debug, Clone, Default)]
pub struct SourceParser {
    settings: DetectorSettings,
    default_context: ContextKind,
}

impl SourceParser {
    /// Parser with default settings
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace detector settings
    #[inline]
    #[must_use]
    pub fn with_settings(mut self, settings: DetectorSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Context used when none can be inferred
    #[inline]
    #[must_use]
    pub fn with_default_context(mut self, context: ContextKind) -> Self {
        self.default_context = context;
        self
    }

    /// Detector settings in use
    #[inline]
    #[must_use]
    pub fn settings(&self) -> &DetectorSettings {
        &self.settings
    }

    /// Read and parse a file
    ///
    /// # Errors
    /// Returns [`ParseError::Io`] when the file cannot be read as UTF-8, or
    /// any error from [`Self::parse_source`]
    pub fn parse_file(&self, path: &Path) -> Result<ParsedFile, ParseError> {
        let text = std::fs::read_to_string(path).map_err(|e| ParseError::io_error(path, e))?;
        self.parse_source(path, &text)
    }

    /// Parse source text attributed to `path`
    ///
    /// # Errors
    /// Returns [`ParseError::Syntax`] when the source has syntax errors
    pub fn parse_source(&self, path: &Path, text: &str) -> Result<ParsedFile, ParseError> {
        let parsed = ParsedSource::parse_valid(text, path)?;
        let root = parsed.root();
        let imports_logging = imports_any_module(root, text, &self.settings.logging_modules);

        let mut file = ParsedFile::default();

        let mut seen = HashSet::new();
        for declaration in DeclarationParser::new(&self.settings).parse(root, text, path, imports_logging) {
            if seen.insert(declaration.name.clone()) {
                file.declarations.push(declaration);
            } else {
                file.warnings.push(format!(
                    "Duplicate declaration {} at {} ignored",
                    declaration.name, declaration.location
                ));
            }
        }

        let contexts = ContextDetector::new(self.default_context);
        for site in BootstrapParser::new(&self.settings, contexts).parse(root, text, path) {
            file.handlers.extend(site.handler);
            file.bindings.extend(site.bindings);
            file.bootstraps.push(site.bootstrap);
        }

        tracing::debug!(
            "Parsed {}: {} declarations, {} handlers, {} bootstraps",
            path.display(),
            file.declarations.len(),
            file.handlers.len(),
            file.bootstraps.len()
        );
        Ok(file)
    }
}
