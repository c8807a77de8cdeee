//! Project report
//!
//! A [`ProjectReport`] is produced by exactly one analysis run through a
//! [`ProjectReportBuilder`] and exposes read-only accessors afterwards.

use crate::declaration::Declaration;
use crate::handler::{BootstrapDeclaration, DIBinding, HandlerDeclaration};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Everything discovered in one legacy project
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectReport {
    root: PathBuf,
    declarations: Vec<Declaration>,
    handlers: Vec<HandlerDeclaration>,
    bootstraps: Vec<BootstrapDeclaration>,
    bindings: Vec<DIBinding>,
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ProjectReport {
    /// Start building a report for `root`
    #[inline]
    #[must_use]
    pub fn builder(root: impl Into<PathBuf>) -> ProjectReportBuilder {
        ProjectReportBuilder::new(root)
    }

    /// Analysed root
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Model declarations
    #[inline]
    #[must_use]
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Handler declarations
    #[inline]
    #[must_use]
    pub fn handlers(&self) -> &[HandlerDeclaration] {
        &self.handlers
    }

    /// Bootstrap declarations
    #[inline]
    #[must_use]
    pub fn bootstraps(&self) -> &[BootstrapDeclaration] {
        &self.bootstraps
    }

    /// DI bindings across all bootstraps
    #[inline]
    #[must_use]
    pub fn bindings(&self) -> &[DIBinding] {
        &self.bindings
    }

    /// Per-file parse failures
    #[inline]
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Heuristic warnings
    #[inline]
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Declaration by exact name
    #[must_use]
    pub fn declaration(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|d| d.name == name)
    }

    /// Serializable representation
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Accumulates one analysis run
#[derive(Debug, Clone)]
pub struct ProjectReportBuilder {
    report: ProjectReport,
}

impl ProjectReportBuilder {
    /// Empty builder
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            report: ProjectReport {
                root: root.into(),
                declarations: Vec::new(),
                handlers: Vec::new(),
                bootstraps: Vec::new(),
                bindings: Vec::new(),
                errors: Vec::new(),
                warnings: Vec::new(),
            },
        }
    }

    /// Add a declaration
    pub fn declaration(&mut self, declaration: Declaration) -> &mut Self {
        self.report.declarations.push(declaration);
        self
    }

    /// Add a handler
    pub fn handler(&mut self, handler: HandlerDeclaration) -> &mut Self {
        self.report.handlers.push(handler);
        self
    }

    /// Add a bootstrap
    pub fn bootstrap(&mut self, bootstrap: BootstrapDeclaration) -> &mut Self {
        self.report.bootstraps.push(bootstrap);
        self
    }

    /// Add a DI binding
    pub fn binding(&mut self, binding: DIBinding) -> &mut Self {
        self.report.bindings.push(binding);
        self
    }

    /// Record a parse failure
    pub fn error(&mut self, message: impl Into<String>) -> &mut Self {
        self.report.errors.push(message.into());
        self
    }

    /// Record a warning
    pub fn warning(&mut self, message: impl Into<String>) -> &mut Self {
        self.report.warnings.push(message.into());
        self
    }

    /// Declarations added so far
    #[inline]
    #[must_use]
    pub fn declarations(&self) -> &[Declaration] {
        &self.report.declarations
    }

    /// Handlers added so far
    #[inline]
    #[must_use]
    pub fn handlers(&self) -> &[HandlerDeclaration] {
        &self.report.handlers
    }

    /// Freeze the report
    #[inline]
    #[must_use]
    pub fn build(self) -> ProjectReport {
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::SourceLocation;

    #[test]
    fn builder_accumulates_entities() {
        let mut builder = ProjectReport::builder("/proj");
        builder
            .declaration(Declaration::new("User", SourceLocation::new("models.py", 1)))
            .error("Error parsing broken.py: syntax error")
            .warning("1 handlers will need explicit readable_column_names in v2");
        let report = builder.build();

        assert_eq!(report.root(), Path::new("/proj"));
        assert_eq!(report.declarations().len(), 1);
        assert!(report.declaration("User").is_some());
        assert!(report.declaration("user").is_none());
        assert_eq!(report.errors().len(), 1);
        assert_eq!(report.warnings().len(), 1);
    }

    #[test]
    fn json_has_entity_lists() {
        let report = ProjectReport::builder("/proj").build();
        let json = report.to_json();
        assert!(json["declarations"].as_array().unwrap().is_empty());
        assert!(json["errors"].as_array().unwrap().is_empty());
    }
}
