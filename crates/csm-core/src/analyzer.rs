//! Project analysis
//!
//! Walks a legacy project in file-system order, parses each source file
//! independently and aggregates one [`ProjectReport`]. A file that fails to
//! parse adds one error and contributes nothing else.

use crate::config::MigrationConfig;
use crate::error::{MigrationError, Result};
use csm_model::{ProjectReport, ProjectReportBuilder};
use csm_parser::{ParsedFile, SourceParser};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Custom-method count above which a model is flagged for review
pub const CUSTOM_METHOD_THRESHOLD: usize = 5;

/// Builds project reports from legacy sources
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: MigrationConfig,
    parser: SourceParser,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(MigrationConfig::default())
    }
}

impl Analyzer {
    /// Analyzer using `config`
    #[must_use]
    pub fn new(config: MigrationConfig) -> Self {
        let parser = SourceParser::new()
            .with_settings(config.detector.clone())
            .with_default_context(config.default_context);
        Self { config, parser }
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &MigrationConfig {
        &self.config
    }

    /// Analyze every source file under `root`
    ///
    /// # Errors
    /// Returns [`MigrationError::InvalidRoot`] if `root` is not a directory.
    /// Per-file failures are recorded in the report instead.
    pub fn analyze(&self, root: &Path) -> Result<ProjectReport> {
        if !root.is_dir() {
            return Err(MigrationError::InvalidRoot(root.to_path_buf()));
        }
        tracing::info!("Analyzing {}", root.display());

        let files = self.discover(root);
        let mut builder = ProjectReport::builder(root);
        for path in &files {
            self.record(&mut builder, path);
        }
        for warning in self.warnings(&builder) {
            builder.warning(warning);
        }

        let report = builder.build();
        tracing::info!(
            "Analyzed {} files: {} models, {} handlers, {} errors",
            files.len(),
            report.declarations().len(),
            report.handlers().len(),
            report.errors().len()
        );
        Ok(report)
    }

    /// Analyze a single file into a partial report
    #[must_use]
    pub fn analyze_file(&self, path: &Path) -> ProjectReport {
        let root = path.parent().unwrap_or(path);
        let mut builder = ProjectReport::builder(root);
        self.record(&mut builder, path);
        builder.build()
    }

    /// Source files under `root`, in walk order, ignored directories pruned
    #[must_use]
    pub fn discover(&self, root: &Path) -> Vec<PathBuf> {
        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !self.is_ignored(e));

        let mut files = Vec::new();
        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_file() && self.is_source(entry.path()) => {
                    files.push(entry.into_path());
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("Skipping unreadable entry: {}", e),
            }
        }
        tracing::debug!("Discovered {} source files", files.len());
        files
    }

    fn is_ignored(&self, entry: &DirEntry) -> bool {
        entry.file_type().is_dir() && self.config.is_ignored(&entry.file_name().to_string_lossy())
    }

    fn is_source(&self, path: &Path) -> bool {
        path.extension()
            .is_some_and(|ext| ext.to_string_lossy() == self.config.source_extension)
    }

    fn record(&self, builder: &mut ProjectReportBuilder, path: &Path) {
        match self.parser.parse_file(path) {
            Ok(file) => merge(builder, file),
            Err(e) => {
                tracing::warn!("Error parsing {}: {}", path.display(), e);
                builder.error(format!("Error parsing {}: {e}", path.display()));
            }
        }
    }

    fn warnings(&self, builder: &ProjectReportBuilder) -> Vec<String> {
        let declarations = builder.declarations();
        let handlers = builder.handlers();
        let mut warnings = Vec::new();

        let default_backend = &self.config.default_backend;
        let on_default = declarations
            .iter()
            .filter(|d| &d.backend == default_backend)
            .count();
        if on_default * 2 > declarations.len() {
            warnings.push(format!(
                "{on_default} models using default {default_backend} - may need real backend in v2"
            ));
        }

        let unconfigured = handlers.iter().filter(|h| !h.has_readable_columns()).count();
        if unconfigured > 0 {
            warnings.push(format!(
                "{unconfigured} handlers will need explicit readable_column_names in v2"
            ));
        }

        let busy = declarations
            .iter()
            .filter(|d| d.custom_methods.len() > CUSTOM_METHOD_THRESHOLD)
            .count();
        if busy > 0 {
            warnings.push(format!(
                "{busy} models have >{CUSTOM_METHOD_THRESHOLD} custom methods - review for proper v2 patterns"
            ));
        }
        warnings
    }
}

fn merge(builder: &mut ProjectReportBuilder, file: ParsedFile) {
    for declaration in file.declarations {
        builder.declaration(declaration);
    }
    for handler in file.handlers {
        builder.handler(handler);
    }
    for bootstrap in file.bootstraps {
        builder.bootstrap(bootstrap);
    }
    for binding in file.bindings {
        builder.binding(binding);
    }
    for warning in file.warnings {
        builder.warning(warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csm_test_utils::{TestProject, V1_BROKEN, V1_BUSY_MODEL, V1_USER_APP, V1_USER_MODEL};

    #[test]
    fn ignored_directories_are_pruned() {
        let project = TestProject::with_files(&[
            ("models.py", V1_USER_MODEL),
            (".venv/lib/site.py", V1_USER_MODEL),
            ("tests/test_models.py", V1_USER_MODEL),
            ("README.md", "# not python"),
        ]);
        let files = Analyzer::default().discover(project.path());
        assert_eq!(files, vec![project.path().join("models.py")]);
    }

    #[test]
    fn broken_file_is_recorded_and_skipped() {
        let project = TestProject::with_files(&[("broken.py", V1_BROKEN), ("models.py", V1_USER_MODEL)]);
        let report = Analyzer::default().analyze(project.path()).unwrap();
        assert_eq!(report.errors().len(), 1);
        assert!(report.errors()[0].starts_with("Error parsing "));
        assert!(report.errors()[0].contains("broken.py"));
        assert_eq!(report.declarations().len(), 1);
    }

    #[test]
    fn busy_models_are_flagged() {
        let project = TestProject::with_files(&[("busy.py", V1_BUSY_MODEL)]);
        let report = Analyzer::default().analyze(project.path()).unwrap();
        assert!(report
            .warnings()
            .iter()
            .any(|w| w == "1 models have >5 custom methods - review for proper v2 patterns"));
    }

    #[test]
    fn single_file_analysis() {
        let project = TestProject::with_files(&[("app.py", V1_USER_APP)]);
        let report = Analyzer::default().analyze_file(&project.path().join("app.py"));
        assert_eq!(report.handlers().len(), 1);
        assert!(report.warnings().is_empty());
    }

    #[test]
    fn missing_root_is_an_error() {
        let err = Analyzer::default().analyze(Path::new("/nonexistent/project")).unwrap_err();
        assert!(matches!(err, MigrationError::InvalidRoot(_)));
    }
}
