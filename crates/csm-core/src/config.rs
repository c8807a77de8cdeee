//! Pipeline configuration
//!
//! Every field has a default, so an empty TOML file (or none at all) is a
//! valid configuration.

use crate::error::ConfigError;
use csm_model::declaration::DEFAULT_BACKEND;
use csm_model::ContextKind;
use csm_parser::DetectorSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where generated files go, relative to the output directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputLayout {
    /// Directory holding one module per model
    pub declarations_dir: String,
    /// Combined endpoints module
    pub handler_file: String,
    /// Runtime context module
    pub bootstrap_file: String,
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self {
            declarations_dir: "models".into(),
            handler_file: "endpoints.py".into(),
            bootstrap_file: "app.py".into(),
        }
    }
}

/// Migration pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// Directory names skipped during discovery
    pub ignore_dirs: Vec<String>,
    /// Extension of legacy source files, without the dot
    pub source_extension: String,
    /// Names the structural heuristics look for
    pub detector: DetectorSettings,
    /// Output file layout
    pub layout: OutputLayout,
    /// Context used when none can be inferred
    pub default_context: ContextKind,
    /// Backend counted as "no backend chosen" by the analysis warnings
    pub default_backend: String,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            ignore_dirs: [
                ".venv",
                "venv",
                "__pycache__",
                ".git",
                "tests",
                "build",
                "dist",
                ".tox",
                ".mypy_cache",
                ".pytest_cache",
                "node_modules",
            ]
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
            source_extension: "py".into(),
            detector: DetectorSettings::default(),
            layout: OutputLayout::default(),
            default_context: ContextKind::default(),
            default_backend: DEFAULT_BACKEND.into(),
        }
    }
}

impl MigrationConfig {
    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the file cannot be read or parsed
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&text).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from `path` when given, else defaults
    ///
    /// # Errors
    /// See [`Self::from_file`]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        path.map_or_else(|| Ok(Self::default()), Self::from_file)
    }

    /// Replace ignored directory names
    #[must_use]
    pub fn with_ignore_dirs(mut self, dirs: &[&str]) -> Self {
        self.ignore_dirs = dirs.iter().map(|d| (*d).to_string()).collect();
        self
    }

    /// Replace detector settings
    #[inline]
    #[must_use]
    pub fn with_detector(mut self, detector: DetectorSettings) -> Self {
        self.detector = detector;
        self
    }

    /// Replace output layout
    #[inline]
    #[must_use]
    pub fn with_layout(mut self, layout: OutputLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Replace the fallback context
    #[inline]
    #[must_use]
    pub fn with_default_context(mut self, context: ContextKind) -> Self {
        self.default_context = context;
        self
    }

    /// Whether a directory name is skipped
    #[must_use]
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignore_dirs.iter().any(|d| d == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_toml_is_default() {
        let config: MigrationConfig = toml::from_str("").unwrap();
        assert_eq!(config, MigrationConfig::default());
    }

    #[test]
    fn partial_toml_overrides() {
        let config: MigrationConfig = toml::from_str(
            r#"
default_context = "Lambda"
ignore_dirs = ["vendor"]

[layout]
declarations_dir = "app/models"

[detector]
di_attributes = ["container"]
"#,
        )
        .unwrap();
        assert_eq!(config.default_context, ContextKind::Lambda);
        assert!(config.is_ignored("vendor"));
        assert!(!config.is_ignored(".git"));
        assert_eq!(config.layout.declarations_dir, "app/models");
        assert_eq!(config.layout.handler_file, "endpoints.py");
        assert_eq!(config.detector.di_attributes, vec!["container"]);
        assert_eq!(config.detector.di_parameters, vec!["di"]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = MigrationConfig::from_file(Path::new("/nonexistent/csm.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(MigrationConfig::load(None).is_ok());
    }
}
