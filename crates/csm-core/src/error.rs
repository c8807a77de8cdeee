//! Error types for the migration pipeline
//!
//! Per-file parse failures never appear here; they are recorded in the
//! project report. What remains is fatal for the whole run:
//! - Unreadable or malformed configuration
//! - A project root that is not a directory
//! - Plan assembly and file-system writes

use csm_model::{ApplyError, PlanError};
use std::path::PathBuf;

/// Configuration loading failures
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("cannot read config {path}: {source}")]
    Io {
        /// Config file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`crate::MigrationConfig`]
    #[error("invalid config {path}: {source}")]
    Toml {
        /// Config file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: toml::de::Error,
    },
}

/// Pipeline failures
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Project root does not exist or is not a directory
    #[error("not a project directory: {0}")]
    InvalidRoot(PathBuf),

    /// Generated plan is inconsistent
    #[error("plan assembly failed: {0}")]
    Plan(#[from] PlanError),

    /// Writing the plan failed
    #[error(transparent)]
    Apply(#[from] ApplyError),
}

/// Result alias for pipeline operations
pub type Result<T> = std::result::Result<T, MigrationError>;
