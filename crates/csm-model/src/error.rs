//! Error types for the entity model
//!
//! Only two operations on model types can fail:
//! - Building a plan with a duplicated output path
//! - Writing a plan to disk

use std::path::PathBuf;

/// Errors while assembling a [`crate::MigrationPlan`]
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// Two generated files target the same relative path
    #[error("duplicate output path in migration plan: {0}")]
    DuplicatePath(PathBuf),
}

/// Errors while applying a plan to the file system
#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    /// Directory creation or file write failed
    #[error("io error writing {path}: {source}")]
    Io {
        /// Target path of the failed operation
        path: PathBuf,
        /// Underlying error, unmodified
        #[source]
        source: std::io::Error,
    },
}

impl ApplyError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
