//! Error types for source parsing
//!
//! Every variant describes a per-file failure. Callers record them in the
//! project report and continue with the next file.

use std::path::PathBuf;

/// Errors while reading or parsing one source file
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Source contains syntax errors
    #[error("syntax error in {path} at line {line}, column {column}: {message}")]
    Syntax {
        /// File
        path: PathBuf,
        /// 1-based line of the first error
        line: usize,
        /// 1-based column of the first error
        column: usize,
        /// Description
        message: String,
    },

    /// File could not be read (includes non UTF-8 content)
    #[error("io error reading {path}: {source}")]
    Io {
        /// File
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Grammar could not be loaded into the parser
    #[error("parser initialisation failed: {0}")]
    ParserInit(String),

    /// Parser returned no tree
    #[error("parser produced no syntax tree")]
    ParseFailed,
}

impl ParseError {
    /// Create syntax error for path
    pub fn syntax_error(
        path: impl Into<PathBuf>,
        line: usize,
        column: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::Syntax {
            path: path.into(),
            line,
            column,
            message: message.into(),
        }
    }

    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
