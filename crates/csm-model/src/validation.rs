//! Validation findings

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Issue severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Advisory
    Warning,
    /// Makes the plan invalid
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// One finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Severity
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// File the issue was found in
    pub file: Option<PathBuf>,
    /// 1-based line
    pub line: Option<usize>,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.severity)?;
        match (&self.file, self.line) {
            (Some(file), Some(line)) => write!(f, "{}:{line}: ", file.display())?,
            (Some(file), None) => write!(f, "{}: ", file.display())?,
            _ => {}
        }
        f.write_str(&self.message)
    }
}

/// All findings for one plan
///
/// Valid iff no error-severity issue has been added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    is_valid: bool,
    issues: Vec<ValidationIssue>,
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self {
            is_valid: true,
            issues: Vec::new(),
        }
    }
}

impl ValidationReport {
    /// Empty, valid report
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an error
    pub fn add_error(&mut self, message: impl Into<String>, file: Option<PathBuf>, line: Option<usize>) {
        self.push(Severity::Error, message.into(), file, line);
    }

    /// Add a warning
    pub fn add_warning(&mut self, message: impl Into<String>, file: Option<PathBuf>, line: Option<usize>) {
        self.push(Severity::Warning, message.into(), file, line);
    }

    fn push(&mut self, severity: Severity, message: String, file: Option<PathBuf>, line: Option<usize>) {
        if severity == Severity::Error {
            self.is_valid = false;
        }
        self.issues.push(ValidationIssue {
            severity,
            message,
            file,
            line,
        });
    }

    /// No error-severity issue present
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// All issues in discovery order
    #[inline]
    #[must_use]
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Issues of one severity
    pub fn issues_with(&self, severity: Severity) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.severity == severity)
    }

    /// Serializable representation
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
