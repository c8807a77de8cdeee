//! Knowledge-base lookup results

use serde::Serialize;

/// Before/after snippet pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnippetPair {
    /// Legacy source
    pub before: String,
    /// Rewritten source
    pub after: String,
}

/// Outcome of mapping a legacy symbol or snippet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MappingResult {
    /// Target symbol; `None` means no known mapping
    pub target: Option<String>,
    /// Breaking changes that apply
    pub breaking_changes: Vec<String>,
    /// Migration notes
    pub notes: Vec<String>,
    /// Worked example
    pub example: Option<SnippetPair>,
}

impl MappingResult {
    /// Whether a target symbol was found
    #[inline]
    #[must_use]
    pub fn is_mapped(&self) -> bool {
        self.target.is_some()
    }

    /// Last dotted segment of the target
    #[must_use]
    pub fn target_tail(&self) -> Option<&str> {
        self.target.as_deref().and_then(|t| t.rsplit('.').next())
    }
}
