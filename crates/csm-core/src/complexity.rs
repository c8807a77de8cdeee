//! Migration complexity scoring
//!
//! `score = models + 2 * handlers + 0.5 * custom methods + 0.5 * hooks`,
//! bucketed into four tiers. Every weight is non-negative, so adding an
//! entity never lowers the score.

use csm_model::ProjectReport;
use serde::Serialize;
use std::fmt;

/// Complexity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityLevel {
    /// Score below 10
    Simple,
    /// Score below 30
    Moderate,
    /// Score below 60
    Complex,
    /// Everything else
    VeryComplex,
}

impl ComplexityLevel {
    /// Tier for a score
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score < 10.0 {
            Self::Simple
        } else if score < 30.0 {
            Self::Moderate
        } else if score < 60.0 {
            Self::Complex
        } else {
            Self::VeryComplex
        }
    }
}

impl fmt::Display for ComplexityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Simple => "simple",
            Self::Moderate => "moderate",
            Self::Complex => "complex",
            Self::VeryComplex => "very_complex",
        })
    }
}

/// Weighted size of a migration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComplexityAssessment {
    /// Tier
    #[serde(rename = "complexity_level")]
    pub level: ComplexityLevel,
    /// Score, truncated
    #[serde(rename = "complexity_score")]
    pub score: u64,
    /// Models
    pub total_models: usize,
    /// Handlers
    pub total_handlers: usize,
    /// Custom methods across all models
    pub total_custom_methods: usize,
    /// Lifecycle hooks across all models
    pub total_hooks: usize,
    /// Hours, at least one
    #[serde(rename = "estimated_migration_time_hours")]
    pub estimated_hours: u64,
}

impl ComplexityAssessment {
    /// Assess from entity counts
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_counts(models: usize, handlers: usize, custom_methods: usize, hooks: usize) -> Self {
        let score = models as f64 + 2.0 * handlers as f64 + 0.5 * custom_methods as f64 + 0.5 * hooks as f64;
        Self {
            level: ComplexityLevel::from_score(score),
            score: score as u64,
            total_models: models,
            total_handlers: handlers,
            total_custom_methods: custom_methods,
            total_hooks: hooks,
            estimated_hours: ((score / 10.0) as u64).max(1),
        }
    }

    /// Assess a report
    #[must_use]
    pub fn assess(report: &ProjectReport) -> Self {
        let declarations = report.declarations();
        Self::from_counts(
            declarations.len(),
            report.handlers().len(),
            declarations.iter().map(|d| d.custom_methods.len()).sum(),
            declarations.iter().map(|d| d.hooks.len()).sum(),
        )
    }

    /// Serializable representation
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csm_test_utils::{handler, report, user_declaration};
    use pretty_assertions::assert_eq;

    #[test]
    fn tiers() {
        assert_eq!(ComplexityLevel::from_score(0.0), ComplexityLevel::Simple);
        assert_eq!(ComplexityLevel::from_score(9.5), ComplexityLevel::Simple);
        assert_eq!(ComplexityLevel::from_score(10.0), ComplexityLevel::Moderate);
        assert_eq!(ComplexityLevel::from_score(59.5), ComplexityLevel::Complex);
        assert_eq!(ComplexityLevel::from_score(60.0), ComplexityLevel::VeryComplex);
    }

    #[test]
    fn weighted_score() {
        let a = ComplexityAssessment::from_counts(3, 2, 5, 1);
        assert_eq!(a.score, 10);
        assert_eq!(a.level, ComplexityLevel::Moderate);
        assert_eq!(a.estimated_hours, 1);

        let big = ComplexityAssessment::from_counts(20, 20, 0, 0);
        assert_eq!(big.score, 60);
        assert_eq!(big.estimated_hours, 6);
    }

    #[test]
    fn assess_report() {
        let a = ComplexityAssessment::assess(&report(vec![user_declaration()], vec![handler("users", "User")]));
        assert_eq!((a.total_models, a.total_handlers, a.total_hooks), (1, 1, 1));
        assert_eq!(a.score, 3);
        let json = a.to_json();
        assert_eq!(json["complexity_level"], "simple");
        assert_eq!(json["estimated_migration_time_hours"], 1);
    }
}
