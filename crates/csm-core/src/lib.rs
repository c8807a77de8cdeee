//! CSM Migration Pipeline
//!
//! Analyzes a clearskies v1 project, plans its v2 replacement and checks the
//! result.
//!
//! # Overview
//!
//! - **Analyzer**: discovers and parses sources into a [`ProjectReport`]
//! - **ComplexityAssessment**: weighted effort estimate for a report
//! - **Planner**: generates a [`MigrationPlan`] from a report
//! - **MigrationConfig**: discovery, detection and layout settings
//! - **tools**: the named operations, as JSON request/response calls
//!
//! # Example
//!
//! ```rust,no_run
//! use csm_core::{Analyzer, Planner};
//! use csm_validate::MigrationValidator;
//! use std::path::Path;
//!
//! let report = Analyzer::default().analyze(Path::new("legacy_app")).unwrap();
//! let plan = Planner::default().generate_all(&report).unwrap();
//! assert!(MigrationValidator::new().validate(&plan).is_valid());
//! plan.apply(Path::new("migrated_app"), true).unwrap();
//! ```
//!
//! [`ProjectReport`]: csm_model::ProjectReport
//! [`MigrationPlan`]: csm_model::MigrationPlan

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod analyzer;
pub mod complexity;
pub mod config;
pub mod error;
pub mod planner;
pub mod tools;

pub use analyzer::Analyzer;
pub use complexity::{ComplexityAssessment, ComplexityLevel};
pub use config::{MigrationConfig, OutputLayout};
pub use error::{ConfigError, MigrationError, Result};
pub use planner::{Planner, BREAKING_CHANGES};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running a migration
    pub use crate::{
        Analyzer, ComplexityAssessment, MigrationConfig, MigrationError, Planner, Result,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
