//! CSM Validator
//!
//! Static checks over a generated [`MigrationPlan`](csm_model::MigrationPlan).
//! Nothing here executes the generated code, and nothing here fails: every
//! finding becomes a [`ValidationIssue`](csm_model::ValidationIssue).
//!
//! # Overview
//!
//! - **MigrationValidator**: per-file syntax, legacy-import, model and
//!   endpoint checks over a whole plan
//! - **completeness**: fields and hooks present before but missing after
//! - **practices**: return annotations, docstrings, unimported namespaces
//!
//! # Example
//!
//! ```rust
//! use csm_model::{MigrationFile, MigrationPlan};
//! use csm_validate::MigrationValidator;
//!
//! let mut builder = MigrationPlan::builder();
//! builder.file(MigrationFile::create("app.py", "import clearskies\n")).unwrap();
//! let report = MigrationValidator::new().validate(&builder.build());
//! assert!(report.is_valid());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod completeness;
pub mod practices;
pub mod structure;
pub mod validator;

pub use completeness::validate_completeness;
pub use practices::check_best_practices;
pub use validator::MigrationValidator;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for validation
    pub use crate::{check_best_practices, validate_completeness, MigrationValidator};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
