//! CSM Entity Model
//!
//! Plain data structures shared by every stage of the migration pipeline.
//!
//! # Core Types
//!
//! - **Declarations**: [`Declaration`], [`FieldSpec`], [`ParameterSpec`] and the
//!   capability set resolved for each declaration
//! - **Wiring**: [`HandlerDeclaration`], [`BootstrapDeclaration`], [`DIBinding`]
//! - **Reports**: [`ProjectReport`] (one analysis run), [`ValidationReport`]
//! - **Output**: [`MigrationPlan`] made of [`MigrationFile`]s, and the
//!   [`MappingResult`] returned by knowledge-base lookups
//!
//! # Flow
//!
//! ```text
//! source tree → ProjectReport → MigrationPlan → ValidationReport
//!                                     ↓
//!                                 apply(dir)
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod declaration;
pub mod error;
pub mod handler;
pub mod literal;
pub mod mapping;
pub mod plan;
pub mod report;
pub mod validation;

pub use declaration::{
    Capability, CapabilitySet, CapabilityUsage, Declaration, FieldSpec, LifecycleHook,
    ParameterSpec, RelationshipKind, SourceLocation,
};
pub use error::{ApplyError, PlanError};
pub use handler::{
    AuthDescriptor, BindingKind, BootstrapDeclaration, ContextKind, DIBinding, HandlerDeclaration,
    UnknownContextKind, UNNAMED_HANDLER,
};
pub use literal::LiteralValue;
pub use mapping::{MappingResult, SnippetPair};
pub use plan::{FileOperation, MigrationFile, MigrationPlan, MigrationPlanBuilder};
pub use report::{ProjectReport, ProjectReportBuilder};
pub use validation::{Severity, ValidationIssue, ValidationReport};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the entity model
    pub use crate::declaration::{Capability, CapabilitySet, Declaration, FieldSpec, LifecycleHook};
    pub use crate::handler::{BootstrapDeclaration, ContextKind, DIBinding, HandlerDeclaration};
    pub use crate::literal::LiteralValue;
    pub use crate::plan::{MigrationFile, MigrationPlan};
    pub use crate::report::ProjectReport;
    pub use crate::validation::ValidationReport;
}
