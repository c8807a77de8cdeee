//! CSM Mapping Knowledge Base
//!
//! Read-only v1 → v2 translation data for clearskies.
//!
//! # Overview
//!
//! - **tables**: class, import, config-key, backend, breaking-change and
//!   authentication tables, shared process-wide without locking
//! - **Mapper**: lookups and snippet translation over those tables, with an
//!   optional [`SymbolCatalog`] to confirm targets exist
//! - **concepts**: Markdown explanations, worked examples, the checklist
//!
//! # Example
//!
//! ```rust
//! use csm_knowledge::Mapper;
//!
//! let mapper = Mapper::new();
//! assert_eq!(mapper.map_column_type("UUID"), "Uuid");
//! assert_eq!(mapper.map_config_key("base_url"), "url");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod concepts;
pub mod mapper;
pub mod tables;

pub use concepts::{concept_example, explain_concept, migration_checklist, pattern_example};
pub use mapper::{Mapper, StaticCatalog, SymbolCatalog};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for knowledge-base lookups
    pub use crate::{explain_concept, migration_checklist, Mapper, SymbolCatalog};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
