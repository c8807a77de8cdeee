//! CSM Structural Parser
//!
//! Reads legacy clearskies sources into the entity model.
//!
//! # Overview
//!
//! - **SourceParser**: one file in, a [`ParsedFile`] out
//! - **DeclarationParser**: model classes, fields, hooks, custom methods
//! - **BootstrapParser**: `Application(...)` calls, handlers, DI bindings
//! - **CapabilityDetector**: configurable / injectable / loggable predicates
//! - **syntax**: tree-sitter helpers shared with the validator and codegen
//!
//! # Example
//!
//! ```rust
//! use csm_parser::SourceParser;
//! use std::path::Path;
//!
//! let src = "class User(Model):\n    table_name = 'users'\n";
//! let file = SourceParser::new().parse_source(Path::new("models.py"), src).unwrap();
//! assert_eq!(file.declarations[0].destination.as_deref(), Some("users"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod bootstrap;
pub mod capability;
pub mod context;
pub mod declaration;
pub mod error;
pub mod literal;
pub mod settings;
pub mod source;
pub mod syntax;

pub use bootstrap::{BootstrapParser, BootstrapSite};
pub use capability::{CapabilityAnalysis, CapabilityDetector};
pub use context::ContextDetector;
pub use declaration::{DeclarationParser, FIELD_CONFIGURATION_METHOD};
pub use error::ParseError;
pub use settings::DetectorSettings;
pub use source::{ParsedFile, SourceParser};
pub use syntax::ParsedSource;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for parsing
    pub use crate::{DetectorSettings, ParseError, ParsedFile, ParsedSource, SourceParser};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
