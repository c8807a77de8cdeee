//! CSM Source Generators
//!
//! Renders clearskies v2 Python from the declarations the parser extracts.
//!
//! # Overview
//!
//! - **declaration**: one model module per v1 model, with column attributes,
//!   a typed `__init__` and hook stubs
//! - **endpoint**: endpoint constructors for every handler, combined into
//!   one module
//! - **context**: the runtime context wrapping the application
//! - **auth**: authentication constructors
//! - **di**: property-injection snippets
//! - **imports**: import detection, grouping, cleanup and merging
//! - **annotations**: parameter and return type rules
//!
//! Every generator computes its imports from the code it rendered, so a
//! module never imports something it does not use.
//!
//! # Example
//!
//! ```rust
//! use csm_codegen::generate_property_injection;
//!
//! let code = generate_property_injection("Order", &["PaymentGateway"]);
//! assert!(code.contains("payment_gateway = inject.ByClass(PaymentGateway)"));
//! assert!(code.starts_with("import clearskies\nfrom clearskies.di import InjectableProperties, inject\n"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod annotations;
pub mod auth;
pub mod context;
pub mod declaration;
pub mod di;
pub mod endpoint;
pub mod imports;
pub mod naming;

pub use auth::{generate_auth, AuthCode};
pub use context::{generate_context, ContextWiring};
pub use declaration::DeclarationGenerator;
pub use di::generate_property_injection;
pub use endpoint::{EndpointGenerator, EndpointModule, ModelRef};
pub use imports::{
    assemble_module, cleanup_unused_imports, detect_required_imports, generate_import_block,
    merge_duplicate_imports,
};
pub use naming::{class_guess, is_identifier, module_path, snake_case, unreserved};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for generating v2 sources
    pub use crate::{
        generate_context, ContextWiring, DeclarationGenerator, EndpointGenerator, ModelRef,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
