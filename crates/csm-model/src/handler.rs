//! Handler, bootstrap and DI binding types

use crate::declaration::SourceLocation;
use crate::literal::LiteralValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name given to handlers whose construction is not assigned to a variable
pub const UNNAMED_HANDLER: &str = "unnamed_handler";

/// Authentication configured on a handler
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthDescriptor {
    /// Authentication kind (last dotted segment, e.g. `SecretBearer`)
    pub kind: String,
    /// Options for the kind, in source order
    pub options: IndexMap<String, LiteralValue>,
}

impl AuthDescriptor {
    /// Descriptor without options
    #[inline]
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            options: IndexMap::new(),
        }
    }

    /// Add an option
    #[inline]
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: LiteralValue) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    /// String option by key
    #[must_use]
    pub fn option_str(&self, key: &str) -> Option<&str> {
        self.options.get(key).and_then(LiteralValue::as_symbol)
    }
}

/// A legacy request handler
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandlerDeclaration {
    /// Variable the handler was bound to, or [`UNNAMED_HANDLER`]
    pub name: String,
    /// Handler kind (short class name), when known
    pub kind: Option<String>,
    /// Raw handler configuration
    pub config: IndexMap<String, LiteralValue>,
    /// Associated declaration (class name)
    pub declaration: Option<String>,
    /// Base path the handler is mounted on
    pub base_path: Option<String>,
    /// Authentication, if configured
    pub authentication: Option<AuthDescriptor>,
    /// Where the handler was constructed
    pub location: SourceLocation,
}

impl HandlerDeclaration {
    /// Handler with empty configuration
    #[must_use]
    pub fn new(name: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            name: name.into(),
            kind: None,
            config: IndexMap::new(),
            declaration: None,
            base_path: None,
            authentication: None,
            location,
        }
    }

    /// Set handler kind
    #[inline]
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Add a configuration entry
    #[inline]
    #[must_use]
    pub fn with_config(mut self, key: impl Into<String>, value: LiteralValue) -> Self {
        self.config.insert(key.into(), value);
        self
    }

    /// Set associated declaration
    #[inline]
    #[must_use]
    pub fn with_declaration(mut self, name: impl Into<String>) -> Self {
        self.declaration = Some(name.into());
        self
    }

    /// Whether the handler was bound to a variable
    #[inline]
    #[must_use]
    pub fn is_named(&self) -> bool {
        self.name != UNNAMED_HANDLER
    }

    /// Whether readable columns are explicitly configured
    #[must_use]
    pub fn has_readable_columns(&self) -> bool {
        self.config
            .get("readable_columns")
            .is_some_and(|v| !v.is_falsy())
    }
}

/// Target runtime context wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ContextKind {
    /// Development WSGI reference server
    #[default]
    WsgiRef,
    /// Production WSGI
    Wsgi,
    /// Command line
    Cli,
    /// AWS Lambda
    Lambda,
}

impl ContextKind {
    /// Class name under `clearskies.contexts`
    #[inline]
    #[must_use]
    pub fn class_name(self) -> &'static str {
        match self {
            Self::WsgiRef => "WsgiRef",
            Self::Wsgi => "Wsgi",
            Self::Cli => "Cli",
            Self::Lambda => "Lambda",
        }
    }
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

/// Unrecognised context name
#[derive(Debug, thiserror::Error)]
#[error("unknown context kind: '{0}' (expected WsgiRef, Wsgi, Cli or Lambda)")]
pub struct UnknownContextKind(pub String);

impl FromStr for ContextKind {
    type Err = UnknownContextKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wsgiref" | "wsgi_ref" => Ok(Self::WsgiRef),
            "wsgi" => Ok(Self::Wsgi),
            "cli" => Ok(Self::Cli),
            "lambda" => Ok(Self::Lambda),
            _ => Err(UnknownContextKind(s.to_string())),
        }
    }
}

/// How a DI binding was declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingKind {
    /// `bindings={name: value}`
    Instance,
    /// `binding_classes=[Class]`
    Class,
    /// `binding_modules=[module]`
    Module,
}

/// One dependency-injection binding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DIBinding {
    /// Bound name
    pub name: String,
    /// Bound value
    pub value: LiteralValue,
    /// Declaration style
    pub kind: BindingKind,
}

impl DIBinding {
    /// Create binding
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, value: LiteralValue, kind: BindingKind) -> Self {
        Self {
            name: name.into(),
            value,
            kind,
        }
    }
}

/// A legacy application construction site
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BootstrapDeclaration {
    /// Where the construction happens
    pub location: SourceLocation,
    /// Handler kind passed to the constructor
    pub handler_kind: Option<String>,
    /// Handler configuration passed to the constructor
    pub handler_config: IndexMap<String, LiteralValue>,
    /// DI bindings declared at construction
    pub bindings: Vec<DIBinding>,
    /// Classes registered with the container
    pub classes: Vec<String>,
    /// Modules registered with the container
    pub modules: Vec<String>,
    /// Inferred runtime context
    pub context: ContextKind,
}

impl BootstrapDeclaration {
    /// Bootstrap with no configuration
    #[must_use]
    pub fn new(location: SourceLocation, context: ContextKind) -> Self {
        Self {
            location,
            handler_kind: None,
            handler_config: IndexMap::new(),
            bindings: Vec::new(),
            classes: Vec::new(),
            modules: Vec::new(),
            context,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_kind_parses_case_insensitively() {
        assert_eq!("wsgiref".parse::<ContextKind>().unwrap(), ContextKind::WsgiRef);
        assert_eq!("Lambda".parse::<ContextKind>().unwrap(), ContextKind::Lambda);
        assert!("daemon".parse::<ContextKind>().is_err());
    }

    #[test]
    fn readable_columns_must_be_non_empty() {
        let loc = SourceLocation::new("app.py", 1);
        let handler = HandlerDeclaration::new("users", loc.clone())
            .with_config("readable_columns", LiteralValue::List(vec![]));
        assert!(!handler.has_readable_columns());

        let handler = HandlerDeclaration::new("users", loc)
            .with_config("readable_columns", LiteralValue::List(vec!["id".into()]));
        assert!(handler.has_readable_columns());
    }

    #[test]
    fn unnamed_handler_detection() {
        let handler = HandlerDeclaration::new(UNNAMED_HANDLER, SourceLocation::new("app.py", 1));
        assert!(!handler.is_named());
    }
}
