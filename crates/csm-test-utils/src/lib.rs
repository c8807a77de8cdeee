//! Testing utilities for the CSM workspace
//!
//! Legacy clearskies v1 source fixtures, on-disk project builders and
//! synthetic report builders.

#![allow(missing_docs)]

use csm_model::{
    AuthDescriptor, ContextKind, Declaration, FieldSpec, HandlerDeclaration, LifecycleHook,
    LiteralValue, ProjectReport, SourceLocation,
};
use std::path::Path;
use tempfile::TempDir;

/// One model with three columns and a `pre_save` hook
pub const V1_USER_MODEL: &str = r#"from collections import OrderedDict
from clearskies import Model
from clearskies import column_types


class User(Model):
    id_column_name = "id"
    table_name = "users"

    def __init__(self, memory_backend, columns):
        super().__init__(memory_backend, columns)

    def columns_configuration(self):
        return OrderedDict([
            ("name", {"class": column_types.String}),
            ("email", {"class": column_types.Email}),
            ("age", {"class": column_types.Integer}),
        ])

    def pre_save(self, data):
        data["name"] = data["name"].strip()
        return data
"#;

/// Handler for `User` without readable-column configuration
pub const V1_USER_APP: &str = r#"import clearskies
from models import User

users = clearskies.Application(
    handler_class=clearskies.handlers.RestfulApi,
    handler_config={
        "model_class": User,
        "base_url": "users",
        "writeable_columns": ["name", "email"],
    },
)
"#;

/// Model reaching the DI container and a logger
pub const V1_DI_MODEL: &str = r#"import logging
from collections import OrderedDict
from clearskies import Model, column_types


class Order(Model):
    backend = clearskies.backends.CursorBackend

    def __init__(self, di, api_key: str, retries=3):
        self._di = di

    def columns_configuration(self):
        return OrderedDict([
            ("total", {"class": column_types.Float, "default": 0.0}),
            ("status", {"class": column_types.Select, "values": ["new", "paid"]}),
            ("created_at", {"class": column_types.Created}),
        ])

    def charge(self):
        gateway = self._di.build("payment_gateway")
        self.logger.info("charging")
        return gateway

    def refund(self):
        return self._di.build(Cursor)

    def post_save(self, data, id):
        pass
"#;

/// Full-featured bootstrap with authentication and bindings
pub const V1_SECURED_APP: &str = r#"import clearskies

orders_api = clearskies.Application(
    handler_class=clearskies.handlers.RestfulApi,
    handler_config={
        "model_class": Order,
        "base_url": "orders",
        "readable_columns": ["id", "total", "status"],
        "writeable_columns": ["total", "status"],
        "authentication": clearskies.authentication.SecretBearer(environment_key="ORDERS_KEY"),
    },
    bindings={"api_key": "secret"},
    binding_classes=[PaymentGateway],
)
"#;

/// File the parser must reject
pub const V1_BROKEN: &str = "class Broken(Model:\n    def oops(self\n";

/// Model with many custom methods
pub const V1_BUSY_MODEL: &str = r#"from clearskies import Model


class Report(Model):
    def a(self): pass
    def b(self): pass
    def c(self): pass
    def d(self): pass
    def e(self): pass
    def f(self): pass
"#;

/// Temporary project directory
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    /// Empty project
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Project with the given files (relative path, content)
    #[must_use]
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let project = Self::new();
        for (path, content) in files {
            project.write(path, content);
        }
        project
    }

    /// Write one file, creating parent directories
    pub fn write(&self, relative: &str, content: &str) {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    /// Project root
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Declaration with `(name, type)` fields
#[must_use]
pub fn declaration(name: &str, fields: &[(&str, &str)]) -> Declaration {
    let file = format!("models/{}.py", name.to_ascii_lowercase());
    fields.iter().fold(
        Declaration::new(name, SourceLocation::new(file, 1)),
        |decl, (field, ty)| decl.with_field(FieldSpec::new(*field, *ty)),
    )
}

/// `User` declaration matching [`V1_USER_MODEL`]
#[must_use]
pub fn user_declaration() -> Declaration {
    let mut user = declaration("User", &[("name", "String"), ("email", "Email"), ("age", "Integer")])
        .with_hook(LifecycleHook::PreSave);
    user.destination = Some("users".into());
    user
}

/// RESTful handler bound to `model`
#[must_use]
pub fn handler(name: &str, model: &str) -> HandlerDeclaration {
    HandlerDeclaration::new(name, SourceLocation::new("app.py", 1))
        .with_kind("RestfulApi")
        .with_declaration(model)
        .with_config("model_class", LiteralValue::Name(model.into()))
        .with_config("base_url", LiteralValue::Str(format!("{}s", model.to_ascii_lowercase())))
}

/// Handler secured with `kind` authentication
#[must_use]
pub fn secured_handler(name: &str, model: &str, kind: &str) -> HandlerDeclaration {
    let mut h = handler(name, model);
    h.authentication = Some(AuthDescriptor::new(kind));
    h
}

/// Report containing the given declarations and handlers
#[must_use]
pub fn report(declarations: Vec<Declaration>, handlers: Vec<HandlerDeclaration>) -> ProjectReport {
    let mut builder = ProjectReport::builder("/project");
    for d in declarations {
        builder.declaration(d);
    }
    for h in handlers {
        builder.handler(h);
    }
    builder.build()
}

/// Bootstrap-only report for `context`
#[must_use]
pub fn bootstrap_report(context: ContextKind) -> ProjectReport {
    let mut builder = ProjectReport::builder("/project");
    builder.bootstrap(csm_model::BootstrapDeclaration::new(
        SourceLocation::new("app.py", 1),
        context,
    ));
    builder.build()
}
