//! Endpoint generation
//!
//! Every legacy handler becomes one `clearskies.endpoints.*` assignment in a
//! combined module. Keyword order: `url`, `model_class`, readable and
//! writeable columns, authentication, then any remaining configuration with
//! keys translated through the knowledge base.

use crate::auth::generate_auth;
use crate::imports::assemble_module;
use crate::naming::{is_identifier, snake_case};
use csm_knowledge::tables::{tail, CLASS_MAPPINGS};
use csm_knowledge::Mapper;
use csm_model::literal::quote;
use csm_model::{Declaration, HandlerDeclaration, LiteralValue};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Endpoint used when a handler's kind is absent or has no v2 counterpart
pub const DEFAULT_ENDPOINT: &str = "RestfulApi";

/// Configuration keys consumed before the pass-through options
static CONSUMED_KEYS: &[&str] = &[
    "base_url",
    "url",
    "model_class",
    "authentication",
    "authentication_config",
];

/// Columns the framework fills in itself
static AUTO_POPULATED: &[&str] = &["created_at", "updated_at"];
static AUTO_POPULATED_TYPES: &[&str] = &["Created", "Updated"];

/// A declaration the combined module can import
#[derive(Debug, Clone, Copy)]
pub struct ModelRef<'a> {
    /// Resolved declaration
    pub declaration: &'a Declaration,
    /// Dotted module it is generated into
    pub module: &'a str,
}

/// Rendered combined module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointModule {
    /// Module text
    pub content: String,
    /// Endpoint variables, in handler order
    pub variables: Vec<String>,
}

/// Renders `clearskies.endpoints.*` assignments
#[derive(Debug, Clone, Copy)]
pub struct EndpointGenerator<'m> {
    mapper: &'m Mapper,
}

impl<'m> EndpointGenerator<'m> {
    /// Generator resolving names through `mapper`
    #[inline]
    #[must_use]
    pub fn new(mapper: &'m Mapper) -> Self {
        Self { mapper }
    }

    /// v2 endpoint class for a handler kind, and whether it was resolved
    #[must_use]
    pub fn endpoint_class(&self, kind: Option<&str>) -> (String, bool) {
        let Some(kind) = kind else {
            return (DEFAULT_ENDPOINT.to_string(), true);
        };
        let mapped = self.mapper.map_class(&format!("clearskies.handlers.{kind}"));
        if let Some(target) = mapped.target_tail() {
            return (target.to_string(), true);
        }
        CLASS_MAPPINGS
            .iter()
            .filter(|(v1, _)| v1.starts_with("clearskies.handlers."))
            .find(|(v1, _)| tail(v1).eq_ignore_ascii_case(kind))
            .map_or_else(
                || (DEFAULT_ENDPOINT.to_string(), false),
                |(_, v2)| (tail(v2).to_string(), true),
            )
    }

    /// One `variable = clearskies.endpoints.X(...)` statement
    #[must_use]
    pub fn generate(
        &self,
        handler: &HandlerDeclaration,
        declaration: Option<&Declaration>,
        variable: &str,
    ) -> String {
        let (class, resolved) = self.endpoint_class(handler.kind.as_deref());
        let mut lines = Vec::new();
        if !resolved {
            lines.push(format!(
                "# TODO: {} has no known v2 endpoint; {DEFAULT_ENDPOINT} assumed",
                handler.kind.as_deref().unwrap_or_default()
            ));
        }
        lines.push(format!("{variable} = clearskies.endpoints.{class}("));

        let url = handler.base_path.clone().or_else(|| {
            ["base_url", "url"]
                .iter()
                .find_map(|k| handler.config.get(*k).and_then(LiteralValue::as_str))
                .map(str::to_string)
        });
        if let Some(url) = url {
            lines.push(format!("    url={},", quote(&url)));
        }
        if let Some(model) = model_name(handler) {
            lines.push(format!("    model_class={model},"));
        }

        let mut options: IndexMap<String, String> = IndexMap::new();
        let mut unsupported = Vec::new();
        for (key, value) in &handler.config {
            if CONSUMED_KEYS.contains(&key.as_str()) {
                continue;
            }
            if is_identifier(key) {
                options.insert(self.mapper.map_config_key(key).to_string(), value.to_python());
            } else {
                unsupported.push(key.clone());
            }
        }

        let readable = declaration.map(|d| {
            d.field_names()
                .filter(|name| !name.starts_with('_'))
                .map(str::to_string)
                .collect::<Vec<_>>()
        });
        let writeable = declaration.map(writeable_columns);
        for (key, default) in [
            ("readable_column_names", readable),
            ("writeable_column_names", writeable),
        ] {
            match (options.shift_remove(key), default) {
                (Some(explicit), _) => lines.push(format!("    {key}={explicit},")),
                (None, Some(columns)) => lines.push(format!("    {key}={},", string_list(columns))),
                (None, None) => lines.push(format!("    # TODO: set {key}")),
            }
        }

        if let Some(auth) = &handler.authentication {
            lines.push(format!("    {}", generate_auth(auth, self.mapper).render()));
        }
        for (key, value) in options {
            lines.push(format!("    {key}={value},"));
        }
        for key in unsupported {
            lines.push(format!("    # TODO: migrate option {}", quote(&key)));
        }
        lines.push(")".to_string());
        lines.join("\n")
    }

    /// Combined module for every handler
    ///
    /// Declarations are matched to handlers by exact name.
    #[must_use]
    pub fn generate_file(
        &self,
        handlers: &[HandlerDeclaration],
        models: &[ModelRef<'_>],
    ) -> EndpointModule {
        let mut used = HashSet::new();
        let mut imports: Vec<String> = Vec::new();
        let mut unresolved: Vec<String> = Vec::new();
        let mut statements = Vec::new();
        let mut variables = Vec::new();

        for handler in handlers {
            let model = model_name(handler);
            let resolved = model.and_then(|name| models.iter().find(|m| m.declaration.name == name));
            match (model, resolved) {
                (_, Some(m)) => {
                    let import = format!("from {} import {}", m.module, m.declaration.name);
                    if !imports.contains(&import) {
                        imports.push(import);
                    }
                }
                (Some(name), None) if !unresolved.iter().any(|u| u == name) => {
                    unresolved.push(name.to_string());
                }
                _ => {}
            }

            let variable = unique(&mut used, base_variable(handler, model));
            statements.push(self.generate(handler, resolved.map(|m| m.declaration), &variable));
            variables.push(variable);
        }

        let mut body: Vec<String> = unresolved
            .iter()
            .map(|name| format!("# TODO: import {name}"))
            .collect();
        if !body.is_empty() {
            body.push(String::new());
        }
        body.push(statements.join("\n\n"));

        EndpointModule {
            content: assemble_module(&body.join("\n"), &imports),
            variables,
        }
    }
}

fn model_name(handler: &HandlerDeclaration) -> Option<&str> {
    handler.declaration.as_deref().or_else(|| {
        handler
            .config
            .get("model_class")
            .and_then(LiteralValue::symbol_tail)
    })
}

fn writeable_columns(declaration: &Declaration) -> Vec<String> {
    declaration
        .fields
        .iter()
        .filter(|f| !f.name.starts_with('_') && f.name != declaration.id_field)
        .filter(|f| !AUTO_POPULATED.contains(&f.name.as_str()))
        .filter(|f| !AUTO_POPULATED_TYPES.contains(&f.source_type.as_str()))
        .map(|f| f.name.clone())
        .collect()
}

fn string_list(items: Vec<String>) -> String {
    LiteralValue::List(items.into_iter().map(LiteralValue::Str).collect()).to_python()
}

fn base_variable(handler: &HandlerDeclaration, model: Option<&str>) -> String {
    if handler.is_named() && is_identifier(&handler.name) {
        handler.name.clone()
    } else if let Some(model) = model {
        format!("{}_endpoint", snake_case(model))
    } else {
        "endpoint".to_string()
    }
}

fn unique(used: &mut HashSet<String>, base: String) -> String {
    if used.insert(base.clone()) {
        return base;
    }
    (2..)
        .map(|n| format!("{base}_{n}"))
        .find(|candidate| used.insert(candidate.clone()))
        .unwrap_or(base)
}
