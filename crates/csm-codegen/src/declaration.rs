//! Model generation
//!
//! A [`Declaration`] becomes one v2 model module: capability mixins ahead of
//! `clearskies.Model`, class-level backend, `configs.*` attributes and a
//! decorated initializer for configurable models, `inject.*` properties for
//! build targets, one `columns.*` attribute per field, typed hook stubs and
//! a review list of custom methods.

use crate::annotations::{hook_stub, parameter_type, ANY};
use crate::imports::assemble_module;
use crate::naming::{class_guess, is_identifier, single_line, snake_case};
use csm_knowledge::Mapper;
use csm_model::literal::quote;
use csm_model::{Capability, Declaration, FieldSpec, LiteralValue, ParameterSpec};
use std::collections::BTreeSet;

/// Concrete base every generated model ends with
pub const MODEL_BASE: &str = "clearskies.Model";

/// Mixin expression per capability
#[must_use]
pub fn mixin(capability: Capability) -> &'static str {
    match capability {
        Capability::Configurable => "configurable.Configurable",
        Capability::Injectable => "InjectableProperties",
        Capability::Loggable => "loggable.Loggable",
    }
}

/// Names a class attribute must not take: the body reads these modules
static RESERVED_ATTRIBUTES: &[&str] = &[
    "clearskies",
    "columns",
    "configs",
    "configurable",
    "inject",
    "loggable",
    "parameters_to_properties",
];

/// Build targets served by a dedicated `inject` helper
static INJECT_HELPERS: &[(&str, &str)] = &[
    ("models", "inject.ByName(\"models\")"),
    ("cursor", "inject.ByName(\"cursor\")"),
    ("utcnow", "inject.Utcnow()"),
    ("time", "inject.Utcnow()"),
    ("environment", "inject.Environment()"),
    ("requests", "inject.Requests()"),
    ("logger", "inject.Logger()"),
];

/// `configs.*` class for an initializer parameter
///
/// The declared hint decides first, then the default's type; strings are the
/// fallback.
#[must_use]
pub fn config_kind(param: &ParameterSpec) -> &'static str {
    let from_hint = param.type_hint.as_deref().and_then(|hint| {
        let head = hint
            .trim()
            .split(|c: char| c == '[' || c == '|' || c.is_whitespace())
            .next()
            .unwrap_or_default();
        match head.rsplit('.').next().unwrap_or(head).to_ascii_lowercase().as_str() {
            "str" => Some("String"),
            "int" => Some("Integer"),
            "bool" => Some("Boolean"),
            "dict" | "mapping" => Some("StringDict"),
            "list" | "sequence" | "tuple" => Some("List"),
            _ => None,
        }
    });
    from_hint.unwrap_or(match param.default {
        Some(LiteralValue::Int(_)) => "Integer",
        Some(LiteralValue::Bool(_)) => "Boolean",
        Some(LiteralValue::Dict(_)) => "StringDict",
        Some(LiteralValue::List(_)) => "List",
        _ => "String",
    })
}

/// Annotation for an initializer parameter
fn init_hint(param: &ParameterSpec) -> String {
    if let Some(hint) = &param.type_hint {
        return hint.clone();
    }
    let from_default = match param.default {
        Some(LiteralValue::Str(_)) => Some("str"),
        Some(LiteralValue::Int(_)) => Some("int"),
        Some(LiteralValue::Float(_)) => Some("float"),
        Some(LiteralValue::Bool(_)) => Some("bool"),
        Some(LiteralValue::List(_)) => Some("list[Any]"),
        Some(LiteralValue::Dict(_)) => Some("dict[str, Any]"),
        _ => None,
    };
    from_default
        .or_else(|| parameter_type(&param.name))
        .unwrap_or(ANY)
        .to_string()
}

fn init_parameter(param: &ParameterSpec) -> String {
    let hint = init_hint(param);
    if hint == ANY || hint.contains("None") || hint.starts_with("Optional") {
        format!("{}: {hint} = None", param.name)
    } else {
        format!("{}: {hint} | None = None", param.name)
    }
}

/// Renders v2 model modules
#[derive(Debug, Clone, Copy)]
pub struct DeclarationGenerator<'m> {
    mapper: &'m Mapper,
}

impl<'m> DeclarationGenerator<'m> {
    /// Generator resolving types through `mapper`
    #[inline]
    #[must_use]
    pub fn new(mapper: &'m Mapper) -> Self {
        Self { mapper }
    }

    /// Complete module for one declaration
    #[must_use]
    pub fn generate(&self, declaration: &Declaration) -> String {
        tracing::debug!("Generating model {}", declaration.name);
        assemble_module(&self.class_body(declaration), &[])
    }

    /// The class definition alone
    #[must_use]
    pub fn class_body(&self, declaration: &Declaration) -> String {
        let caps = &declaration.capabilities;
        let configurable =
            caps.contains(Capability::Configurable) && !declaration.init_params.is_empty();

        let bases: Vec<&str> = caps
            .iter()
            .map(mixin)
            .chain(std::iter::once(MODEL_BASE))
            .collect();
        let mut lines = vec![
            format!("class {}({}):", declaration.name, bases.join(", ")),
            format!("    \"\"\"{} model.\"\"\"", declaration.name),
            String::new(),
            format!("    id_column_name = \"{}\"", declaration.id_field),
            format!(
                "    backend = clearskies.backends.{}()",
                self.mapper.map_backend(&declaration.backend)
            ),
        ];
        if let Some(table) = &declaration.destination {
            lines.push(format!("    table_name = {}", quote(table)));
        }

        if configurable {
            lines.push(String::new());
            lines.push("    # Configuration attributes".into());
            lines.extend(declaration.init_params.iter().map(config_attribute));
        }

        if caps.contains(Capability::Injectable) && !declaration.usage.build_targets.is_empty() {
            lines.push(String::new());
            lines.push("    # Dependency injection properties".into());
            lines.extend(injection_properties(&declaration.usage.build_targets));
        }

        if !declaration.fields.is_empty() {
            lines.push(String::new());
            lines.extend(declaration.fields.iter().map(|f| self.column(f)));
        }

        if configurable {
            let params: Vec<String> = declaration.init_params.iter().map(init_parameter).collect();
            lines.push(String::new());
            lines.push("    @parameters_to_properties".into());
            lines.push(format!("    def __init__(self, {}) -> None:", params.join(", ")));
            lines.push(format!("        \"\"\"Configure {}.\"\"\"", declaration.name));
            lines.push("        self.finalize_and_validate_configuration()".into());
        }

        if !declaration.hooks.is_empty() {
            lines.push(String::new());
            lines.push("    # Lifecycle hooks".into());
            let stubs: Vec<String> = declaration.hooks.iter().map(|h| hook_stub(*h)).collect();
            lines.push(stubs.join("\n\n"));
        }

        if !declaration.custom_methods.is_empty() {
            lines.push(String::new());
            lines.push("    # TODO: Migrate custom methods:".into());
            lines.extend(
                declaration
                    .custom_methods
                    .iter()
                    .map(|m| format!("    # - {m}()")),
            );
        }

        lines.join("\n")
    }

    /// `name = columns.Type(options)`
    ///
    /// A field or option name Python cannot bind is kept as a commented-out
    /// line under a TODO.
    #[must_use]
    pub fn column(&self, field: &FieldSpec) -> String {
        let options: Vec<String> = field
            .options
            .iter()
            .map(|(key, value)| format!("{key}={}", value.to_python()))
            .collect();
        let line = format!(
            "{} = columns.{}({})",
            field.name,
            self.mapper.map_column_type(&field.source_type),
            options.join(", ")
        );
        let todo = if is_identifier(&field.name) {
            field
                .options
                .keys()
                .find(|key| !is_identifier(key))
                .map(|key| format!("migrate column option {} by hand", quote(key)))
        } else {
            Some(format!(
                "rename column {}, it is not a valid attribute name",
                quote(&field.name)
            ))
        };
        match todo {
            Some(todo) => format!("    # TODO: {todo}\n    # {}", single_line(&line)),
            None => format!("    {line}"),
        }
    }
}

fn config_attribute(param: &ParameterSpec) -> String {
    let default = match &param.default {
        Some(value) if *value != LiteralValue::None => format!("default={}", value.to_python()),
        _ => String::new(),
    };
    let line = format!("{} = configs.{}({default})", param.name, config_kind(param));
    if RESERVED_ATTRIBUTES.contains(&param.name.as_str()) {
        format!(
            "    # TODO: rename configuration '{}', it shadows a module used by this class\n    # {}",
            param.name,
            single_line(&line)
        )
    } else {
        format!("    {line}")
    }
}

fn injection_properties(targets: &[String]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    targets
        .iter()
        .filter_map(|target| {
            let property = snake_case(target);
            if !seen.insert(property.clone()) {
                return None;
            }
            let helper = INJECT_HELPERS
                .iter()
                .find(|(name, _)| *name == target.to_ascii_lowercase())
                .map(|(_, helper)| (*helper).to_string());
            let class = class_guess(target);
            let class_ok = helper.is_some() || is_identifier(&class);
            let value = helper.unwrap_or_else(|| format!("inject.ByClass({class})"));
            if is_identifier(&property) && class_ok {
                Some(format!("    {property} = {value}"))
            } else {
                Some(format!(
                    "    # TODO: inject {} under a valid attribute name\n    # {property} = {value}",
                    quote(target)
                ))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use csm_model::{CapabilityUsage, LifecycleHook};
    use csm_parser::ParsedSource;
    use csm_test_utils::{declaration, user_declaration};
    use pretty_assertions::assert_eq;

    fn generate(decl: &Declaration) -> String {
        DeclarationGenerator::new(&Mapper::new()).generate(decl)
    }

    #[test]
    fn plain_model() {
        let out = generate(&user_declaration());
        assert_eq!(
            out,
            r#"from typing import Any

import clearskies
from clearskies import columns


class User(clearskies.Model):
    """User model."""

    id_column_name = "id"
    backend = clearskies.backends.MemoryBackend()
    table_name = "users"

    name = columns.String()
    email = columns.Email()
    age = columns.Integer()

    # Lifecycle hooks
    def pre_save(self, data: dict[str, Any], **kwargs: Any) -> None:
        """Hook: pre_save."""
        # TODO: Migrate pre_save logic
        pass
"#
        );
    }

    #[test]
    fn column_types_and_options_are_mapped() {
        let field = FieldSpec::new("external_id", "UUID")
            .with_option("is_unique", LiteralValue::Bool(true))
            .with_option("values", LiteralValue::List(vec!["a".into()]));
        let out = DeclarationGenerator::new(&Mapper::new()).column(&field);
        assert_eq!(out, r#"    external_id = columns.Uuid(is_unique=True, values=["a"])"#);
    }

    #[test]
    fn mixins_in_canonical_order() {
        let mut decl = declaration("Order", &[]);
        decl.capabilities.insert(Capability::Loggable);
        decl.capabilities.insert(Capability::Injectable);
        decl.capabilities.insert(Capability::Configurable);
        decl.init_params.push(ParameterSpec::new("api_key").with_type_hint("str"));
        let out = generate(&decl);
        assert!(out.contains(
            "class Order(configurable.Configurable, InjectableProperties, loggable.Loggable, clearskies.Model):"
        ));
        assert!(out.contains("from clearskies import configs, configurable, loggable"));
        assert!(out.contains("from clearskies.di import InjectableProperties"));
    }

    #[test]
    fn configurable_model() {
        let mut decl = declaration("Order", &[]).with_backend("CursorBackend");
        decl.capabilities.insert(Capability::Configurable);
        decl.init_params = vec![
            ParameterSpec::new("api_key").with_type_hint("str"),
            ParameterSpec::new("retries").with_default(LiteralValue::Int(3)),
            ParameterSpec::new("cursor"),
        ];
        let out = generate(&decl);
        assert!(out.contains("    backend = clearskies.backends.CursorBackend()"));
        assert!(out.contains("    api_key = configs.String()\n"));
        assert!(out.contains("    retries = configs.Integer(default=3)\n"));
        assert!(out.contains("from clearskies.decorators import parameters_to_properties"));
        assert!(out.contains(
            "    def __init__(self, api_key: str | None = None, retries: int | None = None, cursor: Cursor | None = None) -> None:"
        ));
        assert!(out.contains("if TYPE_CHECKING:\n    from clearskies.backends.cursor import Cursor"));
        assert!(out.starts_with("from __future__ import annotations\n"));
    }

    #[test]
    fn shadowing_configuration_is_commented_out() {
        let mut decl = declaration("User", &[("name", "String")]);
        decl.capabilities.insert(Capability::Configurable);
        decl.init_params = vec![ParameterSpec::new("memory_backend"), ParameterSpec::new("columns")];
        let out = generate(&decl);
        assert!(out.contains("    memory_backend = configs.String()\n"));
        assert!(out.contains("    # columns = configs.String()\n"));
        assert!(out.contains("    name = columns.String()"));
        assert!(out.contains("memory_backend: Any = None, columns: Any = None"));
    }

    #[test]
    fn build_targets_become_properties() {
        let mut decl = declaration("Order", &[]);
        decl.capabilities.insert(Capability::Injectable);
        decl.usage = CapabilityUsage {
            injects_via_initializer: true,
            build_targets: vec!["payment_gateway".into(), "Cursor".into(), "utcnow".into()],
        };
        let out = generate(&decl);
        assert!(out.contains("    # Dependency injection properties\n"));
        assert!(out.contains("    payment_gateway = inject.ByClass(PaymentGateway)\n"));
        assert!(out.contains("    cursor = inject.ByName(\"cursor\")\n"));
        assert!(out.contains("    utcnow = inject.Utcnow()\n"));
        assert!(out.contains("from clearskies.di import InjectableProperties, inject"));
    }

    #[test]
    fn unbindable_column_names_are_commented_out() {
        let decl = declaration("Message", &[("from", "String"), ("first-name", "String"), ("body", "String")]);
        let out = generate(&decl);
        assert!(out.contains(
            "    # TODO: rename column \"from\", it is not a valid attribute name\n    # from = columns.String()\n"
        ));
        assert!(out.contains("    # first-name = columns.String()\n"));
        assert!(out.contains("    body = columns.String()"));
        assert!(!ParsedSource::parse(&out).unwrap().has_error(), "{out}");
    }

    #[test]
    fn unbindable_column_options_are_commented_out() {
        let field = FieldSpec::new("title", "String").with_option("max-length", LiteralValue::Int(5));
        let out = DeclarationGenerator::new(&Mapper::new()).column(&field);
        assert_eq!(
            out,
            "    # TODO: migrate column option \"max-length\" by hand\n    # title = columns.String(max-length=5)"
        );
    }

    #[test]
    fn unbindable_build_targets_are_commented_out() {
        let mut decl = declaration("Return", &[]);
        decl.capabilities.insert(Capability::Injectable);
        decl.usage = CapabilityUsage {
            injects_via_initializer: false,
            build_targets: vec!["payment-gateway".into(), "2fa".into(), "mailer".into()],
        };
        let out = generate(&decl);
        assert!(out.contains(
            "    # TODO: inject \"payment-gateway\" under a valid attribute name\n    # payment-gateway = inject.ByClass(PaymentGateway)\n"
        ));
        assert!(out.contains("    # 2fa = inject.ByClass(2fa)\n"));
        assert!(out.contains("    mailer = inject.ByClass(Mailer)\n"));
        assert!(!ParsedSource::parse(&out).unwrap().has_error(), "{out}");
    }

    #[test]
    fn custom_methods_listed_for_review() {
        let decl = declaration("Order", &[])
            .with_custom_method("charge")
            .with_custom_method("refund")
            .with_hook(LifecycleHook::PostSave);
        let out = generate(&decl);
        assert!(out.contains("    # TODO: Migrate custom methods:\n    # - charge()\n    # - refund()\n"));
        assert!(out.contains("def post_save(self, data: dict[str, Any], id: str | int, **kwargs: Any) -> None:"));
    }

    #[test]
    fn config_kinds() {
        let kind = |p: ParameterSpec| config_kind(&p);
        assert_eq!(kind(ParameterSpec::new("a").with_type_hint("list[str]")), "List");
        assert_eq!(kind(ParameterSpec::new("a").with_type_hint("dict[str, Any]")), "StringDict");
        assert_eq!(kind(ParameterSpec::new("a").with_default(LiteralValue::Bool(true))), "Boolean");
        assert_eq!(kind(ParameterSpec::new("a")), "String");
    }
}
