//! Runtime-context generation
//!
//! The v1 `Application` becomes an explicit `clearskies.contexts.*` wrapper.
//! Wiring found in the legacy project is listed as commented-out arguments;
//! without it, placeholders show where each argument goes.

use crate::imports::assemble_module;
use crate::naming::single_line;
use csm_model::{ContextKind, DIBinding};

/// What the project knows about its entry point
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextWiring {
    /// Import statements for generated models
    pub model_imports: Vec<String>,
    /// Dotted module holding the endpoints
    pub endpoint_module: Option<String>,
    /// Endpoint variables in that module
    pub endpoints: Vec<String>,
    /// Instance bindings
    pub bindings: Vec<DIBinding>,
    /// Classes registered for injection
    pub classes: Vec<String>,
    /// Modules registered for injection
    pub modules: Vec<String>,
}

impl ContextWiring {
    fn is_empty(&self) -> bool {
        self.model_imports.is_empty()
            && self.endpoints.is_empty()
            && self.bindings.is_empty()
            && self.classes.is_empty()
            && self.modules.is_empty()
    }
}

fn variable(kind: ContextKind) -> &'static str {
    match kind {
        ContextKind::WsgiRef | ContextKind::Wsgi => "wsgi",
        ContextKind::Cli => "cli",
        ContextKind::Lambda => "app",
    }
}

fn heading(kind: ContextKind) -> &'static str {
    match kind {
        ContextKind::WsgiRef | ContextKind::Wsgi => "# WSGI application",
        ContextKind::Cli => "# CLI application",
        ContextKind::Lambda => "# Lambda application",
    }
}

fn endpoint_argument(kind: ContextKind, endpoints: &[String]) -> String {
    let todo = if kind == ContextKind::Lambda {
        "Configure endpoint"
    } else {
        "Add your endpoint"
    };
    match endpoints {
        [] => format!("    # your_endpoint,  # TODO: {todo}"),
        [one] => format!("    # {one},  # TODO: {todo}"),
        many => format!(
            "    # clearskies.EndpointGroup([{}]),  # TODO: {todo}s",
            many.join(", ")
        ),
    }
}

/// Module wrapping the application in a `kind` context
#[must_use]
pub fn generate_context(kind: ContextKind, wiring: &ContextWiring) -> String {
    let mut lines = vec!["# Import your models and endpoints".to_string()];
    if wiring.is_empty() {
        lines.push("# from models.user import User".into());
        lines.push("# from endpoints import user_endpoint".into());
    } else {
        lines.extend(wiring.model_imports.iter().map(|i| format!("# {i}")));
        if let (Some(module), false) = (&wiring.endpoint_module, wiring.endpoints.is_empty()) {
            lines.push(format!("# from {module} import {}", wiring.endpoints.join(", ")));
        }
    }
    lines.push(String::new());
    lines.push(heading(kind).into());
    lines.push(format!(
        "{} = clearskies.contexts.{}(",
        variable(kind),
        kind.class_name()
    ));
    lines.push(endpoint_argument(kind, &wiring.endpoints));

    let bindings: Vec<String> = wiring
        .bindings
        .iter()
        .map(|b| {
            single_line(&format!(
                "{}: {}",
                csm_model::literal::quote(&b.name),
                b.value.to_python()
            ))
        })
        .collect();
    if !bindings.is_empty() || kind != ContextKind::Lambda {
        lines.push(format!(
            "    # bindings={{{}}},  # TODO: Add DI bindings",
            bindings.join(", ")
        ));
    }
    if !wiring.classes.is_empty() || matches!(kind, ContextKind::WsgiRef | ContextKind::Wsgi) {
        lines.push(format!(
            "    # classes=[{}],  # TODO: Add classes for DI",
            single_line(&wiring.classes.join(", "))
        ));
    }
    if !wiring.modules.is_empty() {
        lines.push(format!(
            "    # modules=[{}],  # TODO: Add modules for DI",
            single_line(&wiring.modules.join(", "))
        ));
    }
    lines.push(")".into());

    assemble_module(&lines.join("\n"), &[])
}
