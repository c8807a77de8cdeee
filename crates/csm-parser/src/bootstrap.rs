//! Bootstrap parser
//!
//! Finds legacy `Application(...)` construction calls. Each call yields a
//! [`BootstrapDeclaration`] and, when it configures a handler, a
//! [`HandlerDeclaration`] plus the DI bindings it declares.

use crate::context::ContextDetector;
use crate::literal::{literal, string_keyed};
use crate::settings::DetectorSettings;
use crate::syntax::{descendants_of_kind, line_of, named_children, node_text};
use csm_model::{
    AuthDescriptor, BindingKind, BootstrapDeclaration, DIBinding, HandlerDeclaration,
    LiteralValue, SourceLocation, UNNAMED_HANDLER,
};
use std::path::Path;
use tree_sitter::Node;

/// Everything extracted from one construction call
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapSite {
    /// Handler configured by the call
    pub handler: Option<HandlerDeclaration>,
    /// The bootstrap itself
    pub bootstrap: BootstrapDeclaration,
    /// DI bindings, in declaration order (instances, classes, modules)
    pub bindings: Vec<DIBinding>,
}

/// Extracts bootstrap sites from a module
#[derive(Debug, Clone, Copy)]
pub struct BootstrapParser<'a> {
    settings: &'a DetectorSettings,
    contexts: ContextDetector,
}

impl<'a> BootstrapParser<'a> {
    /// Create parser
    #[inline]
    #[must_use]
    pub fn new(settings: &'a DetectorSettings, contexts: ContextDetector) -> Self {
        Self { settings, contexts }
    }

    /// Every construction call in the module, in document order
    #[must_use]
    pub fn parse(&self, root: Node<'_>, source: &str, path: &Path) -> Vec<BootstrapSite> {
        descendants_of_kind(root, "call")
            .into_iter()
            .filter(|call| self.is_constructor(*call, source))
            .map(|call| self.parse_call(call, source, path))
            .collect()
    }

    fn is_constructor(&self, call: Node<'_>, source: &str) -> bool {
        let Some(function) = call.child_by_field_name("function") else {
            return false;
        };
        let name = match function.kind() {
            "identifier" => node_text(function, source),
            "attribute" => function
                .child_by_field_name("attribute")
                .map_or("", |n| node_text(n, source)),
            _ => return false,
        };
        DetectorSettings::matches(&self.settings.bootstrap_constructors, name)
    }

    fn parse_call(&self, call: Node<'_>, source: &str, path: &Path) -> BootstrapSite {
        let location = SourceLocation::new(path, line_of(call));
        let mut handler_kind = None;
        let mut handler_config = Vec::new();
        let mut has_handler = false;
        let mut bindings = Vec::new();
        let mut classes = Vec::new();
        let mut modules = Vec::new();

        for (name, value) in keyword_arguments(call, source) {
            match name.as_str() {
                "handler_class" => {
                    has_handler = true;
                    handler_kind = value.symbol_tail().map(str::to_string);
                }
                "handler_config" => {
                    has_handler = true;
                    handler_config = string_keyed(value);
                }
                "bindings" => {
                    bindings.extend(
                        string_keyed(value)
                            .into_iter()
                            .map(|(k, v)| DIBinding::new(k, v, BindingKind::Instance)),
                    );
                }
                "binding_classes" => classes = symbols(value),
                "binding_modules" => modules = symbols(value),
                _ => {}
            }
        }

        bindings.extend(
            classes
                .iter()
                .map(|c| DIBinding::new(c.clone(), LiteralValue::Name(c.clone()), BindingKind::Class)),
        );
        bindings.extend(
            modules
                .iter()
                .map(|m| DIBinding::new(m.clone(), LiteralValue::Name(m.clone()), BindingKind::Module)),
        );

        let context = self.contexts.infer(path, handler_kind.as_deref());
        let mut bootstrap = BootstrapDeclaration::new(location.clone(), context);
        bootstrap.handler_kind = handler_kind.clone();
        bootstrap.handler_config = handler_config.iter().cloned().collect();
        bootstrap.bindings = bindings.clone();
        bootstrap.classes = classes;
        bootstrap.modules = modules;

        let handler = has_handler.then(|| {
            let name = assigned_name(call, source).unwrap_or_else(|| UNNAMED_HANDLER.to_string());
            handler_from_config(name, location, handler_kind, handler_config)
        });

        BootstrapSite {
            handler,
            bootstrap,
            bindings,
        }
    }
}

fn handler_from_config(
    name: String,
    location: SourceLocation,
    kind: Option<String>,
    config: Vec<(String, LiteralValue)>,
) -> HandlerDeclaration {
    let mut handler = HandlerDeclaration::new(name, location);
    handler.kind = kind;

    let mut auth_config = Vec::new();
    for (key, value) in config {
        match key.as_str() {
            "model_class" => handler.declaration = value.symbol_tail().map(str::to_string),
            "base_url" | "url" => {
                if handler.base_path.is_none() {
                    handler.base_path = value.as_str().map(str::to_string);
                }
            }
            "authentication" => handler.authentication = authentication(&value),
            "authentication_config" => auth_config = string_keyed(value.clone()),
            _ => {}
        }
        handler.config.insert(key, value);
    }

    if let Some(auth) = handler.authentication.as_mut() {
        for (key, value) in auth_config {
            auth.options.entry(key).or_insert(value);
        }
    }
    handler
}

/// `SecretBearer`, `"public"`, or `SecretBearer(environment_key=...)`
fn authentication(value: &LiteralValue) -> Option<AuthDescriptor> {
    let kind = value.symbol_tail()?;
    let descriptor = AuthDescriptor::new(kind);
    Some(match value {
        LiteralValue::Call { keywords, .. } => keywords
            .iter()
            .fold(descriptor, |d, (k, v)| d.with_option(k.clone(), v.clone())),
        _ => descriptor,
    })
}

fn symbols(value: LiteralValue) -> Vec<String> {
    match value {
        LiteralValue::List(items) => items
            .iter()
            .filter_map(|item| item.as_symbol().map(str::to_string))
            .collect(),
        other => other.as_symbol().map(str::to_string).into_iter().collect(),
    }
}

fn keyword_arguments(call: Node<'_>, source: &str) -> Vec<(String, LiteralValue)> {
    let Some(args) = call.child_by_field_name("arguments") else {
        return Vec::new();
    };
    named_children(args)
        .into_iter()
        .filter(|a| a.kind() == "keyword_argument")
        .filter_map(|kw| {
            let name = kw.child_by_field_name("name")?;
            let value = kw.child_by_field_name("value")?;
            Some((node_text(name, source).to_string(), literal(value, source)))
        })
        .collect()
}

/// Target of `name = Application(...)`
fn assigned_name(call: Node<'_>, source: &str) -> Option<String> {
    let parent = call.parent()?;
    if parent.kind() != "assignment" {
        return None;
    }
    let right = parent.child_by_field_name("right")?;
    if right.id() != call.id() {
        return None;
    }
    let left = parent.child_by_field_name("left")?;
    (left.kind() == "identifier").then(|| node_text(left, source).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::ParsedSource;
    use csm_model::ContextKind;

    fn parse_at(src: &str, path: &str) -> Vec<BootstrapSite> {
        let settings = DetectorSettings::default();
        let parsed = ParsedSource::parse(src).unwrap();
        BootstrapParser::new(&settings, ContextDetector::default()).parse(parsed.root(), src, Path::new(path))
    }

    const APP: &str = r#"
import clearskies
from models import User

users_api = clearskies.Application(
    handler_class=clearskies.handlers.RestfulApi,
    handler_config={
        "model_class": User,
        "base_url": "users",
        "readable_columns": ["id", "name"],
        "authentication": clearskies.authentication.SecretBearer(environment_key="MY_KEY"),
        "authentication_config": {"header": "X-Token"},
    },
    bindings={"api_key": "abc", "cursor": Cursor},
    binding_classes=[UserService],
    binding_modules=[helpers],
)
"#;

    #[test]
    fn extracts_handler_and_bindings() {
        let sites = parse_at(APP, "app.py");
        assert_eq!(sites.len(), 1);
        let site = &sites[0];

        let handler = site.handler.as_ref().unwrap();
        assert_eq!(handler.name, "users_api");
        assert_eq!(handler.kind.as_deref(), Some("RestfulApi"));
        assert_eq!(handler.declaration.as_deref(), Some("User"));
        assert_eq!(handler.base_path.as_deref(), Some("users"));
        assert!(handler.has_readable_columns());

        let auth = handler.authentication.as_ref().unwrap();
        assert_eq!(auth.kind, "SecretBearer");
        assert_eq!(auth.option_str("environment_key"), Some("MY_KEY"));
        assert_eq!(auth.option_str("header"), Some("X-Token"));

        let kinds: Vec<_> = site.bindings.iter().map(|b| (b.name.as_str(), b.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                ("api_key", BindingKind::Instance),
                ("cursor", BindingKind::Instance),
                ("UserService", BindingKind::Class),
                ("helpers", BindingKind::Module),
            ]
        );
        assert_eq!(site.bootstrap.context, ContextKind::WsgiRef);
        assert_eq!(site.bootstrap.classes, vec!["UserService"]);
    }

    #[test]
    fn unassigned_calls_are_unnamed() {
        let src = "Application(handler_class=SimpleRouting, handler_config={})\n";
        let site = &parse_at(src, "lambda_main.py")[0];
        assert_eq!(site.handler.as_ref().unwrap().name, UNNAMED_HANDLER);
        assert_eq!(site.bootstrap.context, ContextKind::Lambda);
    }

    #[test]
    fn calls_without_handler_yield_only_bootstrap() {
        let src = "app = Application(bindings={'x': 1})\n";
        let site = &parse_at(src, "app.py")[0];
        assert!(site.handler.is_none());
        assert_eq!(site.bindings.len(), 1);
    }

    #[test]
    fn other_calls_are_ignored() {
        assert!(parse_at("x = Applications()\ny = make(Application)\n", "app.py").is_empty());
    }

    #[test]
    fn string_authentication_kind() {
        let src = "a = Application(handler_class=RestfulApi, handler_config={'authentication': 'public'})\n";
        let handler = parse_at(src, "app.py").remove(0).handler.unwrap();
        assert_eq!(handler.authentication.unwrap().kind, "public");
    }
}
