//! Capability detection
//!
//! One predicate per capability, each evaluated against a class subtree:
//! - **Configurable**: the initializer takes parameters besides the receiver
//!   and the DI container
//! - **Injectable**: the initializer takes the DI container, a method reads a
//!   container attribute on the receiver, or calls a build method on it
//! - **Loggable**: a logger attribute is read, a level method is called on
//!   it, or the file imports a logging module
//!
//! Predicates are OR-combined into an insert-only [`CapabilitySet`]. Indirect
//! usage (a container reached through a local alias, say) is not followed.

use crate::literal::literal;
use crate::settings::DetectorSettings;
use crate::syntax::{
    class_methods, definition_name, descendants, descendants_of_kind, named_children, node_text,
    string_value,
};
use csm_model::{Capability, CapabilitySet, CapabilityUsage, LiteralValue, ParameterSpec};
use tree_sitter::Node;

/// Receiver names never treated as configuration
const RECEIVERS: [&str; 2] = ["self", "cls"];

/// Detector output for one class
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapabilityAnalysis {
    /// Detected capabilities
    pub capabilities: CapabilitySet,
    /// Initializer parameters (receiver and container excluded)
    pub init_params: Vec<ParameterSpec>,
    /// DI usage
    pub usage: CapabilityUsage,
}

/// Evaluates the capability predicates
#[derive(Debug, Clone, Copy)]
pub struct CapabilityDetector<'a> {
    settings: &'a DetectorSettings,
}

impl<'a> CapabilityDetector<'a> {
    /// Create detector
    #[inline]
    #[must_use]
    pub fn new(settings: &'a DetectorSettings) -> Self {
        Self { settings }
    }

    /// Run every predicate against `class`
    #[must_use]
    pub fn detect(&self, class: Node<'_>, source: &str, file_imports_logging: bool) -> CapabilityAnalysis {
        let mut capabilities = CapabilitySet::new();
        capabilities.insert_if(Capability::Configurable, self.is_configurable(class, source));
        capabilities.insert_if(Capability::Injectable, self.is_injectable(class, source));
        capabilities.insert_if(
            Capability::Loggable,
            file_imports_logging || self.is_loggable(class, source),
        );

        let usage = CapabilityUsage {
            injects_via_initializer: self.initializer_takes_container(class, source),
            build_targets: self.build_targets(class, source),
        };

        CapabilityAnalysis {
            capabilities,
            init_params: self.init_params(class, source),
            usage,
        }
    }

    /// Initializer has at least one configuration parameter
    #[must_use]
    pub fn is_configurable(&self, class: Node<'_>, source: &str) -> bool {
        !self.init_params(class, source).is_empty()
    }

    /// Class reaches a DI container
    #[must_use]
    pub fn is_injectable(&self, class: Node<'_>, source: &str) -> bool {
        self.initializer_takes_container(class, source)
            || self.reads_container_attribute(class, source)
            || !self.build_calls(class, source).is_empty()
    }

    /// Class uses a logger (file-level imports are checked separately)
    #[must_use]
    pub fn is_loggable(&self, class: Node<'_>, source: &str) -> bool {
        descendants(class).into_iter().any(|node| match node.kind() {
            "attribute" => self.is_logger_access(node, source),
            "identifier" => {
                let name = node_text(node, source).to_ascii_lowercase();
                self.settings
                    .logging_modules
                    .iter()
                    .any(|m| name.contains(m.as_str()))
            }
            "call" => self.is_level_call(node, source),
            _ => false,
        })
    }

    /// Initializer parameters that become configuration
    #[must_use]
    pub fn init_params(&self, class: Node<'_>, source: &str) -> Vec<ParameterSpec> {
        self.initializer(class, source)
            .map(|init| {
                parameters(init, source)
                    .into_iter()
                    .filter(|p| {
                        !RECEIVERS.contains(&p.name.as_str())
                            && !DetectorSettings::matches(&self.settings.di_parameters, &p.name)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Names passed to container build calls, first occurrence order
    #[must_use]
    pub fn build_targets(&self, class: Node<'_>, source: &str) -> Vec<String> {
        let mut usage = CapabilityUsage::default();
        for call in self.build_calls(class, source) {
            let Some(args) = call.child_by_field_name("arguments") else {
                continue;
            };
            let first = named_children(args)
                .into_iter()
                .find(|a| a.kind() != "keyword_argument");
            let target = first.and_then(|arg| match arg.kind() {
                "string" => string_value(node_text(arg, source)),
                "identifier" => Some(node_text(arg, source).to_string()),
                _ => None,
            });
            if let Some(target) = target.filter(|t| !t.is_empty()) {
                usage.add_build_target(target);
            }
        }
        usage.build_targets
    }

    fn initializer<'t>(&self, class: Node<'t>, source: &str) -> Option<Node<'t>> {
        class_methods(class)
            .into_iter()
            .find(|m| definition_name(*m, source) == "__init__")
    }

    fn initializer_takes_container(&self, class: Node<'_>, source: &str) -> bool {
        self.initializer(class, source).is_some_and(|init| {
            parameters(init, source)
                .iter()
                .any(|p| DetectorSettings::matches(&self.settings.di_parameters, &p.name))
        })
    }

    fn reads_container_attribute(&self, class: Node<'_>, source: &str) -> bool {
        class_methods(class).into_iter().any(|method| {
            descendants_of_kind(method, "attribute").into_iter().any(|attr| {
                let object = attr.child_by_field_name("object");
                let name = attr.child_by_field_name("attribute");
                matches!((object, name), (Some(o), Some(n))
                    if o.kind() == "identifier"
                        && RECEIVERS.contains(&node_text(o, source))
                        && DetectorSettings::matches(&self.settings.di_attributes, node_text(n, source)))
            })
        })
    }

    /// `self._di.build(..)`, `x.di.build(..)` and `di.build(..)` calls
    fn build_calls<'t>(&self, class: Node<'t>, source: &str) -> Vec<Node<'t>> {
        class_methods(class)
            .into_iter()
            .flat_map(|m| descendants_of_kind(m, "call"))
            .filter(|call| {
                let Some(function) = call.child_by_field_name("function") else {
                    return false;
                };
                if function.kind() != "attribute" {
                    return false;
                }
                let method = function
                    .child_by_field_name("attribute")
                    .map_or("", |n| node_text(n, source));
                if !DetectorSettings::matches(&self.settings.build_methods, method) {
                    return false;
                }
                let Some(object) = function.child_by_field_name("object") else {
                    return false;
                };
                match object.kind() {
                    "attribute" => object.child_by_field_name("attribute").is_some_and(|n| {
                        DetectorSettings::matches(&self.settings.di_attributes, node_text(n, source))
                    }),
                    "identifier" => {
                        DetectorSettings::matches(&self.settings.di_parameters, node_text(object, source))
                    }
                    _ => false,
                }
            })
            .collect()
    }

    fn is_logger_access(&self, attr: Node<'_>, source: &str) -> bool {
        attr.child_by_field_name("attribute").is_some_and(|n| {
            DetectorSettings::matches(&self.settings.logger_attributes, node_text(n, source))
        })
    }

    /// `<x>.logger.<level>(..)`
    fn is_level_call(&self, call: Node<'_>, source: &str) -> bool {
        let Some(function) = call.child_by_field_name("function") else {
            return false;
        };
        if function.kind() != "attribute" {
            return false;
        }
        let level = function
            .child_by_field_name("attribute")
            .map_or("", |n| node_text(n, source));
        DetectorSettings::matches(&self.settings.log_levels, level)
            && function
                .child_by_field_name("object")
                .is_some_and(|o| o.kind() == "attribute" && self.is_logger_access(o, source))
    }
}

/// Whether the module imports any of `modules` (at any nesting level)
#[must_use]
pub fn imports_any_module(root: Node<'_>, source: &str, modules: &[String]) -> bool {
    let first_segment = |node: Node<'_>| -> String {
        let target = if node.kind() == "aliased_import" {
            node.child_by_field_name("name").unwrap_or(node)
        } else {
            node
        };
        node_text(target, source)
            .split('.')
            .next()
            .unwrap_or("")
            .trim()
            .to_string()
    };

    descendants(root).into_iter().any(|node| {
        let imported: Vec<String> = match node.kind() {
            "import_statement" => crate::syntax::field_children(node, "name")
                .into_iter()
                .map(first_segment)
                .collect(),
            "import_from_statement" => node
                .child_by_field_name("module_name")
                .map(first_segment)
                .into_iter()
                .collect(),
            _ => Vec::new(),
        };
        imported
            .iter()
            .any(|name| DetectorSettings::matches(modules, name))
    })
}

/// Parameters of a function definition, in order
///
/// Splat parameters and separators are skipped.
#[must_use]
pub fn parameters(function: Node<'_>, source: &str) -> Vec<ParameterSpec> {
    let Some(params) = function.child_by_field_name("parameters") else {
        return Vec::new();
    };

    named_children(params)
        .into_iter()
        .filter_map(|param| {
            let text_of = |field: &str| param.child_by_field_name(field).map(|n| node_text(n, source));
            match param.kind() {
                "identifier" => Some(ParameterSpec::new(node_text(param, source))),
                "typed_parameter" => {
                    let name = named_children(param)
                        .into_iter()
                        .find(|n| n.kind() == "identifier")?;
                    let mut spec = ParameterSpec::new(node_text(name, source));
                    spec.type_hint = text_of("type").map(str::to_string);
                    Some(spec)
                }
                "default_parameter" | "typed_default_parameter" => {
                    let name = param.child_by_field_name("name")?;
                    if name.kind() != "identifier" {
                        return None;
                    }
                    let mut spec = ParameterSpec::new(node_text(name, source));
                    spec.type_hint = text_of("type").map(str::to_string);
                    spec.default = param
                        .child_by_field_name("value")
                        .map(|v| literal(v, source))
                        .filter(|v| *v != LiteralValue::None);
                    Some(spec)
                }
                _ => None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::ParsedSource;

    fn analyse(src: &str) -> CapabilityAnalysis {
        let settings = DetectorSettings::default();
        let parsed = ParsedSource::parse(src).unwrap();
        let class = descendants_of_kind(parsed.root(), "class_definition")[0];
        let imports_logging = imports_any_module(parsed.root(), src, &settings.logging_modules);
        CapabilityDetector::new(&settings).detect(class, src, imports_logging)
    }

    #[test]
    fn plain_class_needs_nothing() {
        let result = analyse("class User(Model):\n    id_column_name = 'id'\n");
        assert!(result.capabilities.is_empty());
        assert!(result.init_params.is_empty());
    }

    #[test]
    fn initializer_params_make_configurable() {
        let src = "class User(Model):\n    def __init__(self, di, api_key: str, retries=3):\n        pass\n";
        let result = analyse(src);
        assert!(result.capabilities.contains(Capability::Configurable));
        assert!(result.capabilities.contains(Capability::Injectable));
        assert!(result.usage.injects_via_initializer);
        let names: Vec<_> = result.init_params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["api_key", "retries"]);
        assert_eq!(result.init_params[0].type_hint.as_deref(), Some("str"));
        assert_eq!(result.init_params[1].default, Some(LiteralValue::Int(3)));
    }

    #[test]
    fn container_param_alone_is_not_configurable() {
        let src = "class User(Model):\n    def __init__(self, di):\n        self._di = di\n";
        let result = analyse(src);
        assert!(!result.capabilities.contains(Capability::Configurable));
        assert!(result.capabilities.contains(Capability::Injectable));
    }

    #[test]
    fn build_calls_collect_targets() {
        let src = r#"
class Order(Model):
    def total(self):
        rates = self._di.build("tax_rates")
        svc = self.di.build(PaymentService)
        again = self._di.build(PaymentService)
        return rates
"#;
        let result = analyse(src);
        assert!(result.capabilities.contains(Capability::Injectable));
        assert_eq!(result.usage.build_targets, vec!["tax_rates", "PaymentService"]);
    }

    #[test]
    fn computed_build_targets_are_ignored() {
        let src = "class Order(Model):\n    def go(self):\n        return self._di.build(name_for(self))\n";
        let result = analyse(src);
        assert!(result.capabilities.contains(Capability::Injectable));
        assert!(result.usage.build_targets.is_empty());
    }

    #[test]
    fn logger_usage_makes_loggable() {
        let src = "class User(Model):\n    def save_it(self):\n        self.logger.info('saved')\n";
        assert!(analyse(src).capabilities.contains(Capability::Loggable));
    }

    #[test]
    fn file_level_logging_import_makes_loggable() {
        let src = "import logging\n\nclass User(Model):\n    pass\n";
        assert!(analyse(src).capabilities.contains(Capability::Loggable));

        let src = "from logging import getLogger\n\nclass User(Model):\n    pass\n";
        assert!(analyse(src).capabilities.contains(Capability::Loggable));
    }

    #[test]
    fn custom_container_attribute_names() {
        let settings = DetectorSettings::default().with_di_attributes(&["container"]);
        let src = "class A(Model):\n    def go(self):\n        return self._di\n";
        let parsed = ParsedSource::parse(src).unwrap();
        let class = descendants_of_kind(parsed.root(), "class_definition")[0];
        assert!(!CapabilityDetector::new(&settings).is_injectable(class, src));
    }

    #[test]
    fn parameters_skip_splats() {
        let src = "def f(self, a, *args, b: int = 2, **kwargs):\n    pass\n";
        let parsed = ParsedSource::parse(src).unwrap();
        let func = descendants_of_kind(parsed.root(), "function_definition")[0];
        let names: Vec<_> = parameters(func, src).into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["self", "a", "b"]);
    }
}
