//! Declaration parser
//!
//! Recognises legacy model classes and extracts their structure:
//! - `id_column_name`, `table_name` and `backend` class attributes
//! - the ordered `columns_configuration()` return value
//! - lifecycle hooks and remaining public methods
//! - capabilities, via [`CapabilityDetector`]

use crate::capability::CapabilityDetector;
use crate::literal::{literal, string_keyed};
use crate::settings::DetectorSettings;
use crate::syntax::{
    class_methods, definition_name, descendants, descendants_of_kind, line_of, named_children,
    node_text, undecorated,
};
use csm_model::{Declaration, FieldSpec, LifecycleHook, LiteralValue, SourceLocation};
use std::path::Path;
use tree_sitter::Node;

/// Method holding the legacy ordered field configuration
pub const FIELD_CONFIGURATION_METHOD: &str = "columns_configuration";

/// Public methods never reported as custom
const FRAMEWORK_METHODS: [&str; 2] = [FIELD_CONFIGURATION_METHOD, "all_columns"];

/// Field type used when a column entry names no class
const DEFAULT_FIELD_TYPE: &str = "String";

/// Extracts [`Declaration`]s from a module
#[derive(Debug, Clone, Copy)]
pub struct DeclarationParser<'a> {
    settings: &'a DetectorSettings,
}

impl<'a> DeclarationParser<'a> {
    /// Create parser
    #[inline]
    #[must_use]
    pub fn new(settings: &'a DetectorSettings) -> Self {
        Self { settings }
    }

    /// Every declaration-shaped class in the module, in document order
    ///
    /// Nested classes are included.
    #[must_use]
    pub fn parse(
        &self,
        root: Node<'_>,
        source: &str,
        path: &Path,
        file_imports_logging: bool,
    ) -> Vec<Declaration> {
        descendants_of_kind(root, "class_definition")
            .into_iter()
            .filter(|class| self.is_declaration(*class, source))
            .map(|class| self.parse_class(class, source, path, file_imports_logging))
            .collect()
    }

    /// Whether a class derives from a declaration marker (`Model`, `x.Model`)
    #[must_use]
    pub fn is_declaration(&self, class: Node<'_>, source: &str) -> bool {
        bases(class).into_iter().any(|base| {
            let name = match base.kind() {
                "identifier" => node_text(base, source),
                "attribute" => base
                    .child_by_field_name("attribute")
                    .map_or("", |n| node_text(n, source)),
                _ => return false,
            };
            DetectorSettings::matches(&self.settings.declaration_bases, name)
        })
    }

    fn parse_class(
        &self,
        class: Node<'_>,
        source: &str,
        path: &Path,
        file_imports_logging: bool,
    ) -> Declaration {
        let name = definition_name(class, source);
        let mut declaration = Declaration::new(name, SourceLocation::new(path, line_of(class)));
        declaration.bases = bases(class)
            .into_iter()
            .map(|b| node_text(b, source).to_string())
            .collect();

        for (target, value) in class_assignments(class) {
            let value = literal(value, source);
            match node_text(target, source) {
                "id_column_name" => {
                    if let Some(id) = value.as_str() {
                        declaration.id_field = id.to_string();
                    }
                }
                "table_name" => declaration.destination = value.as_str().map(str::to_string),
                "backend" | "backend_class" => {
                    if let Some(backend) = value.symbol_tail() {
                        declaration.backend = backend.to_string();
                    }
                }
                _ => {}
            }
        }

        for method in class_methods(class) {
            let method_name = definition_name(method, source);
            if method_name == FIELD_CONFIGURATION_METHOD {
                declaration.fields = field_configuration(method, source);
            } else if let Some(hook) = LifecycleHook::from_method_name(method_name) {
                declaration.hooks.insert(hook);
            } else if !method_name.starts_with('_') && !FRAMEWORK_METHODS.contains(&method_name) {
                declaration.custom_methods.push(method_name.to_string());
            }
        }

        let analysis = CapabilityDetector::new(self.settings).detect(class, source, file_imports_logging);
        declaration.capabilities = analysis.capabilities;
        declaration.init_params = analysis.init_params;
        declaration.usage = analysis.usage;

        tracing::debug!(
            "Declaration {} at {}: {} fields, {} hooks, capabilities {:?}",
            declaration.name,
            declaration.location,
            declaration.fields.len(),
            declaration.hooks.len(),
            declaration.capabilities
        );
        declaration
    }
}

fn bases(class: Node<'_>) -> Vec<Node<'_>> {
    class
        .child_by_field_name("superclasses")
        .map(named_children)
        .unwrap_or_default()
        .into_iter()
        .filter(|n| n.kind() != "keyword_argument")
        .collect()
}

/// `name = value` statements directly in the class body
fn class_assignments(class: Node<'_>) -> Vec<(Node<'_>, Node<'_>)> {
    let Some(body) = class.child_by_field_name("body") else {
        return Vec::new();
    };
    named_children(body)
        .into_iter()
        .filter(|stmt| stmt.kind() == "expression_statement")
        .flat_map(named_children)
        .filter(|expr| expr.kind() == "assignment")
        .filter_map(|assignment| {
            let left = assignment.child_by_field_name("left")?;
            let right = assignment.child_by_field_name("right")?;
            (left.kind() == "identifier").then_some((left, right))
        })
        .collect()
}

/// Fields from the first return statement of the configuration method
///
/// Accepts `OrderedDict([...])`, a bare list or tuple of `(name, {...})`
/// pairs, or a dict literal.
fn field_configuration(method: Node<'_>, source: &str) -> Vec<FieldSpec> {
    let Some(body) = method.child_by_field_name("body") else {
        return Vec::new();
    };
    let returned = descendants(body)
        .into_iter()
        .filter(|n| n.kind() == "return_statement")
        .filter(|n| enclosing_function(*n).is_some_and(|f| f.id() == method.id()))
        .find_map(|ret| named_children(ret).into_iter().next());
    let Some(returned) = returned else {
        return Vec::new();
    };

    let entries: Vec<(LiteralValue, LiteralValue)> = match literal(returned, source) {
        LiteralValue::Call { arguments, .. } => match arguments.into_iter().next() {
            Some(LiteralValue::List(items)) => pairs_of(items),
            Some(LiteralValue::Dict(pairs)) => pairs,
            _ => Vec::new(),
        },
        LiteralValue::List(items) => pairs_of(items),
        LiteralValue::Dict(pairs) => pairs,
        _ => Vec::new(),
    };

    entries
        .into_iter()
        .filter_map(|(name, config)| {
            let name = name.as_str()?.to_string();
            let mut source_type = DEFAULT_FIELD_TYPE.to_string();
            let mut options = Vec::new();
            for (key, value) in string_keyed(config) {
                if key == "class" {
                    if let Some(tail) = value.symbol_tail() {
                        source_type = tail.to_string();
                    }
                } else {
                    options.push((key, value));
                }
            }
            let field = options
                .into_iter()
                .fold(FieldSpec::new(name, source_type), |field, (k, v)| field.with_option(k, v));
            Some(field)
        })
        .collect()
}

fn pairs_of(items: Vec<LiteralValue>) -> Vec<(LiteralValue, LiteralValue)> {
    items
        .into_iter()
        .filter_map(|item| match item {
            LiteralValue::List(mut pair) if pair.len() == 2 => {
                let config = pair.pop()?;
                let name = pair.pop()?;
                Some((name, config))
            }
            _ => None,
        })
        .collect()
}

fn enclosing_function(node: Node<'_>) -> Option<Node<'_>> {
    let mut current = node.parent();
    while let Some(n) = current {
        if undecorated(n).kind() == "function_definition" {
            return Some(n);
        }
        current = n.parent();
    }
    None
}
