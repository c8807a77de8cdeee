//! v2 style checks for a single generated snippet

use crate::structure::imported_names;
use csm_parser::syntax::{definition_name, descendants, named_children, node_text, root_identifier};
use csm_parser::ParsedSource;
use std::collections::BTreeSet;
use tree_sitter::Node;

/// Names that only resolve through an import
pub const FRAMEWORK_NAMESPACES: &[&str] = &[
    "clearskies",
    "columns",
    "validators",
    "inject",
    "configs",
    "configurable",
    "loggable",
];

fn has_docstring(definition: Node<'_>) -> bool {
    definition
        .child_by_field_name("body")
        .and_then(|body| named_children(body).into_iter().next())
        .filter(|first| first.kind() == "expression_statement")
        .and_then(|first| named_children(first).into_iter().next())
        .is_some_and(|expr| matches!(expr.kind(), "string" | "concatenated_string"))
}

/// Best-practice violations in `code`, in document order
///
/// Unparsable code yields a single "Could not parse code" entry.
#[must_use]
pub fn check_best_practices(code: &str) -> Vec<String> {
    let parsed = match ParsedSource::parse(code) {
        Ok(parsed) if !parsed.has_error() => parsed,
        _ => return vec!["Could not parse code".to_string()],
    };
    let root = parsed.root();
    let mut violations = Vec::new();

    for node in descendants(root) {
        let is_function = match node.kind() {
            "function_definition" => true,
            "class_definition" => false,
            _ => continue,
        };
        let name = definition_name(node, code);
        if is_function && node.child_by_field_name("return_type").is_none() {
            violations.push(format!("{name} missing return type hint"));
        }
        if !has_docstring(node) {
            violations.push(format!("{name} missing docstring"));
        }
    }

    let imported = imported_names(root, code);
    let mut unimported = BTreeSet::new();
    for node in descendants(root).into_iter().filter(|n| n.kind() == "attribute") {
        let Some(id) = root_identifier(node) else {
            continue;
        };
        let name = node_text(id, code);
        if FRAMEWORK_NAMESPACES.contains(&name) && !imported.contains(name) {
            unimported.insert(name);
        }
    }
    violations.extend(
        unimported
            .into_iter()
            .map(|name| format!("'{name}' is used but never imported")),
    );
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn clean_code_has_no_violations() {
        let code = "import clearskies\n\n\nclass User(clearskies.Model):\n    \"\"\"User model.\"\"\"\n\n    def greet(self) -> str:\n        \"\"\"Say hi.\"\"\"\n        return \"hi\"\n";
        assert!(check_best_practices(code).is_empty());
    }

    #[test]
    fn missing_annotations_docstrings_and_imports() {
        let code = "class User(clearskies.Model):\n    name = columns.String()\n\n    def greet(self):\n        return 1\n";
        assert_eq!(
            check_best_practices(code),
            vec![
                "User missing docstring",
                "greet missing return type hint",
                "greet missing docstring",
                "'clearskies' is used but never imported",
                "'columns' is used but never imported",
            ]
        );
    }

    #[test]
    fn unparsable_code() {
        assert_eq!(check_best_practices("def broken(:\n"), vec!["Could not parse code"]);
    }
}
