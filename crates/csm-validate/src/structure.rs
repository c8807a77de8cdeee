//! Per-file structural checks
//!
//! Each check is independent and only adds issues. Model checks apply to
//! every class deriving from `Model`; endpoint checks apply to every call,
//! so a hand-written file mixing both shapes gets both.

use csm_model::ValidationReport;
use csm_parser::syntax::{
    class_methods, definition_name, descendants, descendants_of_kind, field_children, line_of,
    named_children, node_text, root_identifier,
};
use csm_parser::ParsedSource;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use tree_sitter::Node;

/// Legacy import shapes, as regex and as shown to the user
static LEGACY_IMPORTS: &[(&str, &str)] = &[
    (r"from\s+clearskies\.handlers\s+import", "from clearskies.handlers import"),
    (r"from\s+clearskies\s+import\s+(?:.*,\s*)?Application\b", "from clearskies import Application"),
    (r"from\s+clearskies\s+import\s+(?:.*,\s*)?column_types\b", "from clearskies import column_types"),
    (r"import\s+clearskies\.column_types\b", "import clearskies.column_types"),
];

static LEGACY_IMPORT_RES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    LEGACY_IMPORTS
        .iter()
        .filter_map(|(re, shown)| Regex::new(re).ok().map(|re| (re, *shown)))
        .collect()
});

/// Legacy column method
pub const LEGACY_COLUMN_METHOD: &str = "columns_configuration";

/// Endpoint kind that must list its readable and writeable columns
pub const CRUD_ENDPOINT: &str = "RestfulApi";

const CRUD_KEYWORDS: [&str; 2] = ["readable_column_names", "writeable_column_names"];

fn file(path: &Path) -> Option<std::path::PathBuf> {
    Some(path.to_path_buf())
}

/// Error when the file does not parse; returns whether it parsed
pub fn check_syntax(parsed: &ParsedSource<'_>, path: &Path, report: &mut ValidationReport) -> bool {
    match parsed.first_error() {
        Some(site) => {
            report.add_error("Invalid Python syntax in generated file", file(path), Some(site.line));
            false
        }
        None => true,
    }
}

/// Warning per legacy import statement still present
pub fn check_legacy_imports(parsed: &ParsedSource<'_>, path: &Path, report: &mut ValidationReport) {
    let root = parsed.root();
    let statements = descendants(root)
        .into_iter()
        .filter(|n| matches!(n.kind(), "import_statement" | "import_from_statement"));
    for statement in statements {
        let text = parsed.node_text(statement);
        for (re, shown) in LEGACY_IMPORT_RES.iter() {
            if re.is_match(text) {
                report.add_warning(
                    format!("Found v1 import pattern: {shown}"),
                    file(path),
                    Some(line_of(statement)),
                );
            }
        }
    }
}

fn is_model_class(class: Node<'_>, source: &str) -> bool {
    let Some(superclasses) = class.child_by_field_name("superclasses") else {
        return false;
    };
    named_children(superclasses).into_iter().any(|base| {
        let text = node_text(base, source);
        text == "Model" || text.ends_with(".Model")
    })
}

fn assigns(class: Node<'_>, source: &str, name: &str) -> bool {
    let Some(body) = class.child_by_field_name("body") else {
        return false;
    };
    named_children(body)
        .into_iter()
        .filter(|s| s.kind() == "expression_statement")
        .flat_map(named_children)
        .filter(|e| e.kind() == "assignment")
        .filter_map(|a| a.child_by_field_name("left"))
        .any(|left| left.kind() == "identifier" && node_text(left, source) == name)
}

/// Errors for model classes without a backend or still using the legacy
/// column method
pub fn check_models(parsed: &ParsedSource<'_>, path: &Path, report: &mut ValidationReport) {
    let source = parsed.text();
    for class in descendants_of_kind(parsed.root(), "class_definition") {
        if !is_model_class(class, source) {
            continue;
        }
        let name = definition_name(class, source);
        if !assigns(class, source, "backend") {
            report.add_error(
                format!("Model {name} missing backend attribute"),
                file(path),
                Some(line_of(class)),
            );
        }
        if class_methods(class)
            .into_iter()
            .any(|m| definition_name(m, source) == LEGACY_COLUMN_METHOD)
        {
            report.add_error(
                format!("Model {name} still has {LEGACY_COLUMN_METHOD}() - should use class attributes"),
                file(path),
                Some(line_of(class)),
            );
        }
    }
}

pub(crate) fn imported_names(root: Node<'_>, source: &str) -> HashSet<String> {
    let mut names = HashSet::new();
    for statement in descendants(root) {
        let from = match statement.kind() {
            "import_statement" => false,
            "import_from_statement" => true,
            _ => continue,
        };
        for name in field_children(statement, "name") {
            let bound = match name.kind() {
                "aliased_import" => name.child_by_field_name("alias").map(|a| node_text(a, source)),
                _ if from => Some(node_text(name, source)),
                _ => node_text(name, source).split('.').next(),
            };
            names.extend(bound.map(str::to_string));
        }
    }
    names
}

/// Warning when `columns.*` is used without importing `columns`
pub fn check_column_import(parsed: &ParsedSource<'_>, path: &Path, report: &mut ValidationReport) {
    let source = parsed.text();
    let root = parsed.root();
    let uses_columns = descendants_of_kind(root, "attribute")
        .into_iter()
        .filter_map(root_identifier)
        .any(|id| node_text(id, source) == "columns");
    let has_model = descendants_of_kind(root, "class_definition")
        .into_iter()
        .any(|c| is_model_class(c, source));
    if has_model && uses_columns && !imported_names(root, source).contains("columns") {
        report.add_warning("Missing 'from clearskies import columns' for model", file(path), None);
    }
}

fn callee_tail<'s>(call: Node<'_>, source: &'s str) -> &'s str {
    call.child_by_field_name("function")
        .map_or("", |f| node_text(f, source))
        .rsplit('.')
        .next()
        .unwrap_or("")
}

fn keyword_names<'s>(call: Node<'_>, source: &'s str) -> Vec<&'s str> {
    call.child_by_field_name("arguments")
        .map(named_children)
        .unwrap_or_default()
        .into_iter()
        .filter(|a| a.kind() == "keyword_argument")
        .filter_map(|a| a.child_by_field_name("name"))
        .map(|n| node_text(n, source))
        .collect()
}

/// Legacy bootstrap calls and handler configuration dicts are warnings;
/// CRUD endpoints missing their column lists are errors
pub fn check_endpoints(parsed: &ParsedSource<'_>, path: &Path, report: &mut ValidationReport) {
    let source = parsed.text();
    let root = parsed.root();
    let calls = descendants_of_kind(root, "call");

    if let Some(call) = calls.iter().find(|c| callee_tail(**c, source) == "Application") {
        report.add_warning(
            "Found Application() call - should use context wrapper",
            file(path),
            Some(line_of(*call)),
        );
    }

    let handler_config = descendants_of_kind(root, "identifier")
        .into_iter()
        .find(|id| node_text(*id, source) == "handler_config");
    if let Some(id) = handler_config {
        report.add_warning(
            "Found handler_config dict - should use kwargs",
            file(path),
            Some(line_of(id)),
        );
    }

    for call in calls.iter().filter(|c| callee_tail(**c, source) == CRUD_ENDPOINT) {
        let keywords = keyword_names(*call, source);
        for required in CRUD_KEYWORDS {
            if !keywords.contains(&required) {
                report.add_error(
                    format!("{CRUD_ENDPOINT} missing {required} configuration"),
                    file(path),
                    Some(line_of(*call)),
                );
            }
        }
    }
}
