//! Import assembly and cleanup for generated modules
//!
//! - [`detect_required_imports`]: sentinel scan of a rendered body
//! - [`generate_import_block`]: grouped, sorted block
//! - [`cleanup_unused_imports`] / [`merge_duplicate_imports`]: tree-based,
//!   idempotent passes over top-level statements
//! - [`assemble_module`]: imports, conditional type imports, then the body
//!
//! The tree passes leave unparsable input untouched and only ever remove or
//! rewrite statements that sit on lines of their own.

use crate::annotations::{required_type_imports, type_checking_block};
use csm_parser::syntax::{
    descendants, dotted_text, field_children, is_non_reference_identifier, named_children,
    node_text, ParsedSource,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::ops::Range;
use tree_sitter::Node;

/// Standard-library top-level modules recognised when grouping
static STDLIB: &[&str] = &[
    "abc",
    "collections",
    "dataclasses",
    "datetime",
    "decimal",
    "enum",
    "functools",
    "itertools",
    "json",
    "logging",
    "os",
    "pathlib",
    "re",
    "sys",
    "time",
    "typing",
    "uuid",
];

/// Framework package
pub const FRAMEWORK: &str = "clearskies";

/// Import block groups, in output order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ImportGroup {
    /// `from __future__ import ...`
    Future,
    /// Standard library
    Stdlib,
    /// Everything else
    ThirdParty,
    /// `clearskies`
    Framework,
}

impl ImportGroup {
    /// Group for an import statement
    #[must_use]
    pub fn of(statement: &str) -> Self {
        let root = statement_module(statement)
            .split('.')
            .next()
            .unwrap_or_default();
        if root == "__future__" {
            Self::Future
        } else if root == FRAMEWORK {
            Self::Framework
        } else if STDLIB.contains(&root) {
            Self::Stdlib
        } else {
            Self::ThirdParty
        }
    }
}

fn statement_module(statement: &str) -> &str {
    let statement = statement.trim();
    let rest = statement
        .strip_prefix("from ")
        .or_else(|| statement.strip_prefix("import "))
        .unwrap_or(statement)
        .trim_start();
    rest.split(|c: char| c.is_whitespace() || c == ',')
        .next()
        .unwrap_or_default()
}

/// Render imports grouped (future, stdlib, third-party, framework), each
/// group sorted with plain `import` lines first, groups separated by a
/// blank line
#[must_use]
pub fn generate_import_block<'a>(imports: impl IntoIterator<Item = &'a str>) -> String {
    let mut groups: BTreeMap<ImportGroup, (BTreeSet<&str>, BTreeSet<&str>)> = BTreeMap::new();
    for statement in imports {
        let statement = statement.trim();
        if statement.is_empty() {
            continue;
        }
        let (plain, from) = groups.entry(ImportGroup::of(statement)).or_default();
        if statement.starts_with("from ") {
            from.insert(statement);
        } else {
            plain.insert(statement);
        }
    }

    groups
        .values()
        .map(|(plain, from)| {
            plain
                .iter()
                .chain(from.iter())
                .copied()
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// (pattern, module, name); an empty name means `import module`
static SENTINEL_TABLE: &[(&str, &str, &str)] = &[
    (r"\bclearskies\.\w", "clearskies", ""),
    (r"(?:^|[^\w.])columns\.\w", "clearskies", "columns"),
    (r"(?:^|[^\w.])validators\.\w", "clearskies", "validators"),
    (r"(?:^|[^\w.])configs\.\w", "clearskies", "configs"),
    (r"(?:^|[^\w.])configurable\.\w", "clearskies", "configurable"),
    (r"(?:^|[^\w.])loggable\.\w", "clearskies", "loggable"),
    (r"(?:^|[^\w.])inject\.\w", "clearskies.di", "inject"),
    (r"(?:^|[^\w.])InjectableProperties\b", "clearskies.di", "InjectableProperties"),
    (r"@parameters_to_properties\b", "clearskies.decorators", "parameters_to_properties"),
    (r"\bAny\b", "typing", "Any"),
    (r"\bTYPE_CHECKING\b", "typing", "TYPE_CHECKING"),
    (r"\bTYPE_CHECKING\b", "__future__", "annotations"),
];

static SENTINELS: Lazy<Vec<(Regex, &'static str, &'static str)>> = Lazy::new(|| {
    SENTINEL_TABLE
        .iter()
        .filter_map(|(pattern, module, name)| {
            Regex::new(&format!("(?m){pattern}"))
                .ok()
                .map(|re| (re, *module, *name))
        })
        .collect()
});

/// Minimal import set for a rendered body
///
/// Comment lines and existing import lines are not scanned. Names from the
/// same module are merged into one sorted statement.
#[must_use]
pub fn detect_required_imports(code: &str) -> BTreeSet<String> {
    let scanned: String = code
        .lines()
        .filter(|line| {
            let line = line.trim_start();
            !(line.starts_with('#') || line.starts_with("import ") || line.starts_with("from "))
        })
        .collect::<Vec<_>>()
        .join("\n");

    let mut modules: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for (re, module, name) in SENTINELS.iter() {
        if re.is_match(&scanned) {
            modules.entry(*module).or_default().insert(*name);
        }
    }

    let mut statements = BTreeSet::new();
    for (module, names) in modules {
        if names.contains("") {
            statements.insert(format!("import {module}"));
        }
        let from: Vec<&str> = names.into_iter().filter(|n| !n.is_empty()).collect();
        if !from.is_empty() {
            statements.insert(format!("from {module} import {}", from.join(", ")));
        }
    }
    statements
}

/// Complete module text for a rendered body
///
/// Imports are computed from the body, never listed by hand; `local` adds
/// imports of sibling generated modules. Annotation-only types referenced
/// from signatures are imported under `if TYPE_CHECKING:`.
#[must_use]
pub fn assemble_module(body: &str, local: &[String]) -> String {
    let body = body.trim_matches('\n');
    let conditional = type_checking_block(&required_type_imports(body));
    let scanned = match &conditional {
        Some(block) => format!("{block}\n{body}"),
        None => body.to_string(),
    };
    let imports = detect_required_imports(&scanned);

    let mut sections = Vec::new();
    let block = generate_import_block(imports.iter().chain(local).map(String::as_str));
    if !block.is_empty() {
        sections.push(block);
    }
    sections.extend(conditional);
    let mut out = sections.join("\n\n");
    if !out.is_empty() {
        out.push_str(if body.starts_with("class ") { "\n\n\n" } else { "\n\n" });
    }
    out.push_str(body);
    out.push('\n');
    out
}

const IMPORT_KINDS: [&str; 3] = [
    "import_statement",
    "import_from_statement",
    "future_import_statement",
];

fn is_import(node: Node<'_>) -> bool {
    IMPORT_KINDS.contains(&node.kind())
}

fn inside_import(node: Node<'_>) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        if is_import(parent) {
            return true;
        }
        current = parent.parent();
    }
    false
}

/// Full lines occupied by `range`, including a trailing comment, or `None`
/// when the line holds other code
fn line_span(text: &str, range: &Range<usize>) -> Option<Range<usize>> {
    let start = text[..range.start].rfind('\n').map_or(0, |i| i + 1);
    if !text[start..range.start].trim().is_empty() {
        return None;
    }
    let end = text[range.end..]
        .find('\n')
        .map_or(text.len(), |i| range.end + i + 1);
    let rest = text[range.end..end].trim();
    if rest.is_empty() || rest.starts_with('#') {
        Some(start..end)
    } else {
        None
    }
}

fn apply_edits(text: &str, mut edits: Vec<(Range<usize>, String)>) -> String {
    edits.sort_by(|a, b| b.0.start.cmp(&a.0.start));
    let mut out = text.to_string();
    for (range, replacement) in edits {
        out.replace_range(range, &replacement);
    }
    out
}

/// Imported entry as written (`a`, `a.b`, `a as b`) and the name it binds
fn entries(statement: Node<'_>, source: &str) -> Vec<(String, String)> {
    field_children(statement, "name")
        .into_iter()
        .map(|entry| {
            if entry.kind() == "aliased_import" {
                let name = entry
                    .child_by_field_name("name")
                    .map_or_else(String::new, |n| dotted_text(n, source));
                let alias = entry
                    .child_by_field_name("alias")
                    .map_or("", |n| node_text(n, source));
                (format!("{name} as {alias}"), alias.to_string())
            } else {
                let name = dotted_text(entry, source);
                let bound = if statement.kind() == "import_statement" {
                    name.split('.').next().unwrap_or_default().to_string()
                } else {
                    name.clone()
                };
                (name, bound)
            }
        })
        .collect()
}

fn is_wildcard(statement: Node<'_>) -> bool {
    let mut cursor = statement.walk();
    let found = statement
        .children(&mut cursor)
        .any(|c| c.kind() == "wildcard_import");
    found
}

fn top_level_imports<'t>(root: Node<'t>) -> Vec<Node<'t>> {
    named_children(root).into_iter().filter(|n| is_import(*n)).collect()
}

/// Drop top-level imports none of whose bound names is referenced
///
/// `__future__` and wildcard imports are always kept. A statement that binds
/// several names is kept whole when any of them is used.
#[must_use]
pub fn cleanup_unused_imports(code: &str) -> String {
    let Ok(parsed) = ParsedSource::parse(code) else {
        return code.to_string();
    };
    if parsed.has_error() {
        return code.to_string();
    }
    let root = parsed.root();

    let referenced: HashSet<&str> = descendants(root)
        .into_iter()
        .filter(|n| n.kind() == "identifier")
        .filter(|n| !is_non_reference_identifier(*n) && !inside_import(*n))
        .map(|n| node_text(n, code))
        .collect();

    let mut edits = Vec::new();
    for statement in top_level_imports(root) {
        if statement.kind() == "future_import_statement" || is_wildcard(statement) {
            continue;
        }
        let bound = entries(statement, code);
        if bound.iter().any(|(_, name)| referenced.contains(name.as_str())) {
            continue;
        }
        if let Some(span) = line_span(code, &statement.byte_range()) {
            tracing::trace!("Dropping unused import: {}", node_text(statement, code));
            edits.push((span, String::new()));
        }
    }
    apply_edits(code, edits)
}

/// Merge top-level `from m import ...` statements per module into the
/// first occurrence, names sorted; drop repeated plain `import` statements
#[must_use]
pub fn merge_duplicate_imports(code: &str) -> String {
    let Ok(parsed) = ParsedSource::parse(code) else {
        return code.to_string();
    };
    if parsed.has_error() {
        return code.to_string();
    }

    let mut from_groups: BTreeMap<String, Vec<Node<'_>>> = BTreeMap::new();
    let mut seen_plain = HashSet::new();
    let mut edits = Vec::new();

    for statement in top_level_imports(parsed.root()) {
        let range = statement.byte_range();
        if line_span(code, &range).is_none() {
            continue;
        }
        match statement.kind() {
            "import_from_statement" if !is_wildcard(statement) => {
                let module = statement
                    .child_by_field_name("module_name")
                    .map_or_else(String::new, |m| dotted_text(m, code));
                from_groups.entry(module).or_default().push(statement);
            }
            "import_statement" => {
                let names: Vec<String> = entries(statement, code).into_iter().map(|(e, _)| e).collect();
                if !seen_plain.insert(names.join(", ")) {
                    if let Some(span) = line_span(code, &range) {
                        edits.push((span, String::new()));
                    }
                }
            }
            _ => {}
        }
    }

    for (module, statements) in from_groups {
        let [first, rest @ ..] = statements.as_slice() else {
            continue;
        };
        if rest.is_empty() {
            continue;
        }
        let names: BTreeSet<String> = statements
            .iter()
            .flat_map(|s| entries(*s, code))
            .map(|(entry, _)| entry)
            .collect();
        let merged = format!(
            "from {module} import {}",
            names.into_iter().collect::<Vec<_>>().join(", ")
        );
        edits.push((first.byte_range(), merged));
        for statement in rest {
            if let Some(span) = line_span(code, &statement.byte_range()) {
                edits.push((span, String::new()));
            }
        }
    }
    apply_edits(code, edits)
}
