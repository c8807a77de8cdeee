//! Type-annotation synthesis
//!
//! Two ordered rule tables, exact names first, then prefix/suffix patterns:
//! - parameters fall back to `Any`
//! - methods fall back to no annotation
//!
//! Annotation-only framework types are imported under `if TYPE_CHECKING:`;
//! [`required_type_imports`] recomputes that set from finished code.

use csm_model::LifecycleHook;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// Universal parameter fallback
pub const ANY: &str = "Any";

/// Exact parameter names
static PARAMETER_TYPES: &[(&str, &str)] = &[
    ("input_output", "InputOutput"),
    ("model", "Model"),
    ("data", "dict[str, Any]"),
    ("id", "str | int"),
    ("kwargs", "Any"),
    ("cursor", "Cursor"),
    ("di", "DI"),
    ("models", "Models"),
    ("utcnow", "datetime"),
    ("environment", "Environment"),
    ("logger", "Logger"),
    ("config", "dict[str, Any]"),
];

enum Affix {
    Prefix(&'static str),
    Suffix(&'static str),
}

/// Parameter name patterns, in priority order
static PARAMETER_PATTERNS: &[(Affix, &str)] = &[
    (Affix::Suffix("_id"), "str | int"),
    (Affix::Suffix("_at"), "datetime"),
    (Affix::Suffix("_list"), "list[Any]"),
    (Affix::Suffix("_dict"), "dict[str, Any]"),
    (Affix::Prefix("is_"), "bool"),
    (Affix::Prefix("has_"), "bool"),
    (Affix::Suffix("_count"), "int"),
];

/// Exact method names
static RETURN_TYPES: &[(&str, &str)] = &[
    ("pre_save", "None"),
    ("post_save", "None"),
    ("save_finished", "None"),
    ("pre_delete", "None"),
    ("post_delete", "None"),
    ("__init__", "None"),
    ("configure", "None"),
    ("validate", "bool"),
    ("to_dict", "dict[str, Any]"),
    ("get_id", "str | int"),
];

/// Method name patterns, in priority order
static RETURN_PATTERNS: &[(Affix, &str)] = &[
    (Affix::Prefix("get_"), "Any"),
    (Affix::Prefix("find_"), "Model | None"),
    (Affix::Prefix("list_"), "list[Model]"),
    (Affix::Prefix("is_"), "bool"),
    (Affix::Prefix("has_"), "bool"),
    (Affix::Prefix("count_"), "int"),
    (Affix::Prefix("save"), "None"),
    (Affix::Prefix("update"), "None"),
    (Affix::Prefix("delete"), "None"),
];

/// Annotation-only types and where they live
pub static TYPE_CHECKING_IMPORTS: &[(&str, &str)] = &[
    ("InputOutput", "clearskies.input_outputs.input_output"),
    ("Model", "clearskies.model"),
    ("Models", "clearskies.models"),
    ("Cursor", "clearskies.backends.cursor"),
    ("DI", "clearskies.di.di"),
    ("Environment", "clearskies.environment"),
    ("Logger", "logging"),
    ("datetime", "datetime"),
];

/// Extra parameters a hook stub receives before `**kwargs`
static HOOK_PARAMETERS: &[(LifecycleHook, &[&str])] = &[
    (LifecycleHook::PreSave, &["data"]),
    (LifecycleHook::PostSave, &["data", "id"]),
];

fn affix_matches(affix: &Affix, name: &str) -> bool {
    match affix {
        Affix::Prefix(p) => name.starts_with(p),
        Affix::Suffix(s) => name.ends_with(s),
    }
}

fn by_rules(
    exact: &[(&str, &'static str)],
    patterns: &[(Affix, &'static str)],
    name: &str,
) -> Option<&'static str> {
    exact
        .iter()
        .find(|(k, _)| *k == name)
        .map(|(_, t)| *t)
        .or_else(|| {
            patterns
                .iter()
                .find(|(affix, _)| affix_matches(affix, name))
                .map(|(_, t)| *t)
        })
}

/// Annotation for a parameter, `None` for the implicit receiver
#[must_use]
pub fn parameter_type(name: &str) -> Option<&'static str> {
    if matches!(name, "self" | "cls") {
        return None;
    }
    Some(by_rules(PARAMETER_TYPES, PARAMETER_PATTERNS, name).unwrap_or(ANY))
}

/// Return annotation for a method, if a rule matches
#[must_use]
pub fn return_type(method: &str) -> Option<&'static str> {
    by_rules(RETURN_TYPES, RETURN_PATTERNS, method)
}

/// Typed stub for a lifecycle hook, indented for a class body
#[must_use]
pub fn hook_stub(hook: LifecycleHook) -> String {
    let name = hook.method_name();
    let extra = HOOK_PARAMETERS
        .iter()
        .find(|(h, _)| *h == hook)
        .map_or(&[][..], |(_, params)| *params);

    let mut params = vec!["self".to_string()];
    for param in extra {
        match parameter_type(param) {
            Some(hint) => params.push(format!("{param}: {hint}")),
            None => params.push((*param).to_string()),
        }
    }
    params.push(format!("**kwargs: {ANY}"));
    let returns = return_type(name).unwrap_or("None");

    format!(
        "    def {name}({}) -> {returns}:\n        \"\"\"Hook: {name}.\"\"\"\n        # TODO: Migrate {name} logic\n        pass",
        params.join(", ")
    )
}

static SIGNATURE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*(?:async[ \t]+)?def[ \t]+\w+[ \t]*\((.*)$").ok());

static TYPE_NAME: Lazy<Option<Regex>> = Lazy::new(|| {
    let names: Vec<&str> = TYPE_CHECKING_IMPORTS.iter().map(|(n, _)| *n).collect();
    Regex::new(&format!(r"(?:^|[^\w.])({})\b", names.join("|"))).ok()
});

/// Annotation-only types referenced from `def` signatures in `code`
///
/// Returned in table order, each at most once.
#[must_use]
pub fn required_type_imports(code: &str) -> Vec<&'static str> {
    let (Some(signature_re), Some(name_re)) = (SIGNATURE.as_ref(), TYPE_NAME.as_ref()) else {
        return Vec::new();
    };
    let mut found = BTreeSet::new();
    for signature in signature_re.captures_iter(code) {
        let text = signature.get(1).map_or("", |m| m.as_str());
        let text = text.split('#').next().unwrap_or("");
        for name in name_re.captures_iter(text) {
            if let Some(m) = name.get(1) {
                found.insert(m.as_str().to_string());
            }
        }
    }
    TYPE_CHECKING_IMPORTS
        .iter()
        .filter(|(name, _)| found.contains(*name))
        .map(|(name, _)| *name)
        .collect()
}

/// `if TYPE_CHECKING:` block importing `types`, or `None` when empty
#[must_use]
pub fn type_checking_block(types: &[&str]) -> Option<String> {
    let lines: Vec<String> = types
        .iter()
        .filter_map(|name| {
            TYPE_CHECKING_IMPORTS
                .iter()
                .find(|(n, _)| n == name)
                .map(|(n, module)| format!("    from {module} import {n}"))
        })
        .collect();
    if lines.is_empty() {
        return None;
    }
    Some(format!("if TYPE_CHECKING:\n{}", lines.join("\n")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_parameter_names_win() {
        assert_eq!(parameter_type("data"), Some("dict[str, Any]"));
        assert_eq!(parameter_type("model"), Some("Model"));
        assert_eq!(parameter_type("self"), None);
    }

    #[test]
    fn parameter_patterns() {
        assert_eq!(parameter_type("user_id"), Some("str | int"));
        assert_eq!(parameter_type("created_at"), Some("datetime"));
        assert_eq!(parameter_type("tag_list"), Some("list[Any]"));
        assert_eq!(parameter_type("is_active"), Some("bool"));
        assert_eq!(parameter_type("retry_count"), Some("int"));
        assert_eq!(parameter_type("anything"), Some("Any"));
    }

    #[test]
    fn return_rules() {
        assert_eq!(return_type("pre_save"), Some("None"));
        assert_eq!(return_type("get_id"), Some("str | int"));
        assert_eq!(return_type("get_name"), Some("Any"));
        assert_eq!(return_type("find_owner"), Some("Model | None"));
        assert_eq!(return_type("list_orders"), Some("list[Model]"));
        assert_eq!(return_type("delete_all"), Some("None"));
        assert_eq!(return_type("charge"), None);
    }

    #[test]
    fn post_save_stub() {
        let stub = hook_stub(LifecycleHook::PostSave);
        assert!(stub.starts_with(
            "    def post_save(self, data: dict[str, Any], id: str | int, **kwargs: Any) -> None:"
        ));
        assert!(stub.contains("# TODO: Migrate post_save logic"));
        assert!(stub.ends_with("pass"));
    }

    #[test]
    fn type_imports_come_from_signatures_only() {
        let code = "class A(clearskies.Model):\n    def find(self, cursor: Cursor) -> Model | None:  # Logger\n        pass\n";
        assert_eq!(required_type_imports(code), vec!["Model", "Cursor"]);
        assert!(required_type_imports("x = clearskies.Model").is_empty());
    }

    #[test]
    fn type_checking_block_lists_modules() {
        let block = type_checking_block(&["Cursor", "datetime"]).unwrap();
        assert_eq!(
            block,
            "if TYPE_CHECKING:\n    from clearskies.backends.cursor import Cursor\n    from datetime import datetime"
        );
        assert!(type_checking_block(&[]).is_none());
    }
}
