//! Field and hook coverage between a legacy file and its replacement

use csm_model::LifecycleHook;
use once_cell::sync::Lazy;
use regex::Regex;

/// `('name', {` entries of a legacy column mapping
static LEGACY_COLUMN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r#"\(\s*['"](\w+)['"]\s*,\s*\{"#).ok());

/// `name = columns.Type(` attributes
static COLUMN_ATTRIBUTE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*(\w+)[ \t]*=[ \t]*(?:clearskies\.)?columns\.\w+\(").ok());

static METHOD: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\bdef\s+(\w+)\s*\(").ok());

fn captures(re: &Lazy<Option<Regex>>, code: &str) -> Vec<String> {
    let Some(re) = re.as_ref() else {
        return Vec::new();
    };
    re.captures_iter(code)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

fn hooks(code: &str) -> Vec<LifecycleHook> {
    let mut found = Vec::new();
    for hook in captures(&METHOD, code)
        .iter()
        .filter_map(|name| LifecycleHook::from_method_name(name))
    {
        if !found.contains(&hook) {
            found.push(hook);
        }
    }
    found
}

/// Columns and hooks present in `old` but absent from `new`
///
/// One message per missing item, columns first, each in `old` order.
#[must_use]
pub fn validate_completeness(new: &str, old: &str) -> Vec<String> {
    let new_columns = captures(&COLUMN_ATTRIBUTE, new);
    let new_hooks = hooks(new);

    let mut missing: Vec<String> = captures(&LEGACY_COLUMN, old)
        .into_iter()
        .filter(|c| !new_columns.contains(c))
        .map(|c| format!("Column '{c}' from v1 not found in v2"))
        .collect();
    missing.extend(
        hooks(old)
            .into_iter()
            .filter(|h| !new_hooks.contains(h))
            .map(|h| format!("Hook '{h}' from v1 not found in v2")),
    );
    missing
}
