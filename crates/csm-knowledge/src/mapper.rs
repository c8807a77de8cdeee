//! v1 → v2 mapper
//!
//! Lookups over the static tables in [`crate::tables`]. Unknown symbols
//! are never an error: they come back unmapped with a note asking for
//! manual review.

use crate::tables::{
    lookup, tail, AUTH_KINDS, BACKEND_MAPPINGS, BREAKING_CHANGES, CLASS_INDEX, CLASS_MAPPINGS,
    CONFIG_MAPPINGS, CONTEXT_CONCEPTS, IMPORTS_LONGEST_FIRST, IMPORT_MAPPINGS,
};
use csm_model::{MappingResult, SnippetPair};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Which v2 symbols exist in the installed framework
///
/// Optional; the mapper works from its static tables when none is attached.
pub trait SymbolCatalog: Send + Sync {
    /// Whether the fully-qualified symbol exists
    fn contains(&self, symbol: &str) -> bool;
}

/// Fixed set of known symbols
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    symbols: BTreeSet<String>,
}

impl StaticCatalog {
    /// Catalog over `symbols`
    #[must_use]
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }
}

impl SymbolCatalog for StaticCatalog {
    fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains(symbol)
    }
}

/// Compiled word-bounded patterns, built once
struct WordPatterns {
    short_names: Vec<(Regex, &'static str)>,
    config_keys: Vec<(Regex, &'static str)>,
}

fn word(pattern: &str) -> Option<Regex> {
    Regex::new(&format!(r"\b{}\b", regex::escape(pattern))).ok()
}

static WORD_PATTERNS: Lazy<WordPatterns> = Lazy::new(|| WordPatterns {
    short_names: CLASS_MAPPINGS
        .iter()
        .filter(|(v1, v2)| tail(v1) != tail(v2))
        .filter_map(|(v1, v2)| word(tail(v1)).map(|re| (re, tail(v2))))
        .collect(),
    config_keys: CONFIG_MAPPINGS
        .iter()
        .filter(|(v1, v2)| v1 != v2)
        .filter_map(|(v1, v2)| word(v1).map(|re| (re, *v2)))
        .collect(),
});

/// Snippet triggers: (substring, concept, note)
const SNIPPET_TRIGGERS: &[(&[&str], &str, &str)] = &[
    (
        &["columns_configuration"],
        "columns_configuration",
        "Convert columns_configuration() to class attributes",
    ),
    (
        &["Application("],
        "Application",
        "Convert Application to appropriate context wrapper",
    ),
    (
        &["handler_class", "handler_config"],
        "handlers",
        "Convert handler_config dict to endpoint kwargs",
    ),
];

/// Static knowledge-base lookups
#[derive(Clone, Default)]
pub struct Mapper {
    catalog: Option<Arc<dyn SymbolCatalog>>,
}

impl fmt::Debug for Mapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapper")
            .field("catalog", &self.catalog.is_some())
            .finish()
    }
}

impl Mapper {
    /// Mapper over the static tables only
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consult `catalog` to confirm mapped targets
    #[must_use]
    pub fn with_catalog(mut self, catalog: Arc<dyn SymbolCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Map a class name (qualified, or a unique short name)
    #[must_use]
    pub fn map_class(&self, name: &str) -> MappingResult {
        let target = CLASS_INDEX.get(name).copied().or_else(|| {
            if name.contains('.') {
                return None;
            }
            let mut candidates = CLASS_INDEX.iter().filter(|(k, _)| tail(k) == name);
            match (candidates.next(), candidates.next()) {
                (Some((_, v2)), None) => Some(*v2),
                _ => None,
            }
        });

        let mut result = MappingResult {
            target: target.map(str::to_string),
            ..MappingResult::default()
        };

        let qualified = CLASS_INDEX
            .iter()
            .find(|(k, _)| **k == name || tail(k) == name)
            .map_or(name, |(k, _)| *k);
        if qualified.contains("handlers") {
            result.breaking_changes.extend(self.owned_changes("handlers"));
            result.notes.push("Update all handler references to use endpoints".into());
        } else if qualified.contains("Application") {
            result.breaking_changes.extend(self.owned_changes("Application"));
            result.notes.push("Choose appropriate context: WsgiRef, Cli, Lambda, etc.".into());
        } else if qualified.contains("column_types") {
            result
                .breaking_changes
                .push("Import from clearskies.columns instead of column_types".into());
            result
                .breaking_changes
                .push("Note: UUID → Uuid (lowercase 'u'), JSON → Json".into());
        }

        match (&result.target, &self.catalog) {
            (None, _) => {
                tracing::debug!("No mapping for class {name}");
                result
                    .notes
                    .push(format!("No known v2 equivalent for {name}; review manually"));
            }
            (Some(target), Some(catalog)) if !catalog.contains(target) => {
                result.notes.push(format!(
                    "{target} was not found in the installed clearskies; verify it manually"
                ));
            }
            _ => {}
        }
        result
    }

    /// Rewrite an import statement
    ///
    /// The longest matching pattern wins; its occurrences are replaced and
    /// no other pattern is applied.
    #[must_use]
    pub fn map_import(&self, statement: &str) -> String {
        IMPORTS_LONGEST_FIRST
            .iter()
            .find(|(v1, _)| statement.contains(v1))
            .map_or_else(|| statement.to_string(), |(v1, v2)| statement.replace(v1, v2))
    }

    /// Endpoint keyword for a `handler_config` key (unknown keys pass through)
    #[must_use]
    pub fn map_config_key<'a>(&self, key: &'a str) -> &'a str {
        lookup(CONFIG_MAPPINGS, key).unwrap_or(key)
    }

    /// v2 column class (short name) for a v1 column type
    #[must_use]
    pub fn map_column_type(&self, name: &str) -> String {
        Self::map_qualified(name, "clearskies.column_types.")
    }

    /// v2 backend class (short name) for a v1 backend
    #[must_use]
    pub fn map_backend(&self, name: &str) -> String {
        Self::map_qualified(name, "clearskies.backends.")
    }

    fn map_qualified(name: &str, namespace: &str) -> String {
        let qualified = if name.starts_with("clearskies") {
            name.to_string()
        } else {
            format!("{namespace}{name}")
        };
        CLASS_INDEX
            .get(qualified.as_str())
            .map_or_else(|| tail(&qualified), |v2| tail(v2))
            .to_string()
    }

    /// Canonical authentication kind, if a dedicated generator exists
    #[must_use]
    pub fn map_auth_kind(&self, kind: &str) -> Option<&'static str> {
        lookup(AUTH_KINDS, tail(kind))
    }

    /// Breaking changes for a concept (empty when unknown)
    #[must_use]
    pub fn breaking_changes_for(&self, concept: &str) -> &'static [&'static str] {
        lookup(BREAKING_CHANGES, concept).unwrap_or(&[])
    }

    fn owned_changes(&self, concept: &str) -> impl Iterator<Item = String> {
        self.breaking_changes_for(concept)
            .iter()
            .map(|s| (*s).to_string())
    }

    /// Translate a snippet
    ///
    /// Applies, in order: import patterns (longest first), class names
    /// (qualified, then word-bounded short names), word-bounded config keys.
    /// Breaking changes and notes are added for triggers found in the input,
    /// then for the concept named by `context`.
    #[must_use]
    pub fn map_snippet(&self, code: &str, context: &str) -> MappingResult {
        let mut v2 = code.to_string();

        for (v1, target) in IMPORTS_LONGEST_FIRST.iter() {
            v2 = v2.replace(v1, target);
        }
        for (v1, target) in CLASS_MAPPINGS.iter().chain(BACKEND_MAPPINGS) {
            v2 = v2.replace(v1, target);
        }
        for (re, target) in &WORD_PATTERNS.short_names {
            v2 = re.replace_all(&v2, *target).into_owned();
        }
        for (re, target) in &WORD_PATTERNS.config_keys {
            v2 = re.replace_all(&v2, *target).into_owned();
        }

        let mut result = MappingResult::default();
        let mut concepts: Vec<&str> = Vec::new();
        for (triggers, concept, note) in SNIPPET_TRIGGERS {
            if triggers.iter().any(|t| code.contains(t)) {
                concepts.push(*concept);
                result.notes.push((*note).to_string());
            }
        }
        if let Some(concept) = lookup(CONTEXT_CONCEPTS, context) {
            if !concepts.contains(&concept) {
                concepts.push(concept);
            }
        }
        for concept in concepts {
            result.breaking_changes.extend(self.owned_changes(concept));
        }

        result.example = Some(SnippetPair {
            before: code.to_string(),
            after: v2,
        });
        result
    }

    /// Every (v1, v2) translation pair the snippet mapper applies
    #[must_use]
    pub fn pairs(&self) -> Vec<(&'static str, &'static str)> {
        CLASS_MAPPINGS
            .iter()
            .chain(BACKEND_MAPPINGS)
            .chain(IMPORT_MAPPINGS)
            .chain(CONFIG_MAPPINGS)
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn qualified_and_short_class_names() {
        let mapper = Mapper::new();
        let result = mapper.map_class("clearskies.handlers.RestfulAPI");
        assert_eq!(result.target.as_deref(), Some("clearskies.endpoints.RestfulApi"));
        assert_eq!(result.breaking_changes.len(), 4);
        assert_eq!(result.notes, vec!["Update all handler references to use endpoints"]);

        let short = mapper.map_class("RestfulAPI");
        assert_eq!(short.target_tail(), Some("RestfulApi"));
    }

    #[test]
    fn column_types_get_import_notes() {
        let result = Mapper::new().map_class("clearskies.column_types.UUID");
        assert_eq!(result.target_tail(), Some("Uuid"));
        assert!(result.breaking_changes[1].contains("UUID → Uuid"));
    }

    #[test]
    fn unknown_class_is_flagged_not_failed() {
        let result = Mapper::new().map_class("clearskies.handlers.Mystery");
        assert!(!result.is_mapped());
        assert!(result.notes.iter().any(|n| n.contains("review manually")));
    }

    #[test]
    fn catalog_misses_add_verification_note() {
        let catalog = Arc::new(StaticCatalog::new(["clearskies.contexts.Wsgi"]));
        let mapper = Mapper::new().with_catalog(catalog);

        assert!(!mapper
            .map_class("clearskies.Application")
            .notes
            .iter()
            .any(|n| n.contains("verify")));
        assert!(mapper
            .map_class("clearskies.column_types.JSON")
            .notes
            .iter()
            .any(|n| n.contains("clearskies.columns.Json was not found")));
    }

    #[test]
    fn import_longest_match_first() {
        let mapper = Mapper::new();
        assert_eq!(
            mapper.map_import("from clearskies.handlers import RestfulAPI"),
            "from clearskies.endpoints import RestfulAPI"
        );
        assert_eq!(
            mapper.map_import("from clearskies.authentication.authentication import Authentication"),
            "from clearskies.authentication import Authentication"
        );
        assert_eq!(mapper.map_import("import os"), "import os");
    }

    #[test]
    fn config_keys_and_column_types() {
        let mapper = Mapper::new();
        assert_eq!(mapper.map_config_key("base_url"), "url");
        assert_eq!(mapper.map_config_key("custom_key"), "custom_key");
        assert_eq!(mapper.map_column_type("UUID"), "Uuid");
        assert_eq!(mapper.map_column_type("clearskies.column_types.JSON"), "Json");
        assert_eq!(mapper.map_column_type("Unheard"), "Unheard");
        assert_eq!(mapper.map_backend("CursorBackend"), "CursorBackend");
    }

    #[test]
    fn auth_kinds_accept_aliases() {
        let mapper = Mapper::new();
        assert_eq!(mapper.map_auth_kind("public"), Some("Public"));
        assert_eq!(mapper.map_auth_kind("clearskies.authentication.SecretBearer"), Some("SecretBearer"));
        assert_eq!(mapper.map_auth_kind("Custom"), None);
    }

    #[test]
    fn snippet_translation_and_notes() {
        let v1 = r#"from clearskies import Application
from clearskies.handlers import RestfulAPI

app = Application(
    handler_class=RestfulAPI,
    handler_config={"model_class": User, "base_url": "users", "readable_columns": ["id"]},
)"#;
        let result = Mapper::new().map_snippet(v1, "general");
        let after = result.example.unwrap().after;

        assert!(after.contains("from clearskies.contexts import Wsgi"));
        assert!(after.contains("from clearskies.endpoints import RestfulApi"));
        assert!(after.contains("app = Wsgi("));
        assert!(after.contains("\"url\": \"users\""));
        assert!(after.contains("readable_column_names"));
        assert_eq!(
            result.notes,
            vec![
                "Convert Application to appropriate context wrapper",
                "Convert handler_config dict to endpoint kwargs",
            ]
        );
        assert_eq!(result.breaking_changes.len(), 8);
    }

    #[test]
    fn snippet_context_adds_concept_changes_once() {
        let mapper = Mapper::new();
        let result = mapper.map_snippet("x = 1", "di");
        assert_eq!(result.breaking_changes.len(), 4);

        let result = mapper.map_snippet("def columns_configuration(self): pass", "model");
        assert_eq!(result.breaking_changes.len(), 4);
    }

    #[test]
    fn short_names_are_word_bounded() {
        let after = Mapper::new()
            .map_snippet("JSONEncoder = JSON", "general")
            .example
            .unwrap()
            .after;
        assert_eq!(after, "JSONEncoder = Json");
    }
}
