//! Static translation tables
//!
//! Every table is a `&'static` slice of `(v1, v2)` pairs in lookup order.
//! Lookups that need ordering by pattern length go through the
//! `Lazy` views at the bottom of this module.

use indexmap::IndexMap;
use once_cell::sync::Lazy;

/// Fully-qualified v1 class → v2 class
pub static CLASS_MAPPINGS: &[(&str, &str)] = &[
    // Handlers → endpoints
    ("clearskies.handlers.RestfulAPI", "clearskies.endpoints.RestfulApi"),
    ("clearskies.handlers.SimpleRouting", "clearskies.endpoints.SimpleRouting"),
    ("clearskies.handlers.Callable", "clearskies.endpoints.Callable"),
    ("clearskies.handlers.List", "clearskies.endpoints.List"),
    ("clearskies.handlers.Get", "clearskies.endpoints.Get"),
    ("clearskies.handlers.Create", "clearskies.endpoints.Create"),
    ("clearskies.handlers.Update", "clearskies.endpoints.Update"),
    ("clearskies.handlers.Delete", "clearskies.endpoints.Delete"),
    // Application → contexts
    ("clearskies.Application", "clearskies.contexts.Wsgi"),
    // Column types
    ("clearskies.column_types.UUID", "clearskies.columns.Uuid"),
    ("clearskies.column_types.String", "clearskies.columns.String"),
    ("clearskies.column_types.Integer", "clearskies.columns.Integer"),
    ("clearskies.column_types.Float", "clearskies.columns.Float"),
    ("clearskies.column_types.Boolean", "clearskies.columns.Boolean"),
    ("clearskies.column_types.DateTime", "clearskies.columns.DateTime"),
    ("clearskies.column_types.Created", "clearskies.columns.Created"),
    ("clearskies.column_types.Updated", "clearskies.columns.Updated"),
    ("clearskies.column_types.Email", "clearskies.columns.Email"),
    ("clearskies.column_types.JSON", "clearskies.columns.Json"),
    ("clearskies.column_types.Select", "clearskies.columns.Select"),
    ("clearskies.column_types.Phone", "clearskies.columns.Phone"),
    ("clearskies.column_types.Timestamp", "clearskies.columns.Timestamp"),
    ("clearskies.column_types.BelongsTo", "clearskies.columns.BelongsTo"),
    ("clearskies.column_types.HasMany", "clearskies.columns.HasMany"),
    ("clearskies.column_types.ManyToMany", "clearskies.columns.ManyToMany"),
];

/// v1 backend → v2 backend
pub static BACKEND_MAPPINGS: &[(&str, &str)] = &[
    ("clearskies.backends.MemoryBackend", "clearskies.backends.MemoryBackend"),
    ("clearskies.backends.CursorBackend", "clearskies.backends.CursorBackend"),
    ("clearskies.backends.ApiBackend", "clearskies.backends.ApiBackend"),
];

/// Import fragments and module paths, applied as substring replacements
pub static IMPORT_MAPPINGS: &[(&str, &str)] = &[
    ("from clearskies.handlers import", "from clearskies.endpoints import"),
    ("from clearskies import Application", "from clearskies.contexts import Wsgi"),
    ("from clearskies import column_types", "from clearskies import columns"),
    ("clearskies.column_types", "clearskies.columns"),
    ("clearskies.handlers", "clearskies.endpoints"),
    ("clearskies.input_requirements", "clearskies.validators"),
    ("clearskies.authentication.authentication", "clearskies.authentication"),
    ("clearskies.binding_specs", "clearskies.di.inject"),
];

/// `handler_config` key → endpoint keyword
pub static CONFIG_MAPPINGS: &[(&str, &str)] = &[
    ("model_class", "model_class"),
    ("base_url", "url"),
    ("readable_columns", "readable_column_names"),
    ("writeable_columns", "writeable_column_names"),
    ("searchable_columns", "searchable_column_names"),
    ("sortable_columns", "sortable_column_names"),
    ("default_sort_column", "default_sort_column_name"),
];

/// Concept → breaking changes
pub static BREAKING_CHANGES: &[(&str, &[&str])] = &[
    (
        "columns_configuration",
        &[
            "columns_configuration() method removed",
            "Columns must be defined as class attributes",
            "Import from clearskies.columns instead of clearskies.column_types",
            "Column classes must be instantiated with ()",
        ],
    ),
    (
        "Application",
        &[
            "Application class removed",
            "Use explicit context wrappers (WsgiRef, Cli, etc.)",
            "handler_config dict replaced with kwargs",
            "binding_classes/binding_modules replaced with classes=/modules=",
        ],
    ),
    (
        "handlers",
        &[
            "handlers renamed to endpoints",
            "RestfulAPI renamed to RestfulApi (lowercase 'i')",
            "handler_config dict replaced with kwargs",
            "More explicit configuration required (readable/writeable columns)",
        ],
    ),
    (
        "di",
        &[
            "Constructor-based DI replaced with property injection",
            "Use inject.ByClass() for dependencies",
            "Models inherit from InjectableProperties mixin",
            "Additional helpers: inject.Utcnow(), inject.Environment()",
        ],
    ),
    (
        "backend",
        &[
            "Backend passed to model constructor → backend as class attribute",
            "Backend must be specified on model class",
        ],
    ),
    (
        "type_hints",
        &[
            "Type hints required (Python 3.13+)",
            "Use TYPE_CHECKING for circular import avoidance",
            "All methods should have type annotations",
        ],
    ),
];

/// Snippet context alias → breaking-change concept
pub static CONTEXT_CONCEPTS: &[(&str, &str)] = &[
    ("model", "columns_configuration"),
    ("columns", "columns_configuration"),
    ("handler", "handlers"),
    ("endpoint", "handlers"),
    ("application", "Application"),
    ("context", "Application"),
    ("di", "di"),
    ("backend", "backend"),
    ("type_hints", "type_hints"),
];

/// Authentication kinds with a dedicated generator, plus accepted aliases
pub static AUTH_KINDS: &[(&str, &str)] = &[
    ("SecretBearer", "SecretBearer"),
    ("secret_bearer", "SecretBearer"),
    ("SecretBasic", "SecretBasic"),
    ("secret_basic", "SecretBasic"),
    ("JWKS", "JWKS"),
    ("jwks", "JWKS"),
    ("JWT", "JWT"),
    ("jwt", "JWT"),
    ("Public", "Public"),
    ("public", "Public"),
    ("OAuth2", "OAuth2"),
    ("oauth2", "OAuth2"),
];

/// Class table keyed by v1 name
pub static CLASS_INDEX: Lazy<IndexMap<&'static str, &'static str>> =
    Lazy::new(|| CLASS_MAPPINGS.iter().chain(BACKEND_MAPPINGS).copied().collect());

/// Import patterns, longest first
pub static IMPORTS_LONGEST_FIRST: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    let mut patterns = IMPORT_MAPPINGS.to_vec();
    // stable sort keeps table order among equal lengths
    patterns.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    patterns
});

/// Look up a `(key, value)` slice
#[must_use]
pub fn lookup<V: Copy>(table: &[(&str, V)], key: &str) -> Option<V> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Last dotted segment
#[inline]
#[must_use]
pub fn tail(symbol: &str) -> &str {
    symbol.rsplit('.').next().unwrap_or(symbol)
}
