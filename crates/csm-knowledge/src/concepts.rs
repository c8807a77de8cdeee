//! Concept explanations, worked examples and the migration checklist

use crate::tables::lookup;
use csm_model::SnippetPair;
use indexmap::IndexMap;

/// Worked before/after example keyed by pattern name
pub static PATTERN_EXAMPLES: &[(&str, &str, &str)] = &[
    (
        "model_definition",
        r#"from clearskies import Model
from collections import OrderedDict

class User(Model):
    id_column_name = "id"

    def columns_configuration(self):
        return OrderedDict([
            ('id', {'class': clearskies.column_types.UUID}),
            ('name', {'class': clearskies.column_types.String}),
            ('email', {'class': clearskies.column_types.Email}),
        ])"#,
        r#"import clearskies
from clearskies import columns

class User(clearskies.Model):
    id_column_name = "id"
    backend = clearskies.backends.MemoryBackend()

    id = columns.Uuid()
    name = columns.String()
    email = columns.Email()"#,
    ),
    (
        "handler_definition",
        r#"from clearskies import Application
from clearskies.handlers import RestfulAPI

app = Application(
    handler_class=RestfulAPI,
    handler_config={
        'model_class': User,
        'base_url': 'users',
    },
)"#,
        r#"import clearskies

endpoint = clearskies.endpoints.RestfulApi(
    url="users",
    model_class=User,
    readable_column_names=["id", "name", "email"],
    writeable_column_names=["name", "email"],
)

wsgi = clearskies.contexts.WsgiRef(endpoint)"#,
    ),
    (
        "di_injection",
        r#"class MyHandler:
    def __init__(self, di):
        self._di = di

    def handle(self, input_output):
        service = self._di.build(MyService)
        service.do_something()"#,
        r#"from clearskies.di import inject

class MyModel(clearskies.Model):
    my_service = inject.ByClass(MyService)

    def do_something(self):
        self.my_service.do_something()"#,
    ),
];

/// Concept → worked example
static CONCEPT_EXAMPLES: &[(&str, &str)] = &[
    ("model", "model_definition"),
    ("columns", "model_definition"),
    ("handler", "handler_definition"),
    ("application", "handler_definition"),
    ("di", "di_injection"),
];

/// Concept → (one-line summary, Markdown body)
static EXPLANATIONS: &[(&str, &str, &str)] = &[
    (
        "model",
        "Model definition changes",
        r#"# Model Definition Changes (v1 → v2)

**v1 Pattern:**
- Models use `columns_configuration()` method
- Columns defined in OrderedDict
- Import from `clearskies.column_types`

**v2 Pattern:**
- Columns are class attributes
- Direct instantiation with `columns.Type()`
- Backend specified as class attribute
- Import from `clearskies.columns`

**Breaking Changes:**
- `columns_configuration()` method removed
- Must specify backend on model
- Column type names changed (UUID → Uuid)
"#,
    ),
    (
        "handler",
        "Handler → Endpoint changes",
        r#"# Handler → Endpoint Changes (v1 → v2)

**v1 Pattern:**
- Import from `clearskies.handlers`
- Class name: `RestfulAPI` (uppercase API)
- Configuration via `handler_config` dict
- Wrapped in `Application` class

**v2 Pattern:**
- Import from `clearskies.endpoints`
- Class name: `RestfulApi` (lowercase i)
- Configuration via kwargs
- Wrapped in context (WsgiRef, Cli, etc.)
- Explicit column configuration required

**Breaking Changes:**
- `handlers` → `endpoints` (renamed package)
- `RestfulAPI` → `RestfulApi` (lowercase 'i')
- `handler_config` dict → kwargs
- Must specify readable/writeable columns explicitly
"#,
    ),
    (
        "di",
        "Dependency injection changes",
        r#"# Dependency Injection Changes (v1 → v2)

**v1 Pattern:**
- Constructor-based injection
- Manual DI container management
- `self._di.build(ClassName)`

**v2 Pattern:**
- Property-based injection
- Declarative with `inject.*` helpers
- Models inherit from `InjectableProperties`
- Automatic resolution

**Breaking Changes:**
- No more constructor injection
- Use property decorators instead
- New helpers: `inject.ByClass()`, `inject.Utcnow()`, `inject.Environment()`
"#,
    ),
    (
        "columns",
        "Column definition changes",
        r#"# Column Definition Changes (v1 → v2)

**Key Changes:**
- Import changed: `column_types` → `columns`
- Type name changes: `UUID` → `Uuid`, `JSON` → `Json`
- Definition style: OrderedDict → class attributes
- Must instantiate with `()`

**Type Name Mappings:**
- UUID → Uuid
- JSON → Json
- All others remain similar (String, Integer, Email, etc.)

**Breaking Changes:**
- Old OrderedDict style no longer supported
- Column instances required (must call with parentheses)
- Some type names changed casing
"#,
    ),
    (
        "application",
        "Application → Context changes",
        r#"# Application → Context Changes (v1 → v2)

**v1 Pattern:**
- Single `Application` class for all contexts
- Implicit context detection

**v2 Pattern:**
- Explicit context selection
- Different contexts: `WsgiRef`, `Cli`, `Lambda`, etc.
- DI configuration moved to context

**Example:**

v2:
```python
wsgi = clearskies.contexts.WsgiRef(
    endpoint,
    bindings={"database": connection},
    classes=[MyService],
)
```

**Breaking Changes:**
- `Application` class removed
- Must choose explicit context
- `binding_classes`/`binding_modules` → `classes=`/`modules=`
"#,
    ),
    (
        "backend",
        "Backend configuration changes",
        r#"# Backend Configuration Changes (v1 → v2)

**v1 Pattern:**
- Backend passed to models constructor
- Created separately and passed around

**v2 Pattern:**
- Backend as class attribute on model
- Specified directly in model definition

**Example:**

v1:
```python
backend = clearskies.backends.MemoryBackend()
models = Models(backend, columns)
```

v2:
```python
class User(clearskies.Model):
    backend = clearskies.backends.MemoryBackend()
    # ... columns ...
```

**Breaking Changes:**
- Backend must be class attribute
- Specified on each model class
"#,
    ),
    (
        "type_hints",
        "Type hint requirements",
        r#"# Type Hints (v1 → v2)

**v1:** Type hints were optional

**v2:** Type hints are required (Python 3.13+)

**Best Practices:**
- Use `TYPE_CHECKING` for circular imports
- Annotate all method signatures
- Include return types

**Example:**
```python
from typing import TYPE_CHECKING, Any

if TYPE_CHECKING:
    from clearskies.input_outputs.input_output import InputOutput

def handle(self, input_output: InputOutput) -> dict[str, Any]:
    return {"status": "ok"}
```
"#,
    ),
];

/// Ordered migration phases and their tasks
static CHECKLIST: &[(&str, &[&str])] = &[
    (
        "preparation",
        &[
            "Backup your v1 codebase",
            "Create a new branch for v2 migration",
            "Review v1 to v2 breaking changes documentation",
            "Set up v2 Python environment (Python 3.13+)",
            "Install clearskies v2 package",
        ],
    ),
    (
        "analysis",
        &[
            "Run analyze_v1_project on your codebase",
            "Review discovered models and handlers",
            "Note any custom business logic",
            "Identify third-party dependencies",
            "Assess migration complexity",
        ],
    ),
    (
        "model_migration",
        &[
            "Convert columns_configuration() to class attributes",
            "Update column type imports (column_types → columns)",
            "Fix column type names (UUID → Uuid, JSON → Json)",
            "Add backend attribute to each model",
            "Migrate model hooks if present",
            "Add type hints to all methods",
        ],
    ),
    (
        "endpoint_migration",
        &[
            "Rename handlers → endpoints",
            "Update RestfulAPI → RestfulApi",
            "Convert handler_config dict to kwargs",
            "Add readable_column_names configuration",
            "Add writeable_column_names configuration",
            "Configure sortable and searchable columns",
        ],
    ),
    (
        "context_setup",
        &[
            "Replace Application with appropriate context",
            "Choose context: WsgiRef, Cli, Lambda, etc.",
            "Update DI bindings configuration",
            "Convert binding_classes/binding_modules to classes=/modules=",
        ],
    ),
    (
        "di_migration",
        &[
            "Convert constructor injection to property injection",
            "Add inject.ByClass() for service dependencies",
            "Use inject.Utcnow() for datetime",
            "Use inject.Environment() for env variables",
            "Ensure models inherit from InjectableProperties",
        ],
    ),
    (
        "testing",
        &[
            "Run generated code through linter",
            "Fix any syntax errors",
            "Run unit tests",
            "Test all endpoints",
            "Verify database operations",
            "Check authentication flows",
        ],
    ),
    (
        "polish",
        &[
            "Add docstrings to all classes and methods",
            "Ensure consistent type hints",
            "Review and update comments",
            "Format code with black/ruff",
            "Update README and documentation",
        ],
    ),
    (
        "deployment",
        &[
            "Test in staging environment",
            "Update deployment scripts",
            "Update CI/CD pipelines",
            "Monitor for runtime errors",
            "Have rollback plan ready",
        ],
    ),
];

/// Worked example by pattern name (`model_definition`, ...)
#[must_use]
pub fn pattern_example(pattern: &str) -> Option<SnippetPair> {
    PATTERN_EXAMPLES
        .iter()
        .find(|(name, _, _)| *name == pattern)
        .map(|(_, before, after)| SnippetPair {
            before: (*before).to_string(),
            after: (*after).to_string(),
        })
}

/// Worked example for a concept, if one exists
#[must_use]
pub fn concept_example(concept: &str) -> Option<SnippetPair> {
    lookup(CONCEPT_EXAMPLES, concept).and_then(pattern_example)
}

/// Concepts [`explain_concept`] knows, with one-line summaries
pub fn concepts() -> impl Iterator<Item = (&'static str, &'static str)> {
    EXPLANATIONS.iter().map(|(name, summary, _)| (*name, *summary))
}

/// Markdown explanation of how a concept changed
///
/// Unknown concepts get the list of known ones instead.
#[must_use]
pub fn explain_concept(concept: &str) -> String {
    let Some((_, _, body)) = EXPLANATIONS.iter().find(|(name, _, _)| *name == concept) else {
        let listing: Vec<String> = concepts()
            .map(|(name, summary)| format!("- {name}: {summary}"))
            .collect();
        return format!(
            "Unknown concept: '{concept}'\n\nAvailable concepts:\n{}\n\nUse explain_concept with one of these concepts.",
            listing.join("\n")
        );
    };

    let mut explanation = (*body).to_string();
    if let Some(example) = concept_example(concept) {
        explanation.push_str(&format!(
            "\n\n**Complete Example:**\n\nv1:\n```python\n{}\n```\n\nv2:\n```python\n{}\n```",
            example.before, example.after
        ));
    }
    explanation
}

/// Ordered phase → tasks checklist
#[must_use]
pub fn migration_checklist() -> IndexMap<&'static str, Vec<&'static str>> {
    CHECKLIST
        .iter()
        .map(|(phase, tasks)| (*phase, tasks.to_vec()))
        .collect()
}
