//! Declaration types
//!
//! A [`Declaration`] is the structural description of one legacy model class:
//! its fields, lifecycle hooks, custom methods and the cross-cutting
//! capabilities it needs in the target dialect.

use crate::literal::LiteralValue;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

/// Where an entity was found
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    /// Source file
    pub path: PathBuf,
    /// 1-based line
    pub line: usize,
}

impl SourceLocation {
    /// Create location
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            path: path.into(),
            line,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path.display(), self.line)
    }
}

/// One initializer parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSpec {
    /// Parameter name
    pub name: String,
    /// Annotation as written in source
    pub type_hint: Option<String>,
    /// Default value
    pub default: Option<LiteralValue>,
}

impl ParameterSpec {
    /// Parameter without hint or default
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_hint: None,
            default: None,
        }
    }

    /// Set type hint
    #[inline]
    #[must_use]
    pub fn with_type_hint(mut self, hint: impl Into<String>) -> Self {
        self.type_hint = Some(hint.into());
        self
    }

    /// Set default
    #[inline]
    #[must_use]
    pub fn with_default(mut self, default: LiteralValue) -> Self {
        self.default = Some(default);
        self
    }
}

/// Relationship column kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    /// Foreign key to a parent
    BelongsTo,
    /// One-to-many
    HasMany,
    /// Many-to-many through a pivot
    ManyToMany,
}

impl RelationshipKind {
    /// Detect from a column type name (short or dotted)
    #[must_use]
    pub fn from_source_type(source_type: &str) -> Option<Self> {
        match source_type.rsplit('.').next().unwrap_or(source_type) {
            "BelongsTo" => Some(Self::BelongsTo),
            "HasMany" => Some(Self::HasMany),
            "ManyToMany" => Some(Self::ManyToMany),
            _ => None,
        }
    }
}

/// One ordered field of a declaration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    /// Field name
    pub name: String,
    /// Legacy column type (short name, e.g. `UUID`)
    pub source_type: String,
    /// Remaining column options, in source order
    pub options: IndexMap<String, LiteralValue>,
    /// Relationship kind, when the column links declarations
    pub relationship: Option<RelationshipKind>,
}

impl FieldSpec {
    /// Create field; relationship kind is derived from the type
    #[must_use]
    pub fn new(name: impl Into<String>, source_type: impl Into<String>) -> Self {
        let source_type = source_type.into();
        Self {
            name: name.into(),
            relationship: RelationshipKind::from_source_type(&source_type),
            source_type,
            options: IndexMap::new(),
        }
    }

    /// Add an option
    #[inline]
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: LiteralValue) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    /// Whether this field is a relationship
    #[inline]
    #[must_use]
    pub fn is_relationship(&self) -> bool {
        self.relationship.is_some()
    }
}

/// Lifecycle hooks recognised on legacy declarations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleHook {
    /// Before persisting
    PreSave,
    /// After persisting
    PostSave,
    /// After all save work finished
    SaveFinished,
    /// Before deletion
    PreDelete,
    /// After deletion
    PostDelete,
}

impl LifecycleHook {
    /// Every hook, in canonical order
    pub const ALL: [Self; 5] = [
        Self::PreSave,
        Self::PostSave,
        Self::SaveFinished,
        Self::PreDelete,
        Self::PostDelete,
    ];

    /// Method name in source
    #[inline]
    #[must_use]
    pub fn method_name(self) -> &'static str {
        match self {
            Self::PreSave => "pre_save",
            Self::PostSave => "post_save",
            Self::SaveFinished => "save_finished",
            Self::PreDelete => "pre_delete",
            Self::PostDelete => "post_delete",
        }
    }

    /// Look up by method name
    #[must_use]
    pub fn from_method_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|h| h.method_name() == name)
    }
}

impl fmt::Display for LifecycleHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_name())
    }
}

/// Cross-cutting capability a declaration may require
///
/// Variant order is the canonical mixin order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Initializer-driven configuration
    Configurable,
    /// Dependency-injected properties
    Injectable,
    /// Logger access
    Loggable,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Configurable => "configurable",
            Self::Injectable => "injectable",
            Self::Loggable => "loggable",
        };
        f.write_str(name)
    }
}

/// Insert-only set of capabilities, iterated in canonical order
///
/// There is no removal: once a need is detected during an analysis pass it
/// stays detected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CapabilitySet(BTreeSet<Capability>);

impl CapabilitySet {
    /// Empty set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a capability; returns true if it was new
    pub fn insert(&mut self, capability: Capability) -> bool {
        self.0.insert(capability)
    }

    /// Record a capability when `detected` holds
    pub fn insert_if(&mut self, capability: Capability, detected: bool) {
        if detected {
            self.0.insert(capability);
        }
    }

    /// Membership test
    #[inline]
    #[must_use]
    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    /// Capabilities in canonical order
    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.0.iter().copied()
    }

    /// Number of capabilities
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// No capability detected
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// How a declaration reaches its DI container
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CapabilityUsage {
    /// Initializer accepts the container
    pub injects_via_initializer: bool,
    /// Names built through the container, first occurrence order
    pub build_targets: Vec<String>,
}

impl CapabilityUsage {
    /// Record a build target once
    pub fn add_build_target(&mut self, target: impl Into<String>) {
        let target = target.into();
        if !self.build_targets.contains(&target) {
            self.build_targets.push(target);
        }
    }
}

/// Structural description of one legacy model class
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Declaration {
    /// Class name
    pub name: String,
    /// Where the class is defined
    pub location: SourceLocation,
    /// Primary key field
    pub id_field: String,
    /// Destination (table) name
    pub destination: Option<String>,
    /// Storage backend class (short name)
    pub backend: String,
    /// Ordered fields
    pub fields: Vec<FieldSpec>,
    /// Lifecycle hooks present
    pub hooks: BTreeSet<LifecycleHook>,
    /// Other public methods, needing manual review
    pub custom_methods: Vec<String>,
    /// Declared base types as written
    pub bases: Vec<String>,
    /// Resolved capabilities
    pub capabilities: CapabilitySet,
    /// Initializer parameters (receiver and DI container excluded)
    pub init_params: Vec<ParameterSpec>,
    /// DI usage details
    pub usage: CapabilityUsage,
}

/// Id field used when a class does not override it
pub const DEFAULT_ID_FIELD: &str = "id";

/// Storage backend assumed when a class does not name one
pub const DEFAULT_BACKEND: &str = "MemoryBackend";

impl Declaration {
    /// Declaration with default id field and backend
    #[must_use]
    pub fn new(name: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            name: name.into(),
            location,
            id_field: DEFAULT_ID_FIELD.to_string(),
            destination: None,
            backend: DEFAULT_BACKEND.to_string(),
            fields: Vec::new(),
            hooks: BTreeSet::new(),
            custom_methods: Vec::new(),
            bases: Vec::new(),
            capabilities: CapabilitySet::new(),
            init_params: Vec::new(),
            usage: CapabilityUsage::default(),
        }
    }

    /// Add a field
    #[inline]
    #[must_use]
    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a hook
    #[inline]
    #[must_use]
    pub fn with_hook(mut self, hook: LifecycleHook) -> Self {
        self.hooks.insert(hook);
        self
    }

    /// Add a custom method
    #[inline]
    #[must_use]
    pub fn with_custom_method(mut self, name: impl Into<String>) -> Self {
        self.custom_methods.push(name.into());
        self
    }

    /// Set backend
    #[inline]
    #[must_use]
    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = backend.into();
        self
    }

    /// Whether the backend is the in-memory default
    #[inline]
    #[must_use]
    pub fn uses_default_backend(&self) -> bool {
        self.backend == DEFAULT_BACKEND
    }

    /// Field names in order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_set_iterates_canonically() {
        let mut set = CapabilitySet::new();
        set.insert(Capability::Loggable);
        set.insert(Capability::Configurable);
        assert!(!set.insert(Capability::Loggable));
        let order: Vec<_> = set.iter().collect();
        assert_eq!(order, vec![Capability::Configurable, Capability::Loggable]);
    }

    #[test]
    fn field_relationship_from_type() {
        assert_eq!(
            FieldSpec::new("user_id", "BelongsTo").relationship,
            Some(RelationshipKind::BelongsTo)
        );
        assert!(FieldSpec::new("tags", "clearskies.column_types.ManyToMany").is_relationship());
        assert!(!FieldSpec::new("name", "String").is_relationship());
    }

    #[test]
    fn hook_lookup() {
        assert_eq!(LifecycleHook::from_method_name("save_finished"), Some(LifecycleHook::SaveFinished));
        assert_eq!(LifecycleHook::from_method_name("save"), None);
    }

    #[test]
    fn usage_dedupes_targets() {
        let mut usage = CapabilityUsage::default();
        usage.add_build_target("MyService");
        usage.add_build_target("MyService");
        assert_eq!(usage.build_targets, vec!["MyService"]);
    }

    #[test]
    fn declaration_defaults() {
        let decl = Declaration::new("User", SourceLocation::new("models.py", 3));
        assert_eq!(decl.id_field, "id");
        assert!(decl.uses_default_backend());
        assert_eq!(decl.location.to_string(), "models.py:3");
    }
}
