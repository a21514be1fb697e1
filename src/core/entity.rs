//! Documentation entity model.
//!
//! An [`Entity`] is one documented construct keyed by its canonical namepath.
//! Every evidence source (line hints, code shape, tags) produces a
//! [`PartialEntity`]; partials are merged field-by-field and then turned into
//! an entity once a name is known.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::core::namepath::entity_id;

/// Documentation entity kinds, modelled after JSDoc kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Class,
    Constant,
    Event,
    External,
    File,
    Function,
    Member,
    Mixin,
    Module,
    Namespace,
}

impl EntityKind {
    /// Map a kind tag name to its kind. `method` is an alias of `function`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "class" => Some(Self::Class),
            "constant" => Some(Self::Constant),
            "event" => Some(Self::Event),
            "external" => Some(Self::External),
            "file" => Some(Self::File),
            "function" | "method" => Some(Self::Function),
            "member" => Some(Self::Member),
            "mixin" => Some(Self::Mixin),
            "module" => Some(Self::Module),
            "namespace" => Some(Self::Namespace),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Constant => "constant",
            Self::Event => "event",
            Self::External => "external",
            Self::File => "file",
            Self::Function => "function",
            Self::Member => "member",
            Self::Mixin => "mixin",
            Self::Module => "module",
            Self::Namespace => "namespace",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an entity was defined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    /// 1-based line of the documented code.
    pub line: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Value of a tag that has no dedicated field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Text(String),
    Flag(bool),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,
}

impl Param {
    /// A parameter known only by its position and name in the code.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Return {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A fully keyed documentation entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<EntityKind>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_instance_member: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherits_from: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Param>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub returns: Vec<Return>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub deprecated: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub inheritdoc: bool,
    pub source: SourceRef,
    #[serde(flatten)]
    pub extra: BTreeMap<String, TagValue>,
}

impl Entity {
    pub fn is_kind(&self, kind: EntityKind) -> bool {
        self.kind == Some(kind)
    }
}

/// Evidence about an entity from a single source. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialEntity {
    /// Identifier derived from the code shape. Only used to seed
    /// pre-synthesized member records; the table key is always generated.
    pub id: Option<String>,
    pub kind: Option<EntityKind>,
    pub name: Option<String>,
    pub container: Option<String>,
    pub is_instance_member: Option<bool>,
    pub inherits_from: Option<String>,
    pub params: Vec<Param>,
    pub returns: Vec<Return>,
    pub types: Option<Vec<String>>,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub deprecated: Option<bool>,
    pub inheritdoc: Option<bool>,
    pub source: Option<SourceRef>,
    pub extra: BTreeMap<String, TagValue>,
}

impl PartialEntity {
    /// Layer `other` on top of `self`. Present fields of `other` win; absent
    /// fields and empty lists leave `self` untouched.
    pub fn merge(&mut self, other: PartialEntity) {
        fn take<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        take(&mut self.id, other.id);
        take(&mut self.kind, other.kind);
        take(&mut self.name, other.name);
        take(&mut self.container, other.container);
        take(&mut self.is_instance_member, other.is_instance_member);
        take(&mut self.inherits_from, other.inherits_from);
        take(&mut self.types, other.types);
        take(&mut self.description, other.description);
        take(&mut self.summary, other.summary);
        take(&mut self.deprecated, other.deprecated);
        take(&mut self.inheritdoc, other.inheritdoc);
        take(&mut self.source, other.source);
        if !other.params.is_empty() {
            self.params = other.params;
        }
        if !other.returns.is_empty() {
            self.returns = other.returns;
        }
        self.extra.extend(other.extra);
    }

    /// Builder form of [`merge`](Self::merge).
    pub fn merged(mut self, other: PartialEntity) -> Self {
        self.merge(other);
        self
    }

    /// The namepath this partial would be stored under, if it has a name.
    pub fn generated_id(&self) -> Option<String> {
        let name = self.name.as_deref()?;
        Some(entity_id(
            self.container.as_deref(),
            name,
            self.is_instance_member.unwrap_or(false),
            self.kind,
        ))
    }

    /// Finish the record. Returns `None` when no evidence source named it.
    pub fn into_entity(self) -> Option<Entity> {
        let id = self.generated_id()?;
        let name = self.name?;
        Some(Entity {
            id,
            kind: self.kind,
            name,
            container: self.container.filter(|c| !c.is_empty()),
            is_instance_member: self.is_instance_member.unwrap_or(false),
            inherits_from: self.inherits_from,
            params: self.params,
            returns: self.returns,
            types: self.types,
            description: self.description,
            summary: self.summary,
            deprecated: self.deprecated.unwrap_or(false),
            inheritdoc: self.inheritdoc.unwrap_or(false),
            source: self.source.unwrap_or_default(),
            extra: self.extra,
        })
    }
}

/// An identifier overwritten by a later definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub id: String,
    pub previous: SourceRef,
    pub replacement: SourceRef,
}

/// Entities keyed by namepath, in first-insertion order.
///
/// Inserting an existing id replaces the entity in place (last write wins)
/// and records a [`Collision`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityTable {
    entries: Vec<Entity>,
    index: HashMap<String, usize>,
    collisions: Vec<Collision>,
}

impl EntityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity under its id. Returns the entity it replaced.
    pub fn insert(&mut self, entity: Entity) -> Option<Entity> {
        match self.index.get(&entity.id) {
            Some(&pos) => {
                let previous = std::mem::replace(&mut self.entries[pos], entity);
                let collision = Collision {
                    id: previous.id.clone(),
                    previous: previous.source.clone(),
                    replacement: self.entries[pos].source.clone(),
                };
                log::warn!(
                    "`{}` documented at line {}{} overrides the definition at line {}{}",
                    collision.id,
                    collision.replacement.line,
                    describe_file(&collision.replacement),
                    collision.previous.line,
                    describe_file(&collision.previous),
                );
                self.collisions.push(collision);
                Some(previous)
            }
            None => {
                self.index.insert(entity.id.clone(), self.entries.len());
                self.entries.push(entity);
                None
            }
        }
    }

    /// Merge `other` into this table in its insertion order.
    pub fn extend(&mut self, other: EntityTable) {
        self.collisions.extend(other.collisions);
        for entity in other.entries {
            self.insert(entity);
        }
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.index.get(id).map(|&pos| &self.entries[pos])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Entity> {
        self.index.get(id).map(|&pos| &mut self.entries[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Position of an id in insertion order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entries.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.id.as_str())
    }

    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }
}

fn describe_file(source: &SourceRef) -> String {
    source
        .name
        .as_deref()
        .map(|name| format!(" of {}", name))
        .unwrap_or_default()
}

impl Serialize for EntityTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entity in &self.entries {
            map.serialize_entry(&entity.id, entity)?;
        }
        map.end()
    }
}
