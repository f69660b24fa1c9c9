//! # Domain Model
//!
//! An editable collection is a list of [`OrderedRecord`]s. Each record wraps the
//! entity fields (`T`) with the bookkeeping the editor needs:
//!
//! - an [`Identity`], either durable (`Persisted`) or local (`Pending`),
//! - an optional parent identity placing it in a nested [`Scope`],
//! - a dense, 1-based `order` within that scope,
//! - creation/update timestamps.
//!
//! ## Identity
//!
//! A record added locally has no server id yet. Instead of position-derived
//! `temp-<index>` strings it gets a `Pending` identity carrying a random
//! [`LocalKey`]. The key is stable across reorders and deletes of other records
//! and is swapped for a `Persisted` id exactly once, when the persistence
//! collaborator reports one. It still renders as `temp-…` so it is never
//! mistaken for a durable id.
//!
//! ## Drafts and Patches
//!
//! Entity fields are edited through a partial field map ([`Draft`]). Merging a
//! draft into an entity goes through serde, which lets the same editing code
//! serve every entity kind.

use crate::error::{CurateError, Result};
use crate::schema::EntityKind;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub const PENDING_PREFIX: &str = "temp-";

/// Partial field map over an entity.
pub type Draft = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalKey(Uuid);

impl LocalKey {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LocalKey {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LocalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Identity {
    Persisted(u64),
    Pending(LocalKey),
}

impl Identity {
    pub fn pending() -> Self {
        Identity::Pending(LocalKey::new())
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Identity::Pending(_))
    }

    pub fn persisted_id(&self) -> Option<u64> {
        match self {
            Identity::Persisted(id) => Some(*id),
            Identity::Pending(_) => None,
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::Persisted(id) => write!(f, "{}", id),
            Identity::Pending(key) => write!(f, "{}{}", PENDING_PREFIX, key),
        }
    }
}

impl FromStr for Identity {
    type Err = CurateError;

    fn from_str(s: &str) -> Result<Self> {
        if let Some(rest) = s.strip_prefix(PENDING_PREFIX) {
            return Uuid::parse_str(rest)
                .map(|uuid| Identity::Pending(LocalKey(uuid)))
                .map_err(|_| CurateError::InvalidLocator(s.to_string()));
        }
        s.parse::<u64>()
            .map(Identity::Persisted)
            .map_err(|_| CurateError::InvalidLocator(s.to_string()))
    }
}

/// The sub-list a record is ordered within.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Records without a parent. For a flat collection, the whole list.
    Root,
    /// Records nested under one parent.
    Parent(Identity),
}

impl Scope {
    pub fn of(parent: Option<Identity>) -> Self {
        match parent {
            Some(id) => Scope::Parent(id),
            None => Scope::Root,
        }
    }

    pub fn parent(&self) -> Option<Identity> {
        match self {
            Scope::Root => None,
            Scope::Parent(id) => Some(*id),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Root => write!(f, "root"),
            Scope::Parent(id) => write!(f, "parent {}", id),
        }
    }
}

/// An entity type managed by the editor.
pub trait Entity: Clone + fmt::Debug + PartialEq + Default + Serialize + DeserializeOwned {
    const KIND: EntityKind;

    /// Short human label used in messages and listings.
    fn label(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderedRecord<T> {
    pub id: Identity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Identity>,
    pub order: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub fields: T,
}

impl<T: Entity> OrderedRecord<T> {
    pub fn new(fields: T, parent: Option<Identity>, order: u32) -> Self {
        let now = Utc::now();
        Self {
            id: Identity::pending(),
            parent,
            order,
            created_at: now,
            updated_at: now,
            fields,
        }
    }

    pub fn scope(&self) -> Scope {
        Scope::of(self.parent)
    }

    /// Key a presentation layer uses to match its elements to this record.
    pub fn key(&self) -> String {
        self.id.to_string()
    }
}

/// A field update, optionally carrying an explicit new position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    pub fields: Draft,
    pub order: Option<u32>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }
}

pub fn to_fields<T: Entity>(entity: &T) -> Result<Draft> {
    match serde_json::to_value(entity)? {
        Value::Object(map) => Ok(map),
        other => Err(CurateError::InvalidField {
            field: T::KIND.to_string(),
            reason: format!("entity serialized to {} instead of an object", other),
        }),
    }
}

pub fn from_fields<T: Entity>(fields: Draft) -> Result<T> {
    Ok(serde_json::from_value(Value::Object(fields))?)
}

/// Overlays `draft` on `entity`, returning the merged entity and its field map.
pub fn merge<T: Entity>(entity: &T, draft: &Draft) -> Result<(T, Draft)> {
    let mut fields = to_fields(entity)?;
    for (key, value) in draft {
        fields.insert(key.clone(), value.clone());
    }
    let merged = from_fields(fields.clone()).map_err(|e| CurateError::InvalidField {
        field: T::KIND.to_string(),
        reason: e.to_string(),
    })?;
    Ok((merged, fields))
}
