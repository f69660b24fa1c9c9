//! # Inline Edit Session
//!
//! The add/edit form of a collection. A session holds a draft seeded either
//! from entity defaults (add) or from an existing record (edit); field edits
//! only touch the draft. Nothing reaches the store until [`InlineEditSession::commit`].
//!
//! At most one session is open per holder. Opening another one discards the
//! unsaved draft; asking the user first is the UI's business.
//!
//! A failed validation keeps the session open and remembers which fields were
//! missing so the form can show them.

use crate::collection::CollectionStore;
use crate::error::{CurateError, Result};
use crate::model::{to_fields, Draft, Entity, Identity, OrderedRecord, Patch, Scope};
use crate::schema::EntityKind;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;

/// Draft key that sets the requested position rather than an entity field.
pub const ORDER_FIELD: &str = "order";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Add,
    Edit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    pub mode: EditMode,
    pub target: Option<Identity>,
    pub scope: Scope,
    pub draft: Draft,
    pub order: u32,
    seed: Draft,
    seed_order: u32,
}

impl EditSession {
    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.seed || self.order != self.seed_order
    }

    /// Fields that differ from what the session was opened with.
    fn changed_fields(&self) -> Draft {
        self.draft
            .iter()
            .filter(|(key, value)| self.seed.get(key.as_str()) != Some(*value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub kind: EntityKind,
    pub missing: Vec<String>,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} needs: {}", self.kind, self.missing.join(", "))
    }
}

#[derive(Debug)]
pub struct InlineEditSession<T> {
    session: Option<EditSession>,
    error: Option<ValidationFailure>,
    _entity: PhantomData<T>,
}

impl<T> Default for InlineEditSession<T> {
    fn default() -> Self {
        Self {
            session: None,
            error: None,
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> InlineEditSession<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn current(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn is_dirty(&self) -> bool {
        self.session.as_ref().is_some_and(EditSession::is_dirty)
    }

    pub fn validation_error(&self) -> Option<&ValidationFailure> {
        self.error.as_ref()
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.session.as_ref().and_then(|s| s.draft.get(key))
    }

    fn replace(&mut self, session: EditSession) {
        if let Some(previous) = self.session.take() {
            if previous.is_dirty() {
                tracing::debug!(kind = %T::KIND, mode = ?previous.mode, "unsaved draft discarded");
            }
        }
        self.error = None;
        self.session = Some(session);
    }

    /// Opens an add form at the end of `scope`, seeded with entity defaults.
    pub fn open_add(&mut self, store: &CollectionStore<T>, scope: Scope) -> Result<()> {
        let seed = to_fields(&T::default())?;
        let order = store.next_order(scope);
        self.replace(EditSession {
            mode: EditMode::Add,
            target: None,
            scope,
            draft: seed.clone(),
            order,
            seed,
            seed_order: order,
        });
        Ok(())
    }

    /// Opens an edit form seeded from the record `id`.
    pub fn open_edit(&mut self, store: &CollectionStore<T>, id: Identity) -> Result<()> {
        let record = store
            .get(id)
            .ok_or_else(|| CurateError::NotFound(id.to_string()))?;
        let seed = to_fields(&record.fields)?;
        self.replace(EditSession {
            mode: EditMode::Edit,
            target: Some(record.id),
            scope: record.scope(),
            draft: seed.clone(),
            order: record.order,
            seed,
            seed_order: record.order,
        });
        Ok(())
    }

    pub fn set_field(&mut self, key: &str, value: Value) -> Result<()> {
        let session = self.session.as_mut().ok_or_else(|| CurateError::InvalidField {
            field: key.to_string(),
            reason: "no edit session is open".to_string(),
        })?;

        if key == ORDER_FIELD {
            let order = value
                .as_u64()
                .filter(|n| *n >= 1)
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| CurateError::InvalidField {
                    field: key.to_string(),
                    reason: format!("expected a positive integer, found {}", value),
                })?;
            session.order = order;
        } else {
            session.draft.insert(key.to_string(), value);
        }
        Ok(())
    }

    /// Validates and writes the draft to the store, closing the session on success.
    ///
    /// Validation failures keep the session open. A stale target closes it.
    pub fn commit(&mut self, store: &mut CollectionStore<T>) -> Result<OrderedRecord<T>> {
        let session = self.session.as_ref().ok_or_else(|| CurateError::InvalidField {
            field: T::KIND.to_string(),
            reason: "no edit session is open".to_string(),
        })?;

        let result = match (session.mode, session.target) {
            (EditMode::Edit, Some(target)) => {
                let mut patch = Patch {
                    fields: session.changed_fields(),
                    order: None,
                };
                if session.order != session.seed_order {
                    patch.order = Some(session.order);
                }
                store.update(target, &patch)
            }
            _ => store.add(&session.draft, session.scope).and_then(|record| {
                if session.order != record.order {
                    store.update(record.id, &Patch::new().with_order(session.order))
                } else {
                    Ok(record)
                }
            }),
        };

        match result {
            Ok(record) => {
                self.session = None;
                self.error = None;
                Ok(record)
            }
            Err(CurateError::Validation { kind, missing }) => {
                self.error = Some(ValidationFailure {
                    kind,
                    missing: missing.clone(),
                });
                Err(CurateError::Validation { kind, missing })
            }
            Err(other) => {
                // the target is gone; nothing left to commit against
                if other.is_recoverable() {
                    self.session = None;
                    self.error = None;
                }
                Err(other)
            }
        }
    }

    /// Discards the draft without touching the store.
    pub fn cancel(&mut self) {
        self.session = None;
        self.error = None;
    }
}
