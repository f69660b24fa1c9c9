//! Staged reordering: a layout editor shuffles a copy of one scope and commits
//! the result as a single reorder. The draft is bound to the store revision it
//! was opened at and refuses to apply once the collection moved on.

use crate::collection::CollectionStore;
use crate::error::{CurateError, Result};
use crate::model::{Entity, Identity, OrderedRecord, Scope};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutDraft {
    scope: Scope,
    revision: u64,
    ids: Vec<Identity>,
}

impl LayoutDraft {
    pub fn open<T: Entity>(store: &CollectionStore<T>, scope: Scope) -> Self {
        Self {
            scope,
            revision: store.revision(),
            ids: store.records_in(scope).iter().map(|r| r.id).collect(),
        }
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn ids(&self) -> &[Identity] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Moves the item at `from` to `to` (0-based) in the staged order.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.ids.len();
        for index in [from, to] {
            if index >= len {
                return Err(CurateError::PositionOutOfRange {
                    scope: self.scope.to_string(),
                    index,
                    len,
                });
            }
        }
        let moved = self.ids.remove(from);
        self.ids.insert(to, moved);
        Ok(())
    }

    /// True when the staged order differs from the store's current one.
    pub fn is_changed<T: Entity>(&self, store: &CollectionStore<T>) -> bool {
        let current: Vec<Identity> = store.records_in(self.scope).iter().map(|r| r.id).collect();
        let staged: Vec<Identity> = self.ids.iter().map(|id| store.canonical(*id)).collect();
        current != staged
    }

    /// Writes the staged order to the store.
    pub fn apply<T: Entity>(&self, store: &mut CollectionStore<T>) -> Result<Vec<OrderedRecord<T>>> {
        if store.revision() != self.revision {
            tracing::warn!(kind = %T::KIND, opened = self.revision, current = store.revision(), "layout draft is stale");
            return Err(CurateError::StaleLayout);
        }
        store.apply_order(self.scope, &self.ids)
    }
}
