//! # Drag Reordering
//!
//! A drag gesture names records, not positions: the record being dragged
//! (`active`) and the record it was dropped on (`over`). The controller turns
//! that pair into a [`ReorderRequest`] against the list as it is *now*, and
//! hands it back for the editor to apply through the store.
//!
//! Two rules keep a gesture honest:
//!
//! - **Staleness**: the store revision is captured when the drag starts. If any
//!   mutation was committed before the drop, the gesture is aborted.
//! - **Scope**: the scope travels with the gesture from start to drop. A drop
//!   into a different scope (another parent's sub-list) is rejected; moving a
//!   record across parents is not something a drag can do.
//!
//! The controller never mutates the store.

use crate::collection::CollectionStore;
use crate::error::{CurateError, Result};
use crate::model::{Entity, Identity, Scope};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragGesture {
    pub active: Identity,
    pub scope: Scope,
    pub revision: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropTarget {
    pub over: Identity,
    pub scope: Scope,
}

impl DropTarget {
    pub fn new(over: Identity, scope: Scope) -> Self {
        Self { over, scope }
    }
}

/// Positions are 0-based within `scope`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReorderRequest {
    pub scope: Scope,
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    NotDragging,
    NoTarget,
    SameSlot,
    ScopeMismatch { source: Scope, target: Scope },
    StaleGesture { started: u64, current: u64 },
    Missing(Identity),
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::NotDragging => write!(f, "no drag in progress"),
            AbortReason::NoTarget => write!(f, "dropped outside the list"),
            AbortReason::SameSlot => write!(f, "dropped on itself"),
            AbortReason::ScopeMismatch { source, target } => {
                write!(f, "cannot move from {} into {}", source, target)
            }
            AbortReason::StaleGesture { started, current } => write!(
                f,
                "list changed during the drag (revision {} -> {})",
                started, current
            ),
            AbortReason::Missing(id) => write!(f, "record {} is gone", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    Move(ReorderRequest),
    Aborted(AbortReason),
}

#[derive(Debug, Default)]
pub struct DragReorderController {
    gesture: Option<DragGesture>,
}

impl DragReorderController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn gesture(&self) -> Option<&DragGesture> {
        self.gesture.as_ref()
    }

    /// Starts a drag of `active` inside `scope`. Replaces any unfinished gesture.
    pub fn begin<T: Entity>(
        &mut self,
        store: &CollectionStore<T>,
        active: Identity,
        scope: Scope,
    ) -> Result<DragGesture> {
        let scope = store.canonical_scope(scope);
        let record = store
            .get(active)
            .ok_or_else(|| CurateError::NotFound(active.to_string()))?;
        if record.scope() != scope {
            return Err(CurateError::ScopeMismatch {
                source_scope: record.scope().to_string(),
                target_scope: scope.to_string(),
            });
        }
        let gesture = DragGesture {
            active: record.id,
            scope,
            revision: store.revision(),
        };
        self.gesture = Some(gesture);
        Ok(gesture)
    }

    pub fn cancel(&mut self) {
        self.gesture = None;
    }

    /// Ends the current gesture, resolving the drop against the current list.
    pub fn drop<T: Entity>(
        &mut self,
        store: &CollectionStore<T>,
        target: Option<DropTarget>,
    ) -> DragOutcome {
        let Some(gesture) = self.gesture.take() else {
            return DragOutcome::Aborted(AbortReason::NotDragging);
        };
        match resolve_drop(store, &gesture, target) {
            Ok(request) => DragOutcome::Move(request),
            Err(reason) => {
                tracing::debug!(kind = %T::KIND, active = %gesture.active, %reason, "drag aborted");
                DragOutcome::Aborted(reason)
            }
        }
    }
}

fn resolve_drop<T: Entity>(
    store: &CollectionStore<T>,
    gesture: &DragGesture,
    target: Option<DropTarget>,
) -> std::result::Result<ReorderRequest, AbortReason> {
    if store.revision() != gesture.revision {
        return Err(AbortReason::StaleGesture {
            started: gesture.revision,
            current: store.revision(),
        });
    }
    let target = target.ok_or(AbortReason::NoTarget)?;
    // an identity swap during the drag does not bump the revision
    let source = store.canonical_scope(gesture.scope);
    let target_scope = store.canonical_scope(target.scope);
    if target_scope != source {
        return Err(AbortReason::ScopeMismatch {
            source,
            target: target_scope,
        });
    }

    let over = store
        .get(target.over)
        .ok_or(AbortReason::Missing(target.over))?;
    if over.scope() != source {
        return Err(AbortReason::ScopeMismatch {
            source,
            target: over.scope(),
        });
    }

    let members = store.records_in(source);
    let position = |id: Identity| members.iter().position(|r| r.id == id);
    let from = position(store.canonical(gesture.active)).ok_or(AbortReason::Missing(gesture.active))?;
    let to = position(over.id).ok_or(AbortReason::Missing(over.id))?;
    if from == to {
        return Err(AbortReason::SameSlot);
    }

    Ok(ReorderRequest {
        scope: source,
        from,
        to,
    })
}
