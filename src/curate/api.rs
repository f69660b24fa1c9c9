//! # Editor Facade
//!
//! [`CollectionEditor`] is the single entry point a UI drives. It owns one
//! collection's store together with the editing state around it (edit session,
//! drag gesture, search window) and the notifier persistence listens on.
//!
//! ## Role and Responsibilities
//!
//! The facade:
//! - **Resolves** locators (ids, pending keys, positions) to records
//! - **Routes** every change through [`CollectionStore`], the single writer
//! - **Notifies** sinks once per committed mutation, with the new snapshot
//! - **Recovers** from stale references: a commit, delete, toggle or drag aimed
//!   at a record that is gone (or in another scope) is logged and reported as
//!   [`EditOutcome::Unchanged`] rather than failing the caller
//!
//! ## What the Facade Does NOT Do
//!
//! - **Rendering**: it hands out records and flags, never strings
//! - **I/O**: saving happens in sinks (see [`crate::store::AutoSave`])
//! - **Waiting**: notifications are fire-and-forget; nothing is rolled back
//!   when a sink fails

use crate::collection::CollectionStore;
use crate::drag::{DragOutcome, DragReorderController, DropTarget};
use crate::error::{CurateError, Result};
use crate::filter::{self, FilterState};
use crate::index::Locator;
use crate::layout::LayoutDraft;
use crate::model::{Entity, Identity, OrderedRecord, Scope};
use crate::notify::{AutoSaveNotifier, MutationEvent, MutationKind, MutationSink};
use crate::schema::FieldRules;
use crate::session::{EditMode, EditSession, InlineEditSession, ValidationFailure};
use serde_json::Value;
use std::sync::mpsc::Receiver;

/// What a mutating call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The store changed and sinks were notified with `sequence`.
    Applied { kind: MutationKind, sequence: u64 },
    /// Nothing changed: a no-op, an aborted gesture or a stale reference.
    Unchanged,
}

impl EditOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, EditOutcome::Applied { .. })
    }
}

pub struct CollectionEditor<T: Entity> {
    store: CollectionStore<T>,
    session: InlineEditSession<T>,
    drag: DragReorderController,
    filter: FilterState,
    notifier: AutoSaveNotifier<T>,
}

impl<T: Entity + 'static> CollectionEditor<T> {
    pub fn new(rules: &FieldRules) -> Self {
        Self::from_store(CollectionStore::new(rules))
    }

    /// Editor over previously saved records.
    pub fn from_records(rules: &FieldRules, records: Vec<OrderedRecord<T>>) -> Self {
        Self::from_store(CollectionStore::from_records(rules, records))
    }

    pub fn from_store(store: CollectionStore<T>) -> Self {
        Self {
            store,
            session: InlineEditSession::new(),
            drag: DragReorderController::new(),
            filter: FilterState::default(),
            notifier: AutoSaveNotifier::new(),
        }
    }

    pub fn with_filter(mut self, filter: FilterState) -> Self {
        self.filter = filter;
        self
    }

    pub fn store(&self) -> &CollectionStore<T> {
        &self.store
    }

    pub fn snapshot(&self) -> Vec<OrderedRecord<T>> {
        self.store.snapshot()
    }

    pub fn revision(&self) -> u64 {
        self.store.revision()
    }

    pub fn subscribe(&mut self, sink: impl MutationSink<T> + 'static) {
        self.notifier.subscribe(sink);
    }

    /// Typed channel of the given mutation kinds (all kinds when empty).
    pub fn channel(&mut self, kinds: &[MutationKind]) -> Receiver<MutationEvent<T>> {
        self.notifier.channel(kinds)
    }

    pub fn resolve(&self, locator: &Locator) -> Result<Identity> {
        self.store.resolve(locator)
    }

    fn notify(&mut self, kind: MutationKind, scope: Option<Scope>) -> EditOutcome {
        let sequence = self.notifier.emit(kind, scope, self.store.snapshot());
        EditOutcome::Applied { kind, sequence }
    }

    /// Turns stale-reference errors into a logged no-op.
    fn recover(&self, action: &str, error: CurateError) -> Result<EditOutcome> {
        if error.is_recoverable() {
            tracing::warn!(kind = %T::KIND, action, %error, "ignored stale reference");
            Ok(EditOutcome::Unchanged)
        } else {
            Err(error)
        }
    }

    // --- Edit session ---

    pub fn open_add(&mut self, scope: Scope) -> Result<()> {
        self.session.open_add(&self.store, scope)
    }

    pub fn open_edit(&mut self, locator: &Locator) -> Result<()> {
        let id = self.store.resolve(locator)?;
        self.session.open_edit(&self.store, id)
    }

    pub fn set_field(&mut self, key: &str, value: Value) -> Result<()> {
        self.session.set_field(key, value)
    }

    pub fn is_session_open(&self) -> bool {
        self.session.is_open()
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.current()
    }

    pub fn validation_error(&self) -> Option<&ValidationFailure> {
        self.session.validation_error()
    }

    /// Commits the open session. Validation errors keep the session open.
    ///
    /// Returns `None` when the edited record was deleted while the session was
    /// open; the session is closed and nothing is written.
    pub fn commit(&mut self) -> Result<Option<OrderedRecord<T>>> {
        let kind = match self.session.current().map(|s| s.mode) {
            Some(EditMode::Add) => MutationKind::Add,
            _ => MutationKind::Update,
        };
        let revision = self.store.revision();
        let record = match self.session.commit(&mut self.store) {
            Ok(record) => record,
            Err(e) => return self.recover("commit", e).map(|_| None),
        };
        if self.store.revision() != revision {
            self.notify(kind, Some(record.scope()));
        }
        Ok(Some(record))
    }

    pub fn cancel(&mut self) {
        self.session.cancel();
    }

    // --- Direct mutations ---

    pub fn delete(&mut self, locator: &Locator) -> Result<EditOutcome> {
        let id = match self.store.resolve(locator) {
            Ok(id) => id,
            Err(e) => return self.recover("delete", e),
        };
        let scope = self.store.get(id).map(|r| r.scope());
        match self.store.delete(id) {
            Ok(_) => Ok(self.notify(MutationKind::Delete, scope)),
            Err(e) => self.recover("delete", e),
        }
    }

    pub fn toggle(&mut self, locator: &Locator, field: &str) -> Result<EditOutcome> {
        let id = match self.store.resolve(locator) {
            Ok(id) => id,
            Err(e) => return self.recover("toggle", e),
        };
        match self.store.toggle(id, field) {
            Ok(record) => Ok(self.notify(MutationKind::Update, Some(record.scope()))),
            Err(e) => self.recover("toggle", e),
        }
    }

    /// Moves a record to a 1-based position within its own scope.
    pub fn move_to(&mut self, locator: &Locator, position: usize) -> Result<EditOutcome> {
        let id = match self.store.resolve(locator) {
            Ok(id) => id,
            Err(e) => return self.recover("move", e),
        };
        let Some(record) = self.store.get(id) else {
            return Ok(EditOutcome::Unchanged);
        };
        let scope = record.scope();
        let from = (record.order as usize).saturating_sub(1);
        let to = position.checked_sub(1).ok_or_else(|| CurateError::PositionOutOfRange {
            scope: scope.to_string(),
            index: 0,
            len: self.store.records_in(scope).len(),
        })?;
        self.reorder(from, to, scope)
    }

    /// Moves the record at `from` to `to` (0-based) within `scope`.
    pub fn reorder(&mut self, from: usize, to: usize, scope: Scope) -> Result<EditOutcome> {
        let revision = self.store.revision();
        self.store.reorder(from, to, scope)?;
        if self.store.revision() == revision {
            return Ok(EditOutcome::Unchanged);
        }
        Ok(self.notify(MutationKind::Reorder, Some(scope)))
    }

    /// Swaps a pending key for the id persistence assigned. Not a mutation event.
    pub fn assign_identity(&mut self, pending: Identity, persisted: u64) -> Result<OrderedRecord<T>> {
        self.store.assign_identity(pending, persisted)
    }

    // --- Drag reordering ---

    /// Starts a drag. Returns false when `active` is gone or not in `scope`.
    pub fn begin_drag(&mut self, active: Identity, scope: Scope) -> Result<bool> {
        match self.drag.begin(&self.store, active, scope) {
            Ok(_) => Ok(true),
            Err(e) => self.recover("drag", e).map(|_| false),
        }
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Ends the drag over `target` (or outside the list when `None`).
    pub fn drop(&mut self, target: Option<DropTarget>) -> Result<EditOutcome> {
        match self.drag.drop(&self.store, target) {
            DragOutcome::Move(request) => self.reorder(request.from, request.to, request.scope),
            DragOutcome::Aborted(_) => Ok(EditOutcome::Unchanged),
        }
    }

    // --- Layout drafts ---

    pub fn begin_layout(&self, scope: Scope) -> LayoutDraft {
        LayoutDraft::open(&self.store, scope)
    }

    /// Commits a staged layout as one reorder notification.
    pub fn apply_layout(&mut self, draft: &LayoutDraft) -> Result<EditOutcome> {
        let revision = self.store.revision();
        draft.apply(&mut self.store)?;
        if self.store.revision() == revision {
            return Ok(EditOutcome::Unchanged);
        }
        Ok(self.notify(MutationKind::Reorder, Some(draft.scope())))
    }

    // --- Search and pagination ---

    pub fn query(&self) -> &str {
        self.filter.query()
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.filter.set_query(query);
    }

    pub fn clear_query(&mut self) {
        self.filter.clear_query();
    }

    pub fn load_more(&mut self) {
        self.filter.load_more();
    }

    fn matches(&self, scope: Scope) -> Vec<&OrderedRecord<T>> {
        filter::apply(
            self.store.records_in(scope),
            self.filter.query(),
            &self.store.rules().search,
        )
    }

    /// The records a list view of `scope` shows right now.
    pub fn visible_records(&self, scope: Scope) -> Vec<&OrderedRecord<T>> {
        filter::paginate(&self.matches(scope), self.filter.visible_count())
    }

    pub fn match_count(&self, scope: Scope) -> usize {
        self.matches(scope).len()
    }

    pub fn has_more(&self, scope: Scope) -> bool {
        self.filter.has_more(self.match_count(scope))
    }
}
