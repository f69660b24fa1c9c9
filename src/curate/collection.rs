//! # Collection Store
//!
//! [`CollectionStore`] is the single writer of one collection instance. Drag
//! controllers, edit sessions and layout drafts only compute what they want;
//! every change to the canonical list goes through a method here.
//!
//! ## Ordering
//!
//! Records live in one `Vec`. Within a [`Scope`], the relative position of the
//! scope's records in that vector *is* their order, and the `order` field is
//! recomputed from it after every structural change (renumbering). Orders are
//! 1-based and dense per scope: `1..=N`, no gaps, no duplicates.
//!
//! A reorder only rewrites the vector slots that belong to its scope, so
//! records in other scopes keep both their slots and their order values.
//!
//! ## Revisions
//!
//! Every committed mutation bumps [`CollectionStore::revision`]. Gestures and
//! layout drafts remember the revision they started from and are rejected when
//! it moved on, instead of applying positions computed against an older list.
//!
//! ## Identity swap
//!
//! [`CollectionStore::assign_identity`] replaces a pending key with the
//! persisted id. The old key stays resolvable through an alias table, so a
//! reference captured before the swap still reaches the record.

use crate::error::{CurateError, Result};
use crate::index::Locator;
use crate::model::{
    from_fields, merge, to_fields, Draft, Entity, Identity, LocalKey, OrderedRecord, Patch, Scope,
};
use crate::schema::{EntityRules, FieldRules};
use crate::slug::slugify;
use chrono::Utc;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
pub struct CollectionStore<T> {
    rules: EntityRules,
    records: Vec<OrderedRecord<T>>,
    aliases: HashMap<LocalKey, u64>,
    revision: u64,
}

impl<T: Entity> CollectionStore<T> {
    pub fn new(rules: &FieldRules) -> Self {
        Self {
            rules: rules.for_kind(T::KIND),
            records: Vec::new(),
            aliases: HashMap::new(),
            revision: 0,
        }
    }

    /// Builds a store from previously saved records.
    ///
    /// Records are sorted by their stored order and every scope is renumbered,
    /// so gaps or duplicates in the input are repaired on load.
    pub fn from_records(rules: &FieldRules, mut records: Vec<OrderedRecord<T>>) -> Self {
        records.sort_by_key(|r| r.order);
        let mut store = Self {
            rules: rules.for_kind(T::KIND),
            records,
            aliases: HashMap::new(),
            revision: 0,
        };
        for scope in store.scopes() {
            store.renumber(scope);
        }
        store
    }

    pub fn rules(&self) -> &EntityRules {
        &self.rules
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[OrderedRecord<T>] {
        &self.records
    }

    pub fn snapshot(&self) -> Vec<OrderedRecord<T>> {
        self.records.clone()
    }

    /// Records of one scope, in order.
    pub fn records_in(&self, scope: Scope) -> Vec<&OrderedRecord<T>> {
        let scope = self.canonical_scope(scope);
        self.records.iter().filter(|r| r.scope() == scope).collect()
    }

    /// Distinct scopes present in the collection, in first-seen order.
    pub fn scopes(&self) -> Vec<Scope> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(|r| r.scope())
            .filter(|scope| seen.insert(*scope))
            .collect()
    }

    /// Maps a pending key that has since been persisted to its durable id.
    pub fn canonical(&self, id: Identity) -> Identity {
        match id {
            Identity::Pending(key) => self
                .aliases
                .get(&key)
                .map(|persisted| Identity::Persisted(*persisted))
                .unwrap_or(id),
            persisted => persisted,
        }
    }

    /// A parent scope keyed by a since-persisted pending key names the same
    /// sub-list as the durable id.
    pub fn canonical_scope(&self, scope: Scope) -> Scope {
        match scope {
            Scope::Parent(id) => Scope::Parent(self.canonical(id)),
            Scope::Root => Scope::Root,
        }
    }

    pub fn get(&self, id: Identity) -> Option<&OrderedRecord<T>> {
        let id = self.canonical(id);
        self.records.iter().find(|r| r.id == id)
    }

    fn slot_of(&self, id: Identity) -> Result<usize> {
        let id = self.canonical(id);
        self.records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| CurateError::NotFound(id.to_string()))
    }

    /// Resolves a locator against the current list.
    pub fn resolve(&self, locator: &Locator) -> Result<Identity> {
        match locator {
            Locator::Key(id) => self
                .get(*id)
                .map(|r| r.id)
                .ok_or_else(|| CurateError::NotFound(id.to_string())),
            Locator::Position { scope, index } => self
                .records_in(*scope)
                .get(*index)
                .map(|r| r.id)
                .ok_or_else(|| CurateError::NotFound(format!("@{} in {}", index + 1, scope))),
        }
    }

    pub fn next_order(&self, scope: Scope) -> u32 {
        let scope = self.canonical_scope(scope);
        self.records
            .iter()
            .filter(|r| r.scope() == scope)
            .map(|r| r.order)
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Merges `draft` over `base`, fills the slug and checks required fields.
    fn prepare(&self, base: &T, draft: &Draft) -> Result<T> {
        let (merged, mut fields) = merge(base, draft)?;

        let mut slug_filled = false;
        if let Some(rule) = &self.rules.slug {
            let target_blank = match fields.get(&rule.target) {
                Some(Value::String(s)) => s.trim().is_empty(),
                None | Some(Value::Null) => true,
                Some(_) => false,
            };
            if target_blank {
                if let Some(Value::String(source)) = fields.get(&rule.source) {
                    let slug = slugify(source);
                    if !slug.is_empty() {
                        fields.insert(rule.target.clone(), Value::String(slug));
                        slug_filled = true;
                    }
                }
            }
        }

        let missing = self.rules.missing_fields(&fields);
        if !missing.is_empty() {
            return Err(CurateError::Validation {
                kind: T::KIND,
                missing,
            });
        }

        if slug_filled {
            from_fields(fields)
        } else {
            Ok(merged)
        }
    }

    /// Appends a new record at the end of `scope` with a pending identity.
    pub fn add(&mut self, draft: &Draft, scope: Scope) -> Result<OrderedRecord<T>> {
        let fields = self.prepare(&T::default(), draft)?;
        let scope = self.canonical_scope(scope);
        if T::KIND.is_two_level() {
            self.check_nesting(scope)?;
        }
        let record = OrderedRecord::new(fields, scope.parent(), self.next_order(scope));
        tracing::debug!(kind = %T::KIND, id = %record.id, order = record.order, %scope, "record added");
        self.records.push(record.clone());
        self.revision += 1;
        Ok(record)
    }

    /// Replaces fields on a record, moving it when the patch carries an order.
    pub fn update(&mut self, id: Identity, patch: &Patch) -> Result<OrderedRecord<T>> {
        let slot = self.slot_of(id)?;
        let current = &self.records[slot];
        let fields = self.prepare(&current.fields, &patch.fields)?;
        let scope = current.scope();
        let current_order = current.order;
        let fields_changed = fields != current.fields;

        let target_order = patch
            .order
            .map(|order| order.clamp(1, self.records_in(scope).len() as u32))
            .filter(|order| *order != current_order);

        if !fields_changed && target_order.is_none() {
            return Ok(self.records[slot].clone());
        }

        let record_id = self.records[slot].id;
        if fields_changed {
            let record = &mut self.records[slot];
            record.fields = fields;
            record.updated_at = Utc::now();
        }
        if let Some(order) = target_order {
            self.move_in_scope(scope, (current_order - 1) as usize, (order - 1) as usize);
        }
        self.revision += 1;
        tracing::debug!(kind = %T::KIND, id = %record_id, moved = target_order.is_some(), "record updated");

        let slot = self.slot_of(record_id)?;
        Ok(self.records[slot].clone())
    }

    /// Flips a boolean field. A null field counts as `false`.
    pub fn toggle(&mut self, id: Identity, field: &str) -> Result<OrderedRecord<T>> {
        let slot = self.slot_of(id)?;
        let mut fields = to_fields(&self.records[slot].fields)?;
        let flipped = match fields.get(field) {
            Some(Value::Bool(b)) => !b,
            Some(Value::Null) => true,
            Some(other) => {
                return Err(CurateError::InvalidField {
                    field: field.to_string(),
                    reason: format!("expected a boolean, found {}", other),
                })
            }
            None => {
                return Err(CurateError::InvalidField {
                    field: field.to_string(),
                    reason: format!("{} has no such field", T::KIND),
                })
            }
        };
        fields.insert(field.to_string(), Value::Bool(flipped));

        let record = &mut self.records[slot];
        record.fields = from_fields(fields)?;
        record.updated_at = Utc::now();
        self.revision += 1;
        tracing::debug!(kind = %T::KIND, id = %record.id, field, value = flipped, "field toggled");
        Ok(record.clone())
    }

    /// Removes a record (and anything nested under it), then renumbers its scope.
    pub fn delete(&mut self, id: Identity) -> Result<Vec<OrderedRecord<T>>> {
        let slot = self.slot_of(id)?;
        let removed = self.records.remove(slot);
        let scope = removed.scope();

        let mut orphans = vec![removed.id];
        while let Some(parent) = orphans.pop() {
            let before = self.records.len();
            let children: Vec<Identity> = self
                .records
                .iter()
                .filter(|r| r.parent == Some(parent))
                .map(|r| r.id)
                .collect();
            self.records.retain(|r| r.parent != Some(parent));
            if self.records.len() != before {
                tracing::debug!(kind = %T::KIND, %parent, count = before - self.records.len(), "nested records removed");
            }
            orphans.extend(children);
        }

        self.renumber(scope);
        self.revision += 1;
        tracing::debug!(kind = %T::KIND, id = %removed.id, %scope, "record deleted");
        Ok(self.snapshot())
    }

    /// Moves the record at `from` to `to`, both 0-based positions within `scope`.
    pub fn reorder(&mut self, from: usize, to: usize, scope: Scope) -> Result<Vec<OrderedRecord<T>>> {
        let scope = self.canonical_scope(scope);
        let len = self.records_in(scope).len();
        for index in [from, to] {
            if index >= len {
                return Err(CurateError::PositionOutOfRange {
                    scope: scope.to_string(),
                    index,
                    len,
                });
            }
        }
        if from == to {
            return Ok(self.snapshot());
        }

        self.move_in_scope(scope, from, to);
        self.revision += 1;
        tracing::debug!(kind = %T::KIND, from, to, %scope, "scope reordered");
        Ok(self.snapshot())
    }

    /// Rewrites `scope` to follow `ordered`, which must list each of its records once.
    pub fn apply_order(&mut self, scope: Scope, ordered: &[Identity]) -> Result<Vec<OrderedRecord<T>>> {
        let scope = self.canonical_scope(scope);
        let slots: Vec<usize> = self.scope_slots(scope);
        let ordered: Vec<Identity> = ordered.iter().map(|id| self.canonical(*id)).collect();

        let current: HashSet<Identity> = slots.iter().map(|&i| self.records[i].id).collect();
        let requested: HashSet<Identity> = ordered.iter().copied().collect();
        if current != requested || ordered.len() != slots.len() {
            return Err(CurateError::StaleLayout);
        }

        let unchanged = slots
            .iter()
            .zip(&ordered)
            .all(|(&slot, id)| self.records[slot].id == *id);
        if unchanged {
            return Ok(self.snapshot());
        }

        let by_id: HashMap<Identity, OrderedRecord<T>> = slots
            .iter()
            .map(|&i| (self.records[i].id, self.records[i].clone()))
            .collect();
        for (slot, id) in slots.iter().zip(&ordered) {
            if let Some(record) = by_id.get(id) {
                self.records[*slot] = record.clone();
            }
        }
        self.renumber(scope);
        self.revision += 1;
        tracing::debug!(kind = %T::KIND, %scope, count = ordered.len(), "scope order applied");
        Ok(self.snapshot())
    }

    /// Swaps a pending identity for the durable id assigned by persistence.
    pub fn assign_identity(&mut self, pending: Identity, persisted: u64) -> Result<OrderedRecord<T>> {
        let key = match pending {
            Identity::Pending(key) => key,
            Identity::Persisted(id) => {
                return Err(CurateError::IdentityConflict(format!(
                    "record {} already has a persisted id",
                    id
                )))
            }
        };
        if let Some(existing) = self.aliases.get(&key) {
            return Err(CurateError::IdentityConflict(format!(
                "{} was already assigned id {}",
                pending, existing
            )));
        }
        let durable = Identity::Persisted(persisted);
        if self.records.iter().any(|r| r.id == durable) {
            return Err(CurateError::IdentityConflict(format!(
                "id {} is already in use",
                persisted
            )));
        }

        let slot = self.slot_of(pending)?;
        self.records[slot].id = durable;
        self.aliases.insert(key, persisted);
        let children = self.repoint_parent(pending, durable);
        tracing::debug!(kind = %T::KIND, %pending, id = persisted, children, "identity assigned");
        Ok(self.records[slot].clone())
    }

    /// Points records nested under `from` at `to` instead. Returns how many moved.
    ///
    /// Orders are untouched: the scope keeps its members, only its key changes.
    pub fn repoint_parent(&mut self, from: Identity, to: Identity) -> usize {
        let mut count = 0;
        for record in self.records.iter_mut().filter(|r| r.parent == Some(from)) {
            record.parent = Some(to);
            count += 1;
        }
        count
    }

    /// Children of a two-level kind hang off a top-level record of this store.
    fn check_nesting(&self, scope: Scope) -> Result<()> {
        let Scope::Parent(id) = scope else {
            return Ok(());
        };
        let parent = self
            .get(id)
            .ok_or_else(|| CurateError::NotFound(id.to_string()))?;
        if parent.parent.is_some() {
            return Err(CurateError::InvalidField {
                field: "parent".to_string(),
                reason: format!("{} nests only one level deep", T::KIND),
            });
        }
        Ok(())
    }

    fn scope_slots(&self, scope: Scope) -> Vec<usize> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.scope() == scope)
            .map(|(i, _)| i)
            .collect()
    }

    fn move_in_scope(&mut self, scope: Scope, from: usize, to: usize) {
        let slots = self.scope_slots(scope);
        let mut members: Vec<OrderedRecord<T>> =
            slots.iter().map(|&i| self.records[i].clone()).collect();
        let moved = members.remove(from);
        members.insert(to, moved);
        for (slot, record) in slots.into_iter().zip(members) {
            self.records[slot] = record;
        }
        self.renumber(scope);
    }

    fn renumber(&mut self, scope: Scope) {
        let mut next = 1;
        for record in self.records.iter_mut().filter(|r| r.scope() == scope) {
            record.order = next;
            next += 1;
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::entities::{Faq, MenuItem, PricingPlan};

    pub(crate) fn faq_draft(question: &str) -> Draft {
        Patch::new()
            .set("question", question)
            .set("answer", format!("Answer to {}", question))
            .fields
    }

    pub(crate) fn assert_dense<T: Entity>(store: &CollectionStore<T>) {
        for scope in store.scopes() {
            let orders: Vec<u32> = store.records_in(scope).iter().map(|r| r.order).collect();
            let expected: Vec<u32> = (1..=orders.len() as u32).collect();
            assert_eq!(orders, expected, "orders in {} are not dense", scope);
        }
    }

    /// FAQs A, B, C persisted as ids 1, 2, 3.
    pub(crate) fn abc_store() -> CollectionStore<Faq> {
        let mut store = CollectionStore::new(&FieldRules::builtin());
        for (i, q) in ["A", "B", "C"].iter().enumerate() {
            let rec = store.add(&faq_draft(q), Scope::Root).unwrap();
            store.assign_identity(rec.id, i as u64 + 1).unwrap();
        }
        store
    }

    fn ids_and_orders<T: Entity>(records: &[OrderedRecord<T>]) -> Vec<(Identity, u32)> {
        records.iter().map(|r| (r.id, r.order)).collect()
    }

    fn p(id: u64) -> Identity {
        Identity::Persisted(id)
    }

    #[test]
    fn reorder_first_to_last() {
        let mut store = abc_store();
        let result = store.reorder(0, 2, Scope::Root).unwrap();
        assert_eq!(ids_and_orders(&result), vec![(p(2), 1), (p(3), 2), (p(1), 3)]);
    }

    #[test]
    fn add_appends_with_next_order_and_pending_id() {
        let mut store = abc_store();
        let draft = Patch::new().set("question", "D").set("answer", "...").fields;
        let record = store.add(&draft, Scope::Root).unwrap();
        assert_eq!(record.order, 4);
        assert!(record.id.is_pending());
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn delete_renumbers_following_records() {
        let mut store = abc_store();
        let result = store.delete(p(2)).unwrap();
        assert_eq!(ids_and_orders(&result), vec![(p(1), 1), (p(3), 2)]);
    }

    #[test]
    fn reorder_same_slot_is_identical() {
        let mut store = abc_store();
        let before = store.snapshot();
        let revision = store.revision();
        let after = store.reorder(1, 1, Scope::Root).unwrap();
        assert_eq!(before, after);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn reorder_out_of_range() {
        let mut store = abc_store();
        assert!(matches!(
            store.reorder(0, 3, Scope::Root),
            Err(CurateError::PositionOutOfRange { index: 3, len: 3, .. })
        ));
    }

    #[test]
    fn add_rejects_missing_required_fields() {
        let mut store = abc_store();
        let draft = Patch::new().set("question", "Only a question").fields;
        match store.add(&draft, Scope::Root) {
            Err(CurateError::Validation { missing, .. }) => assert_eq!(missing, vec!["answer"]),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn update_preserves_identity_and_order() {
        let mut store = abc_store();
        let created = store.get(p(2)).unwrap().created_at;
        let updated = store
            .update(p(2), &Patch::new().set("answer", "Changed"))
            .unwrap();
        assert_eq!(updated.id, p(2));
        assert_eq!(updated.order, 2);
        assert_eq!(updated.created_at, created);
        assert_eq!(updated.fields.answer, "Changed");
    }

    #[test]
    fn identical_update_is_a_no_op() {
        let mut store = abc_store();
        let revision = store.revision();
        let patch = Patch::new().set("question", "B");
        let record = store.update(p(2), &patch).unwrap();
        assert_eq!(record.order, 2);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn update_with_order_moves_within_scope() {
        let mut store = abc_store();
        store.update(p(3), &Patch::new().with_order(1)).unwrap();
        assert_eq!(
            ids_and_orders(store.records()),
            vec![(p(3), 1), (p(1), 2), (p(2), 3)]
        );

        store.update(p(3), &Patch::new().with_order(99)).unwrap();
        assert_eq!(store.get(p(3)).unwrap().order, 3);
        assert_dense(&store);
    }

    #[test]
    fn update_cannot_blank_required_fields() {
        let mut store = abc_store();
        let result = store.update(p(1), &Patch::new().set("question", " "));
        assert!(matches!(result, Err(CurateError::Validation { .. })));
        assert_eq!(store.get(p(1)).unwrap().fields.question, "A");
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let mut store = abc_store();
        assert!(matches!(
            store.update(p(99), &Patch::new()),
            Err(CurateError::NotFound(_))
        ));
    }

    #[test]
    fn toggle_flips_both_ways() {
        let mut store = abc_store();
        let off = store.toggle(p(1), "display_home_page").unwrap();
        assert!(!off.fields.display_home_page);
        let on = store.toggle(p(1), "display_home_page").unwrap();
        assert!(on.fields.display_home_page);
    }

    #[test]
    fn toggle_rejects_non_boolean_fields() {
        let mut store = abc_store();
        assert!(matches!(
            store.toggle(p(1), "question"),
            Err(CurateError::InvalidField { .. })
        ));
        assert!(matches!(
            store.toggle(p(1), "nope"),
            Err(CurateError::InvalidField { .. })
        ));
    }

    fn plans_store() -> (CollectionStore<PricingPlan>, Scope, Scope) {
        let mut store = CollectionStore::new(&FieldRules::builtin());
        let a = Scope::Parent(p(100));
        let b = Scope::Parent(p(200));
        for (scope, name) in [(a, "A1"), (b, "B1"), (a, "A2"), (b, "B2"), (a, "A3")] {
            let draft = Patch::new().set("package", name).set("price", 10.0).fields;
            store.add(&draft, scope).unwrap();
        }
        (store, a, b)
    }

    fn labels(store: &CollectionStore<PricingPlan>, scope: Scope) -> Vec<(String, u32)> {
        store
            .records_in(scope)
            .iter()
            .map(|r| (r.fields.package.clone(), r.order))
            .collect()
    }

    #[test]
    fn nested_reorder_leaves_other_parent_alone() {
        let (mut store, a, b) = plans_store();
        let b_before = labels(&store, b);

        store.reorder(2, 0, a).unwrap();

        assert_eq!(
            labels(&store, a),
            vec![("A3".into(), 1), ("A1".into(), 2), ("A2".into(), 3)]
        );
        assert_eq!(labels(&store, b), b_before);
        assert_dense(&store);
    }

    #[test]
    fn nested_add_orders_within_parent() {
        let (mut store, a, b) = plans_store();
        let draft = Patch::new().set("package", "B3").set("price", 1).fields;
        let record = store.add(&draft, b).unwrap();
        assert_eq!(record.order, 3);
        assert_eq!(store.next_order(a), 4);
    }

    #[test]
    fn slug_is_filled_from_source() {
        let (store, a, _) = plans_store();
        assert_eq!(store.records_in(a)[0].fields.slug, "a1");
    }

    #[test]
    fn delete_removes_nested_records() {
        let mut store: CollectionStore<Faq> = CollectionStore::new(&FieldRules::builtin());
        let parent = store.add(&faq_draft("Parent"), Scope::Root).unwrap();
        store.add(&faq_draft("Other"), Scope::Root).unwrap();
        store.add(&faq_draft("Child"), Scope::Parent(parent.id)).unwrap();

        store.delete(parent.id).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].fields.question, "Other");
        assert_eq!(store.records()[0].order, 1);
    }

    #[test]
    fn assign_identity_keeps_old_key_resolvable() {
        let mut store: CollectionStore<Faq> = CollectionStore::new(&FieldRules::builtin());
        let parent = store.add(&faq_draft("Parent"), Scope::Root).unwrap();
        let child = store.add(&faq_draft("Child"), Scope::Parent(parent.id)).unwrap();

        let persisted = store.assign_identity(parent.id, 10).unwrap();
        assert_eq!(persisted.id, p(10));
        assert_eq!(persisted.fields.question, "Parent");
        assert_eq!(store.get(child.id).unwrap().parent, Some(p(10)));

        // stale reference to the pending key
        let updated = store
            .update(parent.id, &Patch::new().set("answer", "late edit"))
            .unwrap();
        assert_eq!(updated.id, p(10));
        assert_eq!(store.resolve(&Locator::Key(parent.id)).unwrap(), p(10));
    }

    #[test]
    fn stale_parent_scope_resolves_to_persisted_parent() {
        let mut store: CollectionStore<Faq> = CollectionStore::new(&FieldRules::builtin());
        let parent = store.add(&faq_draft("Parent"), Scope::Root).unwrap();
        let stale = Scope::Parent(parent.id);
        store.add(&faq_draft("C1"), stale).unwrap();
        store.assign_identity(parent.id, 10).unwrap();

        let c2 = store.add(&faq_draft("C2"), stale).unwrap();
        assert_eq!(c2.parent, Some(p(10)));
        assert_eq!(c2.order, 2);

        let children: Vec<(String, u32)> = store
            .records_in(Scope::Parent(p(10)))
            .iter()
            .map(|r| (r.fields.question.clone(), r.order))
            .collect();
        assert_eq!(children, vec![("C1".into(), 1), ("C2".into(), 2)]);
        assert_eq!(store.records_in(stale).len(), 2);
        assert_eq!(store.next_order(stale), 3);

        store.reorder(1, 0, stale).unwrap();
        assert_eq!(store.records_in(Scope::Parent(p(10)))[0].fields.question, "C2");
        assert_dense(&store);
    }

    fn menu_draft(name: &str) -> Draft {
        Patch::new()
            .set("display_name", name)
            .set("url_name", format!("/{}", name.to_lowercase()))
            .fields
    }

    fn menu_labels(store: &CollectionStore<MenuItem>, scope: Scope) -> Vec<(String, u32)> {
        store
            .records_in(scope)
            .iter()
            .map(|r| (r.fields.display_name.clone(), r.order))
            .collect()
    }

    #[test]
    fn submenus_order_within_their_menu_item() {
        let mut store: CollectionStore<MenuItem> = CollectionStore::new(&FieldRules::builtin());
        let docs = store.add(&menu_draft("Docs"), Scope::Root).unwrap();
        let blog = store.add(&menu_draft("Blog"), Scope::Root).unwrap();
        let docs_menu = Scope::Parent(docs.id);
        for name in ["Guides", "Api", "Faq"] {
            store.add(&menu_draft(name), docs_menu).unwrap();
        }
        store.add(&menu_draft("Archive"), Scope::Parent(blog.id)).unwrap();

        store.reorder(2, 0, docs_menu).unwrap();

        assert_eq!(
            menu_labels(&store, docs_menu),
            vec![("Faq".into(), 1), ("Guides".into(), 2), ("Api".into(), 3)]
        );
        assert_eq!(
            menu_labels(&store, Scope::Root),
            vec![("Docs".into(), 1), ("Blog".into(), 2)]
        );
        assert_eq!(menu_labels(&store, Scope::Parent(blog.id)), vec![("Archive".into(), 1)]);
        assert_dense(&store);
    }

    #[test]
    fn submenus_do_not_nest_further() {
        let mut store: CollectionStore<MenuItem> = CollectionStore::new(&FieldRules::builtin());
        let docs = store.add(&menu_draft("Docs"), Scope::Root).unwrap();
        let guides = store.add(&menu_draft("Guides"), Scope::Parent(docs.id)).unwrap();

        assert!(matches!(
            store.add(&menu_draft("Deep"), Scope::Parent(guides.id)),
            Err(CurateError::InvalidField { .. })
        ));
        assert!(matches!(
            store.add(&menu_draft("Lost"), Scope::Parent(p(404))),
            Err(CurateError::NotFound(_))
        ));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn menu_identity_swap_and_delete_carry_submenus() {
        let mut store: CollectionStore<MenuItem> = CollectionStore::new(&FieldRules::builtin());
        let docs = store.add(&menu_draft("Docs"), Scope::Root).unwrap();
        store.add(&menu_draft("Blog"), Scope::Root).unwrap();
        store.add(&menu_draft("Guides"), Scope::Parent(docs.id)).unwrap();
        store.add(&menu_draft("Api"), Scope::Parent(docs.id)).unwrap();

        store.assign_identity(docs.id, 5).unwrap();
        assert_eq!(
            menu_labels(&store, Scope::Parent(p(5))),
            vec![("Guides".into(), 1), ("Api".into(), 2)]
        );

        store.delete(p(5)).unwrap();
        assert_eq!(menu_labels(&store, Scope::Root), vec![("Blog".into(), 1)]);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn assign_identity_conflicts() {
        let mut store = abc_store();
        assert!(matches!(
            store.assign_identity(p(1), 5),
            Err(CurateError::IdentityConflict(_))
        ));

        let fresh = store.add(&faq_draft("D"), Scope::Root).unwrap();
        assert!(matches!(
            store.assign_identity(fresh.id, 2),
            Err(CurateError::IdentityConflict(_))
        ));
        store.assign_identity(fresh.id, 4).unwrap();
        assert!(matches!(
            store.assign_identity(fresh.id, 5),
            Err(CurateError::IdentityConflict(_))
        ));
    }

    #[test]
    fn resolve_by_position() {
        let store = abc_store();
        assert_eq!(store.resolve(&Locator::at(Scope::Root, 2)).unwrap(), p(3));
        assert!(store.resolve(&Locator::at(Scope::Root, 3)).is_err());
    }

    #[test]
    fn apply_order_validates_membership() {
        let mut store = abc_store();
        assert!(matches!(
            store.apply_order(Scope::Root, &[p(1), p(2)]),
            Err(CurateError::StaleLayout)
        ));
        store.apply_order(Scope::Root, &[p(3), p(1), p(2)]).unwrap();
        assert_eq!(
            ids_and_orders(store.records()),
            vec![(p(3), 1), (p(1), 2), (p(2), 3)]
        );
    }

    #[test]
    fn from_records_repairs_gaps() {
        let source = abc_store();
        let mut records = source.snapshot();
        records[0].order = 10;
        records[1].order = 3;
        records[2].order = 3;
        let store = CollectionStore::<Faq>::from_records(&FieldRules::builtin(), records);
        assert_eq!(
            ids_and_orders(store.records()),
            vec![(p(2), 1), (p(3), 2), (p(1), 3)]
        );
    }

    #[test]
    fn random_walk_keeps_orders_dense() {
        let (mut store, a, b) = plans_store();
        let mut root = CollectionStore::<Faq>::new(&FieldRules::builtin());
        for q in ["1", "2", "3", "4", "5"] {
            root.add(&faq_draft(q), Scope::Root).unwrap();
        }

        let steps: [(usize, usize); 6] = [(0, 2), (2, 0), (1, 1), (0, 1), (2, 1), (1, 0)];
        for (from, to) in steps {
            store.reorder(from, to, a).unwrap();
            assert_dense(&store);
            root.reorder(from + 1, to, Scope::Root).unwrap();
            assert_dense(&root);
        }

        let victim = store.records_in(b)[0].id;
        store.delete(victim).unwrap();
        assert_dense(&store);

        let victim = root.records()[2].id;
        root.delete(victim).unwrap();
        root.add(&faq_draft("6"), Scope::Root).unwrap();
        root.update(root.records()[0].id, &Patch::new().with_order(3))
            .unwrap();
        assert_dense(&root);
        assert_eq!(root.len(), 5);
    }
}
