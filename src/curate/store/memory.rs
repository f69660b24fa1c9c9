use super::DataStore;
use crate::error::Result;
use crate::model::{Entity, OrderedRecord};
use crate::schema::EntityKind;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// In-memory store for tests. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    collections: Rc<RefCell<HashMap<EntityKind, Value>>>,
    saves: Rc<Cell<usize>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of saves performed through any clone.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl DataStore for InMemoryStore {
    fn load<T: Entity>(&self) -> Result<Vec<OrderedRecord<T>>> {
        match self.collections.borrow().get(&T::KIND) {
            Some(value) => Ok(serde_json::from_value(value.clone())?),
            None => Ok(Vec::new()),
        }
    }

    fn save<T: Entity>(&mut self, records: &[OrderedRecord<T>]) -> Result<()> {
        let value = serde_json::to_value(records)?;
        self.collections.borrow_mut().insert(T::KIND, value);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }

    fn exists(&self, kind: EntityKind) -> bool {
        self.collections.borrow().contains_key(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::tests::abc_store;
    use crate::entities::Faq;
    use crate::model::Scope;
    use crate::notify::{AutoSaveNotifier, MutationKind};
    use crate::store::AutoSave;

    #[test]
    fn test_clones_share_contents() {
        let store = InMemoryStore::new();
        let mut writer = store.clone();
        writer.save(&abc_store().snapshot()).unwrap();

        assert!(store.exists(EntityKind::Faq));
        assert_eq!(store.load::<Faq>().unwrap().len(), 3);
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_auto_save_writes_each_snapshot() {
        let store = InMemoryStore::new();
        let mut notifier = AutoSaveNotifier::<Faq>::new();
        notifier.subscribe(AutoSave::new(store.clone()));

        let mut records = abc_store();
        notifier.emit(MutationKind::Add, Some(Scope::Root), records.snapshot());
        records.reorder(0, 2, Scope::Root).unwrap();
        notifier.emit(MutationKind::Reorder, Some(Scope::Root), records.snapshot());

        assert_eq!(store.save_count(), 2);
        assert_eq!(store.load::<Faq>().unwrap(), records.snapshot());
    }
}
