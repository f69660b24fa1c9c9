//! # Storage Layer
//!
//! Persistence for collections. The editor core never calls storage directly:
//! it emits mutation events, and [`AutoSave`] turns each event into a full
//! snapshot write through a [`DataStore`].
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: one JSON file per collection kind
//! - [`memory::InMemoryStore`]: shared in-process map, for tests
//!
//! ## Storage Format
//!
//! ```text
//! .curate/
//! ├── config.json          # CurateConfig
//! ├── faq.json             # CollectionFile<Faq>
//! ├── pricing_plan.json    # CollectionFile<PricingPlan>
//! └── ...
//! ```
//!
//! A whole snapshot is written every time. Saves are idempotent, so when
//! several events arrive back to back only the last write matters.

use crate::error::{CurateError, Result};
use crate::model::{Entity, OrderedRecord};
use crate::notify::{MutationEvent, MutationSink};
use crate::schema::EntityKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod fs;
pub mod memory;

/// On-disk shape of one collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionFile<T> {
    pub kind: EntityKind,
    pub saved_at: DateTime<Utc>,
    #[serde(default)]
    pub records: Vec<OrderedRecord<T>>,
}

impl<T: Entity> CollectionFile<T> {
    pub fn new(records: Vec<OrderedRecord<T>>) -> Self {
        Self {
            kind: T::KIND,
            saved_at: Utc::now(),
            records,
        }
    }

    /// Checks the file holds the collection it was read as.
    pub fn expect_kind(self) -> Result<Self> {
        if self.kind != T::KIND {
            return Err(CurateError::Config(format!(
                "expected a {} collection, found {}",
                T::KIND,
                self.kind
            )));
        }
        Ok(self)
    }
}

/// Abstract interface for collection storage.
pub trait DataStore {
    /// Load every record of `T`'s collection (empty when nothing was saved yet)
    fn load<T: Entity>(&self) -> Result<Vec<OrderedRecord<T>>>;

    /// Replace the stored collection with `records`
    fn save<T: Entity>(&mut self, records: &[OrderedRecord<T>]) -> Result<()>;

    /// Whether a collection of `kind` has ever been saved
    fn exists(&self, kind: EntityKind) -> bool;
}

/// Mutation sink that saves the snapshot of every event.
pub struct AutoSave<S> {
    store: S,
}

impl<S: DataStore> AutoSave<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<T: Entity, S: DataStore> MutationSink<T> for AutoSave<S> {
    fn receive(&mut self, event: &MutationEvent<T>) -> Result<()> {
        tracing::debug!(kind = %T::KIND, sequence = event.sequence, mutation = %event.kind, "saving snapshot");
        self.store.save(&event.snapshot)
    }
}
