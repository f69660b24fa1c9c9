use super::{CollectionFile, DataStore};
use crate::error::Result;
use crate::model::{Entity, OrderedRecord};
use crate::schema::EntityKind;
use std::fs;
use std::path::{Path, PathBuf};

/// JSON file per collection kind under one root directory.
///
/// Cloning is cheap and clones address the same files, so one handle can be
/// subscribed as an auto-save sink while another is kept for loading.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn collection_path(&self, kind: EntityKind) -> PathBuf {
        self.root.join(format!("{}.json", kind))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root)?;
        }
        Ok(())
    }
}

impl DataStore for FileStore {
    fn load<T: Entity>(&self) -> Result<Vec<OrderedRecord<T>>> {
        let path = self.collection_path(T::KIND);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)?;
        let file: CollectionFile<T> = serde_json::from_str(&content)?;
        Ok(file.expect_kind()?.records)
    }

    fn save<T: Entity>(&mut self, records: &[OrderedRecord<T>]) -> Result<()> {
        self.ensure_dir()?;
        let file = CollectionFile::new(records.to_vec());
        let content = serde_json::to_string_pretty(&file)?;

        // Write to a sibling first so a failed save never truncates the collection
        let path = self.collection_path(T::KIND);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, content)?;
        fs::rename(&staging, &path)?;
        Ok(())
    }

    fn exists(&self, kind: EntityKind) -> bool {
        self.collection_path(kind).exists()
    }
}
