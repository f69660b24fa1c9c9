//! # Command Layer
//!
//! One module per CLI-level operation. Commands drive a [`CollectionEditor`]
//! exactly the way an interactive UI would (open a session, set fields, commit;
//! delete by locator; move) and describe what happened in a [`CmdResult`].
//! They never print.

use crate::api::CollectionEditor;
use crate::config::CurateConfig;
use crate::error::{CurateError, Result};
use crate::model::{Entity, OrderedRecord};
use crate::schema::{EntityKind, EntityRules};
use crate::store::{AutoSave, DataStore};
use serde_json::Value;
use std::path::PathBuf;

pub mod assign;
pub mod create;
pub mod delete;
pub mod init;
pub mod kinds;
pub mod list;
pub mod move_record;
pub mod toggle;
pub mod update;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// A record as shown in a listing.
#[derive(Debug, Clone)]
pub struct ListedRecord<T> {
    /// 1-based position within the listed scope
    pub position: u32,
    pub record: OrderedRecord<T>,
}

#[derive(Debug, Clone)]
pub struct KindInfo {
    pub kind: EntityKind,
    pub rules: EntityRules,
    pub parent: Option<EntityKind>,
    /// Whether a collection file exists for this kind
    pub stored: bool,
}

#[derive(Debug)]
pub struct CmdResult<T> {
    pub affected: Vec<OrderedRecord<T>>,
    pub listed: Vec<ListedRecord<T>>,
    pub total_matches: usize,
    pub has_more: bool,
    pub kinds: Vec<KindInfo>,
    pub paths: Vec<PathBuf>,
    pub messages: Vec<CmdMessage>,
}

impl<T> Default for CmdResult<T> {
    fn default() -> Self {
        Self {
            affected: Vec::new(),
            listed: Vec::new(),
            total_matches: 0,
            has_more: false,
            kinds: Vec::new(),
            paths: Vec::new(),
            messages: Vec::new(),
        }
    }
}

impl<T> CmdResult<T> {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected(mut self, records: Vec<OrderedRecord<T>>) -> Self {
        self.affected = records;
        self
    }

    pub fn with_listed(mut self, records: Vec<ListedRecord<T>>) -> Self {
        self.listed = records;
        self
    }

    pub fn with_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.paths = paths;
        self
    }
}

/// Opens an editor over the stored collection of `T`, saving after every mutation.
pub fn open_editor<T, S>(store: &S, config: &CurateConfig) -> Result<CollectionEditor<T>>
where
    T: Entity + 'static,
    S: DataStore + Clone + 'static,
{
    let records = store.load::<T>()?;
    tracing::debug!(kind = %T::KIND, count = records.len(), "collection loaded");
    let mut editor = CollectionEditor::from_records(&config.field_rules(), records)
        .with_filter(config.filter_state());
    editor.subscribe(AutoSave::new(store.clone()));
    Ok(editor)
}

/// Parses `field=value` assignments.
///
/// Values that read as JSON (numbers, booleans, null, arrays, objects, quoted
/// strings) are taken as such; anything else is a plain string.
pub fn parse_assignments<I: AsRef<str>>(inputs: &[I]) -> Result<Vec<(String, Value)>> {
    inputs
        .iter()
        .map(|input| {
            let input = input.as_ref();
            let (key, raw) = input.split_once('=').ok_or_else(|| CurateError::InvalidField {
                field: input.to_string(),
                reason: "expected field=value".to_string(),
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(CurateError::InvalidField {
                    field: input.to_string(),
                    reason: "field name is empty".to_string(),
                });
            }
            let value = serde_json::from_str::<Value>(raw)
                .unwrap_or_else(|_| Value::String(raw.to_string()));
            Ok((key.to_string(), value))
        })
        .collect()
}
