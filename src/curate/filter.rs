//! # Search and Pagination
//!
//! The visible slice of a collection is derived, never stored:
//!
//! ```text
//! store order ──► apply(query, fields) ──► paginate(visible_count) ──► view
//! ```
//!
//! Matching is a trimmed, case-insensitive substring test over the string
//! values of the configured fields. Results keep store order; there is no
//! relevance ranking, so what an editor sees is always the manual order.
//!
//! [`FilterState`] holds the query and the display window. Changing the query
//! snaps the window back to one page so stale pagination never hides fresh
//! matches; "load more" only ever grows it.

use crate::model::{to_fields, Entity, OrderedRecord};
use serde_json::Value;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_PAGE_INCREMENT: usize = 10;

fn field_matches(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(s) => s.to_lowercase().contains(needle),
        Value::Number(n) => n.to_string().contains(needle),
        _ => false,
    }
}

fn record_matches<T: Entity>(record: &OrderedRecord<T>, needle: &str, fields: &[String]) -> bool {
    let Ok(map) = to_fields(&record.fields) else {
        return false;
    };
    fields
        .iter()
        .filter_map(|name| map.get(name))
        .any(|value| field_matches(value, needle))
}

/// Records matching `query` in any of `fields`, in their incoming order.
///
/// An empty (or blank) query matches everything.
pub fn apply<'a, T, I>(records: I, query: &str, fields: &[String]) -> Vec<&'a OrderedRecord<T>>
where
    T: Entity + 'a,
    I: IntoIterator<Item = &'a OrderedRecord<T>>,
{
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records.into_iter().collect();
    }
    records
        .into_iter()
        .filter(|record| record_matches(*record, &needle, fields))
        .collect()
}

/// The first `visible_count` items.
pub fn paginate<R: Clone>(filtered: &[R], visible_count: usize) -> Vec<R> {
    filtered.iter().take(visible_count).cloned().collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    query: String,
    visible_count: usize,
    page_size: usize,
    page_increment: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, DEFAULT_PAGE_INCREMENT)
    }
}

impl FilterState {
    pub fn new(page_size: usize, page_increment: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            query: String::new(),
            visible_count: page_size,
            page_size,
            page_increment: page_increment.max(1),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Sets the query; the window resets whenever the query actually changes.
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query != self.query {
            self.query = query;
            self.visible_count = self.page_size;
        }
    }

    pub fn clear_query(&mut self) {
        self.set_query(String::new());
    }

    pub fn load_more(&mut self) {
        self.visible_count = self.visible_count.saturating_add(self.page_increment);
    }

    pub fn has_more(&self, match_count: usize) -> bool {
        match_count > self.visible_count
    }
}
