use crate::api::CollectionEditor;
use crate::commands::{CmdMessage, CmdResult, ListedRecord};
use crate::error::Result;
use crate::model::{Entity, Scope};

/// Lists one scope, optionally filtered, with `extra_pages` "load more" steps applied.
pub fn run<T: Entity + 'static>(
    editor: &mut CollectionEditor<T>,
    scope: Scope,
    search: Option<&str>,
    extra_pages: usize,
) -> Result<CmdResult<T>> {
    match search {
        Some(query) => editor.set_query(query),
        None => editor.clear_query(),
    }
    for _ in 0..extra_pages {
        editor.load_more();
    }

    let listed: Vec<ListedRecord<T>> = editor
        .visible_records(scope)
        .into_iter()
        .map(|record| ListedRecord {
            position: record.order,
            record: record.clone(),
        })
        .collect();

    let mut result = CmdResult::default().with_listed(listed);
    result.total_matches = editor.match_count(scope);
    result.has_more = editor.has_more(scope);
    if result.has_more {
        result.add_message(CmdMessage::info(format!(
            "Showing {} of {} (use --more to see more)",
            result.listed.len(),
            result.total_matches
        )));
    }
    Ok(result)
}
