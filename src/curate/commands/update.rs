use crate::api::CollectionEditor;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::Locator;
use crate::model::Entity;
use serde_json::Value;

/// Edits one record through an edit session. Only the given fields change.
pub fn run<T: Entity + 'static>(
    editor: &mut CollectionEditor<T>,
    locator: &Locator,
    fields: &[(String, Value)],
) -> Result<CmdResult<T>> {
    editor.open_edit(locator)?;
    let revision = editor.revision();
    let committed = fields
        .iter()
        .try_for_each(|(key, value)| editor.set_field(key, value.clone()))
        .and_then(|_| editor.commit());

    let record = match committed {
        Ok(Some(record)) => record,
        Ok(None) => {
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::warning(format!(
                "Skipped {}: record no longer exists",
                locator
            )));
            return Ok(result);
        }
        Err(e) => {
            editor.cancel();
            return Err(e);
        }
    };

    let mut result = CmdResult::default();
    if editor.revision() == revision {
        result.add_message(CmdMessage::info(format!(
            "No changes ({}): {}",
            locator,
            record.fields.label()
        )));
    } else {
        result.add_message(CmdMessage::success(format!(
            "Updated {} @{} ({}): {}",
            T::KIND,
            record.order,
            record.id,
            record.fields.label()
        )));
    }
    Ok(result.with_affected(vec![record]))
}
