use crate::api::CollectionEditor;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{Entity, Scope};
use serde_json::Value;

/// Adds a record to `scope` through an add session.
///
/// A failed validation cancels the session and returns the error.
pub fn run<T: Entity + 'static>(
    editor: &mut CollectionEditor<T>,
    scope: Scope,
    fields: &[(String, Value)],
) -> Result<CmdResult<T>> {
    editor.open_add(scope)?;
    let committed = fields
        .iter()
        .try_for_each(|(key, value)| editor.set_field(key, value.clone()))
        .and_then(|_| editor.commit());

    let record = match committed {
        Ok(Some(record)) => record,
        Ok(None) => {
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::warning(format!(
                "Skipped {}: nothing was added",
                T::KIND
            )));
            return Ok(result);
        }
        Err(e) => {
            editor.cancel();
            return Err(e);
        }
    };

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Added {} @{} ({}): {}",
        T::KIND,
        record.order,
        record.id,
        record.fields.label()
    )));
    Ok(result.with_affected(vec![record]))
}
