use crate::api::{CollectionEditor, EditOutcome};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::Locator;
use crate::model::{to_fields, Entity};
use serde_json::Value;

pub fn run<T: Entity + 'static>(
    editor: &mut CollectionEditor<T>,
    locator: &Locator,
    field: &str,
) -> Result<CmdResult<T>> {
    let mut result = CmdResult::default();
    if let EditOutcome::Unchanged = editor.toggle(locator, field)? {
        result.add_message(CmdMessage::warning(format!("Skipped {}: not found", locator)));
        return Ok(result);
    }

    let id = editor.resolve(locator)?;
    if let Some(record) = editor.store().get(id).cloned() {
        let state = match to_fields(&record.fields)?.get(field) {
            Some(Value::Bool(true)) => "on",
            _ => "off",
        };
        result.add_message(CmdMessage::success(format!(
            "{} {} ({}): {}",
            field,
            state,
            locator,
            record.fields.label()
        )));
        result.affected.push(record);
    }
    Ok(result)
}
