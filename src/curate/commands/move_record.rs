use crate::api::{CollectionEditor, EditOutcome};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::Locator;
use crate::model::Entity;

/// Moves a record to a 1-based position within its scope.
pub fn run<T: Entity + 'static>(
    editor: &mut CollectionEditor<T>,
    locator: &Locator,
    position: usize,
) -> Result<CmdResult<T>> {
    let mut result = CmdResult::default();
    // Pin the record first: a positional locator points elsewhere after the move
    let id = match editor.resolve(locator) {
        Ok(id) => id,
        Err(e) if e.is_recoverable() => {
            result.add_message(CmdMessage::warning(format!("Skipped {}: {}", locator, e)));
            return Ok(result);
        }
        Err(e) => return Err(e),
    };

    match editor.move_to(&Locator::Key(id), position)? {
        EditOutcome::Applied { .. } => {
            if let Some(record) = editor.store().get(id).cloned() {
                result.add_message(CmdMessage::success(format!(
                    "Moved {} to @{}: {}",
                    T::KIND,
                    record.order,
                    record.fields.label()
                )));
                result.affected.push(record);
            }
        }
        EditOutcome::Unchanged => result.add_message(CmdMessage::info(format!(
            "{} is already at @{}",
            locator, position
        ))),
    }
    Ok(result)
}
