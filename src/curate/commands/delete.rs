use crate::api::{CollectionEditor, EditOutcome};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::Locator;
use crate::model::{Entity, Identity};

/// Deletes the located records.
///
/// Every locator is resolved against the list as it was before the first
/// delete, so `@1 @2` removes the first two records rather than the first and
/// third.
pub fn run<T: Entity + 'static>(
    editor: &mut CollectionEditor<T>,
    locators: &[Locator],
) -> Result<CmdResult<T>> {
    let mut result = CmdResult::default();
    let mut targets: Vec<(Locator, Identity)> = Vec::with_capacity(locators.len());
    for locator in locators {
        match editor.resolve(locator) {
            Ok(id) => targets.push((*locator, id)),
            Err(e) => {
                result.add_message(CmdMessage::warning(format!("Skipped {}: {}", locator, e)))
            }
        }
    }

    for (locator, id) in targets {
        let Some(record) = editor.store().get(id).cloned() else {
            result.add_message(CmdMessage::warning(format!(
                "Skipped {}: already removed",
                locator
            )));
            continue;
        };
        match editor.delete(&Locator::Key(id))? {
            EditOutcome::Applied { .. } => {
                result.add_message(CmdMessage::success(format!(
                    "Deleted {} ({}): {}",
                    T::KIND,
                    locator,
                    record.fields.label()
                )));
                result.affected.push(record);
            }
            EditOutcome::Unchanged => result.add_message(CmdMessage::warning(format!(
                "Skipped {}: no longer present",
                locator
            ))),
        }
    }

    Ok(result)
}
