use crate::api::CollectionEditor;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{Entity, Identity};
use crate::store::DataStore;

/// Records the durable id persistence gave a pending record, then saves.
///
/// Identity swaps are not mutation events, so the snapshot is written here.
pub fn run<T: Entity + 'static, S: DataStore>(
    editor: &mut CollectionEditor<T>,
    store: &mut S,
    pending: Identity,
    id: u64,
) -> Result<CmdResult<T>> {
    let record = editor.assign_identity(pending, id)?;
    store.save(&editor.snapshot())?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "{} is now {}: {}",
        pending,
        record.id,
        record.fields.label()
    )));
    Ok(result.with_affected(vec![record]))
}
