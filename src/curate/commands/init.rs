use crate::commands::{CmdMessage, CmdResult};
use crate::config::CurateConfig;
use crate::error::Result;
use std::fs;
use std::path::Path;

/// Creates the data directory with a default config, keeping an existing one.
pub fn run<T>(data_dir: &Path) -> Result<CmdResult<T>> {
    let mut result = CmdResult::default();
    if !data_dir.exists() {
        fs::create_dir_all(data_dir)?;
    }

    if data_dir.join("config.json").exists() {
        result.add_message(CmdMessage::info(format!(
            "Already initialized at {}",
            data_dir.display()
        )));
    } else {
        CurateConfig::default().save(data_dir)?;
        result.add_message(CmdMessage::success(format!(
            "Initialized curate store at {}",
            data_dir.display()
        )));
    }
    Ok(result.with_paths(vec![data_dir.to_path_buf()]))
}
