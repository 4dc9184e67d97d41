//! Level documents on disk

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::sim::{Level, LevelDoc};

#[derive(Debug, Error)]
pub enum LevelFileError {
    #[error("failed to access level file: {0}")]
    Io(#[from] std::io::Error),
    #[error("level file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read a level document; absent fields default like any other document
pub fn load_level(path: &Path) -> Result<Level, LevelFileError> {
    let text = fs::read_to_string(path)?;
    let doc: LevelDoc = serde_json::from_str(&text)?;
    let level = Level::load(&doc);
    log::info!("Loaded level '{}' from {}", level.name, path.display());
    Ok(level)
}

/// Write a level document as pretty JSON
pub fn save_level(level: &Level, path: &Path) -> Result<(), LevelFileError> {
    let json = serde_json::to_string_pretty(&level.to_doc())?;
    fs::write(path, json)?;
    log::info!("Saved level '{}' ({} obstacles) to {}", level.name, level.len(), path.display());
    Ok(())
}
