//! Document and config files.

use crate::{AppError, AppResult};
use lovart_core::{Editor, EditorConfig};
use std::path::Path;

fn read(path: &Path) -> AppResult<String> {
    std::fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a JSON element list into the editor, replacing its document.
/// Returns the number of elements loaded.
pub fn load_document(editor: &mut Editor, path: &Path) -> AppResult<usize> {
    let content = read(path)?;
    let count = editor.load_json(&content)?;
    log::info!("Loaded document from: {:?}", path);
    Ok(count)
}

/// Write the editor's element list as JSON.
pub fn save_document(editor: &Editor, path: &Path) -> AppResult<()> {
    let json = editor.serialize_elements()?;
    std::fs::write(path, json).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Saved document to: {:?}", path);
    Ok(())
}

/// Read an editor config file. Missing fields take their defaults.
pub fn load_config(path: &Path) -> AppResult<EditorConfig> {
    let content = read(path)?;
    Ok(EditorConfig::from_json(&content)?)
}
