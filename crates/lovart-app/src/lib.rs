//! Lovart Application
//!
//! Native shell around the editor core: document files, the system
//! clipboard, keyboard shortcuts and scripted session replay.

pub mod document;
pub mod script;
pub mod shortcuts;
#[cfg(feature = "native")]
pub mod system_clipboard;

use lovart_core::EditorError;
use std::path::PathBuf;
use thiserror::Error;

pub use document::{load_config, load_document, save_document};
pub use script::{ScriptReport, ScriptStep, parse_script, run_script};
pub use shortcuts::{Shortcut, ShortcutRegistry};
#[cfg(feature = "native")]
pub use system_clipboard::SystemClipboard;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error("Script error: {0}")]
    Script(String),
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;
