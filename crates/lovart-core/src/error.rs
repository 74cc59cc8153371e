//! Error types for editor operations.

use crate::clipboard::ClipboardError;
use crate::element::ElementId;
use thiserror::Error;

/// Editor errors.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Element not found: {0}")]
    ElementNotFound(ElementId),
    #[error("Duplicate element id: {0}")]
    DuplicateId(ElementId),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
}

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

impl From<serde_json::Error> for EditorError {
    fn from(e: serde_json::Error) -> Self {
        EditorError::Serialization(e.to_string())
    }
}
