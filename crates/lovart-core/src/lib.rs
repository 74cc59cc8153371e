//! Lovart Core Library
//!
//! Platform-agnostic canvas editing engine: the element model, viewport math,
//! pointer gestures, undo history, clipboard and contextual UI resolution.
//! Rendering and generation services live outside this crate.

pub mod arrange;
pub mod clipboard;
pub mod command;
pub mod config;
pub mod editor;
pub mod element;
pub mod error;
pub mod geometry;
pub mod handles;
pub mod history;
pub mod input;
pub mod interaction;
pub mod resolver;
pub mod snap;
pub mod store;
pub mod tools;
pub mod viewport;

pub use arrange::{Alignment, Axis};
pub use clipboard::{
    ClipboardEngine, ClipboardError, ClipboardPayload, MemoryClipboard, NoClipboard, PlatformClipboard,
    StyleClipboard,
};
pub use command::Command;
pub use config::EditorConfig;
pub use editor::Editor;
pub use element::{
    ConnectorStyle, Element, ElementColor, ElementId, ElementKind, ElementPatch, ElementType,
    GeneratedContent, GroupId, ShapeType,
};
pub use error::{EditorError, EditorResult};
pub use geometry::BoundingBox;
pub use handles::{HANDLE_SIZE, ResizeHandle};
pub use history::{History, HistoryEntry};
pub use input::Modifiers;
pub use interaction::{InteractionMachine, InteractionOutcome, PointerInput, PointerTarget, Session};
pub use resolver::{ContextUi, ElementUiState};
pub use snap::{GuideAxis, SnapGuide, SnapResult};
pub use store::{ElementStore, Selection};
pub use tools::{CursorHint, ToolKind};
pub use viewport::Viewport;
