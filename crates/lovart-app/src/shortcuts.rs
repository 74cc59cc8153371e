//! Keyboard shortcut registry and documentation.

use lovart_core::{Command, Modifiers};

/// A keyboard shortcut bound to an editor command.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    /// Ctrl on Windows/Linux, Cmd on macOS.
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub command: Command,
}

impl Shortcut {
    pub const fn new(key: &'static str, ctrl: bool, shift: bool, command: Command) -> Self {
        Self {
            key,
            ctrl,
            shift,
            alt: false,
            command,
        }
    }

    pub const fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    /// Format the shortcut for display (e.g., "Ctrl+Shift+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.alt {
            parts.push("Alt");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    /// Keys compare case-insensitively; Cmd counts as Ctrl.
    pub fn matches(&self, key: &str, modifiers: Modifiers) -> bool {
        self.key.eq_ignore_ascii_case(key)
            && self.ctrl == (modifiers.ctrl || modifiers.meta)
            && self.shift == modifiers.shift
            && self.alt == modifiers.alt
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        use Command::*;
        vec![
            // Edit
            Shortcut::new("Z", true, false, Undo),
            Shortcut::new("Z", true, true, Redo),
            Shortcut::new("Y", true, false, Redo),
            Shortcut::new("C", true, false, Copy),
            Shortcut::new("V", true, false, Paste),
            Shortcut::new("V", true, true, PasteImage),
            Shortcut::new("X", true, false, Cut),
            Shortcut::new("Delete", false, false, Delete),
            Shortcut::new("Backspace", false, false, Delete),
            Shortcut::new("A", true, false, SelectAll),
            Shortcut::new("D", true, false, Duplicate),
            Shortcut::new("Escape", false, false, Escape),
            Shortcut::new("C", true, true, CopyStyle).with_alt(),
            Shortcut::new("V", true, true, PasteStyle).with_alt(),
            // Arrange
            Shortcut::new("]", true, false, BringToFront),
            Shortcut::new("[", true, false, SendToBack),
            Shortcut::new("]", true, false, BringForward).with_alt(),
            Shortcut::new("[", true, false, SendBackward).with_alt(),
            Shortcut::new("ArrowLeft", true, true, AlignLeft),
            Shortcut::new("ArrowRight", true, true, AlignRight),
            Shortcut::new("ArrowUp", true, true, AlignTop),
            Shortcut::new("ArrowDown", true, true, AlignBottom),
            Shortcut::new("H", false, true, FlipHorizontal),
            Shortcut::new("V", false, true, FlipVertical),
            // View
            Shortcut::new("=", true, false, ZoomIn),
            Shortcut::new("+", true, false, ZoomIn),
            Shortcut::new("-", true, false, ZoomOut),
            Shortcut::new("0", true, false, ZoomReset),
            Shortcut::new(";", true, false, ToggleSnap),
            Shortcut::new("'", true, false, ToggleGrid),
            // Navigation
            Shortcut::new("ArrowUp", false, false, MoveUp),
            Shortcut::new("ArrowDown", false, false, MoveDown),
            Shortcut::new("ArrowLeft", false, false, MoveLeft),
            Shortcut::new("ArrowRight", false, false, MoveRight),
            Shortcut::new("ArrowUp", false, true, MoveUpFast),
            Shortcut::new("ArrowDown", false, true, MoveDownFast),
            Shortcut::new("ArrowLeft", false, true, MoveLeftFast),
            Shortcut::new("ArrowRight", false, true, MoveRightFast),
        ]
    }

    /// Command bound to a key chord.
    ///
    /// While a text field has focus only Escape is let through.
    pub fn find(key: &str, modifiers: Modifiers, text_input_focused: bool) -> Option<Command> {
        let command = Self::all()
            .into_iter()
            .find(|s| s.matches(key, modifiers))
            .map(|s| s.command)?;
        if text_input_focused && command != Command::Escape {
            return None;
        }
        Some(command)
    }

    /// Print all shortcuts to console.
    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:24} {}", shortcut.format(), shortcut.command.description());
        }
        println!();
    }
}
