//! Named editor operations dispatched from shortcuts and scripts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! commands {
    ($($variant:ident => $name:literal, $description:literal;)+) => {
        /// An editor operation addressed by name.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub enum Command {
            $($variant,)+
        }

        impl Command {
            pub const ALL: &'static [Command] = &[$(Command::$variant,)+];

            /// Wire name, e.g. `"selectAll"`.
            pub fn name(&self) -> &'static str {
                match self {
                    $(Command::$variant => $name,)+
                }
            }

            pub fn description(&self) -> &'static str {
                match self {
                    $(Command::$variant => $description,)+
                }
            }
        }
    };
}

commands! {
    Undo => "undo", "Undo";
    Redo => "redo", "Redo";
    Copy => "copy", "Copy selection";
    Cut => "cut", "Cut selection";
    Paste => "paste", "Paste elements";
    PasteImage => "pasteImage", "Paste image from the system clipboard";
    Duplicate => "duplicate", "Duplicate selection";
    Delete => "delete", "Delete selection";
    SelectAll => "selectAll", "Select all elements";
    Deselect => "deselect", "Clear selection";
    Escape => "escape", "Cancel current action";
    BringToFront => "bringToFront", "Bring to front";
    SendToBack => "sendToBack", "Send to back";
    BringForward => "bringForward", "Bring forward";
    SendBackward => "sendBackward", "Send backward";
    ZoomIn => "zoomIn", "Zoom in";
    ZoomOut => "zoomOut", "Zoom out";
    ZoomReset => "zoomReset", "Reset zoom and pan";
    ToggleSnap => "toggleSnap", "Toggle snapping to elements";
    ToggleGrid => "toggleGrid", "Toggle snapping to grid";
    MoveUp => "moveUp", "Nudge up";
    MoveDown => "moveDown", "Nudge down";
    MoveLeft => "moveLeft", "Nudge left";
    MoveRight => "moveRight", "Nudge right";
    MoveUpFast => "moveUpFast", "Nudge up by a large step";
    MoveDownFast => "moveDownFast", "Nudge down by a large step";
    MoveLeftFast => "moveLeftFast", "Nudge left by a large step";
    MoveRightFast => "moveRightFast", "Nudge right by a large step";
    AlignLeft => "alignLeft", "Align left";
    AlignCenter => "alignCenter", "Align horizontal centers";
    AlignRight => "alignRight", "Align right";
    AlignTop => "alignTop", "Align top";
    AlignMiddle => "alignMiddle", "Align vertical centers";
    AlignBottom => "alignBottom", "Align bottom";
    DistributeHorizontal => "distributeHorizontal", "Distribute horizontally";
    DistributeVertical => "distributeVertical", "Distribute vertically";
    FlipHorizontal => "flipHorizontal", "Flip horizontally";
    FlipVertical => "flipVertical", "Flip vertically";
    CopyStyle => "copyStyle", "Copy style";
    PasteStyle => "pasteStyle", "Paste style";
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .iter()
            .copied()
            .find(|c| c.name() == s)
            .ok_or_else(|| format!("unknown command: {s}"))
    }
}
