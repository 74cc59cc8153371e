//! Canvas tools.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    /// Select, move and resize elements.
    #[default]
    Select,
    /// Pan the viewport.
    Hand,
    /// Draw freehand paths.
    Draw,
}

/// Cursor a renderer should show for a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorHint {
    Default,
    Grab,
    Crosshair,
}

impl ToolKind {
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Hand => "hand",
            ToolKind::Draw => "draw",
        }
    }

    pub fn cursor(&self) -> CursorHint {
        match self {
            ToolKind::Select => CursorHint::Default,
            ToolKind::Hand => CursorHint::Grab,
            ToolKind::Draw => CursorHint::Crosshair,
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToolKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "select" => Ok(ToolKind::Select),
            "hand" => Ok(ToolKind::Hand),
            "draw" => Ok(ToolKind::Draw),
            other => Err(format!("unknown tool: {other}")),
        }
    }
}
