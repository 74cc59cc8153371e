//! Pointer and keyboard input primitives.

use kurbo::Point;
use serde::{Deserialize, Serialize};

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };
}

/// Key names that delete the current selection.
pub const DELETE_KEYS: [&str; 2] = ["Delete", "Backspace"];

/// Whether a key name deletes the selection.
pub fn is_delete_key(key: &str) -> bool {
    DELETE_KEYS.contains(&key)
}

/// Double-click detection constants.
const DOUBLE_CLICK_TIME_MS: u128 = 500;
const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Detects double clicks from a stream of pointer-down positions.
#[derive(Debug, Clone, Default)]
pub struct ClickTracker {
    last_click_time: Option<Instant>,
    last_click_position: Option<Point>,
}

impl ClickTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a click at `now`. Returns true if it completes a double click.
    pub fn register(&mut self, position: Point, now: Instant) -> bool {
        if let (Some(last_time), Some(last_pos)) = (self.last_click_time, self.last_click_position) {
            let elapsed = now.saturating_duration_since(last_time).as_millis();
            if elapsed < DOUBLE_CLICK_TIME_MS && position.distance(last_pos) < DOUBLE_CLICK_DISTANCE {
                // Reset so a third click starts a new pair
                self.last_click_time = None;
                self.last_click_position = None;
                return true;
            }
        }
        self.last_click_time = Some(now);
        self.last_click_position = Some(position);
        false
    }

    pub fn reset(&mut self) {
        self.last_click_time = None;
        self.last_click_position = None;
    }
}
