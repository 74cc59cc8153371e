//! Resize handles for the single selected element.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Handle size in screen pixels.
pub const HANDLE_SIZE: f64 = 10.0;
/// Handle hit tolerance in screen pixels.
pub const HANDLE_HIT_TOLERANCE: f64 = 8.0;

/// Compass position of a resize handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::NW,
        ResizeHandle::N,
        ResizeHandle::NE,
        ResizeHandle::E,
        ResizeHandle::SE,
        ResizeHandle::S,
        ResizeHandle::SW,
        ResizeHandle::W,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ResizeHandle::N => "n",
            ResizeHandle::S => "s",
            ResizeHandle::E => "e",
            ResizeHandle::W => "w",
            ResizeHandle::NE => "ne",
            ResizeHandle::NW => "nw",
            ResizeHandle::SE => "se",
            ResizeHandle::SW => "sw",
        }
    }

    pub fn has_north(&self) -> bool {
        matches!(self, ResizeHandle::N | ResizeHandle::NE | ResizeHandle::NW)
    }

    pub fn has_south(&self) -> bool {
        matches!(self, ResizeHandle::S | ResizeHandle::SE | ResizeHandle::SW)
    }

    pub fn has_east(&self) -> bool {
        matches!(self, ResizeHandle::E | ResizeHandle::NE | ResizeHandle::SE)
    }

    pub fn has_west(&self) -> bool {
        matches!(self, ResizeHandle::W | ResizeHandle::NW | ResizeHandle::SW)
    }

    /// Position of this handle on `bounds`.
    pub fn position(&self, bounds: Rect) -> Point {
        let cx = (bounds.x0 + bounds.x1) / 2.0;
        let cy = (bounds.y0 + bounds.y1) / 2.0;
        match self {
            ResizeHandle::N => Point::new(cx, bounds.y0),
            ResizeHandle::S => Point::new(cx, bounds.y1),
            ResizeHandle::E => Point::new(bounds.x1, cy),
            ResizeHandle::W => Point::new(bounds.x0, cy),
            ResizeHandle::NE => Point::new(bounds.x1, bounds.y0),
            ResizeHandle::NW => Point::new(bounds.x0, bounds.y0),
            ResizeHandle::SE => Point::new(bounds.x1, bounds.y1),
            ResizeHandle::SW => Point::new(bounds.x0, bounds.y1),
        }
    }
}

impl FromStr for ResizeHandle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResizeHandle::ALL
            .into_iter()
            .find(|h| h.name() == s)
            .ok_or_else(|| format!("unknown resize handle: {s}"))
    }
}

/// All eight handles with their positions on `bounds`.
pub fn handle_positions(bounds: Rect) -> [(ResizeHandle, Point); 8] {
    ResizeHandle::ALL.map(|h| (h, h.position(bounds)))
}

/// Find the handle under `point`. `tolerance` should be adjusted for zoom.
pub fn hit_test_handles(bounds: Rect, point: Point, tolerance: f64) -> Option<ResizeHandle> {
    ResizeHandle::ALL
        .into_iter()
        .find(|h| h.position(bounds).distance(point) <= tolerance)
}

/// Box of an element when a resize starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeOrigin {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ResizeOrigin {
    /// Width over height, with missing extents treated as 1.
    pub fn aspect_ratio(&self) -> f64 {
        let w = if self.width > 0.0 { self.width } else { 1.0 };
        let h = if self.height > 0.0 { self.height } else { 1.0 };
        w / h
    }
}

/// Compute the resized box for a handle drag of `delta` canvas units.
///
/// `e`/`w` handles change the width (and x for `w`); `n`/`s` change the
/// height (and y for `n`). With `aspect` set, any handle touching an east
/// or west edge derives the height from the new width; pure `n`/`s`
/// handles derive the width from the new height. Width and height are
/// floored at `min_size`.
pub fn compute_resize(
    handle: ResizeHandle,
    origin: ResizeOrigin,
    delta: Vec2,
    aspect: Option<f64>,
    min_size: f64,
) -> ResizeOrigin {
    let ResizeOrigin { x, y, width, height } = origin;
    let mut new_x = x;
    let mut new_y = y;
    let mut new_w = width;
    let mut new_h = height;

    if handle.has_east() {
        new_w = width + delta.x;
    }
    if handle.has_south() {
        new_h = height + delta.y;
    }
    if handle.has_west() {
        new_w = width - delta.x;
        new_x = x + delta.x;
    }
    if handle.has_north() {
        new_h = height - delta.y;
        new_y = y + delta.y;
    }

    if let Some(aspect) = aspect.filter(|a| a.is_finite() && *a > 0.0) {
        if handle.has_east() || handle.has_west() {
            new_h = new_w / aspect;
            if handle.has_north() {
                new_y = y + (height - new_h);
            }
        } else {
            new_w = new_h * aspect;
            if handle == ResizeHandle::N {
                new_y = y + (height - new_h);
            }
        }
    }

    ResizeOrigin {
        x: new_x,
        y: new_y,
        width: new_w.max(min_size),
        height: new_h.max(min_size),
    }
}
