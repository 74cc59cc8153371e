//! Viewport transform between screen and canvas space.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Pan/zoom state of the canvas.
///
/// `pan` is the screen-space position of the canvas origin relative to the
/// canvas area, and `header_height` is the height of the chrome above that
/// area. Raw pointer positions include the header, so every conversion from
/// pointer coordinates goes through [`Viewport::screen_to_canvas`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Zoom factor.
    pub scale: f64,
    /// Screen-space offset of the canvas origin.
    pub pan: Vec2,
    /// Vertical offset of the canvas area below the header.
    pub header_height: f64,
    pub min_scale: f64,
    pub max_scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            pan: Vec2::ZERO,
            header_height: 56.0,
            min_scale: 0.1,
            max_scale: 3.0,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a viewport with a custom header offset and scale range.
    pub fn with_limits(header_height: f64, min_scale: f64, max_scale: f64) -> Self {
        Self {
            header_height,
            min_scale,
            max_scale,
            ..Self::default()
        }
    }

    /// Transform converting canvas coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.pan + Vec2::new(0.0, self.header_height)) * Affine::scale(self.scale)
    }

    /// Transform converting screen coordinates to canvas coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.scale) * Affine::translate(-(self.pan + Vec2::new(0.0, self.header_height)))
    }

    /// `((sx - pan.x) / scale, (sy - pan.y - header) / scale)`.
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan.x) / self.scale,
            (screen.y - self.pan.y - self.header_height) / self.scale,
        )
    }

    /// Inverse of [`Viewport::screen_to_canvas`], used to anchor overlay UI.
    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        Point::new(
            canvas.x * self.scale + self.pan.x,
            canvas.y * self.scale + self.pan.y + self.header_height,
        )
    }

    /// Convert a screen-space delta to canvas units.
    pub fn screen_delta_to_canvas(&self, delta: Vec2) -> Vec2 {
        delta / self.scale
    }

    /// Pan by a screen-space delta. Pan is not affected by scale.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    pub fn set_pan(&mut self, pan: Vec2) {
        self.pan = pan;
    }

    /// Set the scale, clamped to the allowed range.
    pub fn set_scale(&mut self, scale: f64) {
        if scale.is_finite() {
            self.scale = scale.clamp(self.min_scale, self.max_scale);
        }
    }

    /// Step the scale by `step`, clamped to the allowed range.
    pub fn zoom_by(&mut self, step: f64) {
        self.set_scale(self.scale + step);
    }

    /// Zoom to `scale`, keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, scale: f64) {
        let anchor = self.screen_to_canvas(screen_point);
        self.set_scale(scale);
        let moved = self.canvas_to_screen(anchor);
        self.pan += Vec2::new(screen_point.x - moved.x, screen_point.y - moved.y);
    }

    /// Reset pan and zoom.
    pub fn reset(&mut self) {
        self.pan = Vec2::ZERO;
        self.scale = 1.0;
    }
}
