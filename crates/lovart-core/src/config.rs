//! Editor configuration.

use crate::error::{EditorError, EditorResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunable constants for the editor.
///
/// Every field has a default, so a config file only needs to name the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Height of the chrome header above the canvas area, in screen pixels.
    pub header_height: f64,
    /// Distance of the contextual toolbar above an element, in canvas units.
    pub toolbar_offset: f64,
    /// Gap between a generator element and its prompt panel, in screen pixels.
    pub generator_panel_margin: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Scale increment for zoom in/out commands.
    pub zoom_step: f64,
    /// Smallest width/height a resize may produce.
    pub min_element_size: f64,
    /// Distance within which edges and centers snap, in canvas units.
    pub snap_threshold: f64,
    /// Snap a single dragged element to the edges of its neighbours.
    pub snap_to_elements: bool,
    /// Round dragged positions to the grid when no element snap applies.
    pub snap_to_grid: bool,
    pub grid_size: f64,
    pub history_max_len: usize,
    /// Debounce window for history commits, in milliseconds.
    pub history_debounce_ms: u64,
    /// Offset applied to each paste and duplicate.
    pub paste_offset: f64,
    /// Horizontal gap between a flow source and its generator.
    pub flow_spacing: f64,
    pub nudge_step: f64,
    pub nudge_step_fast: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            header_height: 56.0,
            toolbar_offset: 60.0,
            generator_panel_margin: 20.0,
            min_scale: 0.1,
            max_scale: 3.0,
            zoom_step: 0.1,
            min_element_size: 10.0,
            snap_threshold: 5.0,
            snap_to_elements: false,
            snap_to_grid: false,
            grid_size: 20.0,
            history_max_len: 100,
            history_debounce_ms: 500,
            paste_offset: 20.0,
            flow_spacing: 120.0,
            nudge_step: 1.0,
            nudge_step_fast: 10.0,
        }
    }
}

impl EditorConfig {
    /// Parse a config from JSON, filling missing fields with defaults.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| EditorError::Config(e.to_string()))?;
        Ok(config.validated())
    }

    /// Serialize the config to pretty JSON.
    pub fn to_json(&self) -> EditorResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Clamp nonsensical values back into a usable range.
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();
        if !(self.min_scale.is_finite() && self.min_scale > 0.0) {
            log::warn!("Invalid minScale {}, using default", self.min_scale);
            self.min_scale = defaults.min_scale;
        }
        if !self.max_scale.is_finite() || self.max_scale < self.min_scale {
            log::warn!("Invalid maxScale {}, using default", self.max_scale);
            self.max_scale = defaults.max_scale.max(self.min_scale);
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 0.0) {
            self.zoom_step = defaults.zoom_step;
        }
        if !(self.min_element_size.is_finite() && self.min_element_size >= 1.0) {
            self.min_element_size = defaults.min_element_size;
        }
        if !(self.grid_size.is_finite() && self.grid_size > 0.0) {
            self.grid_size = defaults.grid_size;
        }
        if !self.snap_threshold.is_finite() || self.snap_threshold < 0.0 {
            self.snap_threshold = defaults.snap_threshold;
        }
        if self.history_max_len == 0 {
            self.history_max_len = 1;
        }
        self
    }

    /// History debounce window as a duration.
    pub fn history_debounce(&self) -> Duration {
        Duration::from_millis(self.history_debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert!((config.header_height - 56.0).abs() < f64::EPSILON);
        assert!((config.max_scale - 3.0).abs() < f64::EPSILON);
        assert_eq!(config.history_max_len, 100);
        assert_eq!(config.history_debounce(), Duration::from_millis(500));
    }

    #[test]
    fn test_partial_json() {
        let config = EditorConfig::from_json(r#"{"headerHeight": 0, "pasteOffset": 10}"#).unwrap();
        assert!(config.header_height.abs() < f64::EPSILON);
        assert!((config.paste_offset - 10.0).abs() < f64::EPSILON);
        assert!((config.min_scale - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_json() {
        let result = EditorConfig::from_json("{not json");
        assert!(matches!(result, Err(EditorError::Config(_))));
    }

    #[test]
    fn test_validation_clamps_scale_range() {
        let config = EditorConfig::from_json(r#"{"minScale": 2.0, "maxScale": 1.0}"#).unwrap();
        assert!(config.max_scale >= config.min_scale);

        let config = EditorConfig::from_json(r#"{"minScale": -1.0, "historyMaxLen": 0}"#).unwrap();
        assert!((config.min_scale - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.history_max_len, 1);
    }
}
