//! Alignment snapping between elements.

use crate::element::Element;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Orientation of a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideAxis {
    /// Vertical line at a fixed x.
    Vertical,
    /// Horizontal line at a fixed y.
    Horizontal,
}

/// A transient alignment line shown while dragging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapGuide {
    #[serde(rename = "type")]
    pub axis: GuideAxis,
    /// x for vertical guides, y for horizontal ones.
    pub position: f64,
    /// Start of the span along the other axis.
    pub start: f64,
    /// End of the span along the other axis.
    pub end: f64,
}

/// Result of a snap computation.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapResult {
    pub guides: Vec<SnapGuide>,
    /// Top-left position after snapping.
    pub point: Point,
    pub snapped_x: bool,
    pub snapped_y: bool,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(point: Point) -> Self {
        Self {
            guides: Vec::new(),
            point,
            snapped_x: false,
            snapped_y: false,
        }
    }

    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }
}

/// Edges and center of a box along one axis.
#[derive(Debug, Clone, Copy)]
struct Span {
    start: f64,
    end: f64,
}

impl Span {
    fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    fn len(&self) -> f64 {
        self.end - self.start
    }
}

/// Candidate alignments in check order: (moving edge, target edge, snapped start).
fn axis_candidates(moving: Span, other: Span) -> [(f64, f64, f64); 5] {
    let len = moving.len();
    [
        (moving.start, other.start, other.start),
        (moving.end, other.end, other.end - len),
        (moving.center(), other.center(), other.center() - len / 2.0),
        (moving.start, other.end, other.end),
        (moving.end, other.start, other.start - len),
    ]
}

/// Compute alignment guides for `moving` against `others`.
///
/// For every other element, left, right and center-x are compared (plus
/// the left/right cross pairs), then top, bottom and center-y. A pair
/// snaps when its distance is strictly below `threshold`. Every match
/// emits a guide spanning both elements; when several matches hit the same
/// axis the last one checked wins. `moving` itself is skipped if present
/// in `others`.
pub fn compute_snap_guides<'a, I>(moving: &Element, others: I, threshold: f64) -> SnapResult
where
    I: IntoIterator<Item = &'a Element>,
{
    let mut result = SnapResult::none(Point::new(moving.x, moving.y));
    let m = moving.rect();
    let mx = Span { start: m.x0, end: m.x1 };
    let my = Span { start: m.y0, end: m.y1 };

    for other in others {
        if other.id == moving.id || other.is_connector() {
            continue;
        }
        let o = other.rect();
        let ox = Span { start: o.x0, end: o.x1 };
        let oy = Span { start: o.y0, end: o.y1 };

        for (edge, target, snapped) in axis_candidates(mx, ox) {
            if (edge - target).abs() < threshold {
                result.point.x = snapped;
                result.snapped_x = true;
                result.guides.push(SnapGuide {
                    axis: GuideAxis::Vertical,
                    position: target,
                    start: my.start.min(oy.start),
                    end: my.end.max(oy.end),
                });
            }
        }

        for (edge, target, snapped) in axis_candidates(my, oy) {
            if (edge - target).abs() < threshold {
                result.point.y = snapped;
                result.snapped_y = true;
                result.guides.push(SnapGuide {
                    axis: GuideAxis::Horizontal,
                    position: target,
                    start: mx.start.min(ox.start),
                    end: mx.end.max(ox.end),
                });
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::element::ShapeType;

    fn threshold() -> f64 {
        EditorConfig::default().snap_threshold
    }

    fn shape(x: f64, y: f64, w: f64, h: f64) -> Element {
        Element::shape(ShapeType::Square, x, y, w, h)
    }

    #[test]
    fn test_no_snap_when_far() {
        let moving = shape(0.0, 0.0, 10.0, 10.0);
        let other = shape(100.0, 100.0, 10.0, 10.0);
        let result = compute_snap_guides(&moving, [&other], threshold());
        assert!(!result.is_snapped());
        assert!(result.guides.is_empty());
        assert_eq!(result.point, Point::ZERO);
    }

    #[test]
    fn test_left_edges_snap() {
        let moving = shape(103.0, 0.0, 20.0, 20.0);
        let other = shape(100.0, 200.0, 50.0, 30.0);
        let result = compute_snap_guides(&moving, [&other], threshold());
        assert!(result.snapped_x);
        assert!(!result.snapped_y);
        assert!((result.point.x - 100.0).abs() < f64::EPSILON);
        assert!((result.point.y).abs() < f64::EPSILON);

        let guide = result.guides[0];
        assert_eq!(guide.axis, GuideAxis::Vertical);
        assert!((guide.position - 100.0).abs() < f64::EPSILON);
        assert!((guide.start).abs() < f64::EPSILON);
        assert!((guide.end - 230.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_threshold_is_strict() {
        let moving = shape(105.0, 0.0, 20.0, 20.0);
        let other = shape(100.0, 200.0, 50.0, 30.0);
        let result = compute_snap_guides(&moving, [&other], 5.0);
        assert!(!result.snapped_x);
    }

    #[test]
    fn test_right_to_left_cross_pair() {
        // Moving right edge (98) is near other left edge (100)
        let moving = shape(88.0, 0.0, 10.0, 10.0);
        let other = shape(100.0, 300.0, 40.0, 40.0);
        let result = compute_snap_guides(&moving, [&other], threshold());
        assert!(result.snapped_x);
        assert!((result.point.x - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_top_to_bottom_cross_pair() {
        let moving = shape(500.0, 52.0, 10.0, 10.0);
        let other = shape(0.0, 0.0, 40.0, 50.0);
        let result = compute_snap_guides(&moving, [&other], threshold());
        assert!(result.snapped_y);
        assert!((result.point.y - 50.0).abs() < f64::EPSILON);
        assert_eq!(result.guides[0].axis, GuideAxis::Horizontal);
        assert!((result.guides[0].start).abs() < f64::EPSILON);
        assert!((result.guides[0].end - 510.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_last_match_wins() {
        // Same size: left, right and center all match; center is checked after right.
        let moving = shape(2.0, 500.0, 10.0, 10.0);
        let other = shape(0.0, 0.0, 10.0, 10.0);
        let result = compute_snap_guides(&moving, [&other], threshold());
        assert_eq!(
            result.guides.iter().filter(|g| g.axis == GuideAxis::Vertical).count(),
            3
        );
        assert!((result.point.x).abs() < f64::EPSILON);

        // Against two elements, the later one decides.
        let first = shape(3.0, 100.0, 50.0, 50.0);
        let second = shape(1.0, 200.0, 80.0, 80.0);
        let moving = shape(2.0, 500.0, 20.0, 20.0);
        let result = compute_snap_guides(&moving, [&first, &second], threshold());
        assert!((result.point.x - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_skips_self_and_connectors() {
        let moving = shape(0.0, 0.0, 10.0, 10.0);
        let other = shape(300.0, 300.0, 10.0, 10.0);
        let connector = Element::connector(moving.id, other.id, Default::default());
        let result = compute_snap_guides(&moving, [&moving, &connector], threshold());
        assert!(!result.is_snapped());
    }
}
