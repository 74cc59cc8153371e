//! Bounding boxes, overlap tests and hit tests over elements.

use crate::element::Element;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Union rectangle of a set of elements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub width: f64,
    pub height: f64,
    pub center_x: f64,
    pub center_y: f64,
}

impl BoundingBox {
    fn from_extents(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        let width = max_x - min_x;
        let height = max_y - min_y;
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
            width,
            height,
            center_x: min_x + width / 2.0,
            center_y: min_y + height / 2.0,
        }
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(self.min_x, self.min_y, self.max_x, self.max_y)
    }

    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.center_y)
    }
}

/// Bounding box of `elements`, or `None` when empty.
///
/// Missing width/height count as 0.
pub fn bounding_box<'a, I>(elements: I) -> Option<BoundingBox>
where
    I: IntoIterator<Item = &'a Element>,
{
    let mut extents: Option<(f64, f64, f64, f64)> = None;
    for el in elements {
        let r = el.rect();
        extents = Some(match extents {
            Some((x0, y0, x1, y1)) => (x0.min(r.x0), y0.min(r.y0), x1.max(r.x1), y1.max(r.y1)),
            None => (r.x0, r.y0, r.x1, r.y1),
        });
    }
    extents.map(|(x0, y0, x1, y1)| BoundingBox::from_extents(x0, y0, x1, y1))
}

/// Strict AABB overlap: rectangles that only touch do not intersect.
pub fn rects_intersect(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && a.x1 > b.x0 && a.y0 < b.y1 && a.y1 > b.y0
}

/// Normalized rectangle spanning two corner points.
pub fn rect_from_points(a: Point, b: Point) -> Rect {
    Rect::new(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
}

/// Whether `point` lies inside the element's box, edges included.
pub fn point_in_element(point: Point, element: &Element) -> bool {
    let r = element.rect();
    point.x >= r.x0 && point.x <= r.x1 && point.y >= r.y0 && point.y <= r.y1
}

/// Elements whose boxes strictly intersect `rect`. Connectors have no box
/// of their own and are never included.
pub fn elements_in_rect<'a, I>(elements: I, rect: Rect) -> Vec<&'a Element>
where
    I: IntoIterator<Item = &'a Element>,
{
    elements
        .into_iter()
        .filter(|el| !el.is_connector() && rects_intersect(el.rect(), rect))
        .collect()
}

/// Round a value to the nearest grid line.
pub fn snap_to_grid(value: f64, grid_size: f64) -> f64 {
    (value / grid_size).round() * grid_size
}

/// Box scaled by `factor` around its center.
pub fn scale_from_center(rect: Rect, factor: f64) -> Rect {
    let center = rect.center();
    let half_w = rect.width() * factor / 2.0;
    let half_h = rect.height() * factor / 2.0;
    Rect::new(center.x - half_w, center.y - half_h, center.x + half_w, center.y + half_h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ShapeType;

    fn shape(x: f64, y: f64, w: f64, h: f64) -> Element {
        Element::shape(ShapeType::Square, x, y, w, h)
    }

    #[test]
    fn test_bounding_box_empty() {
        let empty: Vec<Element> = Vec::new();
        assert!(bounding_box(&empty).is_none());
    }

    #[test]
    fn test_bounding_box_single() {
        let els = vec![shape(10.0, 20.0, 100.0, 50.0)];
        let bb = bounding_box(&els).unwrap();
        assert_eq!(
            bb,
            BoundingBox {
                min_x: 10.0,
                min_y: 20.0,
                max_x: 110.0,
                max_y: 70.0,
                width: 100.0,
                height: 50.0,
                center_x: 60.0,
                center_y: 45.0,
            }
        );
    }

    #[test]
    fn test_bounding_box_union_with_unsized() {
        let els = vec![shape(0.0, 0.0, 10.0, 10.0), Element::text("t", 50.0, -5.0)];
        let bb = bounding_box(&els).unwrap();
        assert!((bb.max_x - 50.0).abs() < f64::EPSILON);
        assert!((bb.min_y + 5.0).abs() < f64::EPSILON);
        assert!((bb.max_y - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rects_intersect_strict() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rects_intersect(a, Rect::new(5.0, 5.0, 15.0, 15.0)));
        // Touching edges do not count
        assert!(!rects_intersect(a, Rect::new(10.0, 0.0, 20.0, 10.0)));
        assert!(!rects_intersect(a, Rect::new(0.0, 10.0, 10.0, 20.0)));
        assert!(!rects_intersect(a, Rect::new(20.0, 20.0, 30.0, 30.0)));
    }

    #[test]
    fn test_elements_in_rect() {
        let inside = shape(50.0, 50.0, 10.0, 10.0);
        let outside = shape(200.0, 200.0, 10.0, 10.0);
        let els = vec![inside.clone(), outside];
        let hits = elements_in_rect(&els, rect_from_points(Point::new(100.0, 100.0), Point::ZERO));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, inside.id);
    }

    #[test]
    fn test_elements_in_rect_skips_connectors() {
        let a = shape(0.0, 0.0, 10.0, 10.0);
        let b = shape(20.0, 0.0, 10.0, 10.0);
        let c = Element::connector(a.id, b.id, Default::default());
        let els = vec![a, b, c];
        let hits = elements_in_rect(&els, Rect::new(-100.0, -100.0, 100.0, 100.0));
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_point_in_element_inclusive() {
        let el = shape(0.0, 0.0, 10.0, 10.0);
        assert!(point_in_element(Point::new(10.0, 10.0), &el));
        assert!(point_in_element(Point::new(0.0, 5.0), &el));
        assert!(!point_in_element(Point::new(10.1, 5.0), &el));
    }

    #[test]
    fn test_snap_to_grid() {
        assert!((snap_to_grid(29.0, 20.0) - 20.0).abs() < f64::EPSILON);
        assert!((snap_to_grid(31.0, 20.0) - 40.0).abs() < f64::EPSILON);
        assert!((snap_to_grid(-11.0, 20.0) + 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scale_from_center() {
        let r = scale_from_center(Rect::new(0.0, 0.0, 100.0, 50.0), 2.0);
        assert!((r.x0 + 50.0).abs() < f64::EPSILON);
        assert!((r.y0 + 25.0).abs() < f64::EPSILON);
        assert!((r.width() - 200.0).abs() < f64::EPSILON);
    }
}
