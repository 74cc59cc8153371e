//! Align, distribute, flip and nudge operations on the selection.
//!
//! Connectors have no box of their own and are skipped by every operation.
//! Each function returns true if any element changed.

use crate::element::{Element, ElementId, ElementKind};
use crate::geometry::bounding_box;
use crate::store::ElementStore;
use kurbo::{Affine, Vec2};
use serde::{Deserialize, Serialize};

/// Edge or center to align the selection to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Top,
    Middle,
    Bottom,
}

/// Axis for distribute and flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

fn selected_boxes(store: &ElementStore) -> Vec<Element> {
    store
        .selected()
        .into_iter()
        .filter(|el| !el.is_connector())
        .cloned()
        .collect()
}

fn move_element(store: &mut ElementStore, id: ElementId, x: f64, y: f64) -> bool {
    match store.get_mut(id) {
        Some(el) if el.x != x || el.y != y => {
            el.x = x;
            el.y = y;
            true
        }
        _ => false,
    }
}

/// Align the selection to an edge or center of its bounding box.
/// Needs at least two elements.
pub fn align(store: &mut ElementStore, alignment: Alignment) -> bool {
    let elements = selected_boxes(store);
    if elements.len() < 2 {
        return false;
    }
    let Some(bb) = bounding_box(&elements) else {
        return false;
    };

    let mut changed = false;
    for el in &elements {
        let (w, h) = (el.width_or_zero(), el.height_or_zero());
        let (x, y) = match alignment {
            Alignment::Left => (bb.min_x, el.y),
            Alignment::Center => (bb.center_x - w / 2.0, el.y),
            Alignment::Right => (bb.max_x - w, el.y),
            Alignment::Top => (el.x, bb.min_y),
            Alignment::Middle => (el.x, bb.center_y - h / 2.0),
            Alignment::Bottom => (el.x, bb.max_y - h),
        };
        changed |= move_element(store, el.id, x, y);
    }
    changed
}

/// Space the selection with equal gaps along an axis, keeping the first and
/// last element in place. Needs at least three elements.
pub fn distribute(store: &mut ElementStore, axis: Axis) -> bool {
    let mut elements = selected_boxes(store);
    if elements.len() < 3 {
        return false;
    }

    let start = |el: &Element| match axis {
        Axis::Horizontal => el.x,
        Axis::Vertical => el.y,
    };
    let extent = |el: &Element| match axis {
        Axis::Horizontal => el.width_or_zero(),
        Axis::Vertical => el.height_or_zero(),
    };
    elements.sort_by(|a, b| start(a).total_cmp(&start(b)));

    let first = start(&elements[0]);
    let end = elements
        .iter()
        .map(|el| start(el) + extent(el))
        .fold(f64::NEG_INFINITY, f64::max);
    let occupied: f64 = elements.iter().map(extent).sum();
    let gap = (end - first - occupied) / (elements.len() - 1) as f64;

    let mut cursor = first;
    let mut changed = false;
    for el in &elements {
        let (x, y) = match axis {
            Axis::Horizontal => (cursor, el.y),
            Axis::Vertical => (el.x, cursor),
        };
        changed |= move_element(store, el.id, x, y);
        cursor += extent(el) + gap;
    }
    changed
}

/// Mirror the selection within its bounding box. Path strokes are mirrored
/// inside their own box as well.
pub fn flip(store: &mut ElementStore, axis: Axis) -> bool {
    let elements = selected_boxes(store);
    let Some(bb) = bounding_box(&elements) else {
        return false;
    };
    let center = bb.center();
    let mirror = match axis {
        Axis::Horizontal => Affine::FLIP_X,
        Axis::Vertical => Affine::FLIP_Y,
    };
    let flip = Affine::translate(center.to_vec2()) * mirror * Affine::translate(-center.to_vec2());

    for original in &elements {
        let Some(el) = store.get_mut(original.id) else {
            continue;
        };
        let mirrored = flip.transform_rect_bbox(original.rect());
        el.x = mirrored.x0;
        el.y = mirrored.y0;

        if let ElementKind::Path { points, .. } = &mut el.kind {
            let local = Affine::translate(Vec2::new(mirrored.width(), mirrored.height()) / 2.0)
                * mirror
                * Affine::translate(-Vec2::new(mirrored.width(), mirrored.height()) / 2.0);
            for p in points.iter_mut() {
                *p = local * *p;
            }
        }
    }
    true
}

/// Move the selection by a canvas-space offset.
pub fn nudge(store: &mut ElementStore, delta: Vec2) -> bool {
    let ids: Vec<ElementId> = selected_boxes(store).iter().map(|el| el.id).collect();
    if ids.is_empty() || delta == Vec2::ZERO {
        return false;
    }
    for id in ids {
        if let Some(el) = store.get_mut(id) {
            el.translate(delta.x, delta.y);
        }
    }
    true
}
