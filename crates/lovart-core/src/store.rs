//! Element store: ordered elements plus the live selection.
//!
//! Insertion order is paint order (later = on top). The store also owns the
//! selection so that removals can never leave selected ids pointing at
//! deleted elements. Cross references (`connectorFrom`, `groupId`,
//! `linkedElements`, `referenceImageId`) are not validated.

use crate::element::{Element, ElementId, ElementPatch};
use crate::error::{EditorError, EditorResult};
use crate::geometry::{self, point_in_element};
use kurbo::{Point, Rect};
use std::collections::{HashMap, HashSet};

/// Ordered set of selected element ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<ElementId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.ids.contains(&id)
    }

    /// The only selected id, if exactly one is selected.
    pub fn single(&self) -> Option<ElementId> {
        match self.ids.as_slice() {
            [id] => Some(*id),
            _ => None,
        }
    }

    /// Append an id if not already selected.
    pub fn add(&mut self, id: ElementId) {
        if !self.ids.contains(&id) {
            self.ids.push(id);
        }
    }

    pub fn remove(&mut self, id: ElementId) {
        self.ids.retain(|&s| s != id);
    }

    /// Add the id if absent, remove it if present.
    pub fn toggle(&mut self, id: ElementId) {
        if self.contains(id) {
            self.remove(id);
        } else {
            self.ids.push(id);
        }
    }

    /// Replace the selection, dropping duplicates.
    pub fn set(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        self.ids.clear();
        for id in ids {
            self.add(id);
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    fn retain(&mut self, mut keep: impl FnMut(ElementId) -> bool) {
        self.ids.retain(|&id| keep(id));
    }
}

/// Ordered collection of elements keyed by id.
#[derive(Debug, Clone, Default)]
pub struct ElementStore {
    elements: HashMap<ElementId, Element>,
    /// Paint order, back to front.
    order: Vec<ElementId>,
    selection: Selection,
}

impl ElementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element on top. Fails if the id is already present.
    pub fn add(&mut self, element: Element) -> EditorResult<()> {
        if self.elements.contains_key(&element.id) {
            return Err(EditorError::DuplicateId(element.id));
        }
        self.order.push(element.id);
        self.elements.insert(element.id, element);
        Ok(())
    }

    /// Append several elements in order as one batch.
    ///
    /// The batch is rejected as a whole if any id collides.
    pub fn add_many(&mut self, elements: Vec<Element>) -> EditorResult<()> {
        let mut seen = HashSet::new();
        for el in &elements {
            if self.elements.contains_key(&el.id) || !seen.insert(el.id) {
                return Err(EditorError::DuplicateId(el.id));
            }
        }
        for el in elements {
            self.order.push(el.id);
            self.elements.insert(el.id, el);
        }
        Ok(())
    }

    /// Shallow-merge `patch` into an element.
    pub fn update(&mut self, id: ElementId, patch: &ElementPatch) -> EditorResult<()> {
        let element = self
            .elements
            .get_mut(&id)
            .ok_or(EditorError::ElementNotFound(id))?;
        element.apply_patch(patch);
        Ok(())
    }

    /// Remove an element and deselect it.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let removed = self.elements.remove(&id)?;
        self.order.retain(|&e| e != id);
        self.selection.remove(id);
        Some(removed)
    }

    /// Remove several elements and deselect them. Unknown ids are skipped.
    pub fn remove_many(&mut self, ids: &[ElementId]) -> Vec<Element> {
        let doomed: HashSet<ElementId> = ids.iter().copied().collect();
        let removed: Vec<Element> = self
            .order
            .iter()
            .filter(|id| doomed.contains(*id))
            .filter_map(|id| self.elements.get(id).cloned())
            .collect();
        self.order.retain(|id| !doomed.contains(id));
        self.elements.retain(|id, _| !doomed.contains(id));
        self.selection.retain(|id| !doomed.contains(&id));
        removed
    }

    /// Remove every selected element.
    pub fn remove_selected(&mut self) -> Vec<Element> {
        let ids = self.selection.ids().to_vec();
        self.remove_many(&ids)
    }

    /// Replace the whole content, keeping the selection only for ids that survive.
    ///
    /// A repeated id keeps the paint position of its first occurrence and
    /// the value of its last.
    pub fn replace_all(&mut self, elements: Vec<Element>) {
        self.elements.clear();
        self.order.clear();
        for el in elements {
            if !self.elements.contains_key(&el.id) {
                self.order.push(el.id);
            }
            self.elements.insert(el.id, el);
        }
        let elements = &self.elements;
        self.selection.retain(|id| elements.contains_key(&id));
    }

    pub fn clear(&mut self) {
        self.elements.clear();
        self.order.clear();
        self.selection.clear();
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(&id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    /// Elements in paint order (back to front).
    pub fn all(&self) -> impl Iterator<Item = &Element> {
        self.order.iter().filter_map(|id| self.elements.get(id))
    }

    /// Owned snapshot of all elements in paint order.
    pub fn to_vec(&self) -> Vec<Element> {
        self.all().cloned().collect()
    }

    pub fn ids(&self) -> &[ElementId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Topmost non-connector element containing `point`.
    pub fn hit_test(&self, point: Point) -> Option<ElementId> {
        self.order.iter().rev().copied().find(|id| {
            self.elements
                .get(id)
                .is_some_and(|el| !el.is_connector() && point_in_element(point, el))
        })
    }

    /// Ids of elements strictly intersecting `rect`, in paint order.
    pub fn ids_in_rect(&self, rect: Rect) -> Vec<ElementId> {
        geometry::elements_in_rect(self.all(), rect)
            .into_iter()
            .map(|el| el.id)
            .collect()
    }

    /// Endpoint centers of a connector, or `None` if it is dangling.
    pub fn connector_line(&self, connector: &Element) -> Option<(Point, Point)> {
        let (from, to) = connector.connector_endpoints()?;
        match (self.get(from), self.get(to)) {
            (Some(a), Some(b)) => Some((a.center(), b.center())),
            _ => {
                log::debug!("Skipping dangling connector {}", connector.id);
                None
            }
        }
    }

    /// Bring an element to the front (topmost).
    pub fn bring_to_front(&mut self, id: ElementId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.order.retain(|&e| e != id);
        self.order.push(id);
        true
    }

    /// Send an element to the back (bottommost).
    pub fn send_to_back(&mut self, id: ElementId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.order.retain(|&e| e != id);
        self.order.insert(0, id);
        true
    }

    /// Move an element one layer towards the front.
    /// Returns false if it is already at the front.
    pub fn bring_forward(&mut self, id: ElementId) -> bool {
        match self.order.iter().position(|&e| e == id) {
            Some(pos) if pos + 1 < self.order.len() => {
                self.order.swap(pos, pos + 1);
                true
            }
            _ => false,
        }
    }

    /// Move an element one layer towards the back.
    /// Returns false if it is already at the back.
    pub fn send_backward(&mut self, id: ElementId) -> bool {
        match self.order.iter().position(|&e| e == id) {
            Some(pos) if pos > 0 => {
                self.order.swap(pos, pos - 1);
                true
            }
            _ => false,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Selected elements in selection order, skipping stale ids.
    pub fn selected(&self) -> Vec<&Element> {
        self.selection
            .ids()
            .iter()
            .filter_map(|id| self.elements.get(id))
            .collect()
    }

    /// Replace the selection. Ids not in the store are dropped.
    pub fn set_selection(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        let elements = &self.elements;
        self.selection
            .set(ids.into_iter().filter(|id| elements.contains_key(id)));
    }

    /// Select exactly one element.
    pub fn select(&mut self, id: ElementId) {
        self.set_selection([id]);
    }

    /// Add an element to the selection.
    pub fn add_to_selection(&mut self, id: ElementId) {
        if self.contains(id) {
            self.selection.add(id);
        }
    }

    pub fn toggle_selection(&mut self, id: ElementId) {
        if self.contains(id) {
            self.selection.toggle(id);
        }
    }

    pub fn deselect(&mut self, id: ElementId) {
        self.selection.remove(id);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Select every element in paint order.
    pub fn select_all(&mut self) {
        self.selection.set(self.order.iter().copied());
    }

    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selection.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ConnectorStyle, ShapeType};

    fn shape(x: f64, y: f64) -> Element {
        Element::shape(ShapeType::Square, x, y, 10.0, 10.0)
    }

    #[test]
    fn test_add_preserves_order() {
        let mut store = ElementStore::new();
        let a = shape(0.0, 0.0);
        let b = shape(5.0, 5.0);
        store.add(a.clone()).unwrap();
        store.add(b.clone()).unwrap();
        let ids: Vec<_> = store.all().map(|e| e.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[test]
    fn test_add_duplicate_id_fails() {
        let mut store = ElementStore::new();
        let a = shape(0.0, 0.0);
        store.add(a.clone()).unwrap();
        assert!(matches!(store.add(a), Err(EditorError::DuplicateId(_))));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_add_many_is_atomic() {
        let mut store = ElementStore::new();
        let a = shape(0.0, 0.0);
        store.add(a.clone()).unwrap();
        let result = store.add_many(vec![shape(1.0, 1.0), a]);
        assert!(result.is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_update_is_shallow_merge() {
        let mut store = ElementStore::new();
        let a = shape(0.0, 0.0);
        store.add(a.clone()).unwrap();
        store
            .update(a.id, &ElementPatch { x: Some(42.0), ..Default::default() })
            .unwrap();
        let updated = store.get(a.id).unwrap();
        assert!((updated.x - 42.0).abs() < f64::EPSILON);
        assert!(updated.y.abs() < f64::EPSILON);
        assert_eq!(updated.width, Some(10.0));
        assert_eq!(updated.kind, a.kind);
    }

    #[test]
    fn test_update_missing() {
        let mut store = ElementStore::new();
        let result = store.update(uuid::Uuid::new_v4(), &ElementPatch::position(1.0, 1.0));
        assert!(matches!(result, Err(EditorError::ElementNotFound(_))));
    }

    #[test]
    fn test_remove_many_prunes_selection() {
        let mut store = ElementStore::new();
        let a = shape(0.0, 0.0);
        let b = shape(1.0, 1.0);
        let c = shape(2.0, 2.0);
        store.add_many(vec![a.clone(), b.clone(), c.clone()]).unwrap();
        store.set_selection([a.id, b.id, c.id]);

        let removed = store.remove_many(&[a.id, c.id, uuid::Uuid::new_v4()]);
        assert_eq!(removed.len(), 2);
        assert_eq!(store.selection().ids(), &[b.id]);
        assert_eq!(store.ids(), &[b.id]);
    }

    #[test]
    fn test_remove_leaves_dangling_connector() {
        let mut store = ElementStore::new();
        let a = shape(0.0, 0.0);
        let b = shape(100.0, 0.0);
        let connector = Element::connector(a.id, b.id, ConnectorStyle::Dashed);
        store.add_many(vec![a.clone(), b.clone(), connector.clone()]).unwrap();

        let line = store.connector_line(&connector).unwrap();
        assert!((line.0.x - 5.0).abs() < f64::EPSILON);
        assert!((line.1.x - 105.0).abs() < f64::EPSILON);

        store.remove(b.id);
        assert!(store.contains(connector.id));
        assert!(store.connector_line(&connector).is_none());
    }

    #[test]
    fn test_set_selection_drops_unknown_ids() {
        let mut store = ElementStore::new();
        let a = shape(0.0, 0.0);
        store.add(a.clone()).unwrap();
        store.set_selection([uuid::Uuid::new_v4(), a.id, a.id]);
        assert_eq!(store.selection().ids(), &[a.id]);
    }

    #[test]
    fn test_toggle_selection() {
        let mut store = ElementStore::new();
        let a = shape(0.0, 0.0);
        store.add(a.clone()).unwrap();
        store.toggle_selection(a.id);
        assert!(store.is_selected(a.id));
        store.toggle_selection(a.id);
        assert!(!store.is_selected(a.id));
    }

    #[test]
    fn test_hit_test_topmost_first() {
        let mut store = ElementStore::new();
        let bottom = shape(0.0, 0.0);
        let top = shape(5.0, 5.0);
        store.add_many(vec![bottom.clone(), top.clone()]).unwrap();
        assert_eq!(store.hit_test(Point::new(7.0, 7.0)), Some(top.id));
        assert_eq!(store.hit_test(Point::new(2.0, 2.0)), Some(bottom.id));
        assert_eq!(store.hit_test(Point::new(50.0, 50.0)), None);
    }

    #[test]
    fn test_layer_ordering() {
        let mut store = ElementStore::new();
        let a = shape(0.0, 0.0);
        let b = shape(0.0, 0.0);
        let c = shape(0.0, 0.0);
        store.add_many(vec![a.clone(), b.clone(), c.clone()]).unwrap();

        assert!(store.bring_to_front(a.id));
        assert_eq!(store.ids(), &[b.id, c.id, a.id]);
        assert!(store.send_to_back(a.id));
        assert_eq!(store.ids(), &[a.id, b.id, c.id]);
        assert!(store.bring_forward(a.id));
        assert_eq!(store.ids(), &[b.id, a.id, c.id]);
        assert!(store.send_backward(c.id));
        assert_eq!(store.ids(), &[b.id, c.id, a.id]);
        assert!(!store.bring_forward(a.id));
        assert!(!store.send_backward(b.id));
    }

    #[test]
    fn test_replace_all_keeps_surviving_selection() {
        let mut store = ElementStore::new();
        let a = shape(0.0, 0.0);
        let b = shape(1.0, 1.0);
        store.add_many(vec![a.clone(), b.clone()]).unwrap();
        store.set_selection([a.id, b.id]);
        store.replace_all(vec![b.clone()]);
        assert_eq!(store.selection().ids(), &[b.id]);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_replace_all_duplicate_keeps_first_position() {
        let mut store = ElementStore::new();
        let a = shape(0.0, 0.0);
        let b = shape(1.0, 1.0);
        let mut a2 = a.clone();
        a2.x = 99.0;
        store.replace_all(vec![a.clone(), b.clone(), a2]);
        assert_eq!(store.ids(), &[a.id, b.id]);
        assert_eq!(store.get(a.id).unwrap().x, 99.0);
    }

    #[test]
    fn test_remove_selected_in_paint_order() {
        let mut store = ElementStore::new();
        let a = shape(0.0, 0.0);
        let b = shape(1.0, 1.0);
        let c = shape(2.0, 2.0);
        store.add_many(vec![a.clone(), b.clone(), c.clone()]).unwrap();
        store.set_selection([c.id, a.id]);

        let removed: Vec<ElementId> = store.remove_selected().into_iter().map(|el| el.id).collect();
        assert_eq!(removed, vec![a.id, c.id]);
        assert_eq!(store.ids(), &[b.id]);
        assert!(store.selection().is_empty());
    }
}
