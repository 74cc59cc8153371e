//! Contextual UI derived from the selection.
//!
//! Everything here is a pure function of the store, viewport and gesture
//! state; callers recompute after any change instead of caching.

use crate::config::EditorConfig;
use crate::element::{ElementId, ElementKind, ElementType};
use crate::store::ElementStore;
use crate::viewport::Viewport;
use kurbo::Point;
use std::collections::HashSet;

/// Default generator height when the element has none.
const DEFAULT_GENERATOR_HEIGHT: f64 = 400.0;

/// Which contextual toolbar to show.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContextUi {
    /// No toolbar.
    None,
    /// Toolbar floating above one element, anchored in screen space.
    Single {
        element_id: ElementId,
        element_type: ElementType,
        anchor: Point,
    },
    /// Fixed-position toolbar for a multi-selection.
    Multi { count: usize },
}

/// Resolve the contextual toolbar.
///
/// `manipulating` should be true while a pan, drag, resize or draw gesture
/// is running; the toolbar is hidden during those.
pub fn resolve_context_ui(
    store: &ElementStore,
    viewport: &Viewport,
    config: &EditorConfig,
    manipulating: bool,
) -> ContextUi {
    if manipulating {
        return ContextUi::None;
    }
    let selected = store.selected();
    match selected.as_slice() {
        [] => ContextUi::None,
        [el] if el.is_connector() => ContextUi::None,
        [el] => ContextUi::Single {
            element_id: el.id,
            element_type: el.element_type(),
            anchor: viewport.canvas_to_screen(Point::new(
                el.x + el.width_or_zero() / 2.0,
                el.y - config.toolbar_offset,
            )),
        },
        many => ContextUi::Multi { count: many.len() },
    }
}

/// Screen position of the prompt panel under a single selected generator.
pub fn generator_panel_anchor(
    store: &ElementStore,
    viewport: &Viewport,
    config: &EditorConfig,
) -> Option<Point> {
    let el = store.selection().single().and_then(|id| store.get(id))?;
    if !matches!(el.kind, ElementKind::ImageGenerator { .. }) {
        return None;
    }
    let bottom = el.y + el.height.unwrap_or(DEFAULT_GENERATOR_HEIGHT);
    let screen = viewport.canvas_to_screen(Point::new(el.x, bottom));
    Some(Point::new(screen.x, screen.y + config.generator_panel_margin))
}

/// Elements linked to the selection, in paint order.
///
/// A link counts in either direction: the selected element lists the other
/// in `linkedElements`, or the other lists the selected one. Selected
/// elements themselves are not included.
pub fn linked_highlights(store: &ElementStore) -> Vec<ElementId> {
    let selected: HashSet<ElementId> = store.selection().ids().iter().copied().collect();
    if selected.is_empty() {
        return Vec::new();
    }
    let outgoing: HashSet<ElementId> = store
        .selected()
        .into_iter()
        .flat_map(|el| el.linked_elements.iter().copied())
        .collect();

    store
        .all()
        .filter(|el| !selected.contains(&el.id))
        .filter(|el| {
            outgoing.contains(&el.id) || el.linked_elements.iter().any(|id| selected.contains(id))
        })
        .map(|el| el.id)
        .collect()
}

/// Display state of one element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ElementUiState {
    #[default]
    Normal,
    /// Linked to a selected element.
    Highlighted,
    Selected,
    /// Text editing is active on this element.
    Editing,
}

impl ElementUiState {
    pub fn is_selected(&self) -> bool {
        matches!(self, Self::Selected | Self::Editing)
    }
}

/// Display state for `id`, given the element being text-edited.
///
/// Only the selection and `id`'s own links are inspected. Use
/// [`element_ui_states`] to classify a whole frame.
pub fn element_ui_state(store: &ElementStore, id: ElementId, editing: Option<ElementId>) -> ElementUiState {
    let linked = store.get(id).is_some_and(|el| {
        el.linked_elements.iter().any(|other| store.is_selected(*other))
            || store.selected().iter().any(|sel| sel.linked_elements.contains(&id))
    });
    classify(store, id, editing, linked)
}

/// Display state of every element, in paint order.
pub fn element_ui_states(store: &ElementStore, editing: Option<ElementId>) -> Vec<(ElementId, ElementUiState)> {
    let highlighted: HashSet<ElementId> = linked_highlights(store).into_iter().collect();
    store
        .all()
        .map(|el| (el.id, classify(store, el.id, editing, highlighted.contains(&el.id))))
        .collect()
}

fn classify(store: &ElementStore, id: ElementId, editing: Option<ElementId>, linked: bool) -> ElementUiState {
    if editing == Some(id) {
        ElementUiState::Editing
    } else if store.is_selected(id) {
        ElementUiState::Selected
    } else if linked {
        ElementUiState::Highlighted
    } else {
        ElementUiState::Normal
    }
}
