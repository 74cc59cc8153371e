//! Pointer interaction state machine.
//!
//! A gesture starts at pointer-down, updates on every pointer-move and ends
//! at pointer-up or [`InteractionMachine::cancel`]. At most one gesture is
//! active at a time. Element positions are always recomputed from the
//! snapshot taken at pointer-down, so a gesture never accumulates drift.

use crate::config::EditorConfig;
use crate::element::{Element, ElementId, ElementKind, ElementPatch};
use crate::geometry::{rect_from_points, snap_to_grid};
use crate::handles::{HANDLE_HIT_TOLERANCE, ResizeHandle, ResizeOrigin, compute_resize, hit_test_handles};
use crate::input::{ClickTracker, Modifiers};
use crate::snap::{SnapGuide, compute_snap_guides};
use crate::store::ElementStore;
use crate::tools::ToolKind;
use crate::viewport::Viewport;
use kurbo::{Point, Rect, Vec2};

#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// What the pointer went down on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// Empty canvas.
    Canvas,
    /// The body of an element.
    Element(ElementId),
    /// A resize handle of an element.
    Handle(ElementId, ResizeHandle),
}

/// A pointer event in screen coordinates (header included).
#[derive(Debug, Clone, Copy)]
pub struct PointerInput {
    pub position: Point,
    pub modifiers: Modifiers,
    pub time: Instant,
}

impl PointerInput {
    pub fn new(position: Point, modifiers: Modifiers, time: Instant) -> Self {
        Self { position, modifiers, time }
    }

    /// Unmodified event at `position`, stamped now.
    pub fn at(position: Point) -> Self {
        Self::new(position, Modifiers::NONE, Instant::now())
    }
}

/// The active gesture.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Session {
    #[default]
    Idle,
    Panning {
        start_screen: Point,
        start_pan: Vec2,
    },
    Dragging {
        start_screen: Point,
        /// Top-left of every selected element at pointer-down.
        initial: Vec<(ElementId, Point)>,
    },
    Resizing {
        id: ElementId,
        handle: ResizeHandle,
        start_screen: Point,
        initial: ResizeOrigin,
        /// Locked width/height ratio, for images.
        aspect: Option<f64>,
    },
    Drawing {
        /// Stroke points in canvas coordinates.
        points: Vec<Point>,
    },
    Marquee {
        start: Point,
        current: Point,
    },
}

impl Session {
    pub fn name(&self) -> &'static str {
        match self {
            Session::Idle => "idle",
            Session::Panning { .. } => "pan",
            Session::Dragging { .. } => "drag",
            Session::Resizing { .. } => "resize",
            Session::Drawing { .. } => "draw",
            Session::Marquee { .. } => "marquee",
        }
    }
}

/// Observable effect of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionOutcome {
    None,
    SelectionChanged,
    Panned,
    Moved,
    Resized,
    /// A stroke point was recorded.
    Stroked,
    /// The marquee rectangle changed.
    MarqueeUpdated,
    /// A new element was created and selected.
    Created(ElementId),
    /// Text editing started on an element.
    EditingText(ElementId),
}

impl InteractionOutcome {
    /// Whether the element list changed.
    pub fn mutates_elements(&self) -> bool {
        matches!(
            self,
            InteractionOutcome::Moved | InteractionOutcome::Resized | InteractionOutcome::Created(_)
        )
    }
}

/// Tool selection plus the gesture in progress.
#[derive(Debug, Clone, Default)]
pub struct InteractionMachine {
    tool: ToolKind,
    session: Session,
    clicks: ClickTracker,
    editing_text: Option<ElementId>,
    guides: Vec<SnapGuide>,
}

impl InteractionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    /// Switch tools. A stroke in progress is dropped.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if matches!(self.session, Session::Drawing { .. }) {
            self.session = Session::Idle;
        }
        self.tool = tool;
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_active(&self) -> bool {
        self.session != Session::Idle
    }

    /// Whether a gesture other than marquee selection is running.
    pub fn is_manipulating(&self) -> bool {
        !matches!(self.session, Session::Idle | Session::Marquee { .. })
    }

    /// Marquee rectangle in canvas coordinates.
    pub fn marquee_rect(&self) -> Option<Rect> {
        match self.session {
            Session::Marquee { start, current } => Some(rect_from_points(start, current)),
            _ => None,
        }
    }

    /// Points of the stroke being drawn, in canvas coordinates.
    pub fn draft_path(&self) -> Option<&[Point]> {
        match &self.session {
            Session::Drawing { points } => Some(points),
            _ => None,
        }
    }

    /// Snap guides for the current drag.
    pub fn active_guides(&self) -> &[SnapGuide] {
        &self.guides
    }

    pub fn editing_text(&self) -> Option<ElementId> {
        self.editing_text
    }

    pub fn enter_text_editing(&mut self, id: ElementId) {
        self.editing_text = Some(id);
    }

    pub fn exit_text_editing(&mut self) {
        self.editing_text = None;
    }

    /// Classify what lies under a screen position.
    ///
    /// Handles are only offered for a single selected element that has a box.
    pub fn resolve_target(store: &ElementStore, viewport: &Viewport, screen: Point) -> PointerTarget {
        let point = viewport.screen_to_canvas(screen);
        if let Some(el) = store.selection().single().and_then(|id| store.get(id)) {
            if !el.is_connector() && el.width.is_some() && el.height.is_some() {
                let tolerance = HANDLE_HIT_TOLERANCE / viewport.scale;
                if let Some(handle) = hit_test_handles(el.rect(), point, tolerance) {
                    return PointerTarget::Handle(el.id, handle);
                }
            }
        }
        store
            .hit_test(point)
            .map_or(PointerTarget::Canvas, PointerTarget::Element)
    }

    /// Start a gesture.
    pub fn pointer_down(
        &mut self,
        store: &mut ElementStore,
        viewport: &Viewport,
        target: PointerTarget,
        input: PointerInput,
    ) -> InteractionOutcome {
        self.guides.clear();
        let screen = input.position;

        match self.tool {
            ToolKind::Hand => {
                self.session = Session::Panning {
                    start_screen: screen,
                    start_pan: viewport.pan,
                };
                InteractionOutcome::None
            }
            ToolKind::Draw => {
                self.session = Session::Drawing {
                    points: vec![viewport.screen_to_canvas(screen)],
                };
                InteractionOutcome::Stroked
            }
            ToolKind::Select => match target {
                PointerTarget::Canvas => self.press_canvas(store, viewport, input),
                PointerTarget::Element(id) => self.press_element(store, id, input),
                PointerTarget::Handle(id, handle) => {
                    if store.selection().single() == Some(id) {
                        self.press_handle(store, id, handle, screen)
                    } else {
                        self.press_element(store, id, input)
                    }
                }
            },
        }
    }

    fn press_canvas(
        &mut self,
        store: &mut ElementStore,
        viewport: &Viewport,
        input: PointerInput,
    ) -> InteractionOutcome {
        self.clicks.reset();
        self.editing_text = None;
        let had_selection = !store.selection().is_empty();
        if !input.modifiers.shift {
            store.clear_selection();
        }
        let start = viewport.screen_to_canvas(input.position);
        self.session = Session::Marquee { start, current: start };
        if had_selection && store.selection().is_empty() {
            InteractionOutcome::SelectionChanged
        } else {
            InteractionOutcome::MarqueeUpdated
        }
    }

    fn press_element(
        &mut self,
        store: &mut ElementStore,
        id: ElementId,
        input: PointerInput,
    ) -> InteractionOutcome {
        let Some(element) = store.get(id) else {
            log::debug!("Pointer down on missing element {id}");
            return InteractionOutcome::None;
        };

        if self.clicks.register(input.position, input.time)
            && matches!(element.kind, ElementKind::Text { .. })
        {
            store.select(id);
            self.editing_text = Some(id);
            self.session = Session::Idle;
            return InteractionOutcome::EditingText(id);
        }

        if self.editing_text.is_some_and(|editing| editing != id) {
            self.editing_text = None;
        }

        if input.modifiers.shift {
            store.toggle_selection(id);
        } else if !store.is_selected(id) {
            store.select(id);
        }

        let initial = store
            .selected()
            .into_iter()
            .map(|el| (el.id, Point::new(el.x, el.y)))
            .collect();
        self.session = Session::Dragging {
            start_screen: input.position,
            initial,
        };
        InteractionOutcome::SelectionChanged
    }

    fn press_handle(
        &mut self,
        store: &ElementStore,
        id: ElementId,
        handle: ResizeHandle,
        screen: Point,
    ) -> InteractionOutcome {
        let Some(element) = store.get(id) else {
            log::debug!("Resize started on missing element {id}");
            return InteractionOutcome::None;
        };
        let initial = ResizeOrigin {
            x: element.x,
            y: element.y,
            width: element.width_or_zero(),
            height: element.height_or_zero(),
        };
        let aspect = matches!(element.kind, ElementKind::Image { .. }).then(|| initial.aspect_ratio());
        self.session = Session::Resizing {
            id,
            handle,
            start_screen: screen,
            initial,
            aspect,
        };
        InteractionOutcome::None
    }

    /// Update the active gesture.
    pub fn pointer_move(
        &mut self,
        store: &mut ElementStore,
        viewport: &mut Viewport,
        config: &EditorConfig,
        input: PointerInput,
    ) -> InteractionOutcome {
        let screen = input.position;
        match &mut self.session {
            Session::Idle => InteractionOutcome::None,
            Session::Panning { start_screen, start_pan } => {
                viewport.set_pan(*start_pan + (screen - *start_screen));
                InteractionOutcome::Panned
            }
            Session::Dragging { start_screen, initial } => {
                let delta = viewport.screen_delta_to_canvas(screen - *start_screen);
                let guides = drag_elements(store, config, initial, delta);
                self.guides = guides;
                InteractionOutcome::Moved
            }
            Session::Resizing {
                id,
                handle,
                start_screen,
                initial,
                aspect,
            } => {
                if !store.contains(*id) {
                    log::debug!("Element {id} vanished during resize");
                    return InteractionOutcome::None;
                }
                let delta = viewport.screen_delta_to_canvas(screen - *start_screen);
                let r = compute_resize(*handle, *initial, delta, *aspect, config.min_element_size);
                match store.update(*id, &ElementPatch::geometry(r.x, r.y, r.width, r.height)) {
                    Ok(()) => InteractionOutcome::Resized,
                    Err(_) => InteractionOutcome::None,
                }
            }
            Session::Drawing { points } => {
                points.push(viewport.screen_to_canvas(screen));
                InteractionOutcome::Stroked
            }
            Session::Marquee { current, .. } => {
                *current = viewport.screen_to_canvas(screen);
                InteractionOutcome::MarqueeUpdated
            }
        }
    }

    /// Finish the active gesture.
    pub fn pointer_up(&mut self, store: &mut ElementStore) -> InteractionOutcome {
        self.guides.clear();
        match std::mem::take(&mut self.session) {
            Session::Drawing { points } => match path_from_stroke(&points) {
                Some(path) => {
                    let id = path.id;
                    match store.add(path) {
                        Ok(()) => {
                            store.select(id);
                            log::debug!("Created path {id} from {} points", points.len());
                            InteractionOutcome::Created(id)
                        }
                        Err(e) => {
                            log::warn!("Failed to add path: {e}");
                            InteractionOutcome::None
                        }
                    }
                }
                None => InteractionOutcome::None,
            },
            Session::Marquee { start, current } => {
                let ids = store.ids_in_rect(rect_from_points(start, current));
                store.set_selection(ids);
                InteractionOutcome::SelectionChanged
            }
            _ => InteractionOutcome::None,
        }
    }

    /// Abort the active gesture, restoring whatever it changed.
    pub fn cancel(&mut self, store: &mut ElementStore, viewport: &mut Viewport) {
        self.guides.clear();
        match std::mem::take(&mut self.session) {
            Session::Panning { start_pan, .. } => viewport.set_pan(start_pan),
            Session::Dragging { initial, .. } => {
                for (id, p) in initial {
                    if let Some(el) = store.get_mut(id) {
                        el.x = p.x;
                        el.y = p.y;
                    }
                }
            }
            Session::Resizing { id, initial, .. } => {
                if let Some(el) = store.get_mut(id) {
                    el.x = initial.x;
                    el.y = initial.y;
                    el.width = el.width.map(|_| initial.width);
                    el.height = el.height.map(|_| initial.height);
                }
            }
            Session::Idle | Session::Drawing { .. } | Session::Marquee { .. } => {}
        }
    }
}

/// Move every dragged element to its snapshot plus `delta`.
///
/// A single dragged element snaps to its neighbours when enabled; the
/// resulting guides are returned. Grid snapping moves the group by one
/// shared offset, taken from the first element, so relative positions hold.
fn drag_elements(
    store: &mut ElementStore,
    config: &EditorConfig,
    initial: &[(ElementId, Point)],
    delta: Vec2,
) -> Vec<SnapGuide> {
    if let [(id, origin)] = initial
        && config.snap_to_elements
    {
        let target = *origin + delta;
        if let Some(el) = store.get(*id) {
            let mut candidate = el.clone();
            candidate.x = target.x;
            candidate.y = target.y;
            let result = compute_snap_guides(&candidate, store.all(), config.snap_threshold);
            if !result.guides.is_empty() {
                move_to(store, *id, result.point);
                return result.guides;
            }
        }
    }

    let delta = match initial.first() {
        Some((_, origin)) if config.snap_to_grid => {
            let target = *origin + delta;
            let snapped = Point::new(
                snap_to_grid(target.x, config.grid_size),
                snap_to_grid(target.y, config.grid_size),
            );
            snapped - *origin
        }
        _ => delta,
    };
    for (id, origin) in initial {
        move_to(store, *id, *origin + delta);
    }
    Vec::new()
}

fn move_to(store: &mut ElementStore, id: ElementId, p: Point) {
    if store.update(id, &ElementPatch::position(p.x, p.y)).is_err() {
        log::debug!("Skipping move of missing element {id}");
    }
}

/// Build a path element from a stroke, or `None` for fewer than two points.
///
/// Points are stored relative to the stroke's bounding box; extents are
/// floored at 1 so a straight stroke still has a box.
pub fn path_from_stroke(points: &[Point]) -> Option<Element> {
    if points.len() < 2 {
        return None;
    }
    let (min_x, min_y, max_x, max_y) = points.iter().fold(
        (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        |(x0, y0, x1, y1), p| (x0.min(p.x), y0.min(p.y), x1.max(p.x), y1.max(p.y)),
    );
    let relative = points
        .iter()
        .map(|p| Point::new(p.x - min_x, p.y - min_y))
        .collect();
    Some(Element::path(
        relative,
        min_x,
        min_y,
        (max_x - min_x).max(1.0),
        (max_y - min_y).max(1.0),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementColor, ShapeType};
    use std::time::Duration;

    struct Fixture {
        store: ElementStore,
        viewport: Viewport,
        config: EditorConfig,
        machine: InteractionMachine,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                store: ElementStore::new(),
                viewport: Viewport::new(),
                config: EditorConfig::default(),
                machine: InteractionMachine::new(),
            }
        }

        fn add(&mut self, el: Element) -> ElementId {
            let id = el.id;
            self.store.add(el).unwrap();
            id
        }

        fn down(&mut self, target: PointerTarget, screen: Point, modifiers: Modifiers) -> InteractionOutcome {
            let input = PointerInput::new(screen, modifiers, Instant::now());
            self.machine.pointer_down(&mut self.store, &self.viewport, target, input)
        }

        fn move_to(&mut self, screen: Point) -> InteractionOutcome {
            self.machine
                .pointer_move(&mut self.store, &mut self.viewport, &self.config, PointerInput::at(screen))
        }

        fn up(&mut self) -> InteractionOutcome {
            self.machine.pointer_up(&mut self.store)
        }

        fn pos(&self, id: ElementId) -> Point {
            let el = self.store.get(id).unwrap();
            Point::new(el.x, el.y)
        }
    }

    fn square(x: f64, y: f64) -> Element {
        Element::shape(ShapeType::Square, x, y, 50.0, 50.0)
    }

    #[test]
    fn test_group_drag_moves_by_scaled_delta() {
        let mut f = Fixture::new();
        f.viewport.set_scale(2.0);
        let a = f.add(square(0.0, 0.0));
        let b = f.add(square(100.0, 40.0));
        f.store.set_selection([a, b]);

        f.down(PointerTarget::Element(a), Point::new(10.0, 10.0), Modifiers::NONE);
        f.move_to(Point::new(20.0, 30.0));
        f.move_to(Point::new(40.0, 50.0));
        assert_eq!(f.up(), InteractionOutcome::None);

        assert_eq!(f.pos(a), Point::new(15.0, 20.0));
        assert_eq!(f.pos(b), Point::new(115.0, 60.0));
        assert_eq!(f.store.selection().len(), 2);
    }

    #[test]
    fn test_press_unselected_element_selects_only_it() {
        let mut f = Fixture::new();
        let a = f.add(square(0.0, 0.0));
        let b = f.add(square(100.0, 0.0));
        f.store.set_selection([a]);
        f.down(PointerTarget::Element(b), Point::new(110.0, 60.0), Modifiers::NONE);
        assert_eq!(f.store.selection().ids(), &[b]);
    }

    #[test]
    fn test_shift_press_toggles() {
        let mut f = Fixture::new();
        let a = f.add(square(0.0, 0.0));
        let b = f.add(square(100.0, 0.0));
        f.store.set_selection([a]);
        f.down(PointerTarget::Element(b), Point::new(110.0, 60.0), Modifiers::SHIFT);
        f.up();
        assert_eq!(f.store.selection().ids(), &[a, b]);
        f.down(PointerTarget::Element(a), Point::new(400.0, 400.0), Modifiers::SHIFT);
        f.up();
        assert_eq!(f.store.selection().ids(), &[b]);
    }

    #[test]
    fn test_draw_creates_relative_path() {
        let mut f = Fixture::new();
        f.machine.set_tool(ToolKind::Draw);
        let header = f.viewport.header_height;
        f.down(PointerTarget::Canvas, Point::new(100.0, 100.0 + header), Modifiers::NONE);
        f.move_to(Point::new(150.0, 120.0 + header));
        f.move_to(Point::new(130.0, 180.0 + header));
        let InteractionOutcome::Created(id) = f.up() else {
            panic!("expected a path");
        };

        let el = f.store.get(id).unwrap();
        assert_eq!(Point::new(el.x, el.y), Point::new(100.0, 100.0));
        assert_eq!(el.width, Some(50.0));
        assert_eq!(el.height, Some(80.0));
        assert_eq!(el.color(), Some(ElementColor::BLACK));
        assert_eq!(el.stroke_width(), Some(3.0));
        let ElementKind::Path { points, .. } = &el.kind else {
            panic!("expected path kind");
        };
        assert_eq!(
            points,
            &vec![Point::new(0.0, 0.0), Point::new(50.0, 20.0), Point::new(30.0, 80.0)]
        );
        assert_eq!(f.store.selection().ids(), &[id]);
    }

    #[test]
    fn test_single_point_stroke_creates_nothing() {
        let mut f = Fixture::new();
        f.machine.set_tool(ToolKind::Draw);
        f.down(PointerTarget::Canvas, Point::new(10.0, 10.0), Modifiers::NONE);
        assert_eq!(f.up(), InteractionOutcome::None);
        assert!(f.store.is_empty());
    }

    #[test]
    fn test_straight_stroke_has_unit_extent() {
        let path = path_from_stroke(&[Point::new(0.0, 5.0), Point::new(10.0, 5.0)]).unwrap();
        assert_eq!(path.height, Some(1.0));
        assert_eq!(path.width, Some(10.0));
    }

    #[test]
    fn test_marquee_selects_intersecting() {
        let mut f = Fixture::new();
        let inside = f.add(square(50.0, 50.0));
        let _outside = f.add(square(500.0, 500.0));
        let stale = f.add(square(900.0, 900.0));
        f.store.set_selection([stale]);
        let header = f.viewport.header_height;

        f.down(PointerTarget::Canvas, Point::new(0.0, header), Modifiers::NONE);
        assert!(f.store.selection().is_empty());
        f.move_to(Point::new(100.0, 100.0 + header));
        assert_eq!(f.machine.marquee_rect(), Some(Rect::new(0.0, 0.0, 100.0, 100.0)));
        assert_eq!(f.up(), InteractionOutcome::SelectionChanged);
        assert_eq!(f.store.selection().ids(), &[inside]);
    }

    #[test]
    fn test_marquee_replaces_even_with_shift() {
        let mut f = Fixture::new();
        let a = f.add(square(0.0, 0.0));
        let b = f.add(square(300.0, 300.0));
        f.store.set_selection([a]);
        let header = f.viewport.header_height;
        f.down(PointerTarget::Canvas, Point::new(290.0, 290.0 + header), Modifiers::SHIFT);
        assert_eq!(f.store.selection().ids(), &[a]);
        f.move_to(Point::new(320.0, 320.0 + header));
        f.up();
        assert_eq!(f.store.selection().ids(), &[b]);
    }

    #[test]
    fn test_missing_element_mid_drag() {
        let mut f = Fixture::new();
        let a = f.add(square(0.0, 0.0));
        let b = f.add(square(100.0, 0.0));
        f.store.set_selection([a, b]);
        f.down(PointerTarget::Element(a), Point::ZERO, Modifiers::NONE);
        f.store.remove(b);
        f.move_to(Point::new(10.0, 10.0));
        f.up();
        assert_eq!(f.pos(a), Point::new(10.0, 10.0));
        assert!(!f.store.contains(b));
    }

    #[test]
    fn test_missing_element_mid_resize() {
        let mut f = Fixture::new();
        let a = f.add(square(0.0, 0.0));
        f.store.select(a);
        f.down(PointerTarget::Handle(a, ResizeHandle::SE), Point::ZERO, Modifiers::NONE);
        f.store.remove(a);
        assert_eq!(f.move_to(Point::new(10.0, 10.0)), InteractionOutcome::None);
        assert_eq!(f.up(), InteractionOutcome::None);
    }

    #[test]
    fn test_resize_image_keeps_aspect() {
        let mut f = Fixture::new();
        let img = f.add(Element::image("data:image/png;base64,", 0.0, 0.0, 100.0, 50.0));
        f.store.select(img);
        f.down(PointerTarget::Handle(img, ResizeHandle::E), Point::new(100.0, 80.0), Modifiers::NONE);
        assert_eq!(f.move_to(Point::new(140.0, 80.0)), InteractionOutcome::Resized);
        let el = f.store.get(img).unwrap();
        assert_eq!(el.width, Some(140.0));
        assert_eq!(el.height, Some(70.0));
    }

    #[test]
    fn test_resize_shape_is_free() {
        let mut f = Fixture::new();
        let s = f.add(Element::shape(ShapeType::Circle, 0.0, 0.0, 100.0, 50.0));
        f.store.select(s);
        f.down(PointerTarget::Handle(s, ResizeHandle::E), Point::new(100.0, 80.0), Modifiers::NONE);
        f.move_to(Point::new(140.0, 80.0));
        let el = f.store.get(s).unwrap();
        assert_eq!(el.width, Some(140.0));
        assert_eq!(el.height, Some(50.0));
    }

    #[test]
    fn test_handle_of_unselected_element_drags() {
        let mut f = Fixture::new();
        let a = f.add(square(0.0, 0.0));
        let b = f.add(square(100.0, 0.0));
        f.store.set_selection([a, b]);
        f.down(PointerTarget::Handle(a, ResizeHandle::SE), Point::ZERO, Modifiers::NONE);
        assert!(matches!(f.machine.session(), Session::Dragging { .. }));
    }

    #[test]
    fn test_cancel_restores_positions() {
        let mut f = Fixture::new();
        let a = f.add(square(10.0, 20.0));
        f.down(PointerTarget::Element(a), Point::ZERO, Modifiers::NONE);
        f.move_to(Point::new(300.0, 300.0));
        f.machine.cancel(&mut f.store, &mut f.viewport);
        assert_eq!(f.pos(a), Point::new(10.0, 20.0));
        assert!(!f.machine.is_active());
    }

    #[test]
    fn test_hand_tool_pans_by_screen_delta() {
        let mut f = Fixture::new();
        f.viewport.set_scale(2.0);
        let a = f.add(square(0.0, 0.0));
        f.machine.set_tool(ToolKind::Hand);
        f.down(PointerTarget::Element(a), Point::new(10.0, 10.0), Modifiers::NONE);
        assert_eq!(f.move_to(Point::new(40.0, 30.0)), InteractionOutcome::Panned);
        f.up();
        assert_eq!(f.viewport.pan, Vec2::new(30.0, 20.0));
        assert_eq!(f.pos(a), Point::ZERO);
    }

    #[test]
    fn test_double_click_text_enters_editing() {
        let mut f = Fixture::new();
        let t = f.add(Element::text("hello", 10.0, 10.0));
        let t0 = Instant::now();
        let p = Point::new(10.0, 66.0);
        f.machine
            .pointer_down(&mut f.store, &f.viewport, PointerTarget::Element(t), PointerInput::new(p, Modifiers::NONE, t0));
        f.up();
        let outcome = f.machine.pointer_down(
            &mut f.store,
            &f.viewport,
            PointerTarget::Element(t),
            PointerInput::new(p, Modifiers::NONE, t0 + Duration::from_millis(120)),
        );
        assert_eq!(outcome, InteractionOutcome::EditingText(t));
        assert_eq!(f.machine.editing_text(), Some(t));

        // Clicking empty canvas leaves editing
        f.down(PointerTarget::Canvas, Point::new(500.0, 500.0), Modifiers::NONE);
        assert_eq!(f.machine.editing_text(), None);
    }

    #[test]
    fn test_drag_snaps_single_element() {
        let mut f = Fixture::new();
        f.config.snap_to_elements = true;
        let anchor = f.add(square(100.0, 300.0));
        let moving = f.add(square(0.0, 0.0));
        f.down(PointerTarget::Element(moving), Point::ZERO, Modifiers::NONE);
        f.move_to(Point::new(97.0, 0.0));
        assert_eq!(f.pos(moving), Point::new(100.0, 0.0));
        assert!(!f.machine.active_guides().is_empty());
        f.up();
        assert!(f.machine.active_guides().is_empty());
        assert_eq!(f.pos(anchor), Point::new(100.0, 300.0));
    }

    #[test]
    fn test_drag_snaps_to_grid() {
        let mut f = Fixture::new();
        f.config.snap_to_grid = true;
        let a = f.add(square(0.0, 0.0));
        let b = f.add(square(200.0, 5.0));
        f.store.set_selection([a, b]);
        f.down(PointerTarget::Element(a), Point::ZERO, Modifiers::NONE);
        f.move_to(Point::new(27.0, 12.0));
        // Offset comes from the first element, so b keeps its 5 px shift
        assert_eq!(f.pos(a), Point::new(20.0, 20.0));
        assert_eq!(f.pos(b), Point::new(220.0, 25.0));
        assert!(f.machine.active_guides().is_empty());
    }

    #[test]
    fn test_element_snap_wins_over_grid() {
        let mut f = Fixture::new();
        f.config.snap_to_elements = true;
        f.config.snap_to_grid = true;
        f.add(square(103.0, 300.0));
        let moving = f.add(square(0.0, 0.0));
        f.down(PointerTarget::Element(moving), Point::ZERO, Modifiers::NONE);
        f.move_to(Point::new(101.0, 0.0));
        assert_eq!(f.pos(moving), Point::new(103.0, 0.0));

        // Out of element range the grid applies
        f.move_to(Point::new(47.0, 0.0));
        assert_eq!(f.pos(moving), Point::new(40.0, 0.0));
    }

    #[test]
    fn test_resolve_target() {
        let mut f = Fixture::new();
        let a = f.add(square(0.0, 0.0));
        let header = f.viewport.header_height;
        assert_eq!(
            InteractionMachine::resolve_target(&f.store, &f.viewport, Point::new(25.0, 25.0 + header)),
            PointerTarget::Element(a)
        );
        f.store.select(a);
        assert_eq!(
            InteractionMachine::resolve_target(&f.store, &f.viewport, Point::new(50.0, 50.0 + header)),
            PointerTarget::Handle(a, ResizeHandle::SE)
        );
        assert_eq!(
            InteractionMachine::resolve_target(&f.store, &f.viewport, Point::new(300.0, 300.0)),
            PointerTarget::Canvas
        );
    }
}
