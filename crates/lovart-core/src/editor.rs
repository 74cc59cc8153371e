//! Editor facade tying the store, viewport, gestures, history and clipboard
//! together.
//!
//! Every content mutation goes through here so that it lands in history.
//! Continuous changes (gesture moves, nudges, property edits) are recorded
//! with the history debounce; discrete operations commit their own entry.
//! Selection, viewport and tool changes are never recorded.

use crate::arrange::{self, Alignment, Axis};
use crate::clipboard::{ClipboardEngine, MemoryClipboard, PlatformClipboard};
use crate::command::Command;
use crate::config::EditorConfig;
use crate::element::{
    ConnectorStyle, DEFAULT_TEXT, Element, ElementColor, ElementId, ElementKind, ElementPatch,
    GeneratedContent, ShapeType,
};
use crate::error::{EditorError, EditorResult};
use crate::history::History;
use crate::input::is_delete_key;
use crate::interaction::{InteractionMachine, InteractionOutcome, PointerInput, PointerTarget, Session};
use crate::resolver::{self, ContextUi, ElementUiState};
use crate::snap::SnapGuide;
use crate::store::ElementStore;
use crate::tools::{CursorHint, ToolKind};
use crate::viewport::Viewport;
use kurbo::{Point, Rect, Vec2};
use uuid::Uuid;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Per-element offset applied to successive inserts.
const CASCADE_STEP: f64 = 20.0;
/// Size used for flow generators and generated media without a size.
const DEFAULT_MEDIA_SIZE: f64 = 400.0;
/// Canvas origin of appended generation results, before panning.
const GENERATED_ORIGIN: f64 = 300.0;
const CONNECTOR_STROKE_WIDTH: f64 = 2.0;

const ACTION_MOVE: &str = "Move elements";
const ACTION_RESIZE: &str = "Resize element";
const ACTION_DRAW: &str = "Draw path";
const ACTION_CANCEL: &str = "Cancel gesture";
const ACTION_ADD: &str = "Add element";
const ACTION_UPDATE: &str = "Update element";
const ACTION_DELETE: &str = "Delete elements";
const ACTION_CUT: &str = "Cut";
const ACTION_PASTE: &str = "Paste";
const ACTION_DUPLICATE: &str = "Duplicate";
const ACTION_PASTE_STYLE: &str = "Paste style";
const ACTION_GENERATE: &str = "Generated content";
const ACTION_CONNECT_FLOW: &str = "Connect flow";
const ACTION_REORDER: &str = "Reorder layers";
const ACTION_ARRANGE: &str = "Arrange";
const ACTION_NUDGE: &str = "Nudge";

fn gesture_label(session: &Session) -> &'static str {
    match session {
        Session::Resizing { .. } => ACTION_RESIZE,
        Session::Drawing { .. } => ACTION_DRAW,
        _ => ACTION_MOVE,
    }
}

/// The canvas editor.
#[derive(Debug)]
pub struct Editor {
    config: EditorConfig,
    store: ElementStore,
    viewport: Viewport,
    interaction: InteractionMachine,
    history: History<Vec<Element>>,
    clipboard: ClipboardEngine,
    /// A host text field has keyboard focus.
    text_input_focused: bool,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// Create an editor with an in-process clipboard.
    pub fn new(config: EditorConfig) -> Self {
        Self::with_clipboard(config, Box::new(MemoryClipboard::new()))
    }

    /// Create an editor backed by a platform clipboard.
    pub fn with_clipboard(config: EditorConfig, platform: Box<dyn PlatformClipboard>) -> Self {
        let config = config.validated();
        Self {
            viewport: Viewport::with_limits(config.header_height, config.min_scale, config.max_scale),
            history: History::new(Vec::new(), config.history_max_len, config.history_debounce()),
            clipboard: ClipboardEngine::new(platform, config.paste_offset),
            store: ElementStore::new(),
            interaction: InteractionMachine::new(),
            text_input_focused: false,
            config,
        }
    }

    // --- State access ---

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Viewport changes are not part of history.
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn history(&self) -> &History<Vec<Element>> {
        &self.history
    }

    pub fn interaction(&self) -> &InteractionMachine {
        &self.interaction
    }

    pub fn clipboard(&self) -> &ClipboardEngine {
        &self.clipboard
    }

    pub fn clipboard_mut(&mut self) -> &mut ClipboardEngine {
        &mut self.clipboard
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.store.all()
    }

    pub fn selected_ids(&self) -> &[ElementId] {
        self.store.selection().ids()
    }

    pub fn tool(&self) -> ToolKind {
        self.interaction.tool()
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.interaction.set_tool(tool);
    }

    pub fn cursor(&self) -> CursorHint {
        self.interaction.tool().cursor()
    }

    /// Tell the editor whether a host text field has focus. Delete keys are
    /// ignored while it does.
    pub fn set_text_input_focused(&mut self, focused: bool) {
        self.text_input_focused = focused;
    }

    // --- Selection ---

    pub fn select(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        self.store.set_selection(ids);
    }

    pub fn select_all(&mut self) {
        self.store.select_all();
    }

    pub fn clear_selection(&mut self) {
        self.store.clear_selection();
    }

    fn selected_elements(&self) -> Vec<Element> {
        self.store.selected().into_iter().cloned().collect()
    }

    // --- History ---

    /// Record the element list, coalescing with nearby changes.
    fn record_at(&mut self, action: &str, now: Instant) {
        self.history.set_at(self.store.to_vec(), action, now);
    }

    /// Record the element list as an entry of its own.
    fn commit(&mut self, action: &str) {
        self.history.flush();
        self.history.set(self.store.to_vec(), action);
        self.history.flush();
    }

    /// Commit debounced history whose deadline has passed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.history.tick(now)
    }

    pub fn flush_history(&mut self) -> bool {
        self.history.flush()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        self.cancel_gesture();
        let Some(state) = self.history.undo().cloned() else {
            return false;
        };
        self.restore(state);
        true
    }

    pub fn redo(&mut self) -> bool {
        self.cancel_gesture();
        let Some(state) = self.history.redo().cloned() else {
            return false;
        };
        self.restore(state);
        true
    }

    fn restore(&mut self, elements: Vec<Element>) {
        self.store.replace_all(elements);
        self.prune_transient();
    }

    /// Drop transient state that points at elements which no longer exist.
    fn prune_transient(&mut self) {
        if let Some(id) = self.interaction.editing_text()
            && !self.store.contains(id)
        {
            self.interaction.exit_text_editing();
        }
    }

    // --- Pointer and keyboard ---

    /// Pointer down, resolving the target by hit testing.
    pub fn pointer_down(&mut self, input: PointerInput) -> InteractionOutcome {
        let target = InteractionMachine::resolve_target(&self.store, &self.viewport, input.position);
        self.pointer_down_on(target, input)
    }

    /// Pointer down on a target the host already resolved.
    pub fn pointer_down_on(&mut self, target: PointerTarget, input: PointerInput) -> InteractionOutcome {
        self.interaction
            .pointer_down(&mut self.store, &self.viewport, target, input)
    }

    pub fn pointer_move(&mut self, input: PointerInput) -> InteractionOutcome {
        let outcome =
            self.interaction
                .pointer_move(&mut self.store, &mut self.viewport, &self.config, input);
        if outcome.mutates_elements() {
            let label = gesture_label(self.interaction.session());
            self.record_at(label, input.time);
        }
        outcome
    }

    /// Finish the gesture. The whole gesture lands in history as one entry.
    pub fn pointer_up(&mut self) -> InteractionOutcome {
        let outcome = self.interaction.pointer_up(&mut self.store);
        if let InteractionOutcome::Created(_) = outcome {
            self.history.set(self.store.to_vec(), ACTION_DRAW);
        }
        self.history.flush();
        outcome
    }

    /// Abort the active gesture and restore what it changed.
    pub fn cancel_gesture(&mut self) -> bool {
        if !self.interaction.is_active() {
            return false;
        }
        self.interaction.cancel(&mut self.store, &mut self.viewport);
        self.history.set(self.store.to_vec(), ACTION_CANCEL);
        self.history.flush();
        true
    }

    /// Interpret a key press. Only the delete keys are handled here; they
    /// are ignored while text is being edited.
    pub fn handle_key(&mut self, key: &str) -> bool {
        if !is_delete_key(key) || self.text_input_focused || self.interaction.editing_text().is_some() {
            return false;
        }
        !self.delete_selected().is_empty()
    }

    // --- Element hooks ---

    /// Append an element without selecting it.
    pub fn add_element(&mut self, element: Element) -> EditorResult<ElementId> {
        let id = element.id;
        self.store.add(element)?;
        self.commit(ACTION_ADD);
        Ok(id)
    }

    /// Patch an element. Rapid edits coalesce in history.
    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> EditorResult<()> {
        self.store.update(id, patch)?;
        self.record_at(ACTION_UPDATE, Instant::now());
        Ok(())
    }

    /// Remove elements by id. Unknown ids are skipped.
    pub fn delete_elements(&mut self, ids: &[ElementId]) -> Vec<ElementId> {
        let removed = self.store.remove_many(ids);
        self.finish_delete(removed)
    }

    pub fn delete_selected(&mut self) -> Vec<ElementId> {
        let removed = self.store.remove_selected();
        self.finish_delete(removed)
    }

    fn finish_delete(&mut self, removed: Vec<Element>) -> Vec<ElementId> {
        if !removed.is_empty() {
            self.prune_transient();
            self.commit(ACTION_DELETE);
        }
        removed.into_iter().map(|el| el.id).collect()
    }

    // --- Insert actions ---

    /// Top-left for the next insert: `base` shifted against the pan and
    /// cascaded by the element count.
    fn cascade_origin(&self, base: f64) -> (f64, f64) {
        let step = self.store.len() as f64 * CASCADE_STEP;
        (base - self.viewport.pan.x + step, base - self.viewport.pan.y + step)
    }

    fn insert(&mut self, element: Element) -> EditorResult<ElementId> {
        let id = element.id;
        let kind = element.element_type();
        self.store.add(element)?;
        self.store.select(id);
        self.interaction.set_tool(ToolKind::Select);
        self.commit(&format!("Add {kind}"));
        Ok(id)
    }

    pub fn insert_image(&mut self, content: impl Into<String>) -> EditorResult<ElementId> {
        let (x, y) = self.cascade_origin(100.0);
        self.insert(Element::image(content, x, y, 300.0, 200.0))
    }

    pub fn insert_video(&mut self, content: impl Into<String>) -> EditorResult<ElementId> {
        let (x, y) = self.cascade_origin(100.0);
        self.insert(Element::video(content, x, y, 400.0, 300.0))
    }

    pub fn insert_text(&mut self) -> EditorResult<ElementId> {
        let (x, y) = self.cascade_origin(200.0);
        self.insert(Element::text(DEFAULT_TEXT, x, y))
    }

    pub fn insert_shape(&mut self, shape_type: ShapeType) -> EditorResult<ElementId> {
        let (x, y) = self.cascade_origin(300.0);
        self.insert(Element::shape(shape_type, x, y, 150.0, 150.0))
    }

    pub fn insert_image_generator(&mut self) -> EditorResult<ElementId> {
        let (x, y) = self.cascade_origin(300.0);
        self.insert(Element::image_generator(x, y, DEFAULT_MEDIA_SIZE, DEFAULT_MEDIA_SIZE))
    }

    // --- Text editing ---

    pub fn editing_text(&self) -> Option<ElementId> {
        self.interaction.editing_text()
    }

    /// Start editing a text element. Returns false for other element types.
    pub fn start_text_editing(&mut self, id: ElementId) -> bool {
        match self.store.get(id) {
            Some(el) if matches!(el.kind, ElementKind::Text { .. }) => {
                self.store.select(id);
                self.interaction.enter_text_editing(id);
                true
            }
            _ => false,
        }
    }

    pub fn set_text_content(&mut self, id: ElementId, content: impl Into<String>) -> EditorResult<()> {
        let patch = ElementPatch {
            content: Some(content.into()),
            ..ElementPatch::default()
        };
        self.update_element(id, &patch)
    }

    /// Leave text editing. A text element left blank is deleted.
    pub fn finish_text_editing(&mut self) -> bool {
        let Some(id) = self.interaction.editing_text() else {
            return false;
        };
        self.interaction.exit_text_editing();
        let blank = self
            .store
            .get(id)
            .is_some_and(|el| matches!(&el.kind, ElementKind::Text { content, .. } if content.trim().is_empty()));
        if blank {
            self.delete_elements(&[id]);
        } else {
            self.history.flush();
        }
        true
    }

    // --- Clipboard ---

    pub fn copy(&mut self) -> bool {
        let selected = self.selected_elements();
        self.clipboard.copy(selected)
    }

    pub fn cut(&mut self) -> Vec<ElementId> {
        let selected = self.selected_elements();
        let ids = self.clipboard.cut(selected);
        if ids.is_empty() {
            return ids;
        }
        self.store.remove_many(&ids);
        self.prune_transient();
        self.commit(ACTION_CUT);
        ids
    }

    fn insert_batch(&mut self, batch: Vec<Element>, action: &str) -> Vec<ElementId> {
        if batch.is_empty() {
            return Vec::new();
        }
        let ids: Vec<ElementId> = batch.iter().map(|el| el.id).collect();
        if let Err(e) = self.store.add_many(batch) {
            log::warn!("Failed to insert batch: {e}");
            return Vec::new();
        }
        self.store.set_selection(ids.iter().copied());
        self.commit(action);
        ids
    }

    /// Paste the clipboard payload and select it.
    pub fn paste(&mut self) -> Vec<ElementId> {
        let batch = self.clipboard.paste();
        self.insert_batch(batch, ACTION_PASTE)
    }

    /// Insert offset copies of the selection without touching the clipboard.
    pub fn duplicate(&mut self) -> Vec<ElementId> {
        let batch = self.clipboard.duplicate(&self.selected_elements());
        self.insert_batch(batch, ACTION_DUPLICATE)
    }

    /// Paste an image from the platform clipboard.
    pub fn paste_image(&mut self) -> Option<ElementId> {
        let image = self.clipboard.paste_image()?;
        self.insert_batch(vec![image], ACTION_PASTE).first().copied()
    }

    /// Copy the style of the first selected element.
    pub fn copy_style(&mut self) -> bool {
        let Some(source) = self.store.selected().first().map(|el| (*el).clone()) else {
            return false;
        };
        self.clipboard.copy_style(&source);
        true
    }

    pub fn paste_style(&mut self) -> bool {
        let patches = self.clipboard.paste_style(self.store.selected());
        let mut changed = false;
        for (id, patch) in &patches {
            let before = self.store.get(*id).cloned();
            if let Err(e) = self.store.update(*id, patch) {
                log::debug!("Skipping style for {id}: {e}");
                continue;
            }
            changed |= self.store.get(*id) != before.as_ref();
        }
        if changed {
            self.commit(ACTION_PASTE_STYLE);
        }
        changed
    }

    // --- Generation flow ---

    /// Place a generation result.
    ///
    /// With a live `target`, the target's content is replaced in place and
    /// its position, size and links are kept. Otherwise the result is
    /// appended near the view origin and selected.
    pub fn accept_generated_content(
        &mut self,
        target: Option<ElementId>,
        content: GeneratedContent,
    ) -> EditorResult<ElementId> {
        if let Some(id) = target {
            if let Some(el) = self.store.get_mut(id) {
                el.kind = content.into_kind();
                self.commit(ACTION_GENERATE);
                return Ok(id);
            }
            log::warn!("Generation target {id} is gone, appending result instead");
        }

        let x = GENERATED_ORIGIN - self.viewport.pan.x;
        let y = GENERATED_ORIGIN - self.viewport.pan.y;
        let element = match content {
            GeneratedContent::Image(content) => {
                Element::image(content, x, y, DEFAULT_MEDIA_SIZE, DEFAULT_MEDIA_SIZE)
            }
            GeneratedContent::Video(content) => {
                Element::video(content, x, y, DEFAULT_MEDIA_SIZE, DEFAULT_MEDIA_SIZE)
            }
            GeneratedContent::Text(content) => Element::text(content, x, y),
        };
        let id = element.id;
        self.store.add(element)?;
        self.store.select(id);
        self.commit(ACTION_GENERATE);
        Ok(id)
    }

    /// Attach a generator to the right of `source_id`, joined by a dashed
    /// connector. The three elements share a fresh group and link to each
    /// other. Returns the generator id.
    pub fn connect_flow(&mut self, source_id: ElementId) -> EditorResult<ElementId> {
        let source = self
            .store
            .get(source_id)
            .ok_or(EditorError::ElementNotFound(source_id))?;
        if source.content().is_none_or(str::is_empty) {
            return Err(EditorError::InvalidPayload(format!(
                "element {source_id} has no content to connect"
            )));
        }

        let width = source.width.unwrap_or(DEFAULT_MEDIA_SIZE);
        let height = source.height.unwrap_or(DEFAULT_MEDIA_SIZE);
        let x = source.x + width + self.config.flow_spacing;
        let y = source.y;
        let group_id = Uuid::new_v4();

        let mut generator = Element::image_generator(x, y, width, height);
        let mut connector = Element::connector(source_id, generator.id, ConnectorStyle::Dashed);
        let (generator_id, connector_id) = (generator.id, connector.id);

        connector.apply_patch(&ElementPatch {
            color: Some(ElementColor::CONNECTOR_GRAY),
            stroke_width: Some(CONNECTOR_STROKE_WIDTH),
            group_id: Some(group_id),
            ..ElementPatch::default()
        });
        generator.apply_patch(&ElementPatch {
            reference_image_id: Some(source_id),
            group_id: Some(group_id),
            linked_elements: Some(vec![source_id, connector_id]),
            ..ElementPatch::default()
        });

        self.store.add_many(vec![connector, generator])?;
        self.store.update(
            source_id,
            &ElementPatch {
                group_id: Some(group_id),
                linked_elements: Some(vec![connector_id, generator_id]),
                ..ElementPatch::default()
            },
        )?;
        self.store.select(generator_id);
        self.interaction.set_tool(ToolKind::Select);
        self.commit(ACTION_CONNECT_FLOW);
        Ok(generator_id)
    }

    // --- Viewport ---

    pub fn zoom_in(&mut self) -> bool {
        self.zoom_by(self.config.zoom_step)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.zoom_by(-self.config.zoom_step)
    }

    fn zoom_by(&mut self, step: f64) -> bool {
        let before = self.viewport.scale;
        self.viewport.zoom_by(step);
        self.viewport.scale != before
    }

    // --- Arrange ---

    fn reorder_selection(
        &mut self,
        op: fn(&mut ElementStore, ElementId) -> bool,
        topmost_first: bool,
    ) -> bool {
        let mut ids: Vec<ElementId> = self
            .store
            .ids()
            .iter()
            .copied()
            .filter(|id| self.store.is_selected(*id))
            .collect();
        if topmost_first {
            ids.reverse();
        }
        let mut changed = false;
        for id in ids {
            changed |= op(&mut self.store, id);
        }
        if changed {
            self.commit(ACTION_REORDER);
        }
        changed
    }

    fn arrange(&mut self, op: impl FnOnce(&mut ElementStore) -> bool) -> bool {
        let changed = op(&mut self.store);
        if changed {
            self.commit(ACTION_ARRANGE);
        }
        changed
    }

    /// Move the selection by `step` canvas units along a direction.
    pub fn nudge(&mut self, direction: Vec2, step: f64) -> bool {
        let changed = arrange::nudge(&mut self.store, direction * step);
        if changed {
            self.record_at(ACTION_NUDGE, Instant::now());
        }
        changed
    }

    fn escape(&mut self) -> bool {
        if self.cancel_gesture() {
            true
        } else if self.finish_text_editing() {
            true
        } else if !self.store.selection().is_empty() {
            self.store.clear_selection();
            true
        } else {
            false
        }
    }

    /// Run a named command. Returns true if anything changed.
    pub fn execute(&mut self, command: Command) -> bool {
        log::debug!("Executing command {command}");
        let step = self.config.nudge_step;
        let fast = self.config.nudge_step_fast;
        match command {
            Command::Undo => self.undo(),
            Command::Redo => self.redo(),
            Command::Copy => self.copy(),
            Command::Cut => !self.cut().is_empty(),
            Command::Paste => !self.paste().is_empty(),
            Command::PasteImage => self.paste_image().is_some(),
            Command::Duplicate => !self.duplicate().is_empty(),
            Command::Delete => !self.delete_selected().is_empty(),
            Command::SelectAll => {
                self.select_all();
                true
            }
            Command::Deselect => {
                self.clear_selection();
                true
            }
            Command::Escape => self.escape(),
            Command::BringToFront => self.reorder_selection(ElementStore::bring_to_front, false),
            Command::SendToBack => self.reorder_selection(ElementStore::send_to_back, true),
            Command::BringForward => self.reorder_selection(ElementStore::bring_forward, true),
            Command::SendBackward => self.reorder_selection(ElementStore::send_backward, false),
            Command::ZoomIn => self.zoom_in(),
            Command::ZoomOut => self.zoom_out(),
            Command::ZoomReset => {
                self.viewport.reset();
                true
            }
            Command::ToggleSnap => {
                self.config.snap_to_elements = !self.config.snap_to_elements;
                true
            }
            Command::ToggleGrid => {
                self.config.snap_to_grid = !self.config.snap_to_grid;
                true
            }
            Command::MoveUp => self.nudge(Vec2::new(0.0, -1.0), step),
            Command::MoveDown => self.nudge(Vec2::new(0.0, 1.0), step),
            Command::MoveLeft => self.nudge(Vec2::new(-1.0, 0.0), step),
            Command::MoveRight => self.nudge(Vec2::new(1.0, 0.0), step),
            Command::MoveUpFast => self.nudge(Vec2::new(0.0, -1.0), fast),
            Command::MoveDownFast => self.nudge(Vec2::new(0.0, 1.0), fast),
            Command::MoveLeftFast => self.nudge(Vec2::new(-1.0, 0.0), fast),
            Command::MoveRightFast => self.nudge(Vec2::new(1.0, 0.0), fast),
            Command::AlignLeft => self.arrange(|s| arrange::align(s, Alignment::Left)),
            Command::AlignCenter => self.arrange(|s| arrange::align(s, Alignment::Center)),
            Command::AlignRight => self.arrange(|s| arrange::align(s, Alignment::Right)),
            Command::AlignTop => self.arrange(|s| arrange::align(s, Alignment::Top)),
            Command::AlignMiddle => self.arrange(|s| arrange::align(s, Alignment::Middle)),
            Command::AlignBottom => self.arrange(|s| arrange::align(s, Alignment::Bottom)),
            Command::DistributeHorizontal => {
                self.arrange(|s| arrange::distribute(s, Axis::Horizontal))
            }
            Command::DistributeVertical => self.arrange(|s| arrange::distribute(s, Axis::Vertical)),
            Command::FlipHorizontal => self.arrange(|s| arrange::flip(s, Axis::Horizontal)),
            Command::FlipVertical => self.arrange(|s| arrange::flip(s, Axis::Vertical)),
            Command::CopyStyle => self.copy_style(),
            Command::PasteStyle => self.paste_style(),
        }
    }

    // --- Derived UI ---

    pub fn context_ui(&self) -> ContextUi {
        resolver::resolve_context_ui(
            &self.store,
            &self.viewport,
            &self.config,
            self.interaction.is_manipulating(),
        )
    }

    pub fn generator_panel_anchor(&self) -> Option<Point> {
        resolver::generator_panel_anchor(&self.store, &self.viewport, &self.config)
    }

    pub fn linked_highlights(&self) -> Vec<ElementId> {
        resolver::linked_highlights(&self.store)
    }

    pub fn element_ui_state(&self, id: ElementId) -> ElementUiState {
        resolver::element_ui_state(&self.store, id, self.interaction.editing_text())
    }

    /// Display state of every element, in paint order.
    pub fn element_ui_states(&self) -> Vec<(ElementId, ElementUiState)> {
        resolver::element_ui_states(&self.store, self.interaction.editing_text())
    }

    pub fn active_guides(&self) -> &[SnapGuide] {
        self.interaction.active_guides()
    }

    pub fn marquee_rect(&self) -> Option<Rect> {
        self.interaction.marquee_rect()
    }

    pub fn draft_path(&self) -> Option<&[Point]> {
        self.interaction.draft_path()
    }

    /// Resolved connector lines in paint order. Dangling connectors are skipped.
    pub fn connector_lines(&self) -> Vec<(ElementId, Point, Point)> {
        self.store
            .all()
            .filter(|el| el.is_connector())
            .filter_map(|el| {
                self.store
                    .connector_line(el)
                    .map(|(from, to)| (el.id, from, to))
            })
            .collect()
    }

    // --- Persistence ---

    /// The element list as pretty JSON.
    pub fn serialize_elements(&self) -> EditorResult<String> {
        Ok(serde_json::to_string_pretty(&self.store.to_vec())?)
    }

    /// Replace the document. Duplicate ids keep the last occurrence.
    /// History restarts from the loaded state.
    pub fn load_elements(&mut self, elements: Vec<Element>) -> usize {
        let incoming = elements.len();
        self.store.replace_all(elements);
        self.store.clear_selection();

        let tool = self.interaction.tool();
        self.interaction = InteractionMachine::new();
        self.interaction.set_tool(tool);
        self.history.reset(self.store.to_vec());

        let loaded = self.store.len();
        if loaded < incoming {
            log::info!("Loaded {loaded} elements ({} duplicate ids dropped)", incoming - loaded);
        } else {
            log::info!("Loaded {loaded} elements");
        }
        loaded
    }

    /// Parse and load a JSON element list.
    pub fn load_json(&mut self, json: &str) -> EditorResult<usize> {
        let elements: Vec<Element> = serde_json::from_str(json)?;
        Ok(self.load_elements(elements))
    }
}
