//! Element and style clipboard.
//!
//! Copies are kept in an internal payload and mirrored to the platform
//! clipboard as a JSON envelope. Platform failures never fail an operation:
//! they are logged and the internal payload is used instead.

use crate::element::{Element, ElementColor, ElementId, ElementKind, ElementPatch};
use crate::error::{EditorError, EditorResult};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[cfg(target_arch = "wasm32")]
use web_time::{SystemTime, UNIX_EPOCH};
#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

/// Envelope discriminator for element payloads.
pub const PAYLOAD_TYPE: &str = "lovart-elements";
/// Envelope format version.
pub const PAYLOAD_VERSION: &str = "1.0";

/// Position and size of an image pasted from the platform.
const PASTED_IMAGE_ORIGIN: (f64, f64) = (100.0, 100.0);
const PASTED_IMAGE_SIZE: f64 = 300.0;

/// Platform clipboard failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("Clipboard access denied: {0}")]
    Denied(String),
    #[error("Clipboard is empty")]
    Empty,
    #[error("Clipboard encoding error: {0}")]
    Encoding(String),
}

/// Access to the host clipboard.
pub trait PlatformClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;

    /// Current text, or `None` if the clipboard holds no text.
    fn read_text(&mut self) -> Result<Option<String>, ClipboardError>;

    /// Current image as a PNG data URI, or `None` if there is no image.
    fn read_image(&mut self) -> Result<Option<String>, ClipboardError>;
}

/// In-process clipboard, also used to simulate a denying host.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    text: Option<String>,
    image: Option<String>,
    denied: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard that rejects every access.
    pub fn denied() -> Self {
        Self {
            denied: true,
            ..Self::default()
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    pub fn set_image(&mut self, data_uri: impl Into<String>) {
        self.image = Some(data_uri.into());
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    fn check(&self) -> Result<(), ClipboardError> {
        if self.denied {
            Err(ClipboardError::Denied("access rejected by host".to_string()))
        } else {
            Ok(())
        }
    }
}

impl PlatformClipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.check()?;
        self.text = Some(text.to_string());
        Ok(())
    }

    fn read_text(&mut self) -> Result<Option<String>, ClipboardError> {
        self.check()?;
        Ok(self.text.clone())
    }

    fn read_image(&mut self) -> Result<Option<String>, ClipboardError> {
        self.check()?;
        Ok(self.image.clone())
    }
}

/// Clipboard for hosts without one. Writes are dropped, reads are empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClipboard;

impl PlatformClipboard for NoClipboard {
    fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Ok(())
    }

    fn read_text(&mut self) -> Result<Option<String>, ClipboardError> {
        Ok(None)
    }

    fn read_image(&mut self) -> Result<Option<String>, ClipboardError> {
        Ok(None)
    }
}

/// Serialized clipboard envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipboardPayload {
    #[serde(rename = "type")]
    pub payload_type: String,
    pub version: String,
    pub elements: Vec<Element>,
    /// Milliseconds since the Unix epoch at copy time.
    pub timestamp: u64,
}

impl ClipboardPayload {
    pub fn new(elements: Vec<Element>) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        Self {
            payload_type: PAYLOAD_TYPE.to_string(),
            version: PAYLOAD_VERSION.to_string(),
            elements,
            timestamp,
        }
    }

    pub fn to_json(&self) -> EditorResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse an envelope. Foreign JSON and other payload types are rejected.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let payload: Self = serde_json::from_str(json)?;
        if payload.payload_type != PAYLOAD_TYPE {
            return Err(EditorError::InvalidPayload(format!(
                "unexpected payload type {}",
                payload.payload_type
            )));
        }
        Ok(payload)
    }

    /// Whether `other` is this payload as written by the same copy.
    fn same_copy(&self, other: &ClipboardPayload) -> bool {
        self.timestamp == other.timestamp
            && self.elements.len() == other.elements.len()
            && self
                .elements
                .iter()
                .zip(&other.elements)
                .all(|(a, b)| a.id == b.id)
    }
}

/// Style captured by copy-style.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleClipboard {
    pub color: Option<ElementColor>,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub stroke_width: Option<f64>,
}

impl StyleClipboard {
    pub fn from_element(element: &Element) -> Self {
        Self {
            color: element.color(),
            font_size: element.font_size(),
            font_family: element.font_family().map(str::to_string),
            stroke_width: element.stroke_width(),
        }
    }

    /// Patch applying this style to `element`.
    ///
    /// Color applies to every element; font fields only to text and stroke
    /// width only to paths. Returns `None` when nothing applies.
    pub fn patch_for(&self, element: &Element) -> Option<ElementPatch> {
        let mut patch = ElementPatch {
            color: self.color,
            ..ElementPatch::default()
        };
        match element.kind {
            ElementKind::Text { .. } => {
                patch.font_size = self.font_size;
                patch.font_family = self.font_family.clone();
            }
            ElementKind::Path { .. } => {
                patch.stroke_width = self.stroke_width;
            }
            _ => {}
        }
        (!patch.is_empty()).then_some(patch)
    }
}

/// Copies of `elements` with fresh ids.
///
/// References between elements of the batch (connector endpoints, links,
/// generator references) are rewritten to the new ids; references leaving
/// the batch are kept.
pub fn regenerate_ids(elements: &[Element]) -> Vec<Element> {
    let mut copies: Vec<Element> = elements.iter().map(Element::with_new_id).collect();
    let remap: HashMap<ElementId, ElementId> = elements
        .iter()
        .zip(&copies)
        .map(|(old, new)| (old.id, new.id))
        .collect();
    let map = |id: &mut ElementId| {
        if let Some(new) = remap.get(id) {
            *id = *new;
        }
    };

    for el in &mut copies {
        el.linked_elements.iter_mut().for_each(map);
        match &mut el.kind {
            ElementKind::Connector { from, to, .. } => {
                map(from);
                map(to);
            }
            ElementKind::ImageGenerator {
                reference_image_id: Some(reference),
            } => map(reference),
            _ => {}
        }
    }
    copies
}

/// Element clipboard with repeated-paste offsetting.
pub struct ClipboardEngine {
    platform: Box<dyn PlatformClipboard>,
    payload: Option<ClipboardPayload>,
    style: Option<StyleClipboard>,
    paste_offset: f64,
}

impl std::fmt::Debug for ClipboardEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipboardEngine")
            .field("payload", &self.payload)
            .field("style", &self.style)
            .field("paste_offset", &self.paste_offset)
            .finish_non_exhaustive()
    }
}

impl ClipboardEngine {
    pub fn new(platform: Box<dyn PlatformClipboard>, paste_offset: f64) -> Self {
        Self {
            platform,
            payload: None,
            style: None,
            paste_offset,
        }
    }

    /// The internal payload.
    pub fn payload(&self) -> Option<&ClipboardPayload> {
        self.payload.as_ref()
    }

    pub fn has_content(&self) -> bool {
        self.payload.as_ref().is_some_and(|p| !p.elements.is_empty())
    }

    pub fn clear(&mut self) {
        self.payload = None;
    }

    /// Store `elements` and mirror them to the platform.
    /// Returns false, leaving the clipboard untouched, when `elements` is empty.
    pub fn copy(&mut self, elements: Vec<Element>) -> bool {
        if elements.is_empty() {
            return false;
        }
        let payload = ClipboardPayload::new(elements);
        match payload.to_json() {
            Ok(json) => {
                if let Err(e) = self.platform.write_text(&json) {
                    log::warn!("Platform clipboard write failed: {e}");
                }
            }
            Err(e) => log::warn!("Failed to encode clipboard payload: {e}"),
        }
        log::debug!("Copied {} elements", payload.elements.len());
        self.payload = Some(payload);
        true
    }

    /// Copy `elements` and return their ids for the caller to delete.
    pub fn cut(&mut self, elements: Vec<Element>) -> Vec<ElementId> {
        let ids = elements.iter().map(|el| el.id).collect();
        if self.copy(elements) { ids } else { Vec::new() }
    }

    pub fn paste_offset(&self) -> f64 {
        self.paste_offset
    }

    /// Produce a batch to insert.
    ///
    /// A payload on the platform clipboard written by someone else replaces
    /// the internal one. Every paste moves the stored payload by the paste
    /// offset, so repeated pastes cascade. Returned elements carry fresh ids.
    pub fn paste(&mut self) -> Vec<Element> {
        if let Some(foreign) = self.read_platform_payload() {
            let ours = self.payload.as_ref().is_some_and(|p| p.same_copy(&foreign));
            if !ours {
                log::debug!("Adopting platform clipboard payload");
                self.payload = Some(foreign);
            }
        }

        let offset = self.paste_offset;
        let Some(payload) = self.payload.as_mut() else {
            return Vec::new();
        };
        for el in &mut payload.elements {
            el.translate(offset, offset);
        }
        regenerate_ids(&payload.elements)
    }

    fn read_platform_payload(&mut self) -> Option<ClipboardPayload> {
        match self.platform.read_text() {
            Ok(Some(text)) => ClipboardPayload::from_json(&text).ok(),
            Ok(None) => None,
            Err(e) => {
                log::warn!("Platform clipboard read failed: {e}");
                None
            }
        }
    }

    /// Offset copies of `elements` with fresh ids. The clipboard is untouched.
    pub fn duplicate(&self, elements: &[Element]) -> Vec<Element> {
        let mut copies = regenerate_ids(elements);
        for el in &mut copies {
            el.translate(self.paste_offset, self.paste_offset);
        }
        copies
    }

    pub fn copy_style(&mut self, element: &Element) {
        self.style = Some(StyleClipboard::from_element(element));
    }

    pub fn style(&self) -> Option<&StyleClipboard> {
        self.style.as_ref()
    }

    pub fn has_style(&self) -> bool {
        self.style.is_some()
    }

    /// Patches applying the copied style to `elements`.
    pub fn paste_style<'a, I>(&self, elements: I) -> Vec<(ElementId, ElementPatch)>
    where
        I: IntoIterator<Item = &'a Element>,
    {
        let Some(style) = &self.style else {
            return Vec::new();
        };
        elements
            .into_iter()
            .filter_map(|el| style.patch_for(el).map(|patch| (el.id, patch)))
            .collect()
    }

    /// Image element built from the platform clipboard image, if any.
    pub fn paste_image(&mut self) -> Option<Element> {
        match self.platform.read_image() {
            Ok(Some(data_uri)) => {
                let (x, y) = PASTED_IMAGE_ORIGIN;
                Some(Element::image(data_uri, x, y, PASTED_IMAGE_SIZE, PASTED_IMAGE_SIZE))
            }
            Ok(None) => None,
            Err(e) => {
                log::warn!("Platform clipboard image read failed: {e}");
                None
            }
        }
    }
}

/// Encode elements as a base64 envelope suitable for sharing as text.
pub fn to_shareable_text(elements: &[Element]) -> EditorResult<String> {
    let json = ClipboardPayload::new(elements.to_vec()).to_json()?;
    Ok(STANDARD.encode(json))
}

/// Decode shared text back to elements with fresh ids.
/// Returns `None` for anything that is not an encoded element envelope.
pub fn from_shareable_text(text: &str) -> Option<Vec<Element>> {
    let bytes = STANDARD.decode(text.trim()).ok()?;
    let json = String::from_utf8(bytes).ok()?;
    let payload = ClipboardPayload::from_json(&json).ok()?;
    Some(regenerate_ids(&payload.elements))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ConnectorStyle, ShapeType};

    fn engine() -> ClipboardEngine {
        ClipboardEngine::new(Box::new(MemoryClipboard::new()), 20.0)
    }

    fn square(x: f64, y: f64) -> Element {
        Element::shape(ShapeType::Square, x, y, 10.0, 10.0)
    }

    #[test]
    fn test_copy_empty_is_noop() {
        let mut cb = engine();
        assert!(!cb.copy(Vec::new()));
        assert!(!cb.has_content());
    }

    #[test]
    fn test_paste_twice_cascades_with_fresh_ids() {
        let mut cb = engine();
        let a = square(0.0, 0.0);
        cb.copy(vec![a.clone()]);

        let first = cb.paste();
        let second = cb.paste();
        assert_eq!(first.len(), 1);
        assert_eq!((first[0].x, first[0].y), (20.0, 20.0));
        assert_eq!((second[0].x, second[0].y), (40.0, 40.0));
        assert_ne!(first[0].id, a.id);
        assert_ne!(second[0].id, a.id);
        assert_ne!(first[0].id, second[0].id);
    }

    #[test]
    fn test_cut_returns_ids() {
        let mut cb = engine();
        let a = square(0.0, 0.0);
        assert_eq!(cb.cut(vec![a.clone()]), vec![a.id]);
        assert!(cb.has_content());
        assert!(cb.cut(Vec::new()).is_empty());
    }

    #[test]
    fn test_paste_with_empty_clipboard() {
        let mut cb = engine();
        assert!(cb.paste().is_empty());
    }

    #[test]
    fn test_denied_platform_falls_back_to_internal() {
        let mut cb = ClipboardEngine::new(Box::new(MemoryClipboard::denied()), 20.0);
        assert!(cb.copy(vec![square(0.0, 0.0)]));
        let pasted = cb.paste();
        assert_eq!(pasted.len(), 1);
        assert!((pasted[0].x - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_foreign_platform_payload_is_adopted() {
        let external = square(500.0, 500.0);
        let mut platform = MemoryClipboard::new();
        platform.set_text(ClipboardPayload::new(vec![external.clone()]).to_json().unwrap());
        let mut cb = ClipboardEngine::new(Box::new(platform), 20.0);

        let pasted = cb.paste();
        assert_eq!(pasted.len(), 1);
        assert!((pasted[0].x - 520.0).abs() < f64::EPSILON);
        assert_ne!(pasted[0].id, external.id);
        assert!(cb.has_content());
    }

    #[test]
    fn test_plain_platform_text_is_ignored() {
        let mut platform = MemoryClipboard::new();
        platform.set_text("hello");
        let mut cb = ClipboardEngine::new(Box::new(platform), 20.0);
        assert!(cb.paste().is_empty());
    }

    #[test]
    fn test_paste_remaps_internal_references() {
        let a = square(0.0, 0.0);
        let b = square(50.0, 0.0);
        let c = Element::connector(a.id, b.id, ConnectorStyle::Dashed);
        let copies = regenerate_ids(&[a.clone(), b.clone(), c]);
        assert_eq!(copies[2].connector_endpoints(), Some((copies[0].id, copies[1].id)));
    }

    #[test]
    fn test_duplicate_leaves_clipboard() {
        let cb = engine();
        let a = square(5.0, 5.0);
        let dup = cb.duplicate(std::slice::from_ref(&a));
        assert_eq!((dup[0].x, dup[0].y), (25.0, 25.0));
        assert_ne!(dup[0].id, a.id);
        assert!(!cb.has_content());
    }

    #[test]
    fn test_paste_style_respects_types() {
        let mut cb = engine();
        let mut source = Element::text("styled", 0.0, 0.0);
        source.apply_patch(&ElementPatch {
            color: Some(ElementColor::rgb(255, 0, 0)),
            font_size: Some(32.0),
            font_family: Some("Inter".to_string()),
            ..ElementPatch::default()
        });
        cb.copy_style(&source);
        assert!(cb.has_style());

        let text = Element::text("target", 0.0, 0.0);
        let shape = square(0.0, 0.0);
        let image = Element::image("data:", 0.0, 0.0, 10.0, 10.0);
        let patches = cb.paste_style([&text, &shape, &image]);

        let text_patch = &patches.iter().find(|(id, _)| *id == text.id).unwrap().1;
        assert_eq!(text_patch.font_size, Some(32.0));
        assert_eq!(text_patch.font_family.as_deref(), Some("Inter"));
        let shape_patch = &patches.iter().find(|(id, _)| *id == shape.id).unwrap().1;
        assert_eq!(shape_patch.color, Some(ElementColor::rgb(255, 0, 0)));
        assert_eq!(shape_patch.font_size, None);
    }

    #[test]
    fn test_paste_image() {
        let mut platform = MemoryClipboard::new();
        platform.set_image("data:image/png;base64,iVBORw0KGgo=");
        let mut cb = ClipboardEngine::new(Box::new(platform), 20.0);
        let img = cb.paste_image().unwrap();
        assert_eq!((img.x, img.y), (100.0, 100.0));
        assert_eq!((img.width, img.height), (Some(300.0), Some(300.0)));
        assert!(engine().paste_image().is_none());
    }

    #[test]
    fn test_shareable_text() {
        let a = square(1.0, 2.0);
        let text = to_shareable_text(std::slice::from_ref(&a)).unwrap();
        let decoded = from_shareable_text(&text).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_ne!(decoded[0].id, a.id);
        assert_eq!(decoded[0].kind, a.kind);

        assert!(from_shareable_text("not base64!").is_none());
        let foreign = STANDARD.encode(r#"{"type":"other","version":"1.0","elements":[],"timestamp":0}"#);
        assert!(from_shareable_text(&foreign).is_none());
    }
}
