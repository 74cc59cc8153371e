//! Canvas element model.
//!
//! Every element shares a positional header (`id`, `x`, `y`, `width`,
//! `height`) plus advisory relationship metadata. Type-specific payloads live
//! in [`ElementKind`]. The serialized form is a flat JSON object with a
//! `type` discriminator, matching documents persisted by the web editor.

use kurbo::{Point, Rect};
use peniko::Color;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an element.
pub type ElementId = Uuid;

/// Tag shared by elements created together (source, connector, generator).
pub type GroupId = Uuid;

/// Smallest extent accepted from a property update.
pub const MIN_EXTENT: f64 = 1.0;

/// Body of a freshly inserted text element.
pub const DEFAULT_TEXT: &str = "Double click to edit";

/// RGBA8 color, serialized as a `#RRGGBB` or `#RRGGBBAA` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ElementColor {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Default fill for inserted shapes.
    pub const SHAPE_GRAY: Self = Self::rgb(0x9C, 0xA3, 0xAF);
    /// Default stroke for flow connectors.
    pub const CONNECTOR_GRAY: Self = Self::rgb(0x6B, 0x72, 0x80);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA`.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            3 => {
                let mut out = [0u8; 3];
                for (slot, c) in out.iter_mut().zip(hex.chars()) {
                    let v = c.to_digit(16)? as u8;
                    *slot = v * 16 + v;
                }
                Some(Self::rgb(out[0], out[1], out[2]))
            }
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// Format as an uppercase hex string, omitting alpha when opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl From<ElementColor> for Color {
    fn from(color: ElementColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

impl Serialize for ElementColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ElementColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ElementColor::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color: {s}")))
    }
}

/// Discriminator for `shape` elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeType {
    #[default]
    Square,
    Circle,
    Triangle,
    Star,
    Message,
    ArrowLeft,
    ArrowRight,
}

/// Line style for connectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorStyle {
    #[default]
    Solid,
    Dashed,
}

/// Fieldless element type, used for display and type checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Image,
    Video,
    Text,
    Shape,
    Path,
    ImageGenerator,
    Connector,
}

impl ElementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Image => "image",
            ElementType::Video => "video",
            ElementType::Text => "text",
            ElementType::Shape => "shape",
            ElementType::Path => "path",
            ElementType::ImageGenerator => "image-generator",
            ElementType::Connector => "connector",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-specific element payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ElementKind {
    /// Raster image; `content` is a data URI or URL.
    Image {
        #[serde(default)]
        content: String,
    },
    /// Video clip; `content` is a data URI or URL.
    Video {
        #[serde(default)]
        content: String,
    },
    Text {
        #[serde(default)]
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<ElementColor>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font_size: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font_family: Option<String>,
    },
    Shape {
        #[serde(default)]
        shape_type: ShapeType,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<ElementColor>,
    },
    /// Freehand stroke. Points are relative to the element's own box.
    Path {
        #[serde(default)]
        points: Vec<Point>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<ElementColor>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stroke_width: Option<f64>,
    },
    /// Placeholder awaiting a generation result.
    ImageGenerator {
        /// Image that seeded this generator. Lookup only.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reference_image_id: Option<ElementId>,
    },
    /// Line joining two elements; geometry is derived from the endpoints.
    Connector {
        #[serde(rename = "connectorFrom")]
        from: ElementId,
        #[serde(rename = "connectorTo")]
        to: ElementId,
        #[serde(rename = "connectorStyle", default)]
        style: ConnectorStyle,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<ElementColor>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stroke_width: Option<f64>,
    },
}

impl ElementKind {
    pub fn element_type(&self) -> ElementType {
        match self {
            ElementKind::Image { .. } => ElementType::Image,
            ElementKind::Video { .. } => ElementType::Video,
            ElementKind::Text { .. } => ElementType::Text,
            ElementKind::Shape { .. } => ElementType::Shape,
            ElementKind::Path { .. } => ElementType::Path,
            ElementKind::ImageGenerator { .. } => ElementType::ImageGenerator,
            ElementKind::Connector { .. } => ElementType::Connector,
        }
    }
}

/// A single element on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    /// Left edge in canvas coordinates. Unused for connectors.
    #[serde(default)]
    pub x: f64,
    /// Top edge in canvas coordinates. Unused for connectors.
    #[serde(default)]
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Highlight tag shared with elements created in the same flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    /// Elements considered linked to this one. Advisory only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub linked_elements: Vec<ElementId>,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl Element {
    /// Create an element with a fresh id.
    pub fn new(kind: ElementKind, x: f64, y: f64, width: Option<f64>, height: Option<f64>) -> Self {
        Self {
            id: Uuid::new_v4(),
            x,
            y,
            width,
            height,
            group_id: None,
            linked_elements: Vec::new(),
            kind,
        }
    }

    pub fn image(content: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(
            ElementKind::Image { content: content.into() },
            x,
            y,
            Some(width),
            Some(height),
        )
    }

    pub fn video(content: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(
            ElementKind::Video { content: content.into() },
            x,
            y,
            Some(width),
            Some(height),
        )
    }

    /// Text elements are sized to their content, so they carry no box.
    pub fn text(content: impl Into<String>, x: f64, y: f64) -> Self {
        Self::new(
            ElementKind::Text {
                content: content.into(),
                color: None,
                font_size: None,
                font_family: None,
            },
            x,
            y,
            None,
            None,
        )
    }

    pub fn shape(shape_type: ShapeType, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(
            ElementKind::Shape {
                shape_type,
                color: Some(ElementColor::SHAPE_GRAY),
            },
            x,
            y,
            Some(width),
            Some(height),
        )
    }

    pub fn path(points: Vec<Point>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(
            ElementKind::Path {
                points,
                color: Some(ElementColor::BLACK),
                stroke_width: Some(3.0),
            },
            x,
            y,
            Some(width),
            Some(height),
        )
    }

    pub fn image_generator(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(
            ElementKind::ImageGenerator { reference_image_id: None },
            x,
            y,
            Some(width),
            Some(height),
        )
    }

    pub fn connector(from: ElementId, to: ElementId, style: ConnectorStyle) -> Self {
        Self::new(
            ElementKind::Connector {
                from,
                to,
                style,
                color: None,
                stroke_width: None,
            },
            0.0,
            0.0,
            None,
            None,
        )
    }

    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    pub fn is_connector(&self) -> bool {
        matches!(self.kind, ElementKind::Connector { .. })
    }

    /// Width with a missing value treated as 0.
    pub fn width_or_zero(&self) -> f64 {
        self.width.unwrap_or(0.0)
    }

    /// Height with a missing value treated as 0.
    pub fn height_or_zero(&self) -> f64 {
        self.height.unwrap_or(0.0)
    }

    /// Bounding rectangle in canvas coordinates.
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.x,
            self.y,
            self.x + self.width_or_zero(),
            self.y + self.height_or_zero(),
        )
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.x + self.width_or_zero() / 2.0,
            self.y + self.height_or_zero() / 2.0,
        )
    }

    /// Content payload for image, video and text elements.
    pub fn content(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Image { content }
            | ElementKind::Video { content }
            | ElementKind::Text { content, .. } => Some(content.as_str()),
            _ => None,
        }
    }

    pub fn color(&self) -> Option<ElementColor> {
        match &self.kind {
            ElementKind::Text { color, .. }
            | ElementKind::Shape { color, .. }
            | ElementKind::Path { color, .. }
            | ElementKind::Connector { color, .. } => *color,
            _ => None,
        }
    }

    pub fn font_size(&self) -> Option<f64> {
        match &self.kind {
            ElementKind::Text { font_size, .. } => *font_size,
            _ => None,
        }
    }

    pub fn font_family(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Text { font_family, .. } => font_family.as_deref(),
            _ => None,
        }
    }

    pub fn stroke_width(&self) -> Option<f64> {
        match &self.kind {
            ElementKind::Path { stroke_width, .. } | ElementKind::Connector { stroke_width, .. } => {
                *stroke_width
            }
            _ => None,
        }
    }

    /// Endpoint ids when this element is a connector.
    pub fn connector_endpoints(&self) -> Option<(ElementId, ElementId)> {
        match &self.kind {
            ElementKind::Connector { from, to, .. } => Some((*from, *to)),
            _ => None,
        }
    }

    /// Copy of this element with a fresh id.
    pub fn with_new_id(&self) -> Self {
        let mut copy = self.clone();
        copy.id = Uuid::new_v4();
        copy
    }

    /// Move the element's box. Path points are box-relative and stay put.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Shallow-merge a patch. Fields the element type does not carry are ignored.
    pub fn apply_patch(&mut self, patch: &ElementPatch) {
        if let Some(x) = patch.x {
            self.x = sanitize_coord(x);
        }
        if let Some(y) = patch.y {
            self.y = sanitize_coord(y);
        }
        if let Some(w) = patch.width {
            self.width = Some(sanitize_extent(w));
        }
        if let Some(h) = patch.height {
            self.height = Some(sanitize_extent(h));
        }
        if let Some(group_id) = patch.group_id {
            self.group_id = Some(group_id);
        }
        if let Some(linked) = &patch.linked_elements {
            self.linked_elements = linked.clone();
        }

        match &mut self.kind {
            ElementKind::Image { content } | ElementKind::Video { content } => {
                if let Some(c) = &patch.content {
                    *content = c.clone();
                }
            }
            ElementKind::Text {
                content,
                color,
                font_size,
                font_family,
            } => {
                if let Some(c) = &patch.content {
                    *content = c.clone();
                }
                if patch.color.is_some() {
                    *color = patch.color;
                }
                if patch.font_size.is_some() {
                    *font_size = patch.font_size;
                }
                if let Some(f) = &patch.font_family {
                    *font_family = Some(f.clone());
                }
            }
            ElementKind::Shape { shape_type, color } => {
                if let Some(t) = patch.shape_type {
                    *shape_type = t;
                }
                if patch.color.is_some() {
                    *color = patch.color;
                }
            }
            ElementKind::Path {
                points,
                color,
                stroke_width,
            } => {
                if let Some(p) = &patch.points {
                    *points = p.clone();
                }
                if patch.color.is_some() {
                    *color = patch.color;
                }
                if patch.stroke_width.is_some() {
                    *stroke_width = patch.stroke_width;
                }
            }
            ElementKind::ImageGenerator { reference_image_id } => {
                if patch.reference_image_id.is_some() {
                    *reference_image_id = patch.reference_image_id;
                }
            }
            ElementKind::Connector {
                style,
                color,
                stroke_width,
                ..
            } => {
                if let Some(s) = patch.connector_style {
                    *style = s;
                }
                if patch.color.is_some() {
                    *color = patch.color;
                }
                if patch.stroke_width.is_some() {
                    *stroke_width = patch.stroke_width;
                }
            }
        }
    }
}

fn sanitize_coord(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

fn sanitize_extent(v: f64) -> f64 {
    if v.is_finite() { v.max(MIN_EXTENT) } else { MIN_EXTENT }
}

/// Partial element update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub content: Option<String>,
    pub color: Option<ElementColor>,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub stroke_width: Option<f64>,
    pub shape_type: Option<ShapeType>,
    pub points: Option<Vec<Point>>,
    pub connector_style: Option<ConnectorStyle>,
    pub group_id: Option<GroupId>,
    pub linked_elements: Option<Vec<ElementId>>,
    pub reference_image_id: Option<ElementId>,
}

impl ElementPatch {
    /// Patch that moves an element.
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Patch that moves and resizes an element.
    pub fn geometry(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A finished generation result delivered by an external service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum GeneratedContent {
    Image(String),
    Video(String),
    Text(String),
}

impl GeneratedContent {
    /// Element payload carrying this content.
    pub fn into_kind(self) -> ElementKind {
        match self {
            GeneratedContent::Image(content) => ElementKind::Image { content },
            GeneratedContent::Video(content) => ElementKind::Video { content },
            GeneratedContent::Text(content) => ElementKind::Text {
                content,
                color: None,
                font_size: None,
                font_family: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex() {
        assert_eq!(ElementColor::from_hex("#9CA3AF"), Some(ElementColor::SHAPE_GRAY));
        assert_eq!(ElementColor::from_hex("#fff"), Some(ElementColor::rgb(255, 255, 255)));
        assert_eq!(
            ElementColor::from_hex("#00000080"),
            Some(ElementColor::new(0, 0, 0, 128))
        );
        assert_eq!(ElementColor::from_hex("9CA3AF"), None);
        assert_eq!(ElementColor::from_hex("#12345"), None);
        assert_eq!(ElementColor::SHAPE_GRAY.to_hex(), "#9CA3AF");
        assert_eq!(ElementColor::new(1, 2, 3, 4).to_hex(), "#01020304");
    }

    #[test]
    fn test_deserialize_web_document() {
        let json = r##"[
            {"id": "8f0b8c7e-3c1a-4d8e-9a51-2f4b1c6d7e80", "type": "shape", "shapeType": "arrow-right",
             "x": 10, "y": 20, "width": 150, "height": 150, "color": "#9CA3AF"},
            {"id": "0e7f6c43-5b2a-4f1e-8c3d-9a8b7c6d5e4f", "type": "text", "x": 5, "y": 6,
             "content": "hello", "fontSize": 24},
            {"id": "4a3b2c1d-0e9f-4a8b-b7c6-d5e4f3a2b1c0", "type": "connector", "x": 0, "y": 0,
             "connectorFrom": "8f0b8c7e-3c1a-4d8e-9a51-2f4b1c6d7e80",
             "connectorTo": "0e7f6c43-5b2a-4f1e-8c3d-9a8b7c6d5e4f",
             "connectorStyle": "dashed", "strokeWidth": 2}
        ]"##;
        let elements: Vec<Element> = serde_json::from_str(json).unwrap();
        assert_eq!(elements.len(), 3);

        assert_eq!(elements[0].element_type(), ElementType::Shape);
        assert!(matches!(
            elements[0].kind,
            ElementKind::Shape { shape_type: ShapeType::ArrowRight, .. }
        ));
        assert_eq!(elements[1].content(), Some("hello"));
        assert_eq!(elements[1].font_size(), Some(24.0));
        assert!(elements[1].width.is_none());

        let (from, to) = elements[2].connector_endpoints().unwrap();
        assert_eq!(from, elements[0].id);
        assert_eq!(to, elements[1].id);
        assert!(matches!(
            elements[2].kind,
            ElementKind::Connector { style: ConnectorStyle::Dashed, .. }
        ));
    }

    #[test]
    fn test_serialize_uses_web_field_names() {
        let mut generator = Element::image_generator(0.0, 0.0, 400.0, 400.0);
        let source = Element::image("data:image/png;base64,AAAA", 0.0, 0.0, 10.0, 10.0);
        generator.kind = ElementKind::ImageGenerator {
            reference_image_id: Some(source.id),
        };
        generator.linked_elements.push(source.id);

        let value = serde_json::to_value(&generator).unwrap();
        assert_eq!(value["type"], "image-generator");
        assert_eq!(value["referenceImageId"], source.id.to_string());
        assert_eq!(value["linkedElements"][0], source.id.to_string());
        assert!(value.get("groupId").is_none());
    }

    #[test]
    fn test_apply_patch_preserves_unspecified_fields() {
        let mut text = Element::text("hello", 10.0, 20.0);
        text.apply_patch(&ElementPatch {
            font_size: Some(32.0),
            ..ElementPatch::default()
        });
        assert_eq!(text.content(), Some("hello"));
        assert_eq!(text.font_size(), Some(32.0));
        assert!((text.x - 10.0).abs() < f64::EPSILON);
        assert!((text.y - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_apply_patch_ignores_foreign_fields() {
        let mut shape = Element::shape(ShapeType::Circle, 0.0, 0.0, 50.0, 50.0);
        shape.apply_patch(&ElementPatch {
            font_size: Some(32.0),
            stroke_width: Some(4.0),
            color: Some(ElementColor::BLACK),
            ..ElementPatch::default()
        });
        assert_eq!(shape.font_size(), None);
        assert_eq!(shape.stroke_width(), None);
        assert_eq!(shape.color(), Some(ElementColor::BLACK));
    }

    #[test]
    fn test_apply_patch_clamps_invalid_geometry() {
        let mut shape = Element::shape(ShapeType::Square, 0.0, 0.0, 50.0, 50.0);
        shape.apply_patch(&ElementPatch {
            x: Some(f64::NAN),
            width: Some(-20.0),
            height: Some(f64::INFINITY),
            ..ElementPatch::default()
        });
        assert!(shape.x.abs() < f64::EPSILON);
        assert_eq!(shape.width, Some(MIN_EXTENT));
        assert_eq!(shape.height, Some(MIN_EXTENT));
    }

    #[test]
    fn test_rect_treats_missing_size_as_zero() {
        let text = Element::text("t", 3.0, 4.0);
        let rect = text.rect();
        assert!((rect.width()).abs() < f64::EPSILON);
        assert!((rect.x0 - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_with_new_id() {
        let shape = Element::shape(ShapeType::Star, 1.0, 2.0, 3.0, 4.0);
        let copy = shape.with_new_id();
        assert_ne!(copy.id, shape.id);
        assert_eq!(copy.kind, shape.kind);
        assert!((copy.x - shape.x).abs() < f64::EPSILON);
    }

    #[test]
    fn test_generated_content_into_kind() {
        let kind = GeneratedContent::Video("https://cdn/clip.mp4".into()).into_kind();
        assert_eq!(kind.element_type(), ElementType::Video);
        let kind = GeneratedContent::Text("caption".into()).into_kind();
        assert!(matches!(kind, ElementKind::Text { ref content, .. } if content == "caption"));
    }
}
