//! Canvas items placed on a design.
//!
//! A [`CanvasItem`] carries the geometry shared by every element and a
//! [`CanvasItemKind`] holding only the fields relevant to its type. On the
//! wire the two are flattened into one camelCase object discriminated by
//! `"type"`.

use serde::{Deserialize, Serialize};

use crate::types::EntityId;

// ---------------------------------------------------------------------------
// Defaults for newly placed items
// ---------------------------------------------------------------------------

/// Font size for a newly placed text item.
pub const DEFAULT_FONT_SIZE: f64 = 48.0;

/// Font family for a newly placed text item.
pub const DEFAULT_FONT_FAMILY: &str = "Inter";

/// Font colour for a newly placed text item.
pub const DEFAULT_FONT_COLOR: &str = "#000000";

/// Solid fill used for the background of a blank design.
pub const DEFAULT_BACKGROUND_COLOR: &str = "#ffffff";

// ---------------------------------------------------------------------------
// Variant enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    Normal,
    Bold,
    #[serde(rename = "900")]
    Black,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeType {
    Rectangle,
    Circle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundType {
    Solid,
    Gradient,
}

/// Type-specific payload of a canvas item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum CanvasItemKind {
    Text {
        text: String,
        font_size: f64,
        font_family: String,
        font_color: String,
        font_weight: FontWeight,
        text_align: TextAlign,
    },
    Image {
        image_url: String,
        image_name: String,
    },
    Shape {
        shape_type: ShapeType,
        fill: String,
        stroke: String,
        stroke_width: f64,
    },
    Background {
        background_type: BackgroundType,
        background_color: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        gradient_from: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        gradient_to: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        gradient_angle: Option<f64>,
    },
}

impl CanvasItemKind {
    /// Wire name of the variant (`"text"`, `"image"`, `"shape"`, `"background"`).
    pub fn type_name(&self) -> &'static str {
        match self {
            CanvasItemKind::Text { .. } => "text",
            CanvasItemKind::Image { .. } => "image",
            CanvasItemKind::Shape { .. } => "shape",
            CanvasItemKind::Background { .. } => "background",
        }
    }
}

// ---------------------------------------------------------------------------
// CanvasItem
// ---------------------------------------------------------------------------

/// One visual element on a design canvas.
///
/// `z_index` values need not be contiguous; they only define paint order
/// (ascending). `locked` is advisory: the editor session refuses to edit a
/// locked item, the model itself does not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasItem {
    pub id: EntityId,
    pub z_index: i32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub locked: bool,
    #[serde(flatten)]
    pub kind: CanvasItemKind,
}

impl CanvasItem {
    /// A solid background covering a `width` x `height` canvas at z-index 0.
    pub fn solid_background(id: impl Into<EntityId>, width: u32, height: u32, color: &str) -> Self {
        Self {
            id: id.into(),
            z_index: 0,
            x: 0.0,
            y: 0.0,
            width: f64::from(width),
            height: f64::from(height),
            rotation: 0.0,
            locked: false,
            kind: CanvasItemKind::Background {
                background_type: BackgroundType::Solid,
                background_color: color.to_string(),
                gradient_from: None,
                gradient_to: None,
                gradient_angle: None,
            },
        }
    }

    /// A left-aligned text item with default typography.
    pub fn text(id: impl Into<EntityId>, text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            z_index: 0,
            x,
            y,
            width: 400.0,
            height: DEFAULT_FONT_SIZE * 1.5,
            rotation: 0.0,
            locked: false,
            kind: CanvasItemKind::Text {
                text: text.into(),
                font_size: DEFAULT_FONT_SIZE,
                font_family: DEFAULT_FONT_FAMILY.to_string(),
                font_color: DEFAULT_FONT_COLOR.to_string(),
                font_weight: FontWeight::Normal,
                text_align: TextAlign::Left,
            },
        }
    }

    /// An image item referencing an uploaded asset.
    pub fn image(
        id: impl Into<EntityId>,
        image_url: impl Into<String>,
        image_name: impl Into<String>,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            id: id.into(),
            z_index: 0,
            x: 0.0,
            y: 0.0,
            width,
            height,
            rotation: 0.0,
            locked: false,
            kind: CanvasItemKind::Image {
                image_url: image_url.into(),
                image_name: image_name.into(),
            },
        }
    }

    /// A filled shape with no stroke.
    pub fn shape(
        id: impl Into<EntityId>,
        shape_type: ShapeType,
        fill: &str,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            id: id.into(),
            z_index: 0,
            x: 0.0,
            y: 0.0,
            width,
            height,
            rotation: 0.0,
            locked: false,
            kind: CanvasItemKind::Shape {
                shape_type,
                fill: fill.to_string(),
                stroke: "transparent".to_string(),
                stroke_width: 0.0,
            },
        }
    }

    pub fn is_background(&self) -> bool {
        matches!(self.kind, CanvasItemKind::Background { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_item_serializes_flat_with_type_tag() {
        let item = CanvasItem::text("t1", "Hello", 10.0, 20.0);
        let value = serde_json::to_value(&item).unwrap();

        assert_eq!(value["type"], "text");
        assert_eq!(value["id"], "t1");
        assert_eq!(value["zIndex"], 0);
        assert_eq!(value["fontSize"], 48.0);
        assert_eq!(value["fontFamily"], "Inter");
        assert_eq!(value["fontWeight"], "normal");
        assert_eq!(value["textAlign"], "left");
        assert!(value.get("locked").is_none());
        assert!(value.get("imageUrl").is_none());
    }

    #[test]
    fn black_font_weight_is_900() {
        let json = serde_json::to_string(&FontWeight::Black).unwrap();
        assert_eq!(json, "\"900\"");
        let parsed: FontWeight = serde_json::from_str("\"900\"").unwrap();
        assert_eq!(parsed, FontWeight::Black);
    }

    #[test]
    fn deserializes_shape_from_editor_payload() {
        let value = json!({
            "id": "s1",
            "type": "shape",
            "zIndex": 3,
            "x": 5.0,
            "y": 6.0,
            "width": 100.0,
            "height": 50.0,
            "rotation": 45.0,
            "locked": true,
            "shapeType": "circle",
            "fill": "#ff0000",
            "stroke": "#000000",
            "strokeWidth": 2.0
        });

        let item: CanvasItem = serde_json::from_value(value).unwrap();
        assert_eq!(item.z_index, 3);
        assert!(item.locked);
        assert_eq!(item.kind.type_name(), "shape");
        match item.kind {
            CanvasItemKind::Shape { shape_type, stroke_width, .. } => {
                assert_eq!(shape_type, ShapeType::Circle);
                assert_eq!(stroke_width, 2.0);
            }
            other => panic!("expected shape, got {other:?}"),
        }
    }

    #[test]
    fn rejects_fields_for_wrong_variant() {
        // An image without its url is not an image.
        let value = json!({
            "id": "i1",
            "type": "image",
            "zIndex": 1,
            "x": 0.0,
            "y": 0.0,
            "width": 10.0,
            "height": 10.0,
            "fontSize": 12.0
        });
        assert!(serde_json::from_value::<CanvasItem>(value).is_err());
    }

    #[test]
    fn rejects_unknown_type() {
        let value = json!({
            "id": "v1",
            "type": "video",
            "zIndex": 1,
            "x": 0.0,
            "y": 0.0,
            "width": 10.0,
            "height": 10.0
        });
        assert!(serde_json::from_value::<CanvasItem>(value).is_err());
    }

    #[test]
    fn solid_background_covers_canvas() {
        let bg = CanvasItem::solid_background("bg", 800, 300, DEFAULT_BACKGROUND_COLOR);
        assert!(bg.is_background());
        assert_eq!(bg.z_index, 0);
        assert_eq!((bg.x, bg.y), (0.0, 0.0));
        assert_eq!((bg.width, bg.height), (800.0, 300.0));

        let value = serde_json::to_value(&bg).unwrap();
        assert_eq!(value["backgroundType"], "solid");
        assert_eq!(value["backgroundColor"], "#ffffff");
        assert!(value.get("gradientFrom").is_none());
    }
}
