//! Positioned fields within a template.

use serde::{Deserialize, Serialize};

/// Closed set of field kinds. `DataMatrix` renders as a machine-readable
/// symbol; every other kind renders as a styled text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Barcode,
    Qr,
    #[serde(rename = "datamatrix")]
    DataMatrix,
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Font attributes for text-rendered fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontAttrs {
    pub size: f32,
    pub family: String,
    pub bold: bool,
    pub italic: bool,
}

impl Default for FontAttrs {
    fn default() -> Self {
        Self {
            size: 10.0,
            family: "Helvetica".to_string(),
            bold: false,
            italic: false,
        }
    }
}

/// One positioned field of a template. Position and size are millimeters
/// measured from the layout origin (top-left of the full page), not from the
/// print-area inset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Unique within the template.
    pub name: String,
    pub kind: FieldKind,
    pub x_mm: f32,
    pub y_mm: f32,
    #[serde(default)]
    pub width_mm: Option<f32>,
    #[serde(default)]
    pub height_mm: Option<f32>,
    #[serde(default)]
    pub font: FontAttrs,
    #[serde(default)]
    pub alignment: Alignment,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default_value: Option<String>,
}

impl FieldSpec {
    /// A plain text field with defaults for everything but name and position.
    pub fn text(name: impl Into<String>, x_mm: f32, y_mm: f32) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Text,
            x_mm,
            y_mm,
            width_mm: None,
            height_mm: None,
            font: FontAttrs::default(),
            alignment: Alignment::Left,
            required: false,
            default_value: None,
        }
    }
}
