//! Page content values.
//!
//! A page is a flat list of positioned elements; positioning is a plain value
//! on the element, consumed uniformly by the page builder.

use crate::error::RenderError;
use labelsmith_template::Alignment;
use std::io::Cursor;

/// A styled single-line text block.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub content: String,
    pub font_size: f32,
    pub font_family: String,
    pub bold: bool,
    pub italic: bool,
    pub alignment: Alignment,
}

/// PNG-encoded image content with its pixel dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageContent {
    pub png: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
}

impl ImageContent {
    pub fn from_rgb(img: image::RgbImage) -> Result<Self, RenderError> {
        let (width_px, height_px) = img.dimensions();
        Self::encode(image::DynamicImage::ImageRgb8(img), width_px, height_px)
    }

    pub fn from_luma(img: image::GrayImage) -> Result<Self, RenderError> {
        let (width_px, height_px) = img.dimensions();
        Self::encode(image::DynamicImage::ImageLuma8(img), width_px, height_px)
    }

    fn encode(img: image::DynamicImage, width_px: u32, height_px: u32) -> Result<Self, RenderError> {
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)?;
        Ok(Self {
            png,
            width_px,
            height_px,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementContent {
    Text(TextBlock),
    Image(ImageContent),
}

/// One element placed on a page. Coordinates are points from the page's
/// top-left corner; width/height bound the element when given.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedElement {
    pub content: ElementContent,
    pub x: f32,
    pub y: f32,
    pub width: Option<f32>,
    pub height: Option<f32>,
}
