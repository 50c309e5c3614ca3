//! Text measurement and alignment.

use labelsmith_template::Alignment;

/// Average glyph advance as a fraction of the font size. An approximation;
/// exact metrics would need a font metrics table.
pub const CHAR_WIDTH_FACTOR: f32 = 0.6;

pub fn measure_text_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * CHAR_WIDTH_FACTOR
}

/// Horizontal start of a text line within its field box. Without a box width
/// the declared position is used as-is; `Justify` degrades to left for the
/// single-line fields labels use.
pub fn aligned_x(x: f32, box_width: Option<f32>, text_width: f32, alignment: Alignment) -> f32 {
    match (alignment, box_width) {
        (Alignment::Center, Some(w)) => x + (w - text_width) / 2.0,
        (Alignment::Right, Some(w)) => x + w - text_width,
        _ => x,
    }
}
