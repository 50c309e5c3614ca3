//! Physical unit conversions.
//!
//! Everything user-facing is specified in millimeters; the PDF layer works in
//! points and rasters work in pixels at a template-specific DPI.

/// One millimeter in PostScript points (1 pt = 1/72 in).
pub const MM_TO_PT: f32 = 2.834645669;

/// Millimeters per inch.
pub const MM_PER_INCH: f32 = 25.4;

pub fn mm_to_pt(mm: f32) -> f32 {
    mm * MM_TO_PT
}

/// Converts millimeters to a pixel count at the given DPI, rounded to the
/// nearest whole pixel.
pub fn mm_to_px(mm: f32, dpi: u32) -> u32 {
    (mm / MM_PER_INCH * dpi as f32).round().max(0.0) as u32
}

pub fn px_to_mm(px: u32, dpi: u32) -> f32 {
    px as f32 * MM_PER_INCH / dpi as f32
}
