//! DataMatrix symbol generation.

use crate::element::ImageContent;
use crate::error::RenderError;
use datamatrix::{DataMatrix, SymbolList};

/// Modules of quiet zone around the symbol, per side.
const QUIET_ZONE: u32 = 1;

/// Encodes `data` as a DataMatrix symbol and renders it as a grayscale PNG
/// that fits within the target pixel box. Modules are kept square; the symbol
/// never upscales beyond the target.
pub fn datamatrix_symbol(
    data: &str,
    target_width_px: u32,
    target_height_px: u32,
) -> Result<ImageContent, RenderError> {
    let encoded = DataMatrix::encode(data.as_bytes(), SymbolList::default())
        .map_err(|e| RenderError::Symbology(format!("{e:?}")))?;
    let bitmap = encoded.bitmap();

    let modules_w = bitmap.width() as u32 + 2 * QUIET_ZONE;
    let modules_h = bitmap.height() as u32 + 2 * QUIET_ZONE;
    let module_px = (target_width_px / modules_w)
        .min(target_height_px / modules_h)
        .max(1);

    let width_px = modules_w * module_px;
    let height_px = modules_h * module_px;
    let mut img = image::GrayImage::from_pixel(width_px, height_px, image::Luma([255]));

    for (x, y) in bitmap.pixels() {
        let base_x = (x as u32 + QUIET_ZONE) * module_px;
        let base_y = (y as u32 + QUIET_ZONE) * module_px;
        for dy in 0..module_px {
            for dx in 0..module_px {
                img.put_pixel(base_x + dx, base_y + dy, image::Luma([0]));
            }
        }
    }

    ImageContent::from_luma(img)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_payload_yields_a_symbol() {
        let symbol = datamatrix_symbol("0104601234567890", 100, 100).unwrap();
        assert!(!symbol.png.is_empty());
        assert!(symbol.width_px > 0 && symbol.width_px <= 100);
        assert!(symbol.height_px > 0 && symbol.height_px <= 100);
    }

    #[test]
    fn symbol_generation_is_deterministic() {
        let a = datamatrix_symbol("ABC-123", 80, 80).unwrap();
        let b = datamatrix_symbol("ABC-123", 80, 80).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn oversized_payload_is_an_error() {
        let huge = "x".repeat(5000);
        assert!(matches!(
            datamatrix_symbol(&huge, 100, 100),
            Err(RenderError::Symbology(_))
        ));
    }
}
