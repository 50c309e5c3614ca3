//! Raster background compositing.

use crate::element::ImageContent;
use crate::error::RenderError;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use labelsmith_template::TemplateGeometry;
use labelsmith_types::{Size, fit_scale, mm_to_px};

/// Decodes artwork bytes and composes them onto a white canvas sized to the
/// layout rectangle at the template DPI: uniform scale (aspect preserved),
/// centered. Alpha blends against the white canvas.
pub(crate) fn compose(bytes: &[u8], geometry: &TemplateGeometry) -> Result<ImageContent, RenderError> {
    let src = image::load_from_memory(bytes)?.to_rgba8();

    let canvas_w = mm_to_px(geometry.layout().width, geometry.dpi()).max(1);
    let canvas_h = mm_to_px(geometry.layout().height, geometry.dpi()).max(1);

    let src_size = Size::new(src.width() as f32, src.height() as f32);
    let canvas_size = Size::new(canvas_w as f32, canvas_h as f32);
    let scale = fit_scale(src_size, canvas_size);

    let scaled_w = ((src.width() as f32 * scale).round() as u32).max(1);
    let scaled_h = ((src.height() as f32 * scale).round() as u32).max(1);
    let resized = imageops::resize(&src, scaled_w, scaled_h, FilterType::Triangle);

    let mut canvas = RgbaImage::from_pixel(canvas_w, canvas_h, Rgba([255, 255, 255, 255]));
    let off_x = (canvas_w.saturating_sub(scaled_w)) / 2;
    let off_y = (canvas_h.saturating_sub(scaled_h)) / 2;
    imageops::overlay(&mut canvas, &resized, off_x as i64, off_y as i64);

    ImageContent::from_rgb(image::DynamicImage::ImageRgba8(canvas).to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use labelsmith_template::Margins;

    fn png_of(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([10, 20, 30]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(
                &mut std::io::Cursor::new(&mut bytes),
                image::ImageFormat::Png,
            )
            .unwrap();
        bytes
    }

    fn geometry_50x30() -> TemplateGeometry {
        TemplateGeometry::new(
            Size::new(50.0, 30.0),
            Size::new(50.0, 30.0),
            Margins::zero(),
            300,
        )
        .unwrap()
    }

    #[test]
    fn canvas_matches_layout_at_dpi() {
        // 50 mm at 300 DPI = 591 px, 30 mm = 354 px.
        let composed = compose(&png_of(100, 100), &geometry_50x30()).unwrap();
        assert_eq!(composed.width_px, 591);
        assert_eq!(composed.height_px, 354);
    }

    #[test]
    fn wide_source_is_bounded_by_canvas_width() {
        let composed = compose(&png_of(2000, 100), &geometry_50x30()).unwrap();
        // The canvas is always the full layout; decode it back and check the
        // artwork is centered with white bands above and below.
        let canvas = image::load_from_memory(&composed.png).unwrap().to_rgb8();
        assert_eq!(canvas.get_pixel(0, 0), &image::Rgb([255, 255, 255]));
        let mid = canvas.get_pixel(295, 177);
        assert_eq!(mid, &image::Rgb([10, 20, 30]));
    }

    #[test]
    fn garbage_bytes_are_an_image_error() {
        assert!(matches!(
            compose(b"not an image", &geometry_50x30()),
            Err(RenderError::Image(_))
        ));
    }
}
