//! Background artwork probing.
//!
//! Reads just enough of the artwork to learn its native dimensions, so that
//! template geometry can be derived before anything is persisted.

use crate::error::TemplateError;
use crate::geometry::TemplateGeometry;
use resvg::usvg;
use serde::{Deserialize, Serialize};

/// Closed set of background kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundKind {
    /// SVG document; rendered as vector drawing commands where possible.
    Vector,
    /// Raster image (PNG, JPEG, GIF).
    Raster,
    /// Blank template, no artwork.
    #[default]
    None,
}

impl BackgroundKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BackgroundKind::Vector => "vector",
            BackgroundKind::Raster => "raster",
            BackgroundKind::None => "none",
        }
    }
}

/// Native pixel dimensions of artwork bytes. Vector sizes are the SVG view
/// size rounded to whole pixels.
pub fn probe_dimensions(bytes: &[u8], kind: BackgroundKind) -> Result<(u32, u32), TemplateError> {
    match kind {
        BackgroundKind::Raster => {
            let img = image::load_from_memory(bytes)
                .map_err(|e| TemplateError::Artwork(e.to_string()))?;
            Ok((img.width(), img.height()))
        }
        BackgroundKind::Vector => {
            let tree = usvg::Tree::from_data(bytes, &usvg::Options::default())
                .map_err(|e| TemplateError::Artwork(e.to_string()))?;
            let size = tree.size();
            Ok((
                size.width().round().max(1.0) as u32,
                size.height().round().max(1.0) as u32,
            ))
        }
        BackgroundKind::None => Err(TemplateError::MissingArtwork { kind: "none" }),
    }
}

/// Derives template geometry from artwork: probe the native size, convert
/// px → mm at the given DPI. Print and layout coincide and margins are zero,
/// matching how uploaded artwork is sized before an operator adjusts it.
pub fn geometry_from_artwork(
    bytes: &[u8],
    kind: BackgroundKind,
    dpi: u32,
) -> Result<TemplateGeometry, TemplateError> {
    let (width_px, height_px) = probe_dimensions(bytes, kind)?;
    TemplateGeometry::from_pixels(width_px, height_px, dpi)
}
