//! Background compositing.
//!
//! A template's artwork is prepared once per job and reused for every page.
//! Vector artwork is kept vector when its shapes can be re-emitted as drawing
//! commands; otherwise it is rasterized and composed like raster artwork.

mod raster;
mod vector;

use crate::element::ImageContent;
use crate::error::RenderError;
use labelsmith_template::{BackgroundKind, LabelTemplate};
use printpdf::ops::Op;

/// Prepared page background, ready to prepend to every page's content.
#[derive(Debug, Clone)]
pub enum PageBackground {
    None,
    /// Drawing commands in page space, one set reused per page.
    Vector(Vec<Op>),
    /// Composited image sized to the layout rectangle.
    Raster(ImageContent),
}

#[derive(Debug, Clone)]
pub struct CompositedBackground {
    pub background: PageBackground,
    /// Human-readable notes about degraded handling (e.g. raster fallback).
    pub notes: Vec<String>,
}

/// Prepares the template's background for rendering.
///
/// Vector artwork that cannot be drawn as commands falls back to a
/// rasterized rendition at three times native resolution; the degradation is
/// recorded in `notes`. Unreadable artwork is an error so the caller can
/// decide whether to proceed without a background.
pub fn composite_background(template: &LabelTemplate) -> Result<CompositedBackground, RenderError> {
    let geometry = template.geometry();
    match template.background_kind() {
        BackgroundKind::None => Ok(CompositedBackground {
            background: PageBackground::None,
            notes: Vec::new(),
        }),
        BackgroundKind::Raster => {
            let artwork = template.artwork().ok_or(RenderError::MissingArtwork)?;
            let image = raster::compose(artwork, geometry)?;
            Ok(CompositedBackground {
                background: PageBackground::Raster(image),
                notes: Vec::new(),
            })
        }
        BackgroundKind::Vector => {
            let artwork = template.artwork().ok_or(RenderError::MissingArtwork)?;
            let tree = vector::parse(artwork)?;
            match vector::vector_ops(&tree, geometry) {
                Ok(ops) => Ok(CompositedBackground {
                    background: PageBackground::Vector(ops),
                    notes: Vec::new(),
                }),
                Err(reason) => {
                    let note = format!(
                        "vector background could not be drawn ({reason}); using rasterized artwork"
                    );
                    log::warn!("{note}");
                    let image = vector::rasterize(&tree, geometry)?;
                    Ok(CompositedBackground {
                        background: PageBackground::Raster(image),
                        notes: vec![note],
                    })
                }
            }
        }
    }
}
