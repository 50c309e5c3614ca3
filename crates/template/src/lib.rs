//! Label template model.
//!
//! A template describes a label's physical geometry (print area, layout area,
//! margins, DPI — all in millimeters), its ordered positioned fields, and
//! optional background artwork (raster image or SVG document).

mod artwork;
mod error;
mod field;
mod geometry;
mod template;

pub use artwork::{BackgroundKind, geometry_from_artwork, probe_dimensions};
pub use error::TemplateError;
pub use field::{Alignment, FieldKind, FieldSpec, FontAttrs};
pub use geometry::{Margins, TemplateGeometry};
pub use template::LabelTemplate;
