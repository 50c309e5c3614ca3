pub mod geometry;
pub mod ids;
pub mod units;

pub use geometry::{Size, center_offset, fit_scale};
pub use ids::{DatasetId, JobId, OwnerId, TemplateId};
pub use units::{MM_PER_INCH, MM_TO_PT, mm_to_pt, mm_to_px, px_to_mm};
