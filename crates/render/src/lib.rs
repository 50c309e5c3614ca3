//! Per-row page rendering: positioned elements, background compositing,
//! DataMatrix symbols, and PDF document assembly.

pub mod background;
pub mod document;
pub mod element;
pub mod error;
pub mod symbology;
pub mod text;

pub use background::{CompositedBackground, PageBackground, composite_background};
pub use document::LabelDocumentRenderer;
pub use element::{ElementContent, ImageContent, PositionedElement, TextBlock};
pub use error::RenderError;
pub use symbology::datamatrix_symbol;
pub use text::{aligned_x, measure_text_width};
