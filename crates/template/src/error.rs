use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("print width ({print} mm) exceeds layout width ({layout} mm)")]
    PrintWidthExceedsLayout { print: f32, layout: f32 },

    #[error("print height ({print} mm) exceeds layout height ({layout} mm)")]
    PrintHeightExceedsLayout { print: f32, layout: f32 },

    #[error(
        "left and right margins ({margins} mm) plus print width ({print} mm) exceed layout width ({layout} mm)"
    )]
    HorizontalOverflow { margins: f32, print: f32, layout: f32 },

    #[error(
        "top and bottom margins ({margins} mm) plus print height ({print} mm) exceed layout height ({layout} mm)"
    )]
    VerticalOverflow { margins: f32, print: f32, layout: f32 },

    #[error("dimensions must be positive, got {0} mm")]
    NonPositiveDimension(f32),

    #[error("margins must be non-negative, got {0} mm")]
    NegativeMargin(f32),

    #[error("DPI must be positive")]
    ZeroDpi,

    #[error("field '{name}': {reason}")]
    InvalidField { name: String, reason: String },

    #[error("duplicate field name '{0}'")]
    DuplicateField(String),

    #[error("template declares {kind} background but no artwork was supplied")]
    MissingArtwork { kind: &'static str },

    #[error("could not read artwork: {0}")]
    Artwork(String),
}
