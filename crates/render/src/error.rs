use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("vector artwork error: {0}")]
    Vector(String),

    /// The vector path hit a construct it cannot express as drawing
    /// commands; the compositor falls back to rasterization.
    #[error("vector drawing unsupported: {0}")]
    VectorUnsupported(&'static str),

    #[error("symbol generation failed: {0}")]
    Symbology(String),

    #[error("template declares a background but carries no artwork")]
    MissingArtwork,
}
