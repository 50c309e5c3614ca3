use labelsmith_ingest::IngestError;
use labelsmith_render::RenderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerationError {
    /// Start preconditions failed; the job stays pending. Each reason is a
    /// self-contained human-readable sentence.
    #[error("job cannot start: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("job was cancelled")]
    Cancelled,

    #[error("invalid job transition: {from} -> {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
