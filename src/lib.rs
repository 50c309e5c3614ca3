//! Batch label PDF generation.
//!
//! Ingests tabular data (delimited text or spreadsheets), binds dataset
//! columns to a positioned-field template, and renders one label page per
//! data row into a single PDF, with per-row failure isolation and a
//! structured per-job log.

pub mod definition;

pub use definition::{GeometryDefinition, JobDefinition};
pub use labelsmith_core::{
    CancelToken, FieldMapping, GenerationController, GenerationError, GenerationJob,
    GenerationLog, GenerationOutcome, GenerationRequest, JobStatus, ProgressHandle, RowRange,
};
pub use labelsmith_ingest::{
    DatasetStatus, DatasetStore, DelimiterSpec, IngestError, IngestSummary, SheetSelector,
    SourceFormat,
};
pub use labelsmith_render::RenderError;
pub use labelsmith_template::{
    Alignment, BackgroundKind, FieldKind, FieldSpec, FontAttrs, LabelTemplate, Margins,
    TemplateError, TemplateGeometry,
};
pub use labelsmith_types::{DatasetId, JobId, OwnerId, TemplateId};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabelsmithError {
    #[error("definition error: {0}")]
    Definition(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
