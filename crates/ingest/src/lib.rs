//! Tabular file ingestion.
//!
//! Parses delimited-text and spreadsheet files into normalized cell records:
//! delimiter/sheet detection, legacy-encoding fallback, header handling and
//! column-count consistency checks, with an in-memory row store exposing the
//! ingested data as ordered rows.

mod dataset;
mod decode;
mod delimited;
mod detect;
mod error;
mod spreadsheet;
mod store;

pub use dataset::{
    CellRecord, ColumnDescriptor, ColumnType, DatasetStatus, DelimiterSpec, SheetSelector,
    SourceFormat, UploadedDataset,
};
pub use decode::decode_bytes;
pub use detect::{CANDIDATE_DELIMITERS, detect_delimiter};
pub use error::IngestError;
pub use store::{DatasetStore, IngestSummary, NumberedRow, RowValues};
