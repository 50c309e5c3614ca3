//! Dataset metadata and cell records.

use labelsmith_types::{DatasetId, OwnerId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of an uploaded dataset. Terminal states are `Completed` and
/// `Error`; a completed dataset's records are immutable until re-ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetStatus {
    Uploading,
    Processing,
    Completed,
    Error,
}

impl fmt::Display for DatasetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DatasetStatus::Uploading => "uploading",
            DatasetStatus::Processing => "processing",
            DatasetStatus::Completed => "completed",
            DatasetStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// Requested delimiter for delimited-text sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelimiterSpec {
    /// Detect from a content sample.
    Auto,
    Char(u8),
}

/// Sheet selection for spreadsheet sources. A named sheet that does not exist
/// falls back to the first sheet with a warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetSelector {
    First,
    Named(String),
}

/// Declared source format of an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    Delimited { delimiter: DelimiterSpec },
    Spreadsheet { sheet: SheetSelector },
}

/// Inferred or declared column type. Ingestion declares everything as text;
/// richer inference is a consumer concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    #[default]
    Text,
    Number,
    Date,
}

/// One column of a dataset. Unique per (dataset, column number).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// 1-based column number.
    pub column: u32,
    pub name: String,
    pub data_type: ColumnType,
    pub required: bool,
}

/// One cell of a dataset, ordered by (row, column). Row and column numbers
/// are 1-based; row 1 is the first data row (the header row is consumed into
/// column names, not stored).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellRecord {
    pub row: u32,
    pub column: u32,
    pub value: String,
}

/// Metadata for one ingested tabular file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedDataset {
    pub id: DatasetId,
    pub filename: String,
    pub format: SourceFormat,
    pub has_header: bool,
    /// Number of data rows (header excluded).
    pub row_count: u32,
    pub column_count: u32,
    pub status: DatasetStatus,
    pub error: Option<String>,
    pub owner: OwnerId,
}

impl UploadedDataset {
    pub fn is_completed(&self) -> bool {
        self.status == DatasetStatus::Completed
    }
}

/// Synthesized name for a column without a header: "Column {n}".
pub(crate) fn synthesized_column_name(column: u32) -> String {
    format!("Column {column}")
}
