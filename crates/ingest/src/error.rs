use labelsmith_types::DatasetId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No decoder in the fallback chain accepted the input bytes.
    #[error("unsupported text encoding: tried {0}")]
    Decode(String),

    /// A row's cell count differs from the first row's. `row` is the 1-based
    /// row number in the source file, header included.
    #[error("row {row} has {actual} columns, expected {expected}")]
    SchemaMismatch { row: u32, expected: u32, actual: u32 },

    #[error("file contains no rows")]
    Empty,

    #[error("CSV parsing failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("unknown dataset: {0}")]
    UnknownDataset(DatasetId),

    /// The dataset is not in the status the operation requires.
    #[error("dataset {id} is {status}, expected {expected}")]
    WrongStatus {
        id: DatasetId,
        status: String,
        expected: String,
    },
}
