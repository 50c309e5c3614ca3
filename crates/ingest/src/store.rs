//! In-memory dataset store and the row-store adapter.
//!
//! Persistence backends are out of scope for the core; this store is the seam
//! where one would attach. It owns dataset metadata, column descriptors and
//! cell records, and exposes ingested data as an ordered sequence of rows.

use crate::dataset::{
    CellRecord, ColumnDescriptor, ColumnType, DatasetStatus, DelimiterSpec, SheetSelector,
    SourceFormat, UploadedDataset, synthesized_column_name,
};
use crate::decode::decode_bytes;
use crate::delimited::parse_delimited;
use crate::detect::detect_delimiter;
use crate::error::IngestError;
use crate::spreadsheet::parse_spreadsheet;
use labelsmith_types::{DatasetId, OwnerId};
use std::collections::BTreeMap;

/// Column number → cell value for one data row.
pub type RowValues = BTreeMap<u32, String>;

/// One data row with its 1-based row number.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberedRow {
    pub row: u32,
    pub values: RowValues,
}

/// What an ingestion run produced, for callers that report back to users.
#[derive(Debug, Clone)]
pub struct IngestSummary {
    pub row_count: u32,
    pub column_count: u32,
    pub headers: Vec<String>,
    /// The delimiter actually used (after auto-detection), for delimited input.
    pub delimiter: Option<u8>,
    /// The sheet actually read, for spreadsheet input.
    pub sheet: Option<String>,
}

#[derive(Debug)]
struct DatasetRecord {
    meta: UploadedDataset,
    columns: Vec<ColumnDescriptor>,
    cells: Vec<CellRecord>,
}

/// Owns all ingested datasets.
#[derive(Debug, Default)]
pub struct DatasetStore {
    next_id: u64,
    datasets: BTreeMap<DatasetId, DatasetRecord>,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new dataset in `uploading` status.
    pub fn create_dataset(
        &mut self,
        filename: impl Into<String>,
        format: SourceFormat,
        has_header: bool,
        owner: OwnerId,
    ) -> DatasetId {
        self.next_id += 1;
        let id = DatasetId::new(self.next_id);
        let meta = UploadedDataset {
            id,
            filename: filename.into(),
            format,
            has_header,
            row_count: 0,
            column_count: 0,
            status: DatasetStatus::Uploading,
            error: None,
            owner,
        };
        self.datasets.insert(
            id,
            DatasetRecord {
                meta,
                columns: Vec::new(),
                cells: Vec::new(),
            },
        );
        id
    }

    /// Parses the raw bytes of a dataset and persists its cells and columns.
    ///
    /// Status moves `uploading → processing → completed`, or to `error` with
    /// the failure message recorded. Prior records for the dataset are
    /// discarded before new ones are written, so a failed run never leaves
    /// partial data behind.
    pub fn ingest(&mut self, id: DatasetId, bytes: &[u8]) -> Result<IngestSummary, IngestError> {
        let record = self
            .datasets
            .get_mut(&id)
            .ok_or(IngestError::UnknownDataset(id))?;
        record.meta.status = DatasetStatus::Processing;
        record.meta.error = None;
        record.columns.clear();
        record.cells.clear();

        match process(bytes, &record.meta.format, record.meta.has_header) {
            Ok(processed) => {
                record.meta.row_count = processed.row_count;
                record.meta.column_count = processed.column_count;
                record.meta.format = processed.resolved_format;
                record.meta.status = DatasetStatus::Completed;
                record.columns = processed.columns;
                record.cells = processed.cells;
                log::info!(
                    "dataset {id}: ingested {} rows x {} columns",
                    processed.row_count,
                    processed.column_count
                );
                Ok(processed.summary)
            }
            Err(e) => {
                record.meta.status = DatasetStatus::Error;
                record.meta.error = Some(e.to_string());
                log::error!("dataset {id}: ingestion failed: {e}");
                Err(e)
            }
        }
    }

    pub fn dataset(&self, id: DatasetId) -> Result<&UploadedDataset, IngestError> {
        self.datasets
            .get(&id)
            .map(|r| &r.meta)
            .ok_or(IngestError::UnknownDataset(id))
    }

    pub fn columns(&self, id: DatasetId) -> Result<&[ColumnDescriptor], IngestError> {
        self.datasets
            .get(&id)
            .map(|r| r.columns.as_slice())
            .ok_or(IngestError::UnknownDataset(id))
    }

    /// Returns data rows in `[start, end]` (1-based, inclusive), ordered by
    /// row number, each as a column → value map. Requires a completed
    /// dataset.
    pub fn rows_in_range(
        &self,
        id: DatasetId,
        start: u32,
        end: u32,
    ) -> Result<Vec<NumberedRow>, IngestError> {
        let record = self.datasets.get(&id).ok_or(IngestError::UnknownDataset(id))?;
        if record.meta.status != DatasetStatus::Completed {
            return Err(IngestError::WrongStatus {
                id,
                status: record.meta.status.to_string(),
                expected: DatasetStatus::Completed.to_string(),
            });
        }

        let mut rows: Vec<NumberedRow> = Vec::new();
        for cell in &record.cells {
            if cell.row < start || cell.row > end {
                continue;
            }
            match rows.last_mut() {
                Some(current) if current.row == cell.row => {
                    current.values.insert(cell.column, cell.value.clone());
                }
                _ => {
                    let mut values = RowValues::new();
                    values.insert(cell.column, cell.value.clone());
                    rows.push(NumberedRow {
                        row: cell.row,
                        values,
                    });
                }
            }
        }
        Ok(rows)
    }
}

struct Processed {
    row_count: u32,
    column_count: u32,
    columns: Vec<ColumnDescriptor>,
    cells: Vec<CellRecord>,
    resolved_format: SourceFormat,
    summary: IngestSummary,
}

fn process(
    bytes: &[u8],
    format: &SourceFormat,
    has_header: bool,
) -> Result<Processed, IngestError> {
    let (rows, resolved_format, delimiter, sheet) = match format {
        SourceFormat::Delimited { delimiter } => {
            let text = decode_bytes(bytes)?;
            let delim = match delimiter {
                DelimiterSpec::Auto => detect_delimiter(&text),
                DelimiterSpec::Char(c) => *c,
            };
            let rows = parse_delimited(&text, delim)?;
            (
                rows,
                SourceFormat::Delimited {
                    delimiter: DelimiterSpec::Char(delim),
                },
                Some(delim),
                None,
            )
        }
        SourceFormat::Spreadsheet { sheet } => {
            let (rows, chosen) = parse_spreadsheet(bytes, sheet)?;
            (
                rows,
                SourceFormat::Spreadsheet {
                    sheet: SheetSelector::Named(chosen.clone()),
                },
                None,
                Some(chosen),
            )
        }
    };

    if rows.is_empty() {
        return Err(IngestError::Empty);
    }

    let column_count = rows[0].len() as u32;
    for (i, row) in rows.iter().enumerate() {
        if row.len() as u32 != column_count {
            return Err(IngestError::SchemaMismatch {
                row: i as u32 + 1,
                expected: column_count,
                actual: row.len() as u32,
            });
        }
    }

    let (headers, data_rows) = if has_header {
        let headers: Vec<String> = rows[0]
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let trimmed = h.trim();
                if trimmed.is_empty() {
                    synthesized_column_name(i as u32 + 1)
                } else {
                    trimmed.to_string()
                }
            })
            .collect();
        (headers, &rows[1..])
    } else {
        let headers = (1..=column_count).map(synthesized_column_name).collect();
        (headers, &rows[..])
    };

    let columns: Vec<ColumnDescriptor> = headers
        .iter()
        .enumerate()
        .map(|(i, name)| ColumnDescriptor {
            column: i as u32 + 1,
            name: name.clone(),
            data_type: ColumnType::Text,
            required: false,
        })
        .collect();

    // Data rows are renumbered from 1; the header row is consumed, not stored.
    let mut cells = Vec::with_capacity(data_rows.len() * column_count as usize);
    for (row_index, row) in data_rows.iter().enumerate() {
        for (col_index, value) in row.iter().enumerate() {
            cells.push(CellRecord {
                row: row_index as u32 + 1,
                column: col_index as u32 + 1,
                value: value.clone(),
            });
        }
    }

    let row_count = data_rows.len() as u32;
    Ok(Processed {
        row_count,
        column_count,
        columns,
        cells,
        resolved_format,
        summary: IngestSummary {
            row_count,
            column_count,
            headers,
            delimiter,
            sheet,
        },
    })
}
