//! Spreadsheet parsing (xlsx, xls, ods) into a raw row grid.

use crate::dataset::SheetSelector;
use crate::error::IngestError;
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use std::io::Cursor;

/// Parses a spreadsheet from raw bytes. Returns the row grid and the name of
/// the sheet that was actually read. A requested sheet that does not exist
/// falls back to the first sheet.
pub fn parse_spreadsheet(
    bytes: &[u8],
    sheet: &SheetSelector,
) -> Result<(Vec<Vec<String>>, String), IngestError> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook =
        open_workbook_auto_from_rs(cursor).map_err(|e| IngestError::Spreadsheet(e.to_string()))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let first = sheet_names.first().cloned().ok_or(IngestError::Empty)?;

    let chosen = match sheet {
        SheetSelector::Named(name) if sheet_names.iter().any(|s| s == name) => name.clone(),
        SheetSelector::Named(name) => {
            log::warn!("sheet '{name}' not found, falling back to first sheet '{first}'");
            first
        }
        SheetSelector::First => first,
    };

    let range = workbook
        .worksheet_range(&chosen)
        .map_err(|e| IngestError::Spreadsheet(e.to_string()))?;

    let rows = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>())
        .collect();
    Ok((rows, chosen))
}

/// Stringifies a cell. Integral floats lose the trailing `.0` so that numeric
/// columns round-trip the way users typed them.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
