//! Delimited-text parsing into a raw row grid.

use crate::error::IngestError;

/// Parses decoded text with the given delimiter into rows of trimmed cell
/// strings. Quoting follows CSV conventions regardless of the delimiter.
/// Column-count consistency is checked by the caller so that the error can
/// name the source row.
pub fn parse_delimited(content: &str, delimiter: u8) -> Result<Vec<Vec<String>>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|cell| cell.trim().to_string())
                .collect::<Vec<_>>(),
        );
    }
    Ok(rows)
}
