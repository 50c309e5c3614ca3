//! Byte-stream decoding with legacy-encoding fallback.
//!
//! UTF-8 is attempted first; files exported from older spreadsheet tooling
//! commonly arrive as windows-1251 or windows-1252, so those are tried next,
//! in that fixed order.

use crate::error::IngestError;
use encoding_rs::{Encoding, UTF_8, WINDOWS_1251, WINDOWS_1252};
use std::borrow::Cow;

const FALLBACK_CHAIN: &[&Encoding] = &[UTF_8, WINDOWS_1251, WINDOWS_1252];

/// Decodes raw bytes into text, trying each encoding of the fallback chain in
/// order. A UTF-8 BOM is stripped. Returns `IngestError::Decode` only when
/// every decoder reports malformed input.
pub fn decode_bytes(bytes: &[u8]) -> Result<Cow<'_, str>, IngestError> {
    for encoding in FALLBACK_CHAIN {
        let (text, actual, had_errors) = encoding.decode(bytes);
        if !had_errors {
            if actual != UTF_8 {
                log::debug!("decoded input as {}", actual.name());
            }
            return Ok(text);
        }
    }
    let tried = FALLBACK_CHAIN
        .iter()
        .map(|e| e.name())
        .collect::<Vec<_>>()
        .join(", ");
    Err(IngestError::Decode(tried))
}
