//! Delimiter auto-detection for delimited-text files.

/// Candidate delimiters, in tie-breaking order.
pub const CANDIDATE_DELIMITERS: [u8; 6] = [b',', b';', b'\t', b'|', b' ', b':'];

/// How much of the file is inspected when detecting the delimiter.
const SAMPLE_SIZE: usize = 1024;

/// Picks the candidate delimiter with the highest occurrence count in a
/// sample of the content. Ties resolve to the earlier candidate, and a sample
/// containing none of the candidates defaults to a comma.
pub fn detect_delimiter(content: &str) -> u8 {
    // Candidates are all ASCII, so counting over raw bytes is safe even if
    // the sample boundary splits a multi-byte character.
    let bytes = content.as_bytes();
    let sample = &bytes[..bytes.len().min(SAMPLE_SIZE)];

    let mut best = b',';
    let mut best_count = 0usize;
    for candidate in CANDIDATE_DELIMITERS {
        let count = sample.iter().filter(|&&b| b == candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}
