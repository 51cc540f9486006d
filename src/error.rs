use std::io;

use thiserror::Error;

/// Fatal parse failures surfaced to callers.
///
/// Everything else the parsers encounter is reported through the dataset
/// itself: cap truncation and cancellation set `is_partial`, malformed
/// quoting degrades to best-effort tokenization, and mapping validation
/// returns a structured report. Only the two conditions below abort a parse.
#[derive(Debug, Error)]
pub enum IngestError {
    /// No usable lines remained after blank-line filtering.
    #[error("'{filename}' contains no usable rows (empty or blank file)")]
    EmptyFile { filename: String },
    /// The underlying reader failed mid-stream; the cause is attached.
    #[error("reading '{filename}' failed after {rows_read} row(s)")]
    StreamRead {
        filename: String,
        rows_read: usize,
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_names_the_input() {
        let err = IngestError::EmptyFile {
            filename: "q3.csv".to_string(),
        };
        assert!(err.to_string().contains("q3.csv"));
    }

    #[test]
    fn stream_read_preserves_source() {
        let err = IngestError::StreamRead {
            filename: "ledger.csv".to_string(),
            rows_read: 120,
            source: io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"),
        };
        assert!(err.to_string().contains("120"));
        let source = std::error::Error::source(&err).expect("io cause attached");
        assert!(source.to_string().contains("pipe closed"));
    }
}
