//! Chunked streaming parser for large inputs.
//!
//! Reads line by line from any buffered source, materializing rows up to a
//! hard cap and surfacing progress after every chunk. Hitting the cap or a
//! caller-raised cancel flag stops consumption at the next boundary and
//! returns whatever accumulated with `is_partial = true`; partial results
//! are successes here, never errors. Type inference runs once at the end
//! over the materialized rows.

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::dataset::ParsedDataset;
use crate::error::IngestError;
use crate::tokenize::{is_blank_line, tokenize_line, trim_line_ending};

/// Hard materialization cap protecting memory on unbounded inputs.
pub const DEFAULT_ROW_CAP: usize = 500_000;
/// Rows per chunk between progress and cancellation checks.
pub const DEFAULT_CHUNK_ROWS: usize = 5_000;

#[derive(Debug, Clone, Copy)]
pub struct StreamOptions<'a> {
    pub row_cap: usize,
    pub chunk_rows: usize,
    /// Source size in bytes when known, used only to estimate total rows
    /// for progress reporting.
    pub total_bytes: Option<u64>,
    /// Caller-owned abort signal, checked at chunk boundaries.
    pub cancel: Option<&'a AtomicBool>,
}

impl Default for StreamOptions<'_> {
    fn default() -> Self {
        StreamOptions {
            row_cap: DEFAULT_ROW_CAP,
            chunk_rows: DEFAULT_CHUNK_ROWS,
            total_bytes: None,
            cancel: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub rows_processed: usize,
    /// Rough projection from byte throughput; non-binding, display only.
    pub estimated_total: Option<usize>,
}

pub fn parse_reader<R: BufRead>(
    mut reader: R,
    filename: &str,
    delimiter: u8,
    options: &StreamOptions<'_>,
    mut on_progress: impl FnMut(Progress),
) -> Result<ParsedDataset, IngestError> {
    let chunk_rows = options.chunk_rows.max(1);
    let mut line = String::new();

    let mut header_bytes = 0u64;
    let header = loop {
        let n = read_line(&mut reader, &mut line, filename, 0)?;
        if n == 0 {
            return Err(IngestError::EmptyFile {
                filename: filename.to_string(),
            });
        }
        header_bytes += n as u64;
        let trimmed = trim_line_ending(&line);
        if !is_blank_line(trimmed) {
            break tokenize_line(trimmed, delimiter);
        }
    };

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    let mut lines_seen = 0usize;
    let mut data_bytes = 0u64;
    let mut pending_chunk = 0usize;
    let mut stopped_early = false;

    loop {
        let n = read_line(&mut reader, &mut line, filename, raw_rows.len())?;
        if n == 0 {
            break;
        }
        let trimmed = trim_line_ending(&line);
        if is_blank_line(trimmed) {
            continue;
        }
        lines_seen += 1;
        data_bytes += n as u64;
        if raw_rows.len() >= options.row_cap {
            // The line that tripped the cap is counted but not materialized,
            // so the result always reports partial.
            stopped_early = true;
            break;
        }
        raw_rows.push(tokenize_line(trimmed, delimiter));
        pending_chunk += 1;

        if pending_chunk == chunk_rows {
            pending_chunk = 0;
            on_progress(Progress {
                rows_processed: raw_rows.len(),
                estimated_total: estimate_total(
                    options.total_bytes,
                    header_bytes,
                    data_bytes,
                    lines_seen,
                ),
            });
            if options.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                // One probe read distinguishes a mid-file stop from a cancel
                // that landed exactly at end of input.
                if let Some(bytes) =
                    probe_data_line(&mut reader, &mut line, filename, raw_rows.len())?
                {
                    lines_seen += 1;
                    data_bytes += bytes;
                    stopped_early = true;
                }
                break;
            }
        }
    }

    if pending_chunk > 0 {
        on_progress(Progress {
            rows_processed: raw_rows.len(),
            estimated_total: estimate_total(
                options.total_bytes,
                header_bytes,
                data_bytes,
                lines_seen,
            ),
        });
    }

    let mut row_count = lines_seen;
    if stopped_early
        && let Some(estimate) = estimate_total(options.total_bytes, header_bytes, data_bytes, lines_seen)
    {
        row_count = row_count.max(estimate);
    }

    Ok(ParsedDataset::assemble(filename, &header, raw_rows, row_count))
}

fn read_line<R: BufRead>(
    reader: &mut R,
    line: &mut String,
    filename: &str,
    rows_read: usize,
) -> Result<usize, IngestError> {
    line.clear();
    reader
        .read_line(line)
        .map_err(|source| IngestError::StreamRead {
            filename: filename.to_string(),
            rows_read,
            source,
        })
}

/// Reads forward to the next non-blank line. `Some(bytes)` means more data
/// exists beyond what was materialized; `None` means end of input.
fn probe_data_line<R: BufRead>(
    reader: &mut R,
    line: &mut String,
    filename: &str,
    rows_read: usize,
) -> Result<Option<u64>, IngestError> {
    loop {
        let n = read_line(reader, line, filename, rows_read)?;
        if n == 0 {
            return Ok(None);
        }
        if !is_blank_line(trim_line_ending(line)) {
            return Ok(Some(n as u64));
        }
    }
}

/// Projects total data rows from bytes consumed so far. Clamped below by
/// rows already seen so the projection never runs backwards.
fn estimate_total(
    total_bytes: Option<u64>,
    header_bytes: u64,
    data_bytes: u64,
    lines_seen: usize,
) -> Option<usize> {
    let total = total_bytes?;
    if data_bytes == 0 || lines_seen == 0 {
        return None;
    }
    let data_total = total.saturating_sub(header_bytes);
    // Widen before multiplying: total_bytes is caller-supplied and may be
    // huge enough to overflow a u64 product.
    let projected = u128::from(data_total) * lines_seen as u128 / u128::from(data_bytes);
    let projected = usize::try_from(projected).unwrap_or(usize::MAX);
    Some(projected.max(lines_seen))
}
