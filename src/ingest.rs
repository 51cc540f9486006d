//! File-level ingestion: resolves delimiter, encoding, and parse mode for an
//! input path, then runs the bounded or streaming parser.

use std::path::Path;
use std::sync::atomic::AtomicBool;

use anyhow::Result;
use encoding_rs::{Encoding, UTF_8};
use log::{debug, info};

use crate::bounded;
use crate::dataset::ParsedDataset;
use crate::io_utils::{self, display_name, input_size, open_decoded_reader, read_decoded};
use crate::stream::{self, DEFAULT_CHUNK_ROWS, DEFAULT_ROW_CAP, Progress, StreamOptions};

/// Files at or above this size take the streaming path.
pub const STREAM_SIZE_THRESHOLD: u64 = 5 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Bounded,
    Streaming,
}

#[derive(Debug, Clone, Copy)]
pub struct IngestOptions<'a> {
    pub delimiter: Option<u8>,
    pub encoding: &'static Encoding,
    /// Preview truncation; forces the bounded path unless a mode is forced.
    pub max_rows: Option<usize>,
    pub forced_mode: Option<ParseMode>,
    /// File size at or above which auto mode streams.
    pub size_threshold: u64,
    pub row_cap: usize,
    pub chunk_rows: usize,
    pub cancel: Option<&'a AtomicBool>,
    /// When false, per-chunk progress is not logged.
    pub report_progress: bool,
}

impl Default for IngestOptions<'_> {
    fn default() -> Self {
        IngestOptions {
            delimiter: None,
            encoding: UTF_8,
            max_rows: None,
            forced_mode: None,
            size_threshold: STREAM_SIZE_THRESHOLD,
            row_cap: DEFAULT_ROW_CAP,
            chunk_rows: DEFAULT_CHUNK_ROWS,
            cancel: None,
            report_progress: true,
        }
    }
}

/// Chooses the parse path. An explicit override wins; previews stay bounded;
/// otherwise the size threshold decides. Unknown sizes (stdin) stream, so
/// the row cap still bounds memory on pipes of arbitrary length.
pub fn resolve_parse_mode(
    forced: Option<ParseMode>,
    size: Option<u64>,
    max_rows: Option<usize>,
    threshold: u64,
) -> ParseMode {
    if let Some(mode) = forced {
        return mode;
    }
    if max_rows.is_some() {
        return ParseMode::Bounded;
    }
    match size {
        Some(bytes) if bytes < threshold => ParseMode::Bounded,
        _ => ParseMode::Streaming,
    }
}

pub fn parse_path(path: &Path, options: &IngestOptions<'_>) -> Result<ParsedDataset> {
    let delimiter = io_utils::resolve_input_delimiter(path, options.delimiter);
    let filename = display_name(path);
    let size = input_size(path)?;
    let mode = resolve_parse_mode(
        options.forced_mode,
        size,
        options.max_rows,
        options.size_threshold,
    );
    debug!("parsing {filename} in {mode:?} mode, size {size:?} bytes");

    let dataset = match mode {
        ParseMode::Bounded => {
            let text = read_decoded(path, options.encoding)?;
            bounded::parse_str(&text, &filename, delimiter, options.max_rows)?
        }
        ParseMode::Streaming => {
            let reader = open_decoded_reader(path, options.encoding)?;
            let stream_options = StreamOptions {
                row_cap: options.row_cap,
                chunk_rows: options.chunk_rows,
                total_bytes: size,
                cancel: options.cancel,
            };
            let report = options.report_progress;
            stream::parse_reader(reader, &filename, delimiter, &stream_options, |progress| {
                if report {
                    log_progress(progress);
                }
            })?
        }
    };

    if dataset.is_partial {
        info!(
            "{filename}: materialized {} of {} rows (partial result)",
            dataset.parsed_row_count, dataset.row_count
        );
    }
    Ok(dataset)
}

fn log_progress(progress: Progress) {
    match progress.estimated_total {
        Some(total) => info!("processed {} of ~{total} rows", progress.rows_processed),
        None => info!("processed {} rows", progress.rows_processed),
    }
}
