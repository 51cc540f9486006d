//! I/O utilities for ingest input handling.
//!
//! - **Delimiter resolution**: extension-based auto-detection (comma for
//!   `.csv`, tab for `.tsv`) with manual override support.
//! - **Encoding**: whole-input decoding for the bounded path and
//!   incrementally decoded readers for the streaming path, via
//!   `encoding_rs` / `encoding_rs_io`, defaulting to UTF-8.
//! - **stdin**: the `-` path convention routes through the standard stream.

use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

use anyhow::{Context, Result, anyhow, bail};
use encoding_rs::{Encoding, UTF_8};
use encoding_rs_io::DecodeReaderBytesBuilder;

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn is_dash(path: &Path) -> bool {
    path.as_os_str() == "-"
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    let Some(value) = label else {
        return Ok(UTF_8);
    };
    Encoding::for_label(value.trim().as_bytes())
        .ok_or_else(|| anyhow!("unrecognized encoding label '{value}'"))
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    if let Some(byte) = provided {
        return byte;
    }
    let is_tsv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("tsv"));
    if is_tsv {
        DEFAULT_TSV_DELIMITER
    } else {
        DEFAULT_CSV_DELIMITER
    }
}

/// Name recorded on the parsed dataset: the file's base name, or `stdin`
/// for the dash convention.
pub fn display_name(path: &Path) -> String {
    if is_dash(path) {
        return "stdin".to_string();
    }
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Byte size of a regular file input; `None` for stdin.
pub fn input_size(path: &Path) -> Result<Option<u64>> {
    if is_dash(path) {
        return Ok(None);
    }
    let meta = std::fs::metadata(path)
        .with_context(|| format!("Reading metadata for input file {path:?}"))?;
    Ok(Some(meta.len()))
}

fn open_raw(path: &Path) -> Result<Box<dyn Read>> {
    if is_dash(path) {
        Ok(Box::new(std::io::stdin().lock()))
    } else {
        let file = File::open(path).with_context(|| format!("Opening input file {path:?}"))?;
        Ok(Box::new(file))
    }
}

/// Entire input decoded to a string, for the bounded parse path.
pub fn read_decoded(path: &Path, encoding: &'static Encoding) -> Result<String> {
    let mut bytes = Vec::new();
    open_raw(path)?
        .read_to_end(&mut bytes)
        .with_context(|| format!("Reading input file {path:?}"))?;
    decode_bytes(&bytes, encoding)
}

/// Buffered reader yielding UTF-8 regardless of source encoding, for the
/// streaming parse path. A leading BOM takes precedence over `encoding`.
pub fn open_decoded_reader(path: &Path, encoding: &'static Encoding) -> Result<Box<dyn BufRead>> {
    let decoder = DecodeReaderBytesBuilder::new()
        .encoding(Some(encoding))
        .bom_override(true)
        .build(open_raw(path)?);
    Ok(Box::new(BufReader::new(decoder)))
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        bail!("input is not valid {} text", encoding.name());
    }
    Ok(text.into_owned())
}
