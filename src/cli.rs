use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::ingest::STREAM_SIZE_THRESHOLD;
use crate::stream::{DEFAULT_CHUNK_ROWS, DEFAULT_ROW_CAP};

#[derive(Debug, Parser)]
#[command(author, version, about = "Ingest CSV files for financial KPI pipelines", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parse a CSV file into a typed dataset with suggested field mappings
    Ingest(IngestArgs),
    /// Show the first rows of a CSV file as an aligned text table
    Preview(PreviewArgs),
    /// List the standard financial field catalog
    Fields(FieldsArgs),
    /// Suggest a standard-field mapping for a CSV file's columns
    Map(MapArgs),
    /// Validate a mapping file for completeness and duplicate columns
    Validate(ValidateArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum ModeArg {
    Auto,
    Bounded,
    Streaming,
}

impl Default for ModeArg {
    fn default() -> Self {
        ModeArg::Auto
    }
}

#[derive(Debug, Args)]
pub struct IngestArgs {
    /// Input CSV file to ingest ('-' reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Destination JSON file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Materialize at most this many rows as a preview
    #[arg(long = "max-rows")]
    pub max_rows: Option<usize>,
    /// Parse path selection; auto decides by file size
    #[arg(long, value_enum, default_value = "auto")]
    pub mode: ModeArg,
    /// File size in bytes at or above which auto mode streams
    #[arg(long = "threshold-bytes", default_value_t = STREAM_SIZE_THRESHOLD)]
    pub threshold_bytes: u64,
    /// Hard cap on materialized rows in streaming mode
    #[arg(long = "row-cap", default_value_t = DEFAULT_ROW_CAP)]
    pub row_cap: usize,
    /// Rows per streaming chunk between progress updates
    #[arg(long = "chunk-rows", default_value_t = DEFAULT_CHUNK_ROWS)]
    pub chunk_rows: usize,
    /// Suppress per-chunk progress logging
    #[arg(long = "no-progress")]
    pub no_progress: bool,
    /// Field delimiter: 'tab', 'comma', 'pipe', 'semicolon', or one ASCII character
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Encoding label for the input bytes (utf-8 when omitted)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Exclude row data from the output, keeping column metadata and counts
    #[arg(long = "columns-only")]
    pub columns_only: bool,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Input CSV file to preview ('-' reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// How many data rows to render
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
    /// Field delimiter: 'tab', 'comma', 'pipe', 'semicolon', or one ASCII character
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Encoding label for the input bytes (utf-8 when omitted)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct FieldsArgs {
    /// Restrict the listing to one category
    /// (income_statement, balance_sheet, cash_flow, dimensions)
    #[arg(short = 'c', long)]
    pub category: Option<String>,
    /// Emit the catalog as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct MapArgs {
    /// Input CSV file to analyze ('-' reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Destination mapping JSON file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Rows to sample for type inference; 0 scans the whole file
    #[arg(long = "sample-rows", default_value_t = 200)]
    pub sample_rows: usize,
    /// Field delimiter: 'tab', 'comma', 'pipe', 'semicolon', or one ASCII character
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Encoding label for the input bytes (utf-8 when omitted)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Mapping JSON file to validate
    #[arg(short, long)]
    pub mapping: PathBuf,
    /// Standard fields that must be mapped (comma-separated ids, repeatable)
    #[arg(long = "require", value_delimiter = ',', action = clap::ArgAction::Append)]
    pub require: Vec<String>,
    /// Emit the validation report as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    let keyword = match value {
        "tab" | "\t" => Some(b'\t'),
        "comma" | "," => Some(b','),
        "pipe" | "|" => Some(b'|'),
        "semicolon" | ";" => Some(b';'),
        _ => None,
    };
    if let Some(byte) = keyword {
        return Ok(byte);
    }
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if ch.is_ascii() => Ok(ch as u8),
        (Some(_), None) => Err(format!("delimiter '{value}' is not an ASCII character")),
        (Some(_), Some(_)) => Err("delimiter must be a single character".to_string()),
        (None, _) => Err("delimiter cannot be empty".to_string()),
    }
}
