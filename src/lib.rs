pub mod bounded;
pub mod cli;
pub mod data;
pub mod dataset;
pub mod error;
pub mod fields;
pub mod infer;
pub mod ingest;
pub mod io_utils;
pub mod mapping;
pub mod preview;
pub mod stream;
pub mod table;
pub mod tokenize;

use std::{env, fs::File, path::Path, str::FromStr, sync::OnceLock};

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{LevelFilter, info, warn};
use serde::Serialize;

use crate::cli::{Cli, Commands, FieldsArgs, IngestArgs, MapArgs, ModeArg, ValidateArgs};
use crate::fields::{FieldCategory, StandardField};
use crate::ingest::{IngestOptions, ParseMode};
use crate::mapping::Mapping;

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("fincsv", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Ingest(args) => handle_ingest(&args),
        Commands::Preview(args) => preview::execute(&args),
        Commands::Fields(args) => handle_fields(&args),
        Commands::Map(args) => handle_map(&args),
        Commands::Validate(args) => handle_validate(&args),
    }
}

fn handle_ingest(args: &IngestArgs) -> Result<()> {
    info!(
        "Ingesting '{}' with delimiter '{}'",
        args.input.display(),
        printable_delimiter(io_utils::resolve_input_delimiter(&args.input, args.delimiter))
    );
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let options = IngestOptions {
        delimiter: args.delimiter,
        encoding,
        max_rows: args.max_rows,
        forced_mode: mode_override(args.mode),
        size_threshold: args.threshold_bytes,
        row_cap: args.row_cap,
        chunk_rows: args.chunk_rows,
        cancel: None,
        report_progress: !args.no_progress,
    };
    let dataset = ingest::parse_path(&args.input, &options)?;
    info!(
        "Parsed {} column(s), {} of {} row(s) from '{}'",
        dataset.columns.len(),
        dataset.parsed_row_count,
        dataset.row_count,
        dataset.filename
    );
    if args.columns_only {
        write_json(&dataset.summary(), args.output.as_deref())?;
    } else {
        write_json(&dataset, args.output.as_deref())?;
    }
    if let Some(path) = &args.output {
        info!("Dataset written to {path:?}");
    }
    Ok(())
}

fn handle_fields(args: &FieldsArgs) -> Result<()> {
    let category = args
        .category
        .as_deref()
        .map(FieldCategory::from_str)
        .transpose()?;

    if args.json {
        write_json(&fields::catalog_listing(category), None)?;
        return Ok(());
    }

    let headers: Vec<String> = ["Category", "Field", "Label", "Kind", "Aliases"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    let rows: Vec<Vec<String>> = fields::catalog_listing(category)
        .iter()
        .map(|entry| {
            vec![
                entry.category.label().to_string(),
                entry.id.to_string(),
                entry.label.to_string(),
                entry.value_kind.to_string(),
                entry.aliases.join(", "),
            ]
        })
        .collect();
    table::print_table_with(&headers, &rows, &[]);
    Ok(())
}

fn handle_map(args: &MapArgs) -> Result<()> {
    info!(
        "Mapping '{}' with delimiter '{}'",
        args.input.display(),
        printable_delimiter(io_utils::resolve_input_delimiter(&args.input, args.delimiter))
    );
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let options = IngestOptions {
        delimiter: args.delimiter,
        encoding,
        max_rows: (args.sample_rows > 0).then_some(args.sample_rows),
        ..IngestOptions::default()
    };
    let dataset = ingest::parse_path(&args.input, &options)?;
    let mapping = mapping::suggest_mapping(&dataset.columns);

    for (field, column) in mapping.iter() {
        info!("{} <- '{}'", field, column);
    }
    let unmapped: Vec<&str> = dataset
        .columns
        .iter()
        .filter(|column| column.suggested_field.is_none())
        .map(|column| column.original_name.as_str())
        .collect();
    if !unmapped.is_empty() {
        warn!("No suggestion for column(s): {}", unmapped.join(", "));
    }

    match &args.output {
        Some(path) => {
            mapping
                .save(path)
                .with_context(|| format!("Writing mapping to {path:?}"))?;
            info!("Mapping for {} field(s) written to {path:?}", mapping.len());
        }
        None => write_json(&mapping, None)?,
    }
    Ok(())
}

fn handle_validate(args: &ValidateArgs) -> Result<()> {
    let mapping = Mapping::load(&args.mapping)?;
    let required = args
        .require
        .iter()
        .map(|id| StandardField::from_str(id))
        .collect::<Result<Vec<_>>>()?;
    let report = mapping::validate(&mapping, &required);

    if args.json {
        write_json(&report, None)?;
    } else {
        for error in &report.errors {
            println!("error: {error}");
        }
        for warning in &report.warnings {
            println!("warning: {warning}");
        }
        if report.valid {
            info!(
                "Mapping {:?} is valid ({} field(s) mapped)",
                args.mapping,
                mapping.len()
            );
        }
    }

    if !report.valid {
        bail!(
            "mapping validation failed with {} error(s)",
            report.errors.len()
        );
    }
    Ok(())
}

fn mode_override(mode: ModeArg) -> Option<ParseMode> {
    match mode {
        ModeArg::Auto => None,
        ModeArg::Bounded => Some(ParseMode::Bounded),
        ModeArg::Streaming => Some(ParseMode::Streaming),
    }
}

fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Creating output file {path:?}"))?;
            serde_json::to_writer_pretty(file, value).context("Writing JSON output")
        }
        None => {
            let text = serde_json::to_string_pretty(value).context("Serializing JSON output")?;
            println!("{text}");
            Ok(())
        }
    }
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
