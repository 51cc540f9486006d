use anyhow::Result;
use log::info;

use crate::cli::PreviewArgs;
use crate::dataset::{Column, ParsedDataset};
use crate::infer::CellType;
use crate::ingest::{IngestOptions, parse_path};
use crate::io_utils;
use crate::table::{self, Align};

pub fn execute(args: &PreviewArgs) -> Result<()> {
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let options = IngestOptions {
        delimiter: args.delimiter,
        encoding,
        max_rows: Some(args.rows),
        ..IngestOptions::default()
    };
    let dataset = parse_path(&args.input, &options)?;

    print_column_summary(&dataset);
    println!();

    let headers: Vec<String> = dataset
        .columns
        .iter()
        .map(|column| format!("{} [{}]", column.original_name, column.inferred_type))
        .collect();
    let aligns: Vec<Align> = dataset
        .columns
        .iter()
        .map(|column| match column.inferred_type {
            CellType::Numeric => Align::Right,
            _ => Align::Left,
        })
        .collect();
    let rows: Vec<Vec<String>> = dataset
        .rows
        .iter()
        .map(|row| {
            dataset
                .columns
                .iter()
                .map(|column| {
                    let raw = row.get(&column.original_name).cloned().unwrap_or_default();
                    display_cell(column, &raw)
                })
                .collect()
        })
        .collect();

    table::print_table_with(&headers, &rows, &aligns);
    if dataset.is_partial {
        info!(
            "Displayed {} of {} row(s) from {:?}",
            dataset.rows.len(),
            dataset.row_count,
            args.input
        );
    } else {
        info!("Displayed {} row(s) from {:?}", dataset.rows.len(), args.input);
    }
    log_unmapped(&dataset);
    Ok(())
}

/// One line per column: name, inferred type, suggested standard field, and
/// the first sample value.
fn print_column_summary(dataset: &ParsedDataset) {
    let headers: Vec<String> = ["Column", "Type", "Suggested Field", "Sample"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    let rows: Vec<Vec<String>> = dataset
        .columns
        .iter()
        .map(|column| {
            vec![
                column.original_name.clone(),
                column.inferred_type.to_string(),
                column
                    .suggested_field
                    .map(|field| field.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                column.sample_values.first().cloned().unwrap_or_default(),
            ]
        })
        .collect();
    table::print_table_with(&headers, &rows, &[]);
}

/// Canonical rendering under the column's inferred type; cells that do not
/// parse fall back to their raw text.
fn display_cell(column: &Column, raw: &str) -> String {
    match column.typed_value(raw) {
        Ok(Some(value)) => value.to_string(),
        _ => raw.to_string(),
    }
}

fn log_unmapped(dataset: &ParsedDataset) {
    let unmapped: Vec<&str> = dataset
        .columns
        .iter()
        .filter(|column| column.suggested_field.is_none())
        .map(|column| column.original_name.as_str())
        .collect();
    if !unmapped.is_empty() {
        info!("No field suggestion for column(s): {}", unmapped.join(", "));
    }
}
