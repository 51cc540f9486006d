//! Dataset shapes shared by the bounded and streaming parsers.
//!
//! Cells stay raw strings after parsing; `Column.inferred_type` is advisory
//! metadata and typed views are produced only at the point of use.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::{CellValue, parse_typed_cell};
use crate::fields::{StandardField, sanitize_column_name, suggest_field};
use crate::infer::{CellType, column_samples, infer_cell_type};

/// How many leading values each column keeps for display.
pub const SAMPLE_VALUE_LIMIT: usize = 3;

/// One data line, keyed by the original header text. Every header key is
/// present; missing trailing cells are stored as empty strings.
pub type Row = BTreeMap<String, String>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,
    pub original_name: String,
    #[serde(rename = "type")]
    pub inferred_type: CellType,
    pub sample_values: Vec<String>,
    pub suggested_field: Option<StandardField>,
}

impl Column {
    /// Parses a raw cell under this column's inferred type. Empty cells are
    /// `None`, not an error.
    pub fn typed_value(&self, raw: &str) -> Result<Option<CellValue>> {
        parse_typed_cell(raw, self.inferred_type)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDataset {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    /// Data lines seen in the source, including any not materialized.
    pub row_count: usize,
    /// Rows actually materialized into `rows`.
    pub parsed_row_count: usize,
    pub filename: String,
    pub is_partial: bool,
}

impl ParsedDataset {
    /// Builds the final dataset from tokenized parts. `row_count` is the
    /// caller's count of data lines in the source; `is_partial` follows from
    /// it, so truncated inputs cannot masquerade as complete ones.
    pub fn assemble(
        filename: &str,
        header: &[String],
        raw_rows: Vec<Vec<String>>,
        row_count: usize,
    ) -> Self {
        let columns = build_columns(header, &raw_rows);
        let rows: Vec<Row> = raw_rows
            .iter()
            .map(|cells| materialize_row(header, cells))
            .collect();
        let parsed_row_count = rows.len();
        ParsedDataset {
            columns,
            rows,
            row_count,
            parsed_row_count,
            filename: filename.to_string(),
            is_partial: parsed_row_count < row_count,
        }
    }

    pub fn column(&self, original_name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.original_name == original_name)
    }

    /// Row-free view for columns-only output; counts and the partial flag
    /// still describe the full parse.
    pub fn summary(&self) -> DatasetSummary<'_> {
        DatasetSummary {
            columns: &self.columns,
            row_count: self.row_count,
            parsed_row_count: self.parsed_row_count,
            filename: &self.filename,
            is_partial: self.is_partial,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary<'a> {
    pub columns: &'a [Column],
    pub row_count: usize,
    pub parsed_row_count: usize,
    pub filename: &'a str,
    pub is_partial: bool,
}

fn build_columns(header: &[String], raw_rows: &[Vec<String>]) -> Vec<Column> {
    header
        .iter()
        .enumerate()
        .map(|(index, raw_name)| {
            let samples = column_samples(raw_rows, index);
            let sample_values = raw_rows
                .iter()
                .take(SAMPLE_VALUE_LIMIT)
                .map(|cells| cells.get(index).cloned().unwrap_or_default())
                .collect();
            Column {
                name: sanitize_column_name(raw_name, index),
                original_name: raw_name.clone(),
                inferred_type: infer_cell_type(&samples),
                sample_values,
                suggested_field: suggest_field(raw_name),
            }
        })
        .collect()
}

/// Zips one tokenized line against the header. Short lines pad with empty
/// strings; cells beyond the header width are dropped. Duplicate header
/// names collapse to the last occurrence (keyed storage, documented
/// limitation).
fn materialize_row(header: &[String], cells: &[String]) -> Row {
    header
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let value = cells.get(index).cloned().unwrap_or_default();
            (name.clone(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(lines: &[&[&str]]) -> Vec<Vec<String>> {
        lines
            .iter()
            .map(|cells| cells.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn assemble_wires_types_names_and_suggestions() {
        let dataset = ParsedDataset::assemble(
            "ledger.csv",
            &header(&["Revenue", "Posted On", "Notes"]),
            rows(&[
                &["100", "2024-01-31", "ok"],
                &["$2,500.75", "2024-02-29", ""],
            ]),
            2,
        );
        assert!(!dataset.is_partial);
        assert_eq!(dataset.parsed_row_count, 2);

        let revenue = dataset.column("Revenue").unwrap();
        assert_eq!(revenue.name, "revenue");
        assert_eq!(revenue.inferred_type, CellType::Numeric);
        assert_eq!(revenue.suggested_field, Some(StandardField::Revenue));
        assert_eq!(revenue.sample_values, vec!["100", "$2,500.75"]);

        let posted = dataset.column("Posted On").unwrap();
        assert_eq!(posted.name, "posted_on");
        assert_eq!(posted.inferred_type, CellType::Date);
    }

    #[test]
    fn every_row_carries_every_header_key() {
        let dataset = ParsedDataset::assemble(
            "short.csv",
            &header(&["a", "b", "c"]),
            rows(&[&["1", "2", "3"], &["4"], &[]]),
            3,
        );
        for row in &dataset.rows {
            assert_eq!(row.keys().cloned().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        }
        assert_eq!(dataset.rows[1]["b"], "");
        assert_eq!(dataset.rows[2]["a"], "");
    }

    #[test]
    fn extra_cells_beyond_header_are_dropped() {
        let dataset = ParsedDataset::assemble(
            "wide.csv",
            &header(&["a"]),
            rows(&[&["1", "stray"]]),
            1,
        );
        assert_eq!(dataset.rows[0].len(), 1);
        assert_eq!(dataset.rows[0]["a"], "1");
    }

    #[test]
    fn partial_flag_follows_from_counts() {
        let truncated =
            ParsedDataset::assemble("t.csv", &header(&["a"]), rows(&[&["1"]]), 5);
        assert!(truncated.is_partial);
        assert_eq!(truncated.parsed_row_count, 1);
        assert_eq!(truncated.row_count, 5);

        let complete = ParsedDataset::assemble("c.csv", &header(&["a"]), rows(&[&["1"]]), 1);
        assert!(!complete.is_partial);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let dataset = ParsedDataset::assemble(
            "k.csv",
            &header(&["Revenue"]),
            rows(&[&["10"]]),
            1,
        );
        let json = serde_json::to_string(&dataset).unwrap();
        assert!(json.contains("\"originalName\":\"Revenue\""));
        assert!(json.contains("\"type\":\"numeric\""));
        assert!(json.contains("\"suggestedField\":\"revenue\""));
        assert!(json.contains("\"rowCount\":1"));
        assert!(json.contains("\"parsedRowCount\":1"));
        assert!(json.contains("\"isPartial\":false"));

        let summary = serde_json::to_string(&dataset.summary()).unwrap();
        assert!(summary.contains("\"rowCount\":1"));
        assert!(!summary.contains("\"rows\""));
    }

    #[test]
    fn typed_value_respects_inferred_type() {
        let dataset = ParsedDataset::assemble(
            "v.csv",
            &header(&["Amount"]),
            rows(&[&["$1,200.50"], &["730.25"]]),
            2,
        );
        let column = dataset.column("Amount").unwrap();
        match column.typed_value("$1,200.50").unwrap() {
            Some(CellValue::Numeric(d)) => assert_eq!(d.to_string(), "1200.50"),
            other => panic!("unexpected typed value: {other:?}"),
        }
        assert!(column.typed_value("").unwrap().is_none());
    }
}
