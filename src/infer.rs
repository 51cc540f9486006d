//! Column type inference from sampled cell values.
//!
//! A column is classified from up to five samples drawn at spread-out row
//! positions (first, ~10th, ~50th, middle, last) so a patterned head of file
//! cannot bias the result. Rules are tried in order (numeric, then date,
//! then text) and a rule only wins when every non-empty sample satisfies it;
//! a single disagreeing sample falls through to the next rule.

use std::{fmt, sync::OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::data::{normalize_numeric_token, parse_cell_date};

/// How many spread samples feed the classifier.
pub const INFERENCE_SAMPLE_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    Numeric,
    Date,
    Text,
}

impl CellType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellType::Numeric => "numeric",
            CellType::Date => "date",
            CellType::Text => "text",
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

static NUMERIC_PATTERN: OnceLock<Regex> = OnceLock::new();

fn numeric_pattern() -> &'static Regex {
    NUMERIC_PATTERN.get_or_init(|| {
        Regex::new(r"^-?\d+(\.\d+)?$").expect("numeric pattern literal compiles")
    })
}

/// True when the value reads as an amount once currency symbols and
/// thousands separators are stripped.
pub fn is_numeric_token(value: &str) -> bool {
    let cleaned = normalize_numeric_token(value);
    !cleaned.is_empty() && numeric_pattern().is_match(&cleaned)
}

pub fn is_date_token(value: &str) -> bool {
    parse_cell_date(value.trim()).is_ok()
}

/// Row indices to sample for a column of `row_count` materialized rows:
/// first, ~10th, ~50th, middle, and last, deduplicated and in order.
pub fn sample_indices(row_count: usize) -> Vec<usize> {
    if row_count == 0 {
        return Vec::new();
    }
    let mut indices = vec![0, 9, 49, row_count / 2, row_count - 1];
    indices.retain(|idx| *idx < row_count);
    indices.sort_unstable();
    indices.dedup();
    indices.truncate(INFERENCE_SAMPLE_LIMIT);
    indices
}

/// Pulls the spread samples for one column from materialized rows. Rows that
/// are short in this column contribute an empty string, matching the
/// missing-trailing-cell rule.
pub fn column_samples<'a>(rows: &'a [Vec<String>], column: usize) -> Vec<&'a str> {
    sample_indices(rows.len())
        .into_iter()
        .map(|idx| rows[idx].get(column).map(String::as_str).unwrap_or(""))
        .collect()
}

/// Classifies a column from its samples. An empty sample set is `Text`.
pub fn infer_cell_type(samples: &[&str]) -> CellType {
    let non_empty: Vec<&str> = samples
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if non_empty.is_empty() {
        return CellType::Text;
    }
    if non_empty.iter().all(|s| is_numeric_token(s)) {
        return CellType::Numeric;
    }
    if non_empty.iter().all(|s| is_date_token(s)) {
        return CellType::Date;
    }
    CellType::Text
}
