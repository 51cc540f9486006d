use std::fmt;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::infer::CellType;

/// A cell interpreted according to its column's inferred type.
///
/// Raw storage stays text end to end; this view exists for the point of use
/// (KPI math, display formatting) so no lossy coercion happens during
/// parsing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum CellValue {
    Numeric(Decimal),
    Date(NaiveDate),
    Text(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Numeric(d) => write!(f, "{d}"),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

/// Drops currency symbols, thousands separators, and whitespace from a
/// candidate numeric token. What remains either matches the numeric pattern
/// or the token was never numeric.
pub fn normalize_numeric_token(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | '£' | '¥' | ',') && !c.is_whitespace())
        .collect()
}

pub fn parse_cell_numeric(value: &str) -> Result<Decimal> {
    let cleaned = normalize_numeric_token(value);
    cleaned
        .parse::<Decimal>()
        .with_context(|| format!("Failed to parse '{value}' as a numeric amount"))
}

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%d.%m.%Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

pub fn parse_cell_date(value: &str) -> Result<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .ok_or_else(|| anyhow!("Failed to parse '{value}' as a date"))
}

/// Converts a raw cell into its typed view. Empty cells are `None`, never an
/// error; a non-empty cell that contradicts its column type is an error the
/// caller decides how to treat.
pub fn parse_typed_cell(value: &str, ty: CellType) -> Result<Option<CellValue>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let typed = match ty {
        CellType::Numeric => CellValue::Numeric(parse_cell_numeric(trimmed)?),
        CellType::Date => CellValue::Date(parse_cell_date(trimmed)?),
        CellType::Text => CellValue::Text(trimmed.to_string()),
    };
    Ok(Some(typed))
}
