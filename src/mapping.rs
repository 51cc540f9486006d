//! Standard-field mapping: assignment of raw columns to catalog fields,
//! persistence as flat JSON, and pre-handoff validation.

use std::{collections::BTreeMap, fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::dataset::Column;
use crate::fields::StandardField;

/// Field-to-column assignment. Each field holds at most one column by
/// construction; the same column may appear under several fields, which
/// validation reports as a warning.
///
/// Persisted shape is a flat object: `{ "<fieldId>": "<originalName>", ... }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Mapping(BTreeMap<StandardField, String>);

impl Mapping {
    pub fn new() -> Self {
        Mapping::default()
    }

    /// Assigns a column to a field, replacing that field's previous column.
    pub fn set(&mut self, field: StandardField, original_name: impl Into<String>) {
        self.0.insert(field, original_name.into());
    }

    pub fn unset(&mut self, field: StandardField) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn column_for(&self, field: StandardField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: StandardField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StandardField, &str)> {
        self.0.iter().map(|(field, column)| (*field, column.as_str()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file =
            File::create(path).with_context(|| format!("Creating mapping file {path:?}"))?;
        serde_json::to_writer_pretty(file, self).context("Writing mapping JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening mapping file {path:?}"))?;
        let reader = BufReader::new(file);
        let mapping = serde_json::from_reader(reader)
            .with_context(|| format!("Parsing mapping JSON {path:?}"))?;
        Ok(mapping)
    }
}

/// Builds a mapping from per-column suggestions. Columns are visited in
/// dataset order and the first column suggesting a field keeps it; later
/// columns suggesting the same field stay unmapped.
pub fn suggest_mapping(columns: &[Column]) -> Mapping {
    let mut mapping = Mapping::new();
    for column in columns {
        if let Some(field) = column.suggested_field
            && !mapping.contains(field)
        {
            mapping.set(field, column.original_name.clone());
        }
    }
    mapping
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Checks a mapping for completeness and likely mistakes. Missing required
/// fields are errors; one column assigned to several fields is a warning and
/// never blocks. `valid` reflects errors only.
pub fn validate(mapping: &Mapping, required_fields: &[StandardField]) -> ValidationReport {
    let errors: Vec<String> = required_fields
        .iter()
        .filter(|field| !mapping.contains(**field))
        .map(|field| format!("Required field '{}' is not mapped to any column", field.label()))
        .collect();

    let warnings: Vec<String> = mapping
        .iter()
        .map(|(_, column)| column)
        .counts()
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .sorted()
        .map(|(column, count)| {
            format!("Column '{column}' is mapped to {count} standard fields")
        })
        .collect();

    ValidationReport {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}
