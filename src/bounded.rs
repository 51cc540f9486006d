//! Whole-file parser for small inputs and previews.
//!
//! Reads complete file text already held in memory, so it suits files under
//! the streaming size threshold or any request that only wants the first
//! `max_rows` rows. `row_count` always reflects every data line in the
//! source, which keeps the partial flag honest for truncated previews.

use crate::dataset::ParsedDataset;
use crate::error::IngestError;
use crate::tokenize::{split_lines, tokenize_line};

pub fn parse_str(
    text: &str,
    filename: &str,
    delimiter: u8,
    max_rows: Option<usize>,
) -> Result<ParsedDataset, IngestError> {
    let mut lines = split_lines(text);
    let header_line = lines.next().ok_or_else(|| IngestError::EmptyFile {
        filename: filename.to_string(),
    })?;
    let header = tokenize_line(header_line, delimiter);

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    let mut row_count = 0usize;
    for line in lines {
        row_count += 1;
        if max_rows.is_none_or(|cap| raw_rows.len() < cap) {
            raw_rows.push(tokenize_line(line, delimiter));
        }
    }

    Ok(ParsedDataset::assemble(filename, &header, raw_rows, row_count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::StandardField;
    use crate::infer::CellType;

    #[test]
    fn parses_small_ledger_completely() {
        let dataset = parse_str("Revenue,COGS\n100,40\n200,90\n", "ledger.csv", b',', None)
            .unwrap();
        assert_eq!(dataset.columns.len(), 2);
        assert_eq!(dataset.rows.len(), 2);
        assert_eq!(dataset.row_count, 2);
        assert_eq!(dataset.parsed_row_count, 2);
        assert!(!dataset.is_partial);

        let revenue = &dataset.columns[0];
        assert_eq!(revenue.name, "revenue");
        assert_eq!(revenue.inferred_type, CellType::Numeric);
        assert_eq!(revenue.suggested_field, Some(StandardField::Revenue));

        let cogs = &dataset.columns[1];
        assert_eq!(cogs.name, "cogs");
        assert_eq!(cogs.inferred_type, CellType::Numeric);
        assert_eq!(cogs.suggested_field, Some(StandardField::Cogs));
    }

    #[test]
    fn empty_and_blank_only_inputs_fail() {
        assert!(matches!(
            parse_str("", "empty.csv", b',', None),
            Err(IngestError::EmptyFile { .. })
        ));
        let err = parse_str("\n   \n\t\n", "blank.csv", b',', None).unwrap_err();
        assert!(err.to_string().contains("blank.csv"));
    }

    #[test]
    fn header_only_file_yields_zero_rows() {
        let dataset = parse_str("a,b\n", "head.csv", b',', None).unwrap();
        assert_eq!(dataset.rows.len(), 0);
        assert_eq!(dataset.row_count, 0);
        assert!(!dataset.is_partial);
        assert_eq!(dataset.columns[0].inferred_type, CellType::Text);
    }

    #[test]
    fn max_rows_truncates_but_counts_everything() {
        let text = "n\n1\n2\n3\n4\n5\n";
        let dataset = parse_str(text, "nums.csv", b',', Some(2)).unwrap();
        assert_eq!(dataset.parsed_row_count, 2);
        assert_eq!(dataset.row_count, 5);
        assert!(dataset.is_partial);

        let exact = parse_str(text, "nums.csv", b',', Some(5)).unwrap();
        assert!(!exact.is_partial);
    }

    #[test]
    fn blank_lines_are_discarded_not_counted() {
        let dataset =
            parse_str("a\n1\n\n   \n2\n", "gaps.csv", b',', None).unwrap();
        assert_eq!(dataset.row_count, 2);
        assert_eq!(dataset.rows.len(), 2);
    }

    #[test]
    fn crlf_and_quoted_delimiters_survive() {
        let dataset = parse_str(
            "Name,Amount\r\n\"Acme, Inc.\",1200\r\n",
            "crlf.csv",
            b',',
            None,
        )
        .unwrap();
        assert_eq!(dataset.rows[0]["Name"], "Acme, Inc.");
        assert_eq!(dataset.rows[0]["Amount"], "1200");
    }
}
