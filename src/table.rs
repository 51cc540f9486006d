//! Plain-text table rendering for terminal output.

use std::borrow::Cow;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Right,
}

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    render_table_with(headers, rows, &[])
}

/// Renders an elastic-width table. `aligns` is consulted per column index;
/// columns past its end fall back to left alignment.
pub fn render_table_with(headers: &[String], rows: &[Vec<String>], aligns: &[Align]) -> String {
    let widths = column_widths(headers, rows);
    let mut output = String::new();

    push_row(&mut output, headers, &widths, aligns);

    let rule_widths: Vec<usize> = widths.iter().map(|w| (*w).max(3)).collect();
    let rule_cells: Vec<String> = rule_widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut output, &rule_cells, &rule_widths, &[]);

    for row in rows {
        push_row(&mut output, row, &widths, aligns);
    }

    output
}

pub fn print_table_with(headers: &[String], rows: &[Vec<String>], aligns: &[Align]) {
    let rendered = render_table_with(headers, rows, aligns);
    print!("{rendered}");
}

/// Widest cell per column, floored at one so empty columns still occupy space.
fn column_widths(headers: &[String], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h).max(1)).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(widths.len()) {
            widths[idx] = widths[idx].max(display_width(cell));
        }
    }
    widths
}

fn push_row(output: &mut String, values: &[String], widths: &[usize], aligns: &[Align]) {
    let mut line = String::new();
    for (idx, width) in widths.iter().enumerate() {
        let raw = values.get(idx).map(String::as_str).unwrap_or("");
        let cell = sanitize_cell(raw);
        let pad = " ".repeat(width.saturating_sub(display_width(&cell)));
        if idx > 0 {
            line.push_str("  ");
        }
        match aligns.get(idx).copied().unwrap_or_default() {
            Align::Left => {
                line.push_str(&cell);
                line.push_str(&pad);
            }
            Align::Right => {
                line.push_str(&pad);
                line.push_str(&cell);
            }
        }
    }
    let _ = writeln!(output, "{}", line.trim_end_matches(' '));
}

fn display_width(value: &str) -> usize {
    value.chars().count()
}

/// Cells can carry stray tabs or carriage returns; flatten them so one
/// logical row stays one terminal line.
fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn right_alignment_pads_on_the_left() {
        let rendered = render_table_with(
            &strings(&["name", "amount"]),
            &[strings(&["a", "5"]), strings(&["bc", "1200"])],
            &[Align::Left, Align::Right],
        );
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "name  amount");
        assert_eq!(lines[2], "a          5");
        assert_eq!(lines[3], "bc      1200");
    }

    #[test]
    fn short_rows_render_without_trailing_padding() {
        let rendered = render_table(
            &strings(&["name", "amount"]),
            &[strings(&["only"])],
        );
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[2], "only");
    }

    #[test]
    fn embedded_breaks_collapse_to_spaces() {
        let rendered = render_table(
            &strings(&["note"]),
            &[strings(&["line one\nline two"])],
        );
        assert!(rendered.contains("line one line two"));
    }
}
