//! Line and record tokenization.
//!
//! Input text is split into physical lines on `\r\n` or `\n`, blank lines are
//! discarded, and each line is scanned into cells honoring double-quote
//! wrapping with `""` as the escaped literal quote. The scanner never fails:
//! an unbalanced quote swallows the remainder of the line into the open
//! field, which matches the best-effort contract for malformed input.

/// Strips a single trailing `\n` or `\r\n` from a physical line.
pub fn trim_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// A line is blank when it contains nothing but whitespace.
pub fn is_blank_line(line: &str) -> bool {
    line.trim().is_empty()
}

/// Yields the non-blank lines of `text` in order, line endings removed.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !is_blank_line(line))
}

/// Scans one line into cells.
///
/// Quoting rules: a delimiter inside an open quote does not split; `""`
/// inside an open quote is a literal quote; any other quote toggles the
/// quoted state and is dropped from the cell. Cells are trimmed of
/// leading/trailing whitespace after unescaping, so `" padded "` and
/// ` padded ` produce the same cell.
pub fn tokenize_line(line: &str, delimiter: u8) -> Vec<String> {
    let delimiter = delimiter as char;
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '"' {
            if in_quotes && chars.peek() == Some(&'"') {
                current.push('"');
                chars.next();
            } else {
                in_quotes = !in_quotes;
            }
        } else if ch == delimiter && !in_quotes {
            cells.push(take_cell(&mut current));
        } else {
            current.push(ch);
        }
    }
    cells.push(take_cell(&mut current));
    cells
}

fn take_cell(current: &mut String) -> String {
    let cell = current.trim().to_string();
    current.clear();
    cell
}
