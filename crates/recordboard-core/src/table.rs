//! Tabular decoder for spreadsheet-exported CSV documents.
//!
//! Decoding is tolerant: malformed quoting never fails the document, short
//! rows are padded with empty strings, and blank rows are dropped.

use std::collections::HashMap;
use std::mem::take;

/// One decoded data row, keyed by trimmed header name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowMap {
    fields: HashMap<String, String>,
}

impl RowMap {
    /// Value of a column, or `""` when the document has no such column.
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, String)> for RowMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Split a comma-delimited document into rows of raw field values.
///
/// A field may be wrapped in double quotes; `""` inside quotes is a literal
/// quote, and commas or line breaks inside quotes are literal text. `\n`,
/// `\r\n` and a lone `\r` all end a row. A row holding a single empty field
/// (a blank line) is dropped.
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next(); // escaped quote
                field.push('"');
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => row.push(take(&mut field)),
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(take(&mut field));
                push_row(&mut rows, take(&mut row));
            }
            _ => field.push(ch),
        }
    }

    // Flush the last row even when the document lacks a trailing newline
    // or ends inside an unterminated quote.
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        push_row(&mut rows, row);
    }

    rows
}

fn push_row(rows: &mut Vec<Vec<String>>, row: Vec<String>) {
    if row.len() > 1 || row.first().is_some_and(|f| !f.is_empty()) {
        rows.push(row);
    }
}

/// Turn parsed rows into header-keyed maps.
///
/// The first row supplies the (trimmed) column names. Values are trimmed,
/// missing trailing fields read as `""`, and rows whose fields are all blank
/// are dropped. Fewer than two rows yields nothing.
pub fn rows_to_maps(rows: &[Vec<String>]) -> Vec<RowMap> {
    let Some((header, body)) = rows.split_first() else {
        return Vec::new();
    };
    let headers: Vec<String> = header.iter().map(|h| h.trim().to_string()).collect();

    body.iter()
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .map(|row| {
            headers
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let value = row.get(i).map(|v| v.trim()).unwrap_or("");
                    (name.clone(), value.to_string())
                })
                .collect()
        })
        .collect()
}

/// Parse a whole document into header-keyed maps.
pub fn decode(text: &str) -> Vec<RowMap> {
    rows_to_maps(&parse_rows(text))
}

/// Encode rows back into CSV text, quoting only where required.
pub fn encode_rows(rows: &[Vec<String>]) -> String {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|field| encode_field(field))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn encode_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_simple_rows() {
        let rows = parse_rows("a,b,c\n1,2,3\n");
        assert_eq!(rows, vec![strings(&["a", "b", "c"]), strings(&["1", "2", "3"])]);
    }

    #[test]
    fn test_parse_quoted_specials() {
        let rows = parse_rows("name,notes\n\"Smith, J\",\"said \"\"hi\"\"\nthen left\"\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0], "Smith, J");
        assert_eq!(rows[1][1], "said \"hi\"\nthen left");
    }

    #[test]
    fn test_parse_crlf_and_blank_lines() {
        let rows = parse_rows("a,b\r\n\r\n1,2\r\n\n3,4");
        assert_eq!(rows, vec![strings(&["a", "b"]), strings(&["1", "2"]), strings(&["3", "4"])]);
    }

    #[test]
    fn test_parse_keeps_row_of_empty_fields() {
        // Two empty fields is not a blank line; it is dropped later by rows_to_maps.
        let rows = parse_rows("a,b\n,\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], strings(&["", ""]));
    }

    #[test]
    fn test_parse_unterminated_quote_degrades() {
        let rows = parse_rows("a,b\n1,\"open field\n2,3");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0], "1");
        assert_eq!(rows[1][1], "open field\n2,3");
    }

    #[test]
    fn test_parse_empty_document() {
        assert!(parse_rows("").is_empty());
        assert!(parse_rows("\n\r\n").is_empty());
    }

    #[test]
    fn test_rows_to_maps_pads_short_rows() {
        let maps = decode(" Event , gender,year\nShot Put,Girls\n");
        assert_eq!(maps.len(), 1);
        assert_eq!(maps[0].get("Event"), "Shot Put");
        assert_eq!(maps[0].get("gender"), "Girls");
        assert_eq!(maps[0].get("year"), "");
        assert_eq!(maps[0].get("missing_column"), "");
    }

    #[test]
    fn test_rows_to_maps_drops_all_blank_rows() {
        let maps = decode("a,b\n , \n1,2\n,\n");
        assert_eq!(maps.len(), 1);
        assert_eq!(maps[0].get("a"), "1");
    }

    #[test]
    fn test_rows_to_maps_trims_values() {
        let maps = decode("a,b\n  x  ,\" y \"\n");
        assert_eq!(maps[0].get("a"), "x");
        assert_eq!(maps[0].get("b"), "y");
    }

    #[test]
    fn test_header_only_yields_nothing() {
        assert!(decode("a,b,c\n").is_empty());
        assert!(decode("").is_empty());
    }

    #[test]
    fn test_encode_then_parse_plain_and_quoted() {
        let rows = vec![
            strings(&["Event", "athlete_1", "notes"]),
            strings(&["4x100 Relay", "Lee, A", "PR \"wind aided\""]),
            strings(&["100m", "Kim", "line\nbreak"]),
        ];
        let text = encode_rows(&rows);
        assert_eq!(parse_rows(&text), rows);
    }
}
