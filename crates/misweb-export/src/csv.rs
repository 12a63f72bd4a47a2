//! CSV document building with manual field escaping
//!
//! A document is built line by line and serialized in one piece with a
//! UTF-8 BOM so spreadsheet software renders non-ASCII correctly.
//! Code-like fields (document numbers, ledger codes with leading zeros)
//! are always quoted; no tab prefixes, no formula wrapping.

use crate::ExportError;

/// UTF-8 byte-order mark expected by Excel
const BOM: &str = "\u{feff}";

/// Escape a field: quote when it contains a comma, quote, or newline;
/// double any embedded quote.
pub fn escape_field(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Quote a code field unconditionally so spreadsheets keep leading zeros
/// and long digit strings as text.
pub fn quote_code(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// An in-memory CSV document
#[derive(Debug, Default)]
pub struct CsvDocument {
    buf: String,
    data_rows: usize,
}

impl CsvDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single-cell caption line (report title, period label)
    pub fn title(&mut self, text: &str) {
        self.push_line(&escape_field(text));
    }

    /// Append a header line; header cells are escaped but not counted
    /// as data rows.
    pub fn header(&mut self, cells: &[&str]) {
        let line = cells.iter().map(|c| escape_field(c)).collect::<Vec<_>>().join(",");
        self.push_line(&line);
    }

    /// Append a data row of pre-escaped cells
    ///
    /// Callers escape each cell with [`escape_field`] or [`quote_code`]
    /// so per-column conventions stay in the report builder.
    pub fn row(&mut self, cells: &[String]) {
        self.push_line(&cells.join(","));
        self.data_rows += 1;
    }

    /// Append an empty spacer line
    pub fn blank(&mut self) {
        self.push_line("");
    }

    /// Number of data rows appended so far
    pub fn data_rows(&self) -> usize {
        self.data_rows
    }

    /// Serialize with the UTF-8 BOM prepended
    ///
    /// Returns [`ExportError::EmptyReport`] when no data row was appended;
    /// empty reports must never produce a file.
    pub fn into_bytes(self) -> Result<Vec<u8>, ExportError> {
        if self.data_rows == 0 {
            return Err(ExportError::EmptyReport);
        }
        let mut out = String::with_capacity(BOM.len() + self.buf.len());
        out.push_str(BOM);
        out.push_str(&self.buf);
        Ok(out.into_bytes())
    }

    fn push_line(&mut self, line: &str) {
        if !self.buf.is_empty() {
            self.buf.push('\n');
        }
        self.buf.push_str(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal RFC-4180 style parse of a single CSV line, for round-trip checks
    fn parse_line(line: &str) -> Vec<String> {
        let mut fields = Vec::new();
        let mut field = String::new();
        let mut chars = line.chars().peekable();
        let mut quoted = false;

        while let Some(c) = chars.next() {
            match c {
                '"' if field.is_empty() && !quoted => quoted = true,
                '"' if quoted => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        quoted = false;
                    }
                }
                ',' if !quoted => {
                    fields.push(std::mem::take(&mut field));
                }
                _ => field.push(c),
            }
        }
        fields.push(field);
        fields
    }

    #[test]
    fn test_plain_field_unquoted() {
        assert_eq!(escape_field("Energy Sales"), "Energy Sales");
    }

    #[test]
    fn test_escape_round_trip() {
        let cases = [
            "has,comma",
            "has \"quote\"",
            "line\nbreak",
            "all,of \"them\"\ntogether",
            "plain",
        ];
        for case in cases {
            let line = format!("{},end", escape_field(case));
            let parsed = parse_line(&line);
            assert_eq!(parsed[0], case, "round-trip failed for {:?}", case);
            assert_eq!(parsed[1], "end");
        }
    }

    #[test]
    fn test_quote_code_always_quotes() {
        assert_eq!(quote_code("00123"), "\"00123\"");
        assert_eq!(quote_code("JV/2026/001"), "\"JV/2026/001\"");
        // No formula wrapping, no tab prefix
        assert!(!quote_code("00123").contains('='));
        assert!(!quote_code("00123").contains('\t'));
    }

    #[test]
    fn test_document_layout() {
        let mut doc = CsvDocument::new();
        doc.title("Ledger Card - 41010");
        doc.header(&["Doc No", "Dr", "Cr"]);
        doc.row(&[quote_code("JV/001"), "100.00".to_string(), "0.00".to_string()]);
        assert_eq!(doc.data_rows(), 1);

        let bytes = doc.into_bytes().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with('\u{feff}'));
        let body = text.trim_start_matches('\u{feff}');
        let lines: Vec<&str> = body.split('\n').collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "Doc No,Dr,Cr");
        assert_eq!(lines[2], "\"JV/001\",100.00,0.00");
    }

    #[test]
    fn test_empty_document_is_noop() {
        let mut doc = CsvDocument::new();
        doc.title("Ledger Card");
        doc.header(&["Doc No", "Dr", "Cr"]);
        assert!(matches!(doc.into_bytes(), Err(ExportError::EmptyReport)));
    }
}
