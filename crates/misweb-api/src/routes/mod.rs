//! Route modules

pub mod entities;
pub mod reports;

use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};

use misweb_export::{escape_html, format_amount, CsvDocument, PrintDocument};

/// Inline error banner shown in place of report content
///
/// The surrounding form keeps its state; the user corrects the filters and
/// retries with another View.
pub(crate) fn error_banner(message: &str) -> String {
    format!(
        r#"<div class='bg-red-50 border border-red-200 text-red-700 rounded-lg p-4'>
        <p class='font-medium'>Could not load the report</p>
        <p class='text-sm'>{}</p>
    </div>"#,
        escape_html(message)
    )
}

/// Empty-state block shown when the backend returned zero rows
pub(crate) fn empty_state(message: &str) -> String {
    format!(
        r#"<div class='text-center py-12 text-gray-500'>
        <p class='text-lg'>No records found</p>
        <p class='text-sm'>{}</p>
    </div>"#,
        escape_html(message)
    )
}

/// Right-aligned numeric table cell
pub(crate) fn num_cell(value: f64) -> String {
    format!("<td class='num'>{}</td>", format_amount(value))
}

/// Escaped plain table cell
pub(crate) fn text_cell(value: &str) -> String {
    format!("<td>{}</td>", escape_html(value))
}

/// CSV download response; empty documents become 204 No Content so no file
/// is ever produced for an empty report.
pub(crate) fn csv_response(filename: &str, document: CsvDocument) -> Response {
    match document.into_bytes() {
        Ok(body) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", filename),
                ),
            ],
            bytes::Bytes::from(body),
        )
            .into_response(),
        Err(_) => StatusCode::NO_CONTENT.into_response(),
    }
}

/// Print document response; None (empty report) becomes 204 No Content.
pub(crate) fn print_response(document: Option<PrintDocument>) -> Response {
    match document {
        Some(doc) => Html(doc.render()).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// Action bar rendered above a loaded report table: CSV and print links
/// carrying the exact query string that produced the view.
pub(crate) fn report_actions(base_path: &str, query: &str) -> String {
    format!(
        r#"<div class='flex justify-end gap-2 mb-3'>
        <a href='{base}/export.csv?{query}' class='px-3 py-1.5 text-sm border rounded-lg hover:bg-gray-50'>Export CSV</a>
        <a href='{base}/print?{query}' target='_blank' class='px-3 py-1.5 text-sm border rounded-lg hover:bg-gray-50'>Print</a>
    </div>"#,
        base = base_path,
        query = query
    )
}

/// Rebuild the canonical query string for export links from named pairs
pub(crate) fn query_string(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_banner_escapes_message() {
        let html = error_banner("bad <input> & worse");
        assert!(html.contains("bad &lt;input&gt; &amp; worse"));
    }

    #[test]
    fn test_query_string_encodes_values() {
        let q = query_string(&[("code", "41/010"), ("year", "2026")]);
        assert_eq!(q, "code=41%2F010&year=2026");
    }

    #[test]
    fn test_num_cell_formats() {
        assert_eq!(num_cell(1234.5), "<td class='num'>1,234.50</td>");
    }
}
