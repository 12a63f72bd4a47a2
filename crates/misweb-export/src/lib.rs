//! CSV and print-document formatting for misweb reports
//!
//! Everything in this crate is pure string building: no I/O, no DOM,
//! no network. The API layer decides where the bytes go.

pub mod csv;
pub mod fmt;
pub mod html;

pub use csv::{escape_field, quote_code, CsvDocument};
pub use fmt::{format_amount, format_amount_with};
pub use html::{escape_html, PageLayout, PrintDocument};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    /// Exports over empty report data are no-ops, never empty files
    #[error("Report has no data rows to export")]
    EmptyReport,
}
