//! Report screen routes
//!
//! One module per report family; each serves a filter page, an HTMX table
//! partial, a CSV download, and a print document.

pub mod income_expenditure;
pub mod ledger_card;
pub mod piv;
pub mod solar;
pub mod verification;
