//! Report aggregation and filter logic
//!
//! Rows arrive from misweb-client in server order; this crate groups them,
//! computes running balances and subtotals, and validates filter input
//! before any upstream call is made. Rendering and export formatting live
//! elsewhere.

pub mod entities;
pub mod error;
pub mod filters;
pub mod grouping;
pub mod ledger;
pub mod pivot;
pub mod registers;

pub use entities::{filter_entities, paginate, Page};
pub use error::FilterError;
pub use filters::{DateRangeFilter, FilterOptions, MonthFilter, PeriodFilter, YearFilter};
pub use grouping::{leading_spans, runs_by};
pub use ledger::{LedgerLine, LedgerStatement, SubAccountGroup};
pub use pivot::{IncomeExpenditureStatement, PivotLine, PivotSection};
pub use registers::{
    DeptGroup, MonthGroup, PivRegister, SolarSettlement, StockBookGroup, VerificationSheet,
};
