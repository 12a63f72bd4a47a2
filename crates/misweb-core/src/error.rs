//! Error types for misweb-core

use thiserror::Error;

/// Filter precondition failures
///
/// Raised before any upstream call; the view renders these as an inline
/// banner and leaves the form state untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Required filter is missing: {field}")]
    Missing { field: &'static str },

    #[error("Year {year} is outside the selectable range {min}-{max}")]
    YearOutOfRange { year: i32, min: i32, max: i32 },

    #[error("Month {month} is outside the selectable range 1-{max}")]
    MonthOutOfRange { month: u32, max: u32 },

    #[error("End month {end_month} is before start month {start_month}")]
    PeriodOrder { start_month: u32, end_month: u32 },

    #[error("Invalid date: {value}")]
    InvalidDate { value: String },

    #[error("To date {to} is before from date {from}")]
    DateOrder { from: String, to: String },

    #[error("Invalid number: {value}")]
    InvalidNumber { value: String },
}

impl FilterError {
    /// Message suitable for an on-page error banner
    pub fn user_message(&self) -> String {
        match self {
            FilterError::Missing { field } => format!("Please select a {}.", field),
            FilterError::YearOutOfRange { year, min, max } => {
                format!("Year {} must be between {} and {}.", year, min, max)
            }
            FilterError::MonthOutOfRange { month, max } => {
                format!("Month {} must be between 1 and {}.", month, max)
            }
            FilterError::PeriodOrder { .. } => "End month cannot be before start month.".to_string(),
            FilterError::InvalidDate { value } => {
                format!("'{}' is not a valid date (expected YYYY-MM-DD).", value)
            }
            FilterError::DateOrder { .. } => "To date cannot be before from date.".to_string(),
            FilterError::InvalidNumber { value } => format!("'{}' is not a valid number.", value),
        }
    }
}
