//! Report filter types and centralized validation
//!
//! Every screen validates through these types before touching the upstream
//! API, so out-of-range input never reaches a URL.

use chrono::{Datelike, NaiveDate, Utc};
use std::collections::HashMap;

use misweb_config::FiltersConfig;

use crate::error::FilterError;

/// Calendar month used when a report offers period 13
pub const THIRTEENTH_PERIOD: u32 = 13;

/// Dropdown bounds derived from configuration
#[derive(Debug, Clone, Copy)]
pub struct FilterOptions {
    pub year_span: i32,
    pub thirteenth_period: bool,
}

impl FilterOptions {
    pub fn from_config(config: &FiltersConfig) -> Self {
        Self {
            year_span: config.year_span,
            thirteenth_period: config.thirteenth_period,
        }
    }

    /// Selectable years, most recent first
    pub fn year_options(&self) -> Vec<i32> {
        let current = current_year();
        (current - self.year_span..=current).rev().collect()
    }

    /// Selectable months; the ledger-card family may offer period 13
    pub fn month_options(&self, with_thirteenth: bool) -> Vec<u32> {
        let max = self.max_month(with_thirteenth);
        (1..=max).collect()
    }

    fn max_month(&self, with_thirteenth: bool) -> u32 {
        if with_thirteenth && self.thirteenth_period {
            THIRTEENTH_PERIOD
        } else {
            12
        }
    }

    fn validate_year(&self, year: i32) -> Result<(), FilterError> {
        let current = current_year();
        let min = current - self.year_span;
        if year < min || year > current {
            return Err(FilterError::YearOutOfRange { year, min, max: current });
        }
        Ok(())
    }

    fn validate_month(&self, month: u32, with_thirteenth: bool) -> Result<(), FilterError> {
        let max = self.max_month(with_thirteenth);
        if month < 1 || month > max {
            return Err(FilterError::MonthOutOfRange { month, max });
        }
        Ok(())
    }
}

fn current_year() -> i32 {
    Utc::now().date_naive().year()
}

/// Year plus start/end month range (ledger-card family)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodFilter {
    pub year: i32,
    pub start_month: u32,
    pub end_month: u32,
}

impl PeriodFilter {
    /// Parse and validate from query parameters
    pub fn from_params(
        params: &HashMap<String, String>,
        options: &FilterOptions,
        with_thirteenth: bool,
    ) -> Result<Self, FilterError> {
        let year = parse_number(required(params, "year")?)?;
        let start_month = parse_number(required(params, "start_month")?)?;
        let end_month = parse_number(required(params, "end_month")?)?;

        let filter = Self { year, start_month, end_month };
        filter.validate(options, with_thirteenth)?;
        Ok(filter)
    }

    pub fn validate(
        &self,
        options: &FilterOptions,
        with_thirteenth: bool,
    ) -> Result<(), FilterError> {
        options.validate_year(self.year)?;
        options.validate_month(self.start_month, with_thirteenth)?;
        options.validate_month(self.end_month, with_thirteenth)?;
        if self.end_month < self.start_month {
            return Err(FilterError::PeriodOrder {
                start_month: self.start_month,
                end_month: self.end_month,
            });
        }
        Ok(())
    }

    /// Display label such as "2026, months 1-4"
    pub fn label(&self) -> String {
        if self.start_month == self.end_month {
            format!("{}, month {}", self.year, self.start_month)
        } else {
            format!("{}, months {}-{}", self.year, self.start_month, self.end_month)
        }
    }
}

/// Bare report year (annual verification family)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearFilter {
    pub year: i32,
}

impl YearFilter {
    pub fn from_params(
        params: &HashMap<String, String>,
        options: &FilterOptions,
    ) -> Result<Self, FilterError> {
        let year = parse_number(required(params, "year")?)?;
        options.validate_year(year)?;
        Ok(Self { year })
    }
}

/// Single year/month pair (income & expenditure family)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthFilter {
    pub year: i32,
    pub month: u32,
}

impl MonthFilter {
    pub fn from_params(
        params: &HashMap<String, String>,
        options: &FilterOptions,
    ) -> Result<Self, FilterError> {
        let year = parse_number(required(params, "year")?)?;
        let month = parse_number(required(params, "month")?)?;

        options.validate_year(year)?;
        options.validate_month(month, false)?;
        Ok(Self { year, month })
    }

    pub fn label(&self) -> String {
        format!("{}-{:02}", self.year, self.month)
    }
}

/// Inclusive from/to date range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateRangeFilter {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRangeFilter {
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, FilterError> {
        let from = parse_date(required(params, "from")?)?;
        let to = parse_date(required(params, "to")?)?;
        Self::new(from, to)
    }

    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, FilterError> {
        if to < from {
            return Err(FilterError::DateOrder {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        Ok(Self { from, to })
    }

    pub fn label(&self) -> String {
        format!("{} to {}", self.from, self.to)
    }
}

/// Fetch a required, non-empty query parameter
pub fn required<'a>(
    params: &'a HashMap<String, String>,
    field: &'static str,
) -> Result<&'a str, FilterError> {
    match params.get(field).map(|s| s.trim()) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(FilterError::Missing { field }),
    }
}

fn parse_number<T: std::str::FromStr>(value: &str) -> Result<T, FilterError> {
    value.parse().map_err(|_| FilterError::InvalidNumber {
        value: value.to_string(),
    })
}

fn parse_date(value: &str) -> Result<NaiveDate, FilterError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| FilterError::InvalidDate {
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> FilterOptions {
        FilterOptions { year_span: 20, thirteenth_period: true }
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_year_options_span() {
        let years = options().year_options();
        assert_eq!(years.len(), 21);
        assert_eq!(years[0] - years[20], 20);
        // Most recent first
        assert!(years[0] > years[1]);
    }

    #[test]
    fn test_month_options_thirteenth_period() {
        let opts = options();
        assert_eq!(opts.month_options(false).len(), 12);
        assert_eq!(opts.month_options(true).len(), 13);

        let no_thirteenth = FilterOptions { year_span: 20, thirteenth_period: false };
        assert_eq!(no_thirteenth.month_options(true).len(), 12);
    }

    #[test]
    fn test_period_filter_valid() {
        let current = Utc::now().date_naive().year();
        let p = params(&[
            ("year", &current.to_string()),
            ("start_month", "1"),
            ("end_month", "13"),
        ]);
        let filter = PeriodFilter::from_params(&p, &options(), true).unwrap();
        assert_eq!(filter.end_month, 13);
        assert!(filter.label().contains("months 1-13"));
    }

    #[test]
    fn test_period_filter_missing_field() {
        let p = params(&[("year", "2026"), ("start_month", "1")]);
        assert_eq!(
            PeriodFilter::from_params(&p, &options(), false),
            Err(FilterError::Missing { field: "end_month" })
        );
    }

    #[test]
    fn test_period_filter_blank_is_missing() {
        let p = params(&[("year", "  "), ("start_month", "1"), ("end_month", "2")]);
        assert_eq!(
            PeriodFilter::from_params(&p, &options(), false),
            Err(FilterError::Missing { field: "year" })
        );
    }

    #[test]
    fn test_period_filter_order() {
        let current = Utc::now().date_naive().year();
        let p = params(&[
            ("year", &current.to_string()),
            ("start_month", "6"),
            ("end_month", "2"),
        ]);
        assert!(matches!(
            PeriodFilter::from_params(&p, &options(), false),
            Err(FilterError::PeriodOrder { .. })
        ));
    }

    #[test]
    fn test_period_filter_thirteenth_rejected_without_flag() {
        let current = Utc::now().date_naive().year();
        let p = params(&[
            ("year", &current.to_string()),
            ("start_month", "1"),
            ("end_month", "13"),
        ]);
        assert!(matches!(
            PeriodFilter::from_params(&p, &options(), false),
            Err(FilterError::MonthOutOfRange { month: 13, max: 12 })
        ));
    }

    #[test]
    fn test_year_out_of_range() {
        let current = Utc::now().date_naive().year();
        let p = params(&[
            ("year", &(current + 1).to_string()),
            ("start_month", "1"),
            ("end_month", "2"),
        ]);
        assert!(matches!(
            PeriodFilter::from_params(&p, &options(), false),
            Err(FilterError::YearOutOfRange { .. })
        ));
    }

    #[test]
    fn test_month_filter_never_offers_thirteenth() {
        let current = Utc::now().date_naive().year();
        let p = params(&[("year", &current.to_string()), ("month", "13")]);
        assert!(matches!(
            MonthFilter::from_params(&p, &options()),
            Err(FilterError::MonthOutOfRange { month: 13, max: 12 })
        ));

        let p = params(&[("year", &current.to_string()), ("month", "12")]);
        let filter = MonthFilter::from_params(&p, &options()).unwrap();
        assert_eq!(filter.label(), format!("{}-12", current));
    }

    #[test]
    fn test_date_range_order() {
        let p = params(&[("from", "2026-03-01"), ("to", "2026-02-01")]);
        assert!(matches!(
            DateRangeFilter::from_params(&p),
            Err(FilterError::DateOrder { .. })
        ));

        let p = params(&[("from", "2026-02-01"), ("to", "2026-02-01")]);
        assert!(DateRangeFilter::from_params(&p).is_ok());
    }

    #[test]
    fn test_date_range_invalid_date() {
        let p = params(&[("from", "01/02/2026"), ("to", "2026-02-28")]);
        assert!(matches!(
            DateRangeFilter::from_params(&p),
            Err(FilterError::InvalidDate { .. })
        ));
    }
}
