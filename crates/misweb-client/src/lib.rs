//! REST client for the upstream MIS backend
//!
//! The backend is the system of record; this crate only fetches and decodes
//! report rows. Aggregation lives in misweb-core.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

pub mod error;
pub mod http;
pub mod types;

pub use error::{ClientError, ClientResult};
pub use http::HttpReportSource;

// Re-export commonly used types
pub use types::{
    Entity, IncomeExpenditureRow, LedgerRow, Payload, PivRow, SolarRow, VerificationRow,
};

/// Shared source handle used by the API layer
pub type SourceRef = Arc<dyn ReportSource>;

/// Kinds of selectable reporting entities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Companies,
    CostCentres,
    Departments,
}

impl EntityKind {
    /// Upstream path serving this entity list
    pub fn path(&self) -> &'static str {
        match self {
            EntityKind::Companies => "/misapi/api/companies",
            EntityKind::CostCentres => "/misapi/api/costcenters",
            EntityKind::Departments => "/misapi/api/departments",
        }
    }

    /// Human label for page headings
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Companies => "Companies",
            EntityKind::CostCentres => "Cost Centres",
            EntityKind::Departments => "Departments",
        }
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "companies" | "company" => Ok(EntityKind::Companies),
            "costcentres" | "costcenters" | "costcentre" => Ok(EntityKind::CostCentres),
            "departments" | "department" => Ok(EntityKind::Departments),
            _ => Err(format!("Invalid entity kind: {}", s)),
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Companies => write!(f, "companies"),
            EntityKind::CostCentres => write!(f, "costcentres"),
            EntityKind::Departments => write!(f, "departments"),
        }
    }
}

/// Async source of report rows
///
/// Implemented by the hyper-backed client; tests substitute an in-memory
/// implementation.
#[async_trait]
pub trait ReportSource: Send + Sync {
    /// Fetch the selectable entity list of the given kind
    async fn entities(&self, kind: EntityKind) -> Result<Vec<Entity>, ClientError>;

    /// Ledger transactions for a GL code over a month range
    async fn ledger_card(
        &self,
        code: &str,
        year: i32,
        start_month: u32,
        end_month: u32,
    ) -> Result<Vec<LedgerRow>, ClientError>;

    /// Income & expenditure cells for a year/month
    async fn income_expenditure(
        &self,
        year: i32,
        month: u32,
    ) -> Result<Vec<IncomeExpenditureRow>, ClientError>;

    /// PIV register for a department over a date range
    async fn piv_register(
        &self,
        dept_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PivRow>, ClientError>;

    /// Annual physical verification sheet
    async fn verification_sheet(&self, year: i32) -> Result<Vec<VerificationRow>, ClientError>;

    /// Solar payment settlements over a date range
    async fn solar_settlement(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<SolarRow>, ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_kind_from_str() {
        assert_eq!("companies".parse::<EntityKind>().unwrap(), EntityKind::Companies);
        assert_eq!("costcenters".parse::<EntityKind>().unwrap(), EntityKind::CostCentres);
        assert_eq!("departments".parse::<EntityKind>().unwrap(), EntityKind::Departments);
        assert!("warehouses".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_entity_kind_paths() {
        assert_eq!(EntityKind::Companies.path(), "/misapi/api/companies");
        assert_eq!(EntityKind::CostCentres.path(), "/misapi/api/costcenters");
        assert_eq!(EntityKind::Departments.path(), "/misapi/api/departments");
    }
}
