//! Hyper-based implementation of the report source
//!
//! Every call is a single GET with a deadline; path segments built from
//! user-selected values are percent-encoded before interpolation.

use async_trait::async_trait;
use chrono::NaiveDate;
use hyper::client::HttpConnector;
use hyper::{Client, Uri};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::ClientError;
use crate::types::{
    Entity, IncomeExpenditureRow, LedgerRow, Payload, PivRow, SolarRow, VerificationRow,
};
use crate::{EntityKind, ReportSource};

/// HTTP client for the upstream MIS backend
pub struct HttpReportSource {
    client: Client<HttpConnector>,
    base_url: String,
    timeout: Duration,
}

impl HttpReportSource {
    /// Create a source against a base URL such as `http://mis.internal:8080`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: Client::new(),
            base_url,
            timeout,
        }
    }

    /// Issue a GET and decode the row payload, tolerating both envelope shapes
    async fn get_rows<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("GET {}", url);

        let uri: Uri = url
            .parse()
            .map_err(|_| ClientError::InvalidUrl { url: url.clone() })?;

        let response = tokio::time::timeout(self.timeout, self.client.get(uri))
            .await
            .map_err(|_| ClientError::Timeout {
                secs: self.timeout.as_secs(),
            })??;

        let status = response.status();
        if !status.is_success() {
            log::warn!("GET {} -> HTTP {}", url, status);
            return Err(ClientError::Status {
                status: status.as_u16(),
            });
        }

        let body = hyper::body::to_bytes(response.into_body()).await?;
        let payload: Payload<T> = serde_json::from_slice(&body).map_err(|e| ClientError::Decode {
            message: e.to_string(),
        })?;

        Ok(payload.into_rows())
    }
}

#[async_trait]
impl ReportSource for HttpReportSource {
    async fn entities(&self, kind: EntityKind) -> Result<Vec<Entity>, ClientError> {
        self.get_rows(kind.path()).await
    }

    async fn ledger_card(
        &self,
        code: &str,
        year: i32,
        start_month: u32,
        end_month: u32,
    ) -> Result<Vec<LedgerRow>, ClientError> {
        let path = format!(
            "/misapi/api/ledgercard/report/{}/{}/{}/{}",
            urlencoding::encode(code),
            year,
            start_month,
            end_month
        );
        self.get_rows(&path).await
    }

    async fn income_expenditure(
        &self,
        year: i32,
        month: u32,
    ) -> Result<Vec<IncomeExpenditureRow>, ClientError> {
        let path = format!("/misapi/api/IncomeExpenditureRegionDetailed/{}/{}", year, month);
        self.get_rows(&path).await
    }

    async fn piv_register(
        &self,
        dept_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PivRow>, ClientError> {
        let path = format!(
            "/misapi/api/pivregister/{}/{}/{}",
            urlencoding::encode(dept_id),
            from.format("%Y-%m-%d"),
            to.format("%Y-%m-%d")
        );
        self.get_rows(&path).await
    }

    async fn verification_sheet(&self, year: i32) -> Result<Vec<VerificationRow>, ClientError> {
        let path = format!("/misapi/api/annual-verification-sheet/{}", year);
        self.get_rows(&path).await
    }

    async fn solar_settlement(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<SolarRow>, ClientError> {
        let path = format!(
            "/misapi/api/solarsettlement/{}/{}",
            from.format("%Y-%m-%d"),
            to.format("%Y-%m-%d")
        );
        self.get_rows(&path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let source = HttpReportSource::new("http://mis.internal:8080/", Duration::from_secs(5));
        assert_eq!(source.base_url, "http://mis.internal:8080");

        let source = HttpReportSource::new("http://mis.internal:8080///", Duration::from_secs(5));
        assert_eq!(source.base_url, "http://mis.internal:8080");
    }

    #[test]
    fn test_path_segment_encoding() {
        // Ledger codes can carry slashes; they must not split the path
        let encoded = urlencoding::encode("41/010");
        assert_eq!(encoded, "41%2F010");
    }
}
