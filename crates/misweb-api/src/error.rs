//! Error types for misweb-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use misweb_client::ClientError;
use misweb_core::FilterError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Upstream(#[from] ClientError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } | ApiError::Filter(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// User-facing message, also shown in HTML error banners
    pub fn message(&self) -> String {
        match self {
            ApiError::Filter(err) => err.user_message(),
            ApiError::Upstream(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(serde_json::json!({
            "error": self.message(),
        }));
        (status, body).into_response()
    }
}
