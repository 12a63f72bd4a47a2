//! Error types for misweb-client

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid upstream URL: {url}")]
    InvalidUrl { url: String },

    #[error("Upstream request failed")]
    Transport(#[from] hyper::Error),

    #[error("Upstream returned HTTP {status}")]
    Status { status: u16 },

    #[error("Upstream request timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("Failed to decode upstream response: {message}")]
    Decode { message: String },
}

impl ClientError {
    /// Short message suitable for an on-page error banner
    pub fn user_message(&self) -> String {
        match self {
            ClientError::InvalidUrl { .. } => "The report service address is misconfigured.".to_string(),
            ClientError::Transport(_) => "Could not reach the report service.".to_string(),
            ClientError::Status { status } => {
                format!("The report service returned an error (HTTP {}).", status)
            }
            ClientError::Timeout { secs } => {
                format!("The report service did not respond within {} seconds.", secs)
            }
            ClientError::Decode { .. } => "The report service returned unexpected data.".to_string(),
        }
    }
}

/// Result type with ClientError
pub type ClientResult<T> = Result<T, ClientError>;
