use std::path::PathBuf;
use thiserror::Error;

/// Failure of a voice service call
///
/// Every variant is a transport or protocol failure; the variants only
/// classify it for callers that want to tell a timeout from a server error.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request timeout")]
    Timeout,

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("HTTP error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Failed to read audio from {}: {source}", path.display())]
    Audio {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Timeout)
    }

    /// HTTP status for non-2xx responses
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::Connection(err.to_string())
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Status {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            ApiError::Request(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}
