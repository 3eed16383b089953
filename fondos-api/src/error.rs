//! Error types for the fund service client.

use thiserror::Error;

/// Why a response body could not be turned into domain types.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("field `{field}`: {reason}")]
    Field { field: &'static str, reason: String },
}

/// Failure of a single API call.
///
/// `Display` is the message meant for the user. For `Status` that is exactly
/// what the service put in its error body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response from {endpoint}: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: DecodeError,
    },
}

impl ApiError {
    /// HTTP status for errors the service answered with.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            ApiError::Decode { .. } => None,
        }
    }
}
