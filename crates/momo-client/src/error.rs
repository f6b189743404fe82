//! Client error types.

use momo_types::ErrorCode;

/// A non-2xx response, normalized from the server's error envelope.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{method} {path} failed with {status} ({code}): {message}")]
pub struct MomoError {
    pub status: u16,
    pub code: ErrorCode,
    pub message: String,
    pub path: String,
    pub method: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Api(#[from] MomoError),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("request cancelled")]
    Cancelled,
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Symbolic code when this is an API error.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ClientError::Api(e) => Some(e.code),
            _ => None,
        }
    }

    /// HTTP status when this is an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api(e) => Some(e.status),
            _ => None,
        }
    }

    /// True when a per-request timeout elapsed.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Http(e) if e.is_timeout())
    }
}
