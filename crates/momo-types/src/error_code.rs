//! Symbolic error codes returned by the API.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Closed set of error kinds exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidRequest,
    Unauthorized,
    NotFound,
    Conflict,
    InternalError,
    NotImplemented,
}

impl ErrorCode {
    /// Derive a code from an HTTP status when the body carries none.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => ErrorCode::InvalidRequest,
            401 | 403 => ErrorCode::Unauthorized,
            404 => ErrorCode::NotFound,
            409 => ErrorCode::Conflict,
            501 => ErrorCode::NotImplemented,
            _ => ErrorCode::InternalError,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidRequest => "invalid_request",
            ErrorCode::Unauthorized => "unauthorized",
            ErrorCode::NotFound => "not_found",
            ErrorCode::Conflict => "conflict",
            ErrorCode::InternalError => "internal_error",
            ErrorCode::NotImplemented => "not_implemented",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown error code: {0}")]
pub struct UnknownErrorCode(pub String);

impl FromStr for ErrorCode {
    type Err = UnknownErrorCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "invalid_request" => Ok(ErrorCode::InvalidRequest),
            "unauthorized" => Ok(ErrorCode::Unauthorized),
            "not_found" => Ok(ErrorCode::NotFound),
            "conflict" => Ok(ErrorCode::Conflict),
            "internal_error" => Ok(ErrorCode::InternalError),
            "not_implemented" => Ok(ErrorCode::NotImplemented),
            other => Err(UnknownErrorCode(other.to_string())),
        }
    }
}
