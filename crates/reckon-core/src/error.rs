//! Error types for Reckon

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Transaction was not created")]
    NotCreated,
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Api(ApiError::Transport(err.to_string()))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Error payload returned by the YNAB API: `{"error": {"id", "name", "detail"}}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ErrorDetail {
    pub fn new(id: &str, name: &str, detail: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            name: Some(name.to_string()),
            detail: Some(detail.to_string()),
        }
    }

    /// Most specific human-readable text: detail, then name, then the fallback
    pub fn message_or(&self, fallback: &str) -> String {
        self.detail
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.name.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or(fallback)
            .to_string()
    }
}

/// Envelope around [`ErrorDetail`] as it appears on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Failures reported by the ledger API, classified at the client boundary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("{}", .0.message_or("Unauthorized: check the YNAB access token"))]
    Unauthorized(ErrorDetail),

    #[error("{}", .0.message_or("Resource not found"))]
    NotFound(ErrorDetail),

    #[error("{}", .0.message_or("Request was rejected as invalid"))]
    ValidationFailed(ErrorDetail),

    #[error("{}", .0.message_or("Request conflicts with existing data"))]
    Conflict(ErrorDetail),

    #[error("{}", .0.message_or("Rate limit exceeded, try again later"))]
    RateLimited(ErrorDetail),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("{}", unknown_message(.status, .detail))]
    Unknown { status: u16, detail: ErrorDetail },
}

fn unknown_message(status: &u16, detail: &ErrorDetail) -> String {
    detail.message_or(&format!("Unexpected API response (HTTP {})", status))
}

impl ApiError {
    /// Classify an HTTP status and (possibly empty) error payload
    pub fn from_status(status: u16, detail: ErrorDetail) -> Self {
        match status {
            400 | 422 => ApiError::ValidationFailed(detail),
            401 | 403 => ApiError::Unauthorized(detail),
            404 => ApiError::NotFound(detail),
            409 => ApiError::Conflict(detail),
            429 => ApiError::RateLimited(detail),
            _ => ApiError::Unknown { status, detail },
        }
    }

    /// HTTP status this error maps to, if it came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::ValidationFailed(_) => Some(400),
            ApiError::Unauthorized(_) => Some(401),
            ApiError::NotFound(_) => Some(404),
            ApiError::Conflict(_) => Some(409),
            ApiError::RateLimited(_) => Some(429),
            ApiError::Transport(_) => None,
            ApiError::Unknown { status, .. } => Some(*status),
        }
    }

    /// The wire payload carried by this error, if any
    pub fn detail(&self) -> Option<&ErrorDetail> {
        match self {
            ApiError::Unauthorized(d)
            | ApiError::NotFound(d)
            | ApiError::ValidationFailed(d)
            | ApiError::Conflict(d)
            | ApiError::RateLimited(d) => Some(d),
            ApiError::Unknown { detail, .. } => Some(detail),
            ApiError::Transport(_) => None,
        }
    }
}
