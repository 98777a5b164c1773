//! Trendmood error types

use std::time::Duration;

/// Trendmood error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Provider/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("model not found: {0}")]
    ModelNotFound(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("empty response from classifier")]
    EmptyResponse,

    /// Item source could not deliver items for a group.
    #[error("failed to fetch items for group '{group}': {message}")]
    Fetch { group: String, message: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Configuration errors
    #[error("no sentiment provider configured")]
    NoProvider,

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Whether this error signals an exhausted classifier quota.
    ///
    /// Covers explicit rate limiting, quota errors, and API errors whose
    /// message mentions a quota (some providers report quota exhaustion
    /// with a generic status).
    pub fn is_quota(&self) -> bool {
        match self {
            Error::RateLimited { .. } | Error::QuotaExceeded(_) => true,
            Error::Api { status, message } => {
                *status == 429 || message.to_lowercase().contains("quota")
            }
            _ => false,
        }
    }

    /// Whether the failure is likely to go away on its own.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Http(_) | Error::RateLimited { .. } | Error::QuotaExceeded(_) => true,
            Error::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Server-provided retry hint, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Error::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err.to_string())
    }
}

/// Result type alias for Trendmood operations
pub type Result<T> = std::result::Result<T, Error>;
