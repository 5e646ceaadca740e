//! HTTP adapter error taxonomy and mapping onto port errors.

use thiserror::Error;

use crate::application::ports::PortError;

/// Errors produced by the API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (DNS, connect, timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body did not parse as the expected JSON shape.
    #[error("failed to parse response: {message}")]
    JsonParse {
        /// Parse error description.
        message: String,
    },

    /// Backend returned a client error with a detail message.
    #[error("API error {status}: {detail}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Detail extracted from the error body, or a canned fallback.
        detail: String,
    },

    /// 401 or 403.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// 404 for the requested resource.
    #[error("not found: {resource}")]
    NotFound {
        /// Path that produced the 404.
        resource: String,
    },

    /// 429 after exhausting retries.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Server-suggested wait, or the default backoff.
        retry_after_secs: u64,
    },

    /// Transient failures persisted past the retry budget.
    #[error("request failed after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded {
        /// Attempts made, including the first.
        attempts: u32,
        /// Description of the final failure.
        last_error: String,
    },
}

impl From<ApiError> for PortError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Network(err) => Self::Unavailable {
                message: err.to_string(),
            },
            ApiError::JsonParse { message } => Self::MalformedResponse { message },
            ApiError::Api { detail, .. } => Self::Rejected { detail },
            ApiError::AuthenticationFailed => Self::AuthenticationFailed,
            ApiError::NotFound { resource } => Self::NotFound { resource },
            ApiError::RateLimited { retry_after_secs } => Self::RateLimited { retry_after_secs },
            ApiError::MaxRetriesExceeded { last_error, .. } => Self::Unavailable {
                message: last_error,
            },
        }
    }
}
