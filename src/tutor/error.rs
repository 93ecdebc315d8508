//! Error types for the AI tutor integration

use thiserror::Error;

/// Errors that can occur when asking the tutor for an explanation
#[derive(Debug, Error)]
pub enum TutorError {
    /// No API key in the environment
    #[error("Tutor API key not configured. Set GEMINI_API_KEY in the environment")]
    ApiKeyNotFound,

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// API returned an error response
    #[error("Tutor API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Rate limited by the API
    #[error("Rate limited. Retry after {retry_after_seconds} seconds")]
    RateLimited {
        /// Seconds to wait before retrying
        retry_after_seconds: u64,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The model answered with no usable text
    #[error("The tutor returned an empty explanation")]
    EmptyResponse,
}

impl TutorError {
    /// Check if this error is recoverable (user can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TutorError::RateLimited { .. } | TutorError::Request(_) | TutorError::EmptyResponse
        )
    }
}
