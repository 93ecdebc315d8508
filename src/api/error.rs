//! Error types for the platform API integration

use thiserror::Error;

use crate::course::model::CourseValidationError;
use crate::portfolio::UploadError;

/// Errors that can occur when talking to the IAEV Online API
#[derive(Debug, Error)]
pub enum ApiError {
    /// No session token is stored
    #[error("Not logged in. Run `aula login` to start a session")]
    NotLoggedIn,

    /// Failed to access system keyring
    #[error("Failed to access keyring: {0}")]
    Keyring(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server rejected the stored session token
    #[error("Session rejected by the server. Run `aula login` again")]
    Unauthorized,

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Server sent a course tree that fails consistency checks
    #[error("Server sent an inconsistent course: {0}")]
    InvalidCourse(#[from] CourseValidationError),

    /// Rejected before upload, nothing was sent
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// Failed to read a file chosen for upload
    #[error("Failed to read upload: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Check if this error means the user has to log in (again)
    pub fn requires_login(&self) -> bool {
        matches!(self, ApiError::NotLoggedIn | ApiError::Unauthorized)
    }
}
