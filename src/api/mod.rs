//! IAEV Online platform API integration
//!
//! Provides session token management, the HTTP client, and the wire
//! types for the platform's JSON endpoints.

pub mod auth;
pub mod client;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use auth::TokenStore;
pub use client::ApiClient;
pub use error::ApiError;
pub use models::{AuthResponse, User, UserRole};
