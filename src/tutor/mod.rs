//! AI tutor integration
//!
//! Sends a lesson's title and content to the Gemini API and returns a
//! plain-language explanation with a practical example.

pub mod client;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use client::TutorClient;
pub use error::TutorError;
pub use models::lesson_prompt;
