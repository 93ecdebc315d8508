//! HTTP client for the Gemini tutor API

use reqwest::Client;

use super::error::TutorError;
use super::models::{ApiErrorBody, GenerateContentRequest, GenerateContentResponse, lesson_prompt};
use crate::course::model::Lesson;

/// AI tutor client
pub struct TutorClient {
    /// HTTP client
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Model identifier, e.g. "gemini-2.5-flash"
    model: String,
}

impl TutorClient {
    /// Gemini API base URL
    const API_BASE: &'static str = "https://generativelanguage.googleapis.com/v1beta/models";

    /// Create a new tutor client with the given API key and model
    pub fn new(api_key: String, model: String) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(300))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, api_key, model }
    }

    /// Create a client from the environment.
    ///
    /// Reads `GEMINI_API_KEY`, falling back to `API_KEY`.
    pub fn from_env(model: String) -> Result<Self, TutorError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .map_err(|_| TutorError::ApiKeyNotFound)?;
        Ok(Self::new(api_key, model))
    }

    /// Ask the tutor to explain a lesson.
    ///
    /// Returns the explanation text, or [`TutorError::EmptyResponse`]
    /// when the model answers with nothing usable.
    pub async fn explain_lesson(&self, lesson: &Lesson) -> Result<String, TutorError> {
        tracing::debug!("Asking tutor about lesson {}", lesson.id);

        let request = GenerateContentRequest::from_text(lesson_prompt(lesson));
        let url = format!("{}/{}:generateContent", Self::API_BASE, self.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(TutorError::RateLimited { retry_after_seconds: retry_after });
        }

        if !status.is_success() {
            let message = match response.json::<ApiErrorBody>().await {
                Ok(body) => body.error.message,
                Err(_) => status.canonical_reason().unwrap_or("request failed").to_string(),
            };
            return Err(TutorError::Api { status: status.as_u16(), message });
        }

        let body: GenerateContentResponse = response.json().await?;
        body.text().ok_or(TutorError::EmptyResponse)
    }
}
