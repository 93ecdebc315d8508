//! Request and response types for the Gemini generateContent API

use serde::{Deserialize, Serialize};

use crate::course::model::Lesson;

/// A piece of content, either sent or received
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

/// A content block in a conversation turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Request body for `models/{model}:generateContent`
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// Single-turn request from one prompt string
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            contents: vec![Content { parts: vec![Part { text: text.into() }], role: None }],
        }
    }
}

/// One candidate answer from the model
#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

/// Response body for `models/{model}:generateContent`
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, `None` when the model sent nothing
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().map(|p| p.text.as_str()).collect();
        if text.is_empty() { None } else { Some(text) }
    }
}

/// Error payload the API attaches to non-2xx responses
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

/// Inner error object of [`ApiErrorBody`]
#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
}

/// The question the tutor is asked about a lesson.
///
/// Wording is part of the product: it sets the register of the answer
/// (simple explanation plus a practical example).
pub fn lesson_prompt(lesson: &Lesson) -> String {
    format!(
        "I am a student learning about \"{}\". The content is: {}. \
         Can you explain this topic simply and give me a practical example?",
        lesson.title, lesson.content
    )
}
