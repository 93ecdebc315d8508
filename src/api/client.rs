//! HTTP client for the IAEV Online platform API
//!
//! The API is a small set of PHP endpoints behind one base URL. Responses
//! are JSON; errors carry a `{ "message": ... }` body. Authenticated
//! calls send the session token as a bearer header.

use std::path::Path;

use reqwest::multipart;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::ApiError;
use super::models::{
    AuthResponse, CreateCourseRequest, ErrorBody, LoginRequest, ProgressUpdate,
};
use crate::course::model::{Course, CourseId, LessonId};
use crate::kardex::GradeRecord;
use crate::portfolio::{Project, UploadKind};

/// Platform API client
pub struct ApiClient {
    /// HTTP client
    client: Client,
    /// Base URL of the API, without a trailing slash
    base_url: String,
    /// Session token, when logged in
    token: Option<String>,
}

impl ApiClient {
    /// Request timeout in seconds
    const TIMEOUT_SECS: u64 = 30;

    /// Create an unauthenticated client (enough for `login`)
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(Self::TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self { client, base_url, token: None }
    }

    /// Create a client that authenticates with the given session token
    pub fn with_token(base_url: impl Into<String>, token: String) -> Self {
        let mut client = Self::new(base_url);
        client.token = Some(token);
        client
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, endpoint);
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Map non-2xx responses onto [`ApiError`]
    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.message,
                Err(_) => status.canonical_reason().unwrap_or("request failed").to_string(),
            };
            return Err(ApiError::Api { status: status.as_u16(), message });
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        tracing::debug!("GET {}", endpoint);
        let response = self.request(Method::GET, endpoint).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        tracing::debug!("POST {}", endpoint);
        let response = self.request(Method::POST, endpoint).json(body).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Exchange credentials for a session token and user profile
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        self.post_json("/auth.php", &LoginRequest { email, password }).await
    }

    /// Fetch the course catalog
    ///
    /// Catalog entries carry display fields only; module trees come from
    /// [`fetch_course`](Self::fetch_course).
    pub async fn fetch_courses(&self) -> Result<Vec<Course>, ApiError> {
        self.get_json("/courses.php").await
    }

    /// Fetch one course with its full module and lesson tree
    ///
    /// The tree is validated before it is handed to callers, so ids and
    /// parent links can be trusted downstream.
    pub async fn fetch_course(&self, id: CourseId) -> Result<Course, ApiError> {
        let course: Course = self.get_json(&format!("/courses.php?id={id}")).await?;
        course.validate()?;
        Ok(course)
    }

    /// Report a lesson as completed
    ///
    /// The server only acknowledges; the client derives its own course
    /// state and never re-fetches after this call.
    pub async fn record_progress(&self, lesson_id: LessonId) -> Result<(), ApiError> {
        tracing::debug!("POST /progress.php lesson_id={}", lesson_id);
        let update = ProgressUpdate { lesson_id, completed: true };
        let response = self.request(Method::POST, "/progress.php").json(&update).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Fetch the student's portfolio projects
    pub async fn fetch_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.get_json("/projects.php").await
    }

    /// Upload a portfolio project file with its metadata
    ///
    /// The file type is checked locally first; unsupported extensions are
    /// rejected before anything is sent.
    pub async fn upload_project(
        &self,
        title: &str,
        description: &str,
        file: &Path,
    ) -> Result<Project, ApiError> {
        let kind = UploadKind::from_path(file)?;
        let bytes = tokio::fs::read(file).await?;
        let file_name = file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();

        tracing::debug!("POST /upload.php file={} ({} bytes)", file_name, bytes.len());

        let part = multipart::Part::bytes(bytes).file_name(file_name).mime_str(kind.mime())?;
        let form = multipart::Form::new()
            .text("title", title.to_string())
            .text("description", description.to_string())
            .part("file", part);

        let response = self.request(Method::POST, "/upload.php").multipart(form).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Fetch the academic kardex (grade history)
    pub async fn fetch_kardex(&self) -> Result<Vec<GradeRecord>, ApiError> {
        self.get_json("/kardex.php").await
    }

    /// Create a course in the catalog (teacher and admin accounts)
    pub async fn create_course(
        &self,
        title: &str,
        description: &str,
        thumbnail: &str,
    ) -> Result<(), ApiError> {
        let request = CreateCourseRequest::new(title, description, thumbnail);
        let response = self.request(Method::POST, "/courses.php").json(&request).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}
