//! Request and response types for the platform API

use serde::{Deserialize, Serialize};

use crate::course::model::LessonId;

/// Role attached to a platform account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Teacher,
    Admin,
}

impl UserRole {
    /// Whether this role may manage the course catalog
    pub fn can_manage_courses(&self) -> bool {
        matches!(self, UserRole::Teacher | UserRole::Admin)
    }
}

/// An authenticated user profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

/// Credentials for `POST /auth.php`
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Successful login payload
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    /// Bearer token for subsequent requests
    pub token: String,
    pub user: User,
}

/// Completion report for `POST /progress.php`
#[derive(Debug, Serialize)]
pub struct ProgressUpdate {
    pub lesson_id: LessonId,
    pub completed: bool,
}

/// Body for `POST /courses.php`
///
/// The endpoint multiplexes on `action`; course creation is the only
/// action the client sends.
#[derive(Debug, Serialize)]
pub struct CreateCourseRequest<'a> {
    pub action: &'static str,
    pub title: &'a str,
    pub description: &'a str,
    pub thumbnail: &'a str,
}

impl<'a> CreateCourseRequest<'a> {
    pub fn new(title: &'a str, description: &'a str, thumbnail: &'a str) -> Self {
        Self { action: "create_course", title, description, thumbnail }
    }
}

/// Error payload the API attaches to non-2xx responses
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn user_role_deserializes_lowercase() {
        let user: User = serde_json::from_value(json!({
            "id": 7,
            "name": "Ana Torres",
            "email": "ana@example.com",
            "role": "student"
        }))
        .unwrap();
        assert_eq!(user.role, UserRole::Student);
        assert_eq!(user.avatar_url, None);
    }

    #[test]
    fn course_management_is_staff_only() {
        assert!(!UserRole::Student.can_manage_courses());
        assert!(UserRole::Teacher.can_manage_courses());
        assert!(UserRole::Admin.can_manage_courses());
    }

    #[test]
    fn progress_update_serializes_lesson_id_as_number() {
        let update = ProgressUpdate { lesson_id: LessonId::new(42), completed: true };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value, json!({ "lesson_id": 42, "completed": true }));
    }

    #[test]
    fn create_course_request_carries_action() {
        let request = CreateCourseRequest::new("Rust 101", "Intro", "https://img.example/1.png");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["action"], "create_course");
        assert_eq!(value["title"], "Rust 101");
    }

    #[test]
    fn auth_response_parses() {
        let auth: AuthResponse = serde_json::from_value(json!({
            "token": "tok-123",
            "user": { "id": 1, "name": "Val", "email": "v@iaev.edu", "role": "admin" }
        }))
        .unwrap();
        assert_eq!(auth.token, "tok-123");
        assert!(auth.user.role.can_manage_courses());
    }
}
