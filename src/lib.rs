//! Aula - A command-line student workspace for the IAEV Online learning
//! platform
//!
//! Aula talks to the platform's API to browse courses, walk lessons in
//! order with sequential unlocking, report completions, ask the AI tutor
//! for explanations, issue completion certificates, and manage the
//! community portfolio and academic kardex.

pub mod api;
pub mod certificate;
pub mod config;
pub mod course;
pub mod kardex;
pub mod player;
pub mod portfolio;
pub mod tutor;

pub use api::ApiClient;
pub use config::Config;
pub use course::model::Course;
pub use player::CoursePlayer;
