//! Data model for courses
//!
//! A course snapshot fetched from the server is a tree: a `Course` owns
//! ordered `Module`s, each of which owns ordered `Lesson`s. Ordering is
//! defined by the `order_index` keys, never by array position, so every
//! positional rule goes through the sorted accessors here.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique identifier for a course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CourseId(u64);

/// Unique identifier for a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleId(u64);

/// Unique identifier for a lesson
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LessonId(u64);

macro_rules! id_impls {
    ($name:ident) => {
        impl $name {
            /// Wrap a raw server id
            pub fn new(id: u64) -> Self {
                Self(id)
            }

            /// The underlying numeric id
            pub fn value(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

id_impls!(CourseId);
id_impls!(ModuleId);
id_impls!(LessonId);

/// Kind of content a lesson carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonKind {
    /// Embedded video (YouTube id or direct MP4 URL)
    Video,
    /// Interactive quiz
    Quiz,
}

/// An atomic unit of course content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    /// Unique identifier (unique within the course)
    pub id: LessonId,
    /// Module this lesson belongs to
    pub module_id: ModuleId,
    /// Display title
    pub title: String,
    /// YouTube id or MP4 URL (empty for quizzes)
    #[serde(default)]
    pub video_url: String,
    /// Markdown description shown under the player
    #[serde(default)]
    pub content: String,
    /// Position within the module; unique per module, gaps allowed
    pub order_index: u32,
    /// Whether the current user has completed this lesson
    pub is_completed: bool,
    /// Quiz score, when the lesson is a graded quiz
    #[serde(default)]
    pub score: Option<u8>,
    /// Content kind
    #[serde(rename = "type")]
    pub kind: LessonKind,
}

impl Lesson {
    /// URL a viewer can open for a video lesson.
    ///
    /// The server stores either a bare YouTube id or a full media URL;
    /// quizzes have no watchable media.
    pub fn watch_url(&self) -> Option<String> {
        if self.kind != LessonKind::Video || self.video_url.is_empty() {
            return None;
        }
        if self.video_url.contains("://") {
            Some(self.video_url.clone())
        } else {
            Some(format!("https://www.youtube.com/watch?v={}", self.video_url))
        }
    }
}

/// A named grouping of ordered lessons within a course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// Unique identifier
    pub id: ModuleId,
    /// Course this module belongs to
    pub course_id: CourseId,
    /// Display title
    pub title: String,
    /// Position within the course; unique per course, gaps allowed
    pub order_index: u32,
    /// Lessons as transmitted (use [`Module::lessons_in_order`] for sequence)
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

impl Module {
    /// Lessons sorted by `order_index`.
    ///
    /// Transmission order is not trusted anywhere in the crate.
    pub fn lessons_in_order(&self) -> Vec<&Lesson> {
        let mut lessons: Vec<&Lesson> = self.lessons.iter().collect();
        lessons.sort_by_key(|l| l.order_index);
        lessons
    }
}

/// A top-level learning unit composed of ordered modules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Unique identifier
    pub id: CourseId,
    /// Display title
    pub title: String,
    /// Display description
    #[serde(default)]
    pub description: String,
    /// Thumbnail URL for the dashboard card
    #[serde(default)]
    pub thumbnail: String,
    /// Server-computed completion percentage. Display hint only; the
    /// progression engine recomputes from the lesson flags.
    #[serde(default)]
    pub progress: u8,
    /// Modules as transmitted (the catalog endpoint omits them)
    #[serde(default)]
    pub modules: Vec<Module>,
}

impl Course {
    /// Modules sorted by `order_index`.
    pub fn modules_in_order(&self) -> Vec<&Module> {
        let mut modules: Vec<&Module> = self.modules.iter().collect();
        modules.sort_by_key(|m| m.order_index);
        modules
    }

    /// Total lesson count across all modules
    pub fn lesson_count(&self) -> usize {
        self.modules.iter().map(|m| m.lessons.len()).sum()
    }

    /// Find a lesson anywhere in the course by id
    pub fn find_lesson(&self, id: LessonId) -> Option<&Lesson> {
        self.modules.iter().flat_map(|m| m.lessons.iter()).find(|l| l.id == id)
    }

    /// Find the module that owns the given lesson
    pub fn module_containing(&self, id: LessonId) -> Option<&Module> {
        self.modules.iter().find(|m| m.lessons.iter().any(|l| l.id == id))
    }

    /// Check a fetched snapshot against the tree invariants.
    ///
    /// Run at the API boundary so malformed payloads are rejected before
    /// any progression rule sees them.
    pub fn validate(&self) -> Result<(), CourseValidationError> {
        let mut lesson_ids = HashSet::new();
        let mut module_orders = HashSet::new();

        for module in &self.modules {
            if module.course_id != self.id {
                return Err(CourseValidationError::ForeignModule {
                    course: self.id,
                    module: module.id,
                });
            }
            if !module_orders.insert(module.order_index) {
                return Err(CourseValidationError::DuplicateModuleOrder {
                    order_index: module.order_index,
                });
            }

            let mut lesson_orders = HashSet::new();
            for lesson in &module.lessons {
                if lesson.module_id != module.id {
                    return Err(CourseValidationError::ForeignLesson {
                        module: module.id,
                        lesson: lesson.id,
                    });
                }
                if !lesson_ids.insert(lesson.id) {
                    return Err(CourseValidationError::DuplicateLessonId(lesson.id));
                }
                if !lesson_orders.insert(lesson.order_index) {
                    return Err(CourseValidationError::DuplicateLessonOrder {
                        module: module.id,
                        order_index: lesson.order_index,
                    });
                }
            }
        }

        Ok(())
    }
}

/// Invariant violations in a fetched course snapshot
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CourseValidationError {
    /// A module's `course_id` points at a different course
    #[error("module {module} does not belong to course {course}")]
    ForeignModule { course: CourseId, module: ModuleId },

    /// A lesson's `module_id` points at a different module
    #[error("lesson {lesson} does not belong to module {module}")]
    ForeignLesson { module: ModuleId, lesson: LessonId },

    /// The same lesson id appears twice in the course
    #[error("duplicate lesson id {0} in course")]
    DuplicateLessonId(LessonId),

    /// Two modules share an `order_index`
    #[error("duplicate module order_index {order_index}")]
    DuplicateModuleOrder { order_index: u32 },

    /// Two lessons in one module share an `order_index`
    #[error("duplicate lesson order_index {order_index} in module {module}")]
    DuplicateLessonOrder { module: ModuleId, order_index: u32 },
}
