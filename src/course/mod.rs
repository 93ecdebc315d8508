//! Course tree model and progression rules

pub mod model;
pub mod progression;

pub use model::{
    Course, CourseId, CourseValidationError, Lesson, LessonId, LessonKind, Module, ModuleId,
};
pub use progression::{
    course_progress, is_locked, lesson_is_locked, lock_states, mark_lesson_complete,
    select_initial_lesson, ProgressionError,
};
