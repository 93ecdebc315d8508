//! Lesson progression and access rules
//!
//! Everything here is a pure function over an in-memory [`Course`] value:
//! no I/O, no await points, no shared state. The caller fetches a snapshot,
//! runs these rules, and is responsible for persisting completions and for
//! feeding the most recently derived course value back in.
//!
//! Locking chains strictly within a module: a lesson is held back only by
//! its immediately preceding sibling, and finishing one module never gates
//! the next one. Both are deliberate product behavior.

use thiserror::Error;

use super::model::{Course, Lesson, LessonId, Module};

/// Errors from progression operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProgressionError {
    /// The lesson id is absent from the course tree. The caller must not
    /// follow up with a persistence call for it.
    #[error("lesson {0} not found in course")]
    LessonNotFound(LessonId),
}

/// Completion percentage for a course, in `[0, 100]`.
///
/// Recomputed from the lesson flags on every call; the server's `progress`
/// field is never consulted. An empty course is 0% complete.
pub fn course_progress(course: &Course) -> u8 {
    let total = course.lesson_count();
    if total == 0 {
        return 0;
    }
    let completed =
        course.modules.iter().flat_map(|m| &m.lessons).filter(|l| l.is_completed).count();
    // Round half up; counts are non-negative so round() does exactly that.
    ((completed as f64 * 100.0) / total as f64).round() as u8
}

/// The lesson to show when a course is first opened.
///
/// Walks modules and lessons in `order_index` order and returns the first
/// incomplete lesson. When every lesson is complete, falls back to the
/// first lesson overall; a course with no lessons selects nothing.
pub fn select_initial_lesson(course: &Course) -> Option<&Lesson> {
    let modules = course.modules_in_order();

    for module in &modules {
        for lesson in module.lessons_in_order() {
            if !lesson.is_completed {
                return Some(lesson);
            }
        }
    }

    modules.iter().find_map(|m| m.lessons_in_order().first().copied())
}

/// Whether the lesson at `index` (position within the module's lessons
/// sorted by `order_index`) is locked.
///
/// The first lesson is never locked, a completed lesson is never locked,
/// and otherwise a lesson is locked exactly when its immediate predecessor
/// is incomplete. An out-of-range index is not locked.
pub fn is_locked(module: &Module, index: usize) -> bool {
    locked_at(&module.lessons_in_order(), index)
}

/// Lock state for every lesson in a module, aligned with
/// [`Module::lessons_in_order`].
pub fn lock_states(module: &Module) -> Vec<bool> {
    let lessons = module.lessons_in_order();
    (0..lessons.len()).map(|i| locked_at(&lessons, i)).collect()
}

/// Lock state for a single lesson anywhere in the course.
///
/// `None` when the id is not part of the course.
pub fn lesson_is_locked(course: &Course, id: LessonId) -> Option<bool> {
    let module = course.module_containing(id)?;
    let lessons = module.lessons_in_order();
    let index = lessons.iter().position(|l| l.id == id)?;
    Some(locked_at(&lessons, index))
}

fn locked_at(lessons: &[&Lesson], index: usize) -> bool {
    match lessons.get(index) {
        Some(lesson) => index > 0 && !lesson.is_completed && !lessons[index - 1].is_completed,
        None => false,
    }
}

/// Derive a new course value with one lesson marked complete.
///
/// The input is left untouched; callers detect the change by holding both
/// values. Marking an already-completed lesson is a no-op that still
/// returns the new value. An unknown id fails loudly so the caller knows
/// nothing changed and nothing should be persisted.
pub fn mark_lesson_complete(course: &Course, id: LessonId) -> Result<Course, ProgressionError> {
    let mut updated = course.clone();
    for module in &mut updated.modules {
        if let Some(lesson) = module.lessons.iter_mut().find(|l| l.id == id) {
            lesson.is_completed = true;
            return Ok(updated);
        }
    }
    Err(ProgressionError::LessonNotFound(id))
}
