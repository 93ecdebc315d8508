//! Interactive course session
//!
//! Holds the working copy of one course plus the active lesson and runs
//! every interaction through the progression rules. Each session owns
//! its course value; nothing is shared or cached across sessions, so a
//! stale snapshot can only ever affect the session holding it.

use thiserror::Error;

use crate::api::{ApiClient, ApiError};
use crate::course::model::{Course, Lesson, LessonId};
use crate::course::progression::{self, ProgressionError};

/// Errors from course session operations
#[derive(Debug, Error)]
pub enum PlayerError {
    /// A progression rule rejected the operation
    #[error(transparent)]
    Progression(#[from] ProgressionError),

    /// The lesson exists but its predecessor is not finished
    #[error("Lesson {0} is locked. Finish the previous lesson first")]
    LessonLocked(LessonId),

    /// Persisting the completion failed; the working copy is unchanged
    #[error("Failed to record the completion with the server")]
    Api(#[from] ApiError),
}

/// One student's working session on a course
pub struct CoursePlayer {
    course: Course,
    active: Option<LessonId>,
}

impl CoursePlayer {
    /// Start a session on a fetched course.
    ///
    /// The initial active lesson is the first incomplete one in reading
    /// order, the first lesson overall when everything is done, and none
    /// for a course with no lessons.
    pub fn new(course: Course) -> Self {
        let active = progression::select_initial_lesson(&course).map(|l| l.id);
        Self { course, active }
    }

    /// The course value this session is working on
    pub fn course(&self) -> &Course {
        &self.course
    }

    /// The lesson currently open, if any
    pub fn active_lesson(&self) -> Option<&Lesson> {
        self.course.find_lesson(self.active?)
    }

    /// Completion percentage derived from the working copy
    pub fn progress(&self) -> u8 {
        progression::course_progress(&self.course)
    }

    /// Whether the course is fully completed (and has lessons at all)
    pub fn is_complete(&self) -> bool {
        self.course.lesson_count() > 0 && self.progress() == 100
    }

    /// Open a lesson, honoring the lock rules, and return it.
    ///
    /// Completed lessons and the first lesson of a module can always be
    /// opened; everything else needs its predecessor finished. Anything
    /// shown or sent downstream for a lesson must come from the value
    /// returned here, never from a raw tree lookup.
    pub fn open_lesson(&mut self, id: LessonId) -> Result<&Lesson, PlayerError> {
        let locked = progression::lesson_is_locked(&self.course, id)
            .ok_or(ProgressionError::LessonNotFound(id))?;
        if locked {
            return Err(PlayerError::LessonLocked(id));
        }
        self.active = Some(id);
        self.course.find_lesson(id).ok_or_else(|| ProgressionError::LessonNotFound(id).into())
    }

    /// Mark a lesson complete and persist it.
    ///
    /// The new course value is derived first, so an unknown id fails
    /// before anything is sent. The completion is then reported to the
    /// server and only after that acknowledgement does the working copy
    /// swap to the derived value. An already-completed lesson is a
    /// no-op with no network traffic.
    pub async fn complete_lesson(
        &mut self,
        api: &ApiClient,
        id: LessonId,
    ) -> Result<(), PlayerError> {
        let lesson =
            self.course.find_lesson(id).ok_or(ProgressionError::LessonNotFound(id))?;
        if lesson.is_completed {
            tracing::debug!("Lesson {} already completed, nothing to do", id);
            return Ok(());
        }
        if progression::lesson_is_locked(&self.course, id) == Some(true) {
            return Err(PlayerError::LessonLocked(id));
        }

        let updated = progression::mark_lesson_complete(&self.course, id)?;
        api.record_progress(id).await?;
        self.course = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::course::model::{CourseId, LessonKind, Module, ModuleId};
    use crate::tutor::lesson_prompt;

    fn lesson(id: u64, module_id: u64, order_index: u32, is_completed: bool) -> Lesson {
        Lesson {
            id: LessonId::new(id),
            module_id: ModuleId::new(module_id),
            title: format!("Lesson {id}"),
            video_url: String::new(),
            content: String::new(),
            order_index,
            is_completed,
            score: None,
            kind: LessonKind::Video,
        }
    }

    fn course(flags: [bool; 3]) -> Course {
        Course {
            id: CourseId::new(1),
            title: "Test Course".into(),
            description: String::new(),
            thumbnail: String::new(),
            progress: 0,
            modules: vec![Module {
                id: ModuleId::new(10),
                course_id: CourseId::new(1),
                title: "Module 10".into(),
                order_index: 0,
                lessons: vec![
                    lesson(100, 10, 0, flags[0]),
                    lesson(101, 10, 1, flags[1]),
                    lesson(102, 10, 2, flags[2]),
                ],
            }],
        }
    }

    /// Client pointing nowhere. Paths that should stay off the network
    /// succeed or fail before any request is attempted.
    fn dead_api() -> ApiClient {
        ApiClient::new("http://127.0.0.1:9")
    }

    #[test]
    fn session_opens_on_first_incomplete_lesson() {
        let player = CoursePlayer::new(course([true, false, false]));
        assert_eq!(player.active_lesson().unwrap().id, LessonId::new(101));
        assert_eq!(player.progress(), 33);
        assert!(!player.is_complete());
    }

    #[test]
    fn empty_course_session_has_no_active_lesson() {
        let mut bare = course([false, false, false]);
        bare.modules.clear();
        let player = CoursePlayer::new(bare);
        assert!(player.active_lesson().is_none());
        assert_eq!(player.progress(), 0);
        assert!(!player.is_complete());
    }

    #[test]
    fn locked_lesson_cannot_be_opened() {
        let mut player = CoursePlayer::new(course([false, false, false]));
        let err = player.open_lesson(LessonId::new(102)).unwrap_err();
        assert!(matches!(err, PlayerError::LessonLocked(id) if id == LessonId::new(102)));
        // Active lesson is unchanged.
        assert_eq!(player.active_lesson().unwrap().id, LessonId::new(100));
    }

    #[test]
    fn completed_lesson_can_be_reopened() {
        let mut player = CoursePlayer::new(course([true, false, false]));
        let reopened = player.open_lesson(LessonId::new(100)).unwrap().id;
        assert_eq!(reopened, LessonId::new(100));
        assert_eq!(player.active_lesson().unwrap().id, LessonId::new(100));
    }

    #[test]
    fn opening_unknown_lesson_fails() {
        let mut player = CoursePlayer::new(course([false, false, false]));
        let err = player.open_lesson(LessonId::new(999)).unwrap_err();
        assert!(matches!(
            err,
            PlayerError::Progression(ProgressionError::LessonNotFound(id))
                if id == LessonId::new(999)
        ));
    }

    #[test]
    fn tutor_prompts_only_come_from_openable_lessons() {
        // Explaining a lesson by id resolves through open_lesson, so a
        // locked lesson's content never reaches the prompt builder.
        let mut player = CoursePlayer::new(course([false, false, false]));
        let err = player.open_lesson(LessonId::new(102)).unwrap_err();
        assert!(matches!(err, PlayerError::LessonLocked(id) if id == LessonId::new(102)));

        let prompt = lesson_prompt(player.open_lesson(LessonId::new(100)).unwrap());
        assert!(prompt.contains("Lesson 100"));
    }

    #[tokio::test]
    async fn completing_a_completed_lesson_skips_the_network() {
        let mut player = CoursePlayer::new(course([true, false, false]));
        player.complete_lesson(&dead_api(), LessonId::new(100)).await.unwrap();
        assert_eq!(player.progress(), 33);
    }

    #[tokio::test]
    async fn completing_unknown_lesson_fails_before_the_network() {
        let mut player = CoursePlayer::new(course([true, false, false]));
        let err = player.complete_lesson(&dead_api(), LessonId::new(999)).await.unwrap_err();
        assert!(matches!(
            err,
            PlayerError::Progression(ProgressionError::LessonNotFound(id))
                if id == LessonId::new(999)
        ));
        // The working copy is untouched.
        assert_eq!(player.progress(), 33);
    }

    #[tokio::test]
    async fn completing_a_locked_lesson_is_rejected() {
        let mut player = CoursePlayer::new(course([false, false, false]));
        let err = player.complete_lesson(&dead_api(), LessonId::new(102)).await.unwrap_err();
        assert!(matches!(err, PlayerError::LessonLocked(id) if id == LessonId::new(102)));
    }

    #[tokio::test]
    async fn persistence_failure_leaves_the_working_copy_untouched() {
        // Lesson 101 is valid and unlocked, so the request is attempted
        // and fails. The derived value must not be committed.
        let mut player = CoursePlayer::new(course([true, false, false]));
        let err = player.complete_lesson(&dead_api(), LessonId::new(101)).await.unwrap_err();
        assert!(matches!(err, PlayerError::Api(_)));
        assert_eq!(player.progress(), 33);
        assert!(!player.course().find_lesson(LessonId::new(101)).unwrap().is_completed);
    }

    #[test]
    fn persistence_failures_surface_the_api_cause() {
        // Callers walking the error chain must find the API rejection
        // behind the session error.
        let err = anyhow::Error::from(PlayerError::from(ApiError::Unauthorized));
        let requires_login = err
            .chain()
            .filter_map(|cause| cause.downcast_ref::<ApiError>())
            .any(ApiError::requires_login);
        assert!(requires_login);
    }

    #[test]
    fn fully_completed_session_reports_complete() {
        let player = CoursePlayer::new(course([true, true, true]));
        assert!(player.is_complete());
        assert_eq!(player.progress(), 100);
        // Fallback selection still lands on the first lesson.
        assert_eq!(player.active_lesson().unwrap().id, LessonId::new(100));
    }
}
