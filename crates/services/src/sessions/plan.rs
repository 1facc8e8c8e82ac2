use rand::Rng;
use rand::seq::SliceRandom;

use quiz_core::model::{Question, TestMode};

use crate::error::SessionError;

/// Question count for a short practice run.
pub const PRACTICE_QUESTIONS: usize = 10;
/// Question count for the full timed mock exam.
pub const MOCK_QUESTIONS: usize = 40;
/// Question cap for a theme-filtered set.
pub const THEME_QUESTIONS: usize = 20;
/// Mock exam length: 30 minutes.
pub const MOCK_SECONDS: u32 = 1800;

/// Per-mode session shape: question count, timing, immediate feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModePreset {
    pub question_count: usize,
    pub timed: bool,
    pub feedback_immediate: bool,
}

impl ModePreset {
    #[must_use]
    pub fn for_mode(mode: TestMode) -> Self {
        match mode {
            TestMode::Practice => Self {
                question_count: PRACTICE_QUESTIONS,
                timed: false,
                feedback_immediate: true,
            },
            TestMode::Mock => Self {
                question_count: MOCK_QUESTIONS,
                timed: true,
                feedback_immediate: false,
            },
            TestMode::Theme => Self {
                question_count: THEME_QUESTIONS,
                timed: false,
                feedback_immediate: true,
            },
        }
    }
}

/// Draw `min(count, pool.len())` questions uniformly without replacement.
///
/// Fisher–Yates via `SliceRandom::shuffle`, so no position in the pool is
/// favored over another.
///
/// # Errors
///
/// Returns `SessionError::EmptyPool` when there is nothing to draw from.
pub fn draw_questions<R: Rng + ?Sized>(
    pool: &[Question],
    count: usize,
    rng: &mut R,
) -> Result<Vec<Question>, SessionError> {
    if pool.is_empty() {
        return Err(SessionError::EmptyPool);
    }

    let mut drawn: Vec<Question> = pool.to_vec();
    drawn.shuffle(rng);
    drawn.truncate(count.min(pool.len()));
    Ok(drawn)
}
