use std::collections::{HashMap, HashSet};
use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;

use quiz_core::model::{Question, TestMode, TestResult};

use crate::error::SessionError;
use crate::sessions::plan::{MOCK_SECONDS, ModePreset, draw_questions};
use crate::sessions::progress::SessionProgress;
use crate::timer::{Countdown, TimerEvent};

/// Outcome of advancing past the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the given position.
    Moved(usize),
    /// Already on the last question; the caller should confirm submission.
    SubmitRequested,
}

/// Per-question feedback data for immediate-feedback modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub selected: Option<usize>,
    pub correct_index: usize,
    pub is_correct: bool,
}

/// A single in-flight test: drawn questions, answers, flags, navigation,
/// and the countdown for timed modes.
///
/// Once submitted the session is terminal: every mutating operation fails
/// with `AlreadySubmitted` and the recorded state stays frozen.
pub struct TestSession {
    mode: TestMode,
    questions: Vec<Question>,
    answers: HashMap<usize, usize>,
    flagged: HashSet<usize>,
    current: usize,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    feedback_immediate: bool,
    countdown: Option<Countdown>,
}

impl TestSession {
    /// Start a session for `mode`, drawing from `pool` with the thread RNG.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyPool` when `pool` is empty.
    pub fn start(
        mode: TestMode,
        pool: &[Question],
        now: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        Self::start_with_rng(mode, pool, now, &mut rand::rng())
    }

    /// Start a session with an explicit RNG, for deterministic tests.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyPool` when `pool` is empty.
    pub fn start_with_rng<R: Rng + ?Sized>(
        mode: TestMode,
        pool: &[Question],
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        let preset = ModePreset::for_mode(mode);
        let questions = draw_questions(pool, preset.question_count, rng)?;
        Self::from_parts(mode, questions, preset.feedback_immediate, preset.timed, now)
    }

    fn from_parts(
        mode: TestMode,
        questions: Vec<Question>,
        feedback_immediate: bool,
        timed: bool,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::EmptyPool);
        }
        Ok(Self {
            mode,
            questions,
            answers: HashMap::new(),
            flagged: HashSet::new(),
            current: 0,
            started_at,
            completed_at: None,
            feedback_immediate,
            countdown: timed.then(|| Countdown::new(MOCK_SECONDS)),
        })
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.completed_at.is_some() {
            return Err(SessionError::AlreadySubmitted);
        }
        Ok(())
    }

    fn check_position(&self, position: usize) -> Result<(), SessionError> {
        if position >= self.questions.len() {
            return Err(SessionError::PositionOutOfRange {
                position,
                len: self.questions.len(),
            });
        }
        Ok(())
    }

    /// Record the answer at `position`, overwriting any prior selection.
    ///
    /// Always legal for any open position, even after navigating away.
    ///
    /// # Errors
    ///
    /// Returns `AlreadySubmitted` on a terminal session and an out-of-range
    /// error for a bad position or option index.
    pub fn select_answer(&mut self, position: usize, option: usize) -> Result<(), SessionError> {
        self.ensure_open()?;
        self.check_position(position)?;
        let len = self.questions[position].options().len();
        if option >= len {
            return Err(SessionError::OptionOutOfRange { option, len });
        }
        self.answers.insert(position, option);
        Ok(())
    }

    /// Toggle the review flag at `position`; returns the new flagged state.
    ///
    /// # Errors
    ///
    /// Returns `AlreadySubmitted` on a terminal session and
    /// `PositionOutOfRange` for a bad position.
    pub fn toggle_flag(&mut self, position: usize) -> Result<bool, SessionError> {
        self.ensure_open()?;
        self.check_position(position)?;
        if self.flagged.remove(&position) {
            Ok(false)
        } else {
            self.flagged.insert(position);
            Ok(true)
        }
    }

    /// Jump to an arbitrary position (question-grid navigation).
    ///
    /// # Errors
    ///
    /// Returns `AlreadySubmitted` on a terminal session and
    /// `PositionOutOfRange` for a bad position.
    pub fn navigate(&mut self, position: usize) -> Result<(), SessionError> {
        self.ensure_open()?;
        self.check_position(position)?;
        self.current = position;
        Ok(())
    }

    /// Move forward one question, or request submission on the last one.
    ///
    /// # Errors
    ///
    /// Returns `AlreadySubmitted` on a terminal session.
    pub fn next(&mut self) -> Result<Advance, SessionError> {
        self.ensure_open()?;
        if self.current + 1 >= self.questions.len() {
            return Ok(Advance::SubmitRequested);
        }
        self.current += 1;
        Ok(Advance::Moved(self.current))
    }

    /// Move back one question; a no-op at position 0.
    ///
    /// # Errors
    ///
    /// Returns `AlreadySubmitted` on a terminal session.
    pub fn previous(&mut self) -> Result<usize, SessionError> {
        self.ensure_open()?;
        self.current = self.current.saturating_sub(1);
        Ok(self.current)
    }

    /// Feedback data for `position` (practice-mode ✅/❌ panel).
    ///
    /// # Errors
    ///
    /// Returns `PositionOutOfRange` for a bad position.
    pub fn check(&self, position: usize) -> Result<AnswerFeedback, SessionError> {
        self.check_position(position)?;
        let selected = self.answers.get(&position).copied();
        let question = &self.questions[position];
        Ok(AnswerFeedback {
            selected,
            correct_index: question.correct_index(),
            is_correct: selected.is_some_and(|option| question.is_correct(option)),
        })
    }

    /// Close the session and score it. The countdown halts, the end time is
    /// recorded, and every unanswered question counts as incorrect.
    ///
    /// Confirming with the user when questions are still unanswered is the
    /// caller's job; no gate is applied here.
    ///
    /// # Errors
    ///
    /// Returns `AlreadySubmitted` on a double submit and propagates scoring
    /// errors (for example a clock that ran backwards).
    pub fn submit(&mut self, now: DateTime<Utc>) -> Result<TestResult, SessionError> {
        self.ensure_open()?;
        let selected: Vec<Option<usize>> = (0..self.questions.len())
            .map(|i| self.answers.get(&i).copied())
            .collect();
        let result =
            TestResult::score(&self.questions, &selected, self.mode, self.started_at, now)?;

        if let Some(countdown) = self.countdown.as_mut() {
            countdown.stop();
        }
        self.completed_at = Some(now);
        Ok(result)
    }

    /// Build an untimed, feedback-immediate session over the questions
    /// answered incorrectly, in their original relative order.
    ///
    /// # Errors
    ///
    /// Returns `NotSubmitted` when called before `submit` and
    /// `PerfectScore` when there is nothing to review.
    pub fn review_incorrect(&self, now: DateTime<Utc>) -> Result<TestSession, SessionError> {
        if self.completed_at.is_none() {
            return Err(SessionError::NotSubmitted);
        }

        let incorrect: Vec<Question> = self
            .questions
            .iter()
            .enumerate()
            .filter(|(i, q)| {
                !self
                    .answers
                    .get(i)
                    .is_some_and(|&option| q.is_correct(option))
            })
            .map(|(_, q)| q.clone())
            .collect();

        if incorrect.is_empty() {
            return Err(SessionError::PerfectScore);
        }
        Self::from_parts(self.mode, incorrect, true, false, now)
    }

    /// Advance the countdown by one second.
    ///
    /// Returns `Idle` for untimed or terminal sessions. On `Expired` the
    /// caller is expected to submit.
    pub fn tick_timer(&mut self) -> TimerEvent {
        if self.completed_at.is_some() {
            return TimerEvent::Idle;
        }
        self.countdown.as_mut().map_or(TimerEvent::Idle, Countdown::tick)
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.questions.len(),
            answered: self.answers.len(),
            flagged: self.flagged.len(),
            current: self.current,
            is_complete: self.completed_at.is_some(),
        }
    }

    #[must_use]
    pub fn mode(&self) -> TestMode {
        self.mode
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, position: usize) -> Option<&Question> {
        self.questions.get(position)
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    #[must_use]
    pub fn answer_at(&self, position: usize) -> Option<usize> {
        self.answers.get(&position).copied()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn is_flagged(&self, position: usize) -> bool {
        self.flagged.contains(&position)
    }

    #[must_use]
    pub fn feedback_immediate(&self) -> bool {
        self.feedback_immediate
    }

    #[must_use]
    pub fn is_timed(&self) -> bool {
        self.countdown.is_some()
    }

    /// Remaining seconds for timed sessions, `None` otherwise.
    #[must_use]
    pub fn time_remaining(&self) -> Option<u32> {
        self.countdown.as_ref().map(Countdown::remaining)
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.completed_at.is_some()
    }
}

impl fmt::Debug for TestSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestSession")
            .field("mode", &self.mode)
            .field("questions_len", &self.questions.len())
            .field("answered", &self.answers.len())
            .field("flagged", &self.flagged.len())
            .field("current", &self.current)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}
