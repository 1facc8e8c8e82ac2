use rand::Rng;

use quiz_core::Clock;
use quiz_core::model::{QuestionBank, TestMode, TestResult};

use crate::error::SessionError;
use crate::sessions::TestSession;
use crate::stats_service::StatsService;

/// Owns the question bank, the single active session, and recorded stats.
///
/// The renderer drives this in response to user input; every operation is
/// synchronous and runs to completion. Starting a new session replaces the
/// old one, dropping its countdown with it, so a stale timer can never act
/// on a dead session.
pub struct QuizService {
    bank: QuestionBank,
    clock: Clock,
    stats: StatsService,
    active: Option<TestSession>,
}

impl QuizService {
    #[must_use]
    pub fn new(bank: QuestionBank, stats: StatsService) -> Self {
        Self {
            bank,
            clock: Clock::default(),
            stats,
            active: None,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    #[must_use]
    pub fn session(&self) -> Option<&TestSession> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn session_mut(&mut self) -> Option<&mut TestSession> {
        self.active.as_mut()
    }

    #[must_use]
    pub fn stats(&self) -> &StatsService {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut StatsService {
        &mut self.stats
    }

    /// Start a practice or mock session drawing from the whole bank.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyPool` when the bank is empty.
    pub fn start(&mut self, mode: TestMode) -> Result<&TestSession, SessionError> {
        let session = TestSession::start(mode, self.bank.questions(), self.clock.now())?;
        Ok(self.active.insert(session))
    }

    /// Start a theme-filtered session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyPool` when no question matches the
    /// selected themes; the caller surfaces "select at least one theme".
    pub fn start_themed(&mut self, themes: &[String]) -> Result<&TestSession, SessionError> {
        let pool = self.bank.filter_by_themes(themes);
        let session = TestSession::start(TestMode::Theme, &pool, self.clock.now())?;
        Ok(self.active.insert(session))
    }

    /// Deterministic variants for tests.
    ///
    /// # Errors
    ///
    /// Same as [`QuizService::start`].
    pub fn start_with_rng<R: Rng + ?Sized>(
        &mut self,
        mode: TestMode,
        rng: &mut R,
    ) -> Result<&TestSession, SessionError> {
        let session =
            TestSession::start_with_rng(mode, self.bank.questions(), self.clock.now(), rng)?;
        Ok(self.active.insert(session))
    }

    /// Submit the active session and hand the result to the stats store.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveSession` when nothing is running and
    /// `AlreadySubmitted` on a double submit.
    pub fn submit(&mut self) -> Result<TestResult, SessionError> {
        let now = self.clock.now();
        let session = self.active.as_mut().ok_or(SessionError::NoActiveSession)?;
        let result = session.submit(now)?;
        self.stats.record(result.clone());
        Ok(result)
    }

    /// Replace the just-submitted session with a review of its incorrect
    /// answers.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveSession` when nothing is loaded, `NotSubmitted`
    /// before submission, and `PerfectScore` when there is nothing to
    /// review.
    pub fn review_incorrect(&mut self) -> Result<&TestSession, SessionError> {
        let now = self.clock.now();
        let session = self.active.as_ref().ok_or(SessionError::NoActiveSession)?;
        let review = session.review_incorrect(now)?;
        Ok(self.active.insert(review))
    }

    /// Drop the active session (navigating away mid-test). The countdown
    /// goes with it.
    pub fn abandon(&mut self) {
        self.active = None;
    }
}
