#![forbid(unsafe_code)]

pub mod engine;
pub mod error;
pub mod practice_service;
pub mod sessions;
pub mod stats_service;
pub mod timer;

pub use quiz_core::Clock;

pub use engine::QuizService;
pub use error::SessionError;
pub use practice_service::{PracticeTracker, TickOutcome};
pub use sessions::{Advance, AnswerFeedback, ModePreset, SessionProgress, TestSession};
pub use stats_service::StatsService;
pub use timer::{Countdown, TimerEvent, WARNING_SECONDS};
