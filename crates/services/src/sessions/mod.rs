mod plan;
mod progress;
mod service;

pub use plan::{
    MOCK_QUESTIONS, MOCK_SECONDS, ModePreset, PRACTICE_QUESTIONS, THEME_QUESTIONS,
    draw_questions,
};
pub use progress::SessionProgress;
pub use service::{Advance, AnswerFeedback, TestSession};
