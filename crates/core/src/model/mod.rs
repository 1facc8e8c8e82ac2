mod practice;
mod question;
mod result;
mod stats;

pub use practice::{DAILY_GOAL_SECONDS, PracticeLog};
pub use question::{Question, QuestionBank, QuestionError};
pub use result::{PASS_MARK_PERCENT, ResultError, TestMode, TestResult, ThemeScore};
pub use stats::{HISTORY_CAP, StatsSummary, UserStats};
