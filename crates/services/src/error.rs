//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::ResultError;

/// Errors emitted by the session engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions match the selected themes")]
    EmptyPool,

    #[error("test already submitted")]
    AlreadySubmitted,

    #[error("test not submitted yet")]
    NotSubmitted,

    #[error("question position {position} out of range for {len} questions")]
    PositionOutOfRange { position: usize, len: usize },

    #[error("option {option} out of range for {len} options")]
    OptionOutOfRange { option: usize, len: usize },

    #[error("perfect score, nothing to review")]
    PerfectScore,

    #[error("no active test session")]
    NoActiveSession,

    #[error(transparent)]
    Result(#[from] ResultError),
}
