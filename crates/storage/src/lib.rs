#![forbid(unsafe_code)]

pub mod json_store;
pub mod question_bank;
pub mod record;
pub mod repository;

pub use json_store::JsonFileStore;
pub use question_bank::load_question_bank;
pub use repository::{InMemoryStore, PracticeRepository, StatsRepository, StorageError};
