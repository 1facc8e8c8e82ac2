use std::sync::{Arc, Mutex};

use thiserror::Error;

use quiz_core::model::{PracticeLog, UserStats};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid question file: {0}")]
    InvalidQuestionFile(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence boundary for the aggregate test history.
///
/// Loading when no blob exists yields empty defaults; a corrupt blob also
/// degrades to defaults rather than failing startup.
pub trait StatsRepository {
    /// Load the persisted stats, or defaults when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the backing store cannot be read at all.
    fn load_stats(&self) -> Result<UserStats, StorageError>;

    /// Persist the full stats blob, replacing what was stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the blob cannot be written.
    fn save_stats(&self, stats: &UserStats) -> Result<(), StorageError>;
}

/// Persistence boundary for daily practice accrual.
pub trait PracticeRepository {
    /// Load the persisted practice log, or defaults when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the backing store cannot be read at all.
    fn load_practice(&self) -> Result<PracticeLog, StorageError>;

    /// Persist the full practice log, replacing what was stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the blob cannot be written.
    fn save_practice(&self, log: &PracticeLog) -> Result<(), StorageError>;
}

/// Simple in-memory store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    stats: Arc<Mutex<Option<UserStats>>>,
    practice: Arc<Mutex<Option<PracticeLog>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatsRepository for InMemoryStore {
    fn load_stats(&self) -> Result<UserStats, StorageError> {
        let guard = self
            .stats
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(guard.clone().unwrap_or_default())
    }

    fn save_stats(&self, stats: &UserStats) -> Result<(), StorageError> {
        let mut guard = self
            .stats
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        *guard = Some(stats.clone());
        Ok(())
    }
}

impl PracticeRepository for InMemoryStore {
    fn load_practice(&self) -> Result<PracticeLog, StorageError> {
        let guard = self
            .practice
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(guard.clone().unwrap_or_default())
    }

    fn save_practice(&self, log: &PracticeLog) -> Result<(), StorageError> {
        let mut guard = self
            .practice
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        *guard = Some(log.clone());
        Ok(())
    }
}
