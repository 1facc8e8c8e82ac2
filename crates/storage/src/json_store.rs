use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use quiz_core::model::{PracticeLog, UserStats};

use crate::record::{
    PRACTICE_SCHEMA_VERSION, PracticeRecord, STATS_SCHEMA_VERSION, StatsRecord,
};
use crate::repository::{PracticeRepository, StatsRepository, StorageError};

const STATS_FILE: &str = "stats.json";
const PRACTICE_FILE: &str = "practice.json";

/// File-backed store: one JSON blob per record under a data directory.
///
/// Reads are forgiving (missing or corrupt file falls back to defaults, per
/// the first-run contract); writes replace the whole blob.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create the store, making sure the data directory exists.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` when the directory cannot be created.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let store = Self::new(dir);
        fs::create_dir_all(&store.dir)?;
        Ok(store)
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read_blob<T: DeserializeOwned>(&self, file: &str) -> Option<T> {
        let path = self.dir.join(file);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!(%err, file, "failed to read blob, using defaults");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(%err, file, "corrupt blob, using defaults");
                None
            }
        }
    }

    fn write_blob<T: Serialize>(&self, file: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string_pretty(value)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        fs::write(self.dir.join(file), raw)?;
        Ok(())
    }
}

impl StatsRepository for JsonFileStore {
    fn load_stats(&self) -> Result<UserStats, StorageError> {
        match self.read_blob::<StatsRecord>(STATS_FILE) {
            Some(record) if record.version == STATS_SCHEMA_VERSION => Ok(record.into_stats()),
            Some(record) => {
                tracing::warn!(version = record.version, "unknown stats schema, using defaults");
                Ok(UserStats::new())
            }
            None => Ok(UserStats::new()),
        }
    }

    fn save_stats(&self, stats: &UserStats) -> Result<(), StorageError> {
        self.write_blob(STATS_FILE, &StatsRecord::from_stats(stats))
    }
}

impl PracticeRepository for JsonFileStore {
    fn load_practice(&self) -> Result<PracticeLog, StorageError> {
        match self.read_blob::<PracticeRecord>(PRACTICE_FILE) {
            Some(record) if record.version == PRACTICE_SCHEMA_VERSION => Ok(record.into_log()),
            Some(record) => {
                tracing::warn!(
                    version = record.version,
                    "unknown practice schema, using defaults"
                );
                Ok(PracticeLog::new())
            }
            None => Ok(PracticeLog::new()),
        }
    }

    fn save_practice(&self, log: &PracticeLog) -> Result<(), StorageError> {
        self.write_blob(PRACTICE_FILE, &PracticeRecord::from_log(log))
    }
}
