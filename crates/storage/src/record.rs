//! Versioned persisted shapes for the stats and practice blobs.
//!
//! These mirror the domain types so repositories can serialize without
//! leaking storage concerns into the domain layer. Conversion back into
//! domain types is defensive: entries that fail validation are skipped with
//! a warning instead of poisoning the whole blob.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use quiz_core::model::{
    PracticeLog, Question, QuestionError, TestMode, TestResult, ThemeScore, UserStats,
};

pub const STATS_SCHEMA_VERSION: u32 = 1;
pub const PRACTICE_SCHEMA_VERSION: u32 = 1;

/// Persisted shape for one test result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRecord {
    pub correct: u32,
    pub total: u32,
    pub time_spent_seconds: u32,
    pub themes: BTreeMap<String, ThemeScore>,
    pub mode: TestMode,
    pub date: DateTime<Utc>,
}

impl ResultRecord {
    #[must_use]
    pub fn from_result(result: &TestResult) -> Self {
        Self {
            correct: result.correct_count(),
            total: result.total(),
            time_spent_seconds: result.time_spent_seconds(),
            themes: result.theme_breakdown().clone(),
            mode: result.mode(),
            date: result.date(),
        }
    }

    /// Convert the record back into a domain result, recomputing the
    /// derived percentage and pass flag.
    ///
    /// # Errors
    ///
    /// Returns `ResultError` when the persisted counts are inconsistent.
    pub fn into_result(self) -> Result<TestResult, quiz_core::model::ResultError> {
        TestResult::from_persisted(
            self.correct,
            self.total,
            self.time_spent_seconds,
            self.themes,
            self.mode,
            self.date,
        )
    }
}

/// Persisted shape for the whole stats blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsRecord {
    pub version: u32,
    pub total_tests: u64,
    pub history: Vec<ResultRecord>,
    pub theme_performance: BTreeMap<String, ThemeScore>,
}

impl StatsRecord {
    #[must_use]
    pub fn from_stats(stats: &UserStats) -> Self {
        Self {
            version: STATS_SCHEMA_VERSION,
            total_tests: stats.total_tests(),
            history: stats.history().iter().map(ResultRecord::from_result).collect(),
            theme_performance: stats.theme_performance().clone(),
        }
    }

    /// Rebuild domain stats, dropping any history entry that fails
    /// validation.
    #[must_use]
    pub fn into_stats(self) -> UserStats {
        let history = self
            .history
            .into_iter()
            .filter_map(|record| match record.into_result() {
                Ok(result) => Some(result),
                Err(err) => {
                    tracing::warn!(%err, "skipping invalid history entry");
                    None
                }
            })
            .collect();
        UserStats::from_persisted(self.total_tests, history, self.theme_performance)
    }
}

/// Persisted shape for the practice blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticeRecord {
    pub version: u32,
    pub daily: BTreeMap<NaiveDate, u32>,
    pub streak: u32,
    pub longest_streak: u32,
}

impl PracticeRecord {
    #[must_use]
    pub fn from_log(log: &PracticeLog) -> Self {
        Self {
            version: PRACTICE_SCHEMA_VERSION,
            daily: log.daily().clone(),
            streak: log.streak(),
            longest_streak: log.longest_streak(),
        }
    }

    #[must_use]
    pub fn into_log(self) -> PracticeLog {
        PracticeLog::from_persisted(self.daily, self.streak, self.longest_streak)
    }
}

/// On-disk shape of one question, matching the bank file's short field names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub theme: String,
    #[serde(rename = "q")]
    pub text: String,
    #[serde(rename = "opts")]
    pub options: Vec<String>,
    #[serde(rename = "a")]
    pub correct: usize,
    #[serde(rename = "exp")]
    pub explanation: String,
}

impl QuestionRecord {
    /// Convert into a validated domain question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` for malformed option lists or answer indexes.
    pub fn into_question(self) -> Result<Question, QuestionError> {
        Question::new(
            self.theme,
            self.text,
            self.options,
            self.correct,
            self.explanation,
        )
    }
}
