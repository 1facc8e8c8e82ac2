use std::collections::BTreeMap;

use crate::model::{TestResult, ThemeScore};

/// Most recent results kept in history; older entries are evicted.
pub const HISTORY_CAP: usize = 50;

/// Aggregate history of past tests and per-theme performance.
///
/// `total_tests` is a running count and keeps growing after the history
/// buffer starts evicting old entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserStats {
    total_tests: u64,
    test_history: Vec<TestResult>,
    theme_performance: BTreeMap<String, ThemeScore>,
}

/// Renderer-facing rollup of the recorded history.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSummary {
    pub total_tests: u64,
    /// Mean of history percentages, rounded; 0 when the history is empty.
    pub average_percentage: u8,
    /// Highest correct count; ties go to the earliest result.
    pub best: Option<TestResult>,
    /// Fraction of the recorded history that passed, in `[0, 1]`.
    pub pass_rate: f64,
}

impl UserStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate stats from persisted storage.
    ///
    /// History beyond [`HISTORY_CAP`] is dropped oldest-first.
    #[must_use]
    pub fn from_persisted(
        total_tests: u64,
        mut test_history: Vec<TestResult>,
        theme_performance: BTreeMap<String, ThemeScore>,
    ) -> Self {
        if test_history.len() > HISTORY_CAP {
            let excess = test_history.len() - HISTORY_CAP;
            test_history.drain(..excess);
        }
        Self {
            total_tests,
            test_history,
            theme_performance,
        }
    }

    /// Record a submitted result: append to history, bump the running count,
    /// fold the theme breakdown into the lifetime tally, evict past the cap.
    pub fn record(&mut self, result: TestResult) {
        self.total_tests += 1;
        for (theme, score) in result.theme_breakdown() {
            self.theme_performance
                .entry(theme.clone())
                .or_default()
                .merge(*score);
        }
        self.test_history.push(result);
        if self.test_history.len() > HISTORY_CAP {
            let excess = self.test_history.len() - HISTORY_CAP;
            self.test_history.drain(..excess);
        }
    }

    #[must_use]
    pub fn summary(&self) -> StatsSummary {
        let len = self.test_history.len();
        let average_percentage = if len == 0 {
            0
        } else {
            let sum: u32 = self
                .test_history
                .iter()
                .map(|r| u32::from(r.percentage()))
                .sum();
            (f64::from(sum) / len as f64).round() as u8
        };

        let mut best: Option<&TestResult> = None;
        for result in &self.test_history {
            if best.is_none_or(|b| result.correct_count() > b.correct_count()) {
                best = Some(result);
            }
        }

        let pass_rate = if len == 0 {
            0.0
        } else {
            let passed = self.test_history.iter().filter(|r| r.passed()).count();
            passed as f64 / len as f64
        };

        StatsSummary {
            total_tests: self.total_tests,
            average_percentage,
            best: best.cloned(),
            pass_rate,
        }
    }

    /// Drop everything. Irreversible; callers confirm with the user first.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn total_tests(&self) -> u64 {
        self.total_tests
    }

    #[must_use]
    pub fn history(&self) -> &[TestResult] {
        &self.test_history
    }

    #[must_use]
    pub fn theme_performance(&self) -> &BTreeMap<String, ThemeScore> {
        &self.theme_performance
    }
}
