use std::sync::Arc;

use quiz_core::model::{StatsSummary, TestResult, UserStats};
use storage::StatsRepository;

/// Recorded test history backed by a stats repository.
///
/// Persistence is best-effort: a failing store logs a warning and the
/// service keeps serving the in-memory state, so everything computed this
/// session stays correct and only durability is lost.
pub struct StatsService {
    stats: UserStats,
    repo: Arc<dyn StatsRepository>,
}

impl StatsService {
    /// Load persisted stats, falling back to empty defaults when the store
    /// cannot be read.
    #[must_use]
    pub fn load(repo: Arc<dyn StatsRepository>) -> Self {
        let stats = match repo.load_stats() {
            Ok(stats) => stats,
            Err(err) => {
                tracing::warn!(%err, "failed to load stats, starting empty");
                UserStats::new()
            }
        };
        Self { stats, repo }
    }

    /// Record a submitted result and persist the updated history.
    pub fn record(&mut self, result: TestResult) {
        self.stats.record(result);
        self.persist();
    }

    #[must_use]
    pub fn summary(&self) -> StatsSummary {
        self.stats.summary()
    }

    #[must_use]
    pub fn stats(&self) -> &UserStats {
        &self.stats
    }

    /// Reset all history and persist the empty state. Irreversible; the
    /// caller confirms with the user first.
    pub fn clear(&mut self) {
        self.stats.clear();
        self.persist();
    }

    fn persist(&self) {
        if let Err(err) = self.repo.save_stats(&self.stats) {
            tracing::warn!(%err, "stats persistence failed, keeping in-memory state");
        }
    }
}
