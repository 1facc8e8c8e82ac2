use std::collections::BTreeMap;

use chrono::NaiveDate;

/// Daily practice-time goal: 90 minutes.
pub const DAILY_GOAL_SECONDS: u32 = 5400;

/// Per-day practice seconds plus streak bookkeeping.
///
/// Days are local calendar dates; turning wall-clock intervals into per-day
/// buckets (including splitting across midnight) is the tracker's job, this
/// type only accumulates and counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PracticeLog {
    daily: BTreeMap<NaiveDate, u32>,
    streak: u32,
    longest_streak: u32,
}

impl PracticeLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate from persisted storage.
    ///
    /// `longest_streak` is clamped up to at least the current streak so a
    /// tampered or stale blob cannot report an impossible pair.
    #[must_use]
    pub fn from_persisted(
        daily: BTreeMap<NaiveDate, u32>,
        streak: u32,
        longest_streak: u32,
    ) -> Self {
        Self {
            daily,
            streak,
            longest_streak: longest_streak.max(streak),
        }
    }

    /// Seconds accrued on `day`, 0 when the day was never practiced.
    #[must_use]
    pub fn seconds_on(&self, day: NaiveDate) -> u32 {
        self.daily.get(&day).copied().unwrap_or(0)
    }

    /// Add practice seconds to `day`.
    ///
    /// Returns `true` exactly when this call moved the day from below the
    /// goal to at-or-above it, so the caller can fire a one-time celebration.
    pub fn add_seconds(&mut self, day: NaiveDate, seconds: u32) -> bool {
        let bucket = self.daily.entry(day).or_insert(0);
        let before = *bucket;
        *bucket = bucket.saturating_add(seconds);
        before < DAILY_GOAL_SECONDS && *bucket >= DAILY_GOAL_SECONDS
    }

    /// Whether `day` has met the daily goal.
    #[must_use]
    pub fn goal_met(&self, day: NaiveDate) -> bool {
        self.seconds_on(day) >= DAILY_GOAL_SECONDS
    }

    /// Recount the streak ending at `today` and update the longest streak.
    ///
    /// Walks backward day by day: today counts only once its goal is already
    /// met, earlier days count while each consecutive one met the goal, and
    /// the walk stops at the first gap.
    pub fn recompute_streak(&mut self, today: NaiveDate) -> u32 {
        let mut cursor = if self.goal_met(today) {
            Some(today)
        } else {
            today.pred_opt()
        };

        let mut streak = 0_u32;
        while let Some(day) = cursor {
            if !self.goal_met(day) {
                break;
            }
            streak += 1;
            cursor = day.pred_opt();
        }

        self.streak = streak;
        self.longest_streak = self.longest_streak.max(streak);
        streak
    }

    #[must_use]
    pub fn streak(&self) -> u32 {
        self.streak
    }

    #[must_use]
    pub fn longest_streak(&self) -> u32 {
        self.longest_streak
    }

    #[must_use]
    pub fn daily(&self) -> &BTreeMap<NaiveDate, u32> {
        &self.daily
    }
}
