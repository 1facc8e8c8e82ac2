use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use quiz_core::model::PracticeLog;
use storage::PracticeRepository;

/// Tracks wall-clock practice time against local calendar days.
///
/// The tracker keeps a checkpoint of the last observed wall-clock instant;
/// each `tick` attributes the elapsed interval to per-day buckets, splitting
/// across midnight when a session spans a day boundary. Ticks are driven
/// externally (periodic interval, visibility change, page unload); the
/// tracker itself schedules nothing.
pub struct PracticeTracker {
    log: PracticeLog,
    checkpoint: NaiveDateTime,
    repo: Arc<dyn PracticeRepository>,
}

/// Outcome of a single accrual tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub today: NaiveDate,
    /// Seconds accrued on `today` so far.
    pub seconds_today: u32,
    /// True exactly on the tick where today crossed the daily goal.
    pub goal_reached: bool,
    /// Streak ending at `today`, freshly recomputed.
    pub streak: u32,
}

impl PracticeTracker {
    /// Load the persisted log and anchor the checkpoint at `now`.
    ///
    /// A store that cannot be read degrades to an empty log.
    #[must_use]
    pub fn load(repo: Arc<dyn PracticeRepository>, now: NaiveDateTime) -> Self {
        let log = match repo.load_practice() {
            Ok(log) => log,
            Err(err) => {
                tracing::warn!(%err, "failed to load practice log, starting empty");
                PracticeLog::new()
            }
        };
        Self {
            log,
            checkpoint: now,
            repo,
        }
    }

    /// Attribute the time since the last checkpoint and recompute the streak.
    ///
    /// An interval spanning local midnight is split at each day boundary so
    /// every second lands in the day it was actually practiced. A clock that
    /// moved backwards drops the interval and just re-anchors the checkpoint.
    pub fn tick(&mut self, now: NaiveDateTime) -> TickOutcome {
        let today = now.date();

        if now <= self.checkpoint {
            self.checkpoint = now;
            return TickOutcome {
                today,
                seconds_today: self.log.seconds_on(today),
                goal_reached: false,
                streak: self.log.recompute_streak(today),
            };
        }

        let mut cursor = self.checkpoint;
        while cursor.date() < today {
            let Some(next_day) = cursor.date().succ_opt() else {
                break;
            };
            let boundary = NaiveDateTime::new(next_day, NaiveTime::MIN);
            let seconds = u32::try_from((boundary - cursor).num_seconds()).unwrap_or(0);
            self.log.add_seconds(cursor.date(), seconds);
            cursor = boundary;
        }

        let seconds = u32::try_from((now - cursor).num_seconds()).unwrap_or(0);
        let goal_reached = self.log.add_seconds(today, seconds);
        self.checkpoint = now;

        TickOutcome {
            today,
            seconds_today: self.log.seconds_on(today),
            goal_reached,
            streak: self.log.recompute_streak(today),
        }
    }

    /// Persist the current log; failures degrade to in-memory only.
    pub fn flush(&self) {
        if let Err(err) = self.repo.save_practice(&self.log) {
            tracing::warn!(%err, "practice persistence failed, keeping in-memory state");
        }
    }

    /// Convenience for the periodic/unload triggers: accrue, then persist.
    pub fn tick_and_flush(&mut self, now: NaiveDateTime) -> TickOutcome {
        let outcome = self.tick(now);
        self.flush();
        outcome
    }

    #[must_use]
    pub fn log(&self) -> &PracticeLog {
        &self.log
    }

    #[must_use]
    pub fn checkpoint(&self) -> NaiveDateTime {
        self.checkpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quiz_core::model::DAILY_GOAL_SECONDS;
    use storage::InMemoryStore;

    fn at(day: u32, hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 5, day)
            .unwrap()
            .and_hms_opt(hour, minute, second)
            .unwrap()
    }

    fn tracker(start: NaiveDateTime) -> PracticeTracker {
        PracticeTracker::load(Arc::new(InMemoryStore::new()), start)
    }

    #[test]
    fn accrues_elapsed_seconds_onto_today() {
        let mut tracker = tracker(at(10, 9, 0, 0));
        let outcome = tracker.tick(at(10, 9, 10, 0));

        assert_eq!(outcome.seconds_today, 600);
        assert!(!outcome.goal_reached);
        assert_eq!(tracker.checkpoint(), at(10, 9, 10, 0));
    }

    #[test]
    fn goal_fires_exactly_once_per_day() {
        let mut tracker = tracker(at(10, 9, 0, 0));

        let first = tracker.tick(at(10, 9, 0, 0) + Duration::seconds(i64::from(DAILY_GOAL_SECONDS)));
        assert!(first.goal_reached);
        assert_eq!(first.seconds_today, DAILY_GOAL_SECONDS);

        let later = tracker.tick(at(10, 12, 0, 0));
        assert!(!later.goal_reached);
        assert!(later.seconds_today > DAILY_GOAL_SECONDS);
    }

    #[test]
    fn interval_spanning_midnight_is_split() {
        // 23:50 -> 00:20 next day: 600 s yesterday, 1200 s today.
        let mut tracker = tracker(at(10, 23, 50, 0));
        let outcome = tracker.tick(at(11, 0, 20, 0));

        assert_eq!(outcome.today, NaiveDate::from_ymd_opt(2026, 5, 11).unwrap());
        assert_eq!(outcome.seconds_today, 1200);
        assert_eq!(
            tracker.log().seconds_on(NaiveDate::from_ymd_opt(2026, 5, 10).unwrap()),
            600
        );
    }

    #[test]
    fn backwards_clock_drops_the_interval() {
        let mut tracker = tracker(at(10, 9, 0, 0));
        let outcome = tracker.tick(at(10, 8, 0, 0));

        assert_eq!(outcome.seconds_today, 0);
        assert_eq!(tracker.checkpoint(), at(10, 8, 0, 0));

        // Accrual resumes normally from the new checkpoint.
        assert_eq!(tracker.tick(at(10, 8, 1, 0)).seconds_today, 60);
    }

    #[test]
    fn streak_is_recomputed_on_tick() {
        let mut tracker = tracker(at(10, 9, 0, 0));
        tracker
            .log
            .add_seconds(NaiveDate::from_ymd_opt(2026, 5, 9).unwrap(), 6000);

        let outcome =
            tracker.tick(at(10, 9, 0, 0) + Duration::seconds(i64::from(DAILY_GOAL_SECONDS)));
        assert_eq!(outcome.streak, 2);
        assert_eq!(tracker.log().longest_streak(), 2);
    }

    #[test]
    fn flush_round_trips_through_the_store() {
        let store = Arc::new(InMemoryStore::new());
        let mut tracker = PracticeTracker::load(store.clone(), at(10, 9, 0, 0));
        tracker.tick_and_flush(at(10, 9, 30, 0));

        let reloaded = PracticeTracker::load(store, at(10, 10, 0, 0));
        assert_eq!(
            reloaded.log().seconds_on(NaiveDate::from_ymd_opt(2026, 5, 10).unwrap()),
            1800
        );
    }
}
