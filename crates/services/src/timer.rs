/// Seconds remaining at which the one-time warning fires.
pub const WARNING_SECONDS: u32 = 300;

/// What a single tick produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Normal tick; remaining seconds after the decrement.
    Tick(u32),
    /// First tick at or below the warning threshold; fires once.
    Warning(u32),
    /// Countdown reached zero; fires once, then the timer halts.
    Expired,
    /// Timer is stopped, expired, or absent; the tick had no effect.
    Idle,
}

/// One countdown per timed session, advanced externally once per second.
///
/// The warning is level-triggered: it fires on the first tick that lands at
/// or below [`WARNING_SECONDS`], so a skipped tick cannot swallow it.
/// `stop` is idempotent and must be called (or the countdown dropped) when
/// the owning session ends, so a stale timer can never act on a dead session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    warning_at: u32,
    warned: bool,
    expired: bool,
    stopped: bool,
}

impl Countdown {
    #[must_use]
    pub fn new(seconds: u32) -> Self {
        Self {
            remaining: seconds,
            warning_at: WARNING_SECONDS,
            warned: false,
            expired: false,
            stopped: false,
        }
    }

    /// Override the warning threshold (0 disables the warning).
    #[must_use]
    pub fn with_warning_at(mut self, seconds: u32) -> Self {
        self.warning_at = seconds;
        self
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expired
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Halt all future ticks. Safe to call any number of times.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Advance by one second.
    pub fn tick(&mut self) -> TimerEvent {
        if self.stopped || self.expired {
            return TimerEvent::Idle;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.expired = true;
            return TimerEvent::Expired;
        }
        if !self.warned && self.remaining <= self.warning_at {
            self.warned = true;
            return TimerEvent::Warning(self.remaining);
        }
        TimerEvent::Tick(self.remaining)
    }
}
