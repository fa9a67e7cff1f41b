//! Periodic Tick Source
//!
//! Converts injected elapsed time into discrete ticks: an optional initial
//! delay, then one tick every `period`. The first tick lands at
//! `delay + period`. Ticks are reported as a count so the owner can apply
//! them one at a time and in order; nothing is coalesced.

use std::time::Duration;

use super::AnimatorError;

/// Cancellable periodic tick source
///
/// Cancelling a ticker is dropping it. There is no "stopped" flag to check.
#[derive(Clone, Debug)]
pub struct Ticker {
    /// Time between ticks
    period: Duration,
    /// Delay still to elapse before ticking starts
    delay_remaining: Duration,
    /// Time accumulated since the last tick
    since_last: Duration,
    /// Total ticks produced
    fired: u64,
}

impl Ticker {
    /// Create a ticker with the given period and initial delay
    ///
    /// # Errors
    ///
    /// Returns [`AnimatorError::ZeroPeriod`] when `period` is zero.
    pub fn new(period: Duration, delay: Duration) -> Result<Self, AnimatorError> {
        if period.is_zero() {
            return Err(AnimatorError::ZeroPeriod { what: "tick period" });
        }

        Ok(Self {
            period,
            delay_remaining: delay,
            since_last: Duration::ZERO,
            fired: 0,
        })
    }

    /// Feed elapsed time, returning how many ticks became due
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        let mut elapsed = elapsed;

        if !self.delay_remaining.is_zero() {
            if elapsed < self.delay_remaining {
                self.delay_remaining -= elapsed;
                return 0;
            }
            elapsed -= self.delay_remaining;
            self.delay_remaining = Duration::ZERO;
        }

        self.since_last += elapsed;

        let period_ns = self.period.as_nanos();
        let since_ns = self.since_last.as_nanos();
        let due = since_ns / period_ns;
        let remainder = since_ns % period_ns;
        // remainder < period, so it fits whatever the period fits
        self.since_last = Duration::from_nanos(u64::try_from(remainder).unwrap_or(u64::MAX));

        let due = u32::try_from(due).unwrap_or(u32::MAX);
        self.fired += u64::from(due);
        due
    }

    /// Whether the initial delay is still running
    #[must_use]
    pub fn is_waiting(&self) -> bool {
        !self.delay_remaining.is_zero()
    }

    /// Ticks produced so far
    #[must_use]
    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Time until the next tick becomes due
    #[must_use]
    pub fn time_to_next_tick(&self) -> Duration {
        self.delay_remaining + self.period.saturating_sub(self.since_last)
    }
}
