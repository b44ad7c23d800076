//! Wall-clock access and the session time budget.
//!
//! The controller never reads the system time directly; it asks a [`Clock`].
//! [`SessionTimer`] turns readings into warnings and an expiry signal, and is
//! polled by whoever drives the periodic tick.

use chrono::{DateTime, TimeDelta, Utc};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, instrument};

/// Source of the current time.
pub trait Clock: std::fmt::Debug {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
///
/// Clones share the same instant, so a test can keep one handle and give
/// another to the controller.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let delta = TimeDelta::from_std(by).unwrap_or(TimeDelta::MAX);
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now = now.checked_add_signed(delta).unwrap_or(*now);
    }

    /// Jumps the clock to `at`.
    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = at;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Time between two instants, zero if `later` is not after `earlier`.
pub fn elapsed_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> Duration {
    (later - earlier).to_std().unwrap_or(Duration::ZERO)
}

/// Result of polling a [`SessionTimer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCheck {
    /// Budget not yet used up.
    Running {
        /// Time left.
        remaining: Duration,
    },
    /// A warning mark was crossed since the last poll.
    Warning {
        /// The mark that was crossed.
        threshold: Duration,
        /// Time left.
        remaining: Duration,
    },
    /// Budget used up.
    Expired,
}

/// Deadline bounding a whole tournament.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTimer {
    started_at: DateTime<Utc>,
    limit: Duration,
    /// Marks not yet announced, largest first.
    pending_warnings: Vec<Duration>,
}

impl SessionTimer {
    /// Starts a timer at `started_at` with the given budget and warning marks.
    ///
    /// Marks at or above the budget are dropped.
    pub fn new(started_at: DateTime<Utc>, limit: Duration, warnings: &[Duration]) -> Self {
        let mut pending_warnings: Vec<Duration> = warnings
            .iter()
            .copied()
            .filter(|w| !w.is_zero() && *w < limit)
            .collect();
        pending_warnings.sort_unstable_by(|a, b| b.cmp(a));
        pending_warnings.dedup();
        Self {
            started_at,
            limit,
            pending_warnings,
        }
    }

    /// When the timer started.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// The full budget.
    pub fn limit(&self) -> Duration {
        self.limit
    }

    /// Time used as of `now`.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        elapsed_between(self.started_at, now)
    }

    /// Time left as of `now`.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        self.limit.saturating_sub(self.elapsed(now))
    }

    /// Polls the timer.
    ///
    /// Each warning mark is reported once. If several marks were crossed
    /// since the last poll only the smallest is reported.
    #[instrument(skip(self))]
    pub fn check(&mut self, now: DateTime<Utc>) -> TimerCheck {
        let remaining = self.remaining(now);
        if remaining.is_zero() {
            self.pending_warnings.clear();
            return TimerCheck::Expired;
        }

        let mut crossed = None;
        while let Some(&mark) = self.pending_warnings.first() {
            if remaining > mark {
                break;
            }
            crossed = Some(mark);
            self.pending_warnings.remove(0);
        }

        match crossed {
            Some(threshold) => {
                debug!(?threshold, ?remaining, "Session time warning");
                TimerCheck::Warning {
                    threshold,
                    remaining,
                }
            }
            None => TimerCheck::Running { remaining },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap()
    }

    fn mins(m: u64) -> Duration {
        Duration::from_secs(m * 60)
    }

    #[test]
    fn test_manual_clock_clones_share_time() {
        let clock = ManualClock::new(start());
        let other = clock.clone();
        clock.advance(Duration::from_secs(90));
        assert_eq!(other.now(), start() + TimeDelta::seconds(90));
    }

    #[test]
    fn test_elapsed_never_negative() {
        let earlier = start();
        assert_eq!(elapsed_between(earlier + TimeDelta::seconds(5), earlier), Duration::ZERO);
    }

    #[test]
    fn test_timer_counts_down_and_expires() {
        let clock = ManualClock::new(start());
        let mut timer = SessionTimer::new(clock.now(), mins(30), &[]);

        clock.advance(mins(10));
        assert_eq!(
            timer.check(clock.now()),
            TimerCheck::Running { remaining: mins(20) }
        );

        clock.advance(mins(20));
        assert_eq!(timer.check(clock.now()), TimerCheck::Expired);

        clock.advance(mins(5));
        assert_eq!(timer.check(clock.now()), TimerCheck::Expired);
    }

    #[test]
    fn test_each_warning_fires_once() {
        let clock = ManualClock::new(start());
        let mut timer = SessionTimer::new(clock.now(), mins(30), &[mins(5), mins(1)]);

        clock.advance(mins(25));
        assert_eq!(
            timer.check(clock.now()),
            TimerCheck::Warning { threshold: mins(5), remaining: mins(5) }
        );

        clock.advance(Duration::from_secs(1));
        assert!(matches!(timer.check(clock.now()), TimerCheck::Running { .. }));

        clock.advance(Duration::from_secs(4 * 60));
        assert!(matches!(
            timer.check(clock.now()),
            TimerCheck::Warning { threshold, .. } if threshold == mins(1)
        ));
        assert!(matches!(timer.check(clock.now()), TimerCheck::Running { .. }));
    }

    #[test]
    fn test_skipped_warnings_collapse_to_smallest() {
        let clock = ManualClock::new(start());
        let mut timer = SessionTimer::new(clock.now(), mins(30), &[mins(1), mins(5)]);

        clock.advance(Duration::from_secs(29 * 60 + 30));
        assert_eq!(
            timer.check(clock.now()),
            TimerCheck::Warning { threshold: mins(1), remaining: Duration::from_secs(30) }
        );
        assert!(matches!(timer.check(clock.now()), TimerCheck::Running { .. }));
    }

    #[test]
    fn test_warnings_beyond_limit_ignored() {
        let clock = ManualClock::new(start());
        let mut timer = SessionTimer::new(clock.now(), mins(2), &[mins(5)]);
        clock.advance(Duration::from_secs(1));
        assert!(matches!(timer.check(clock.now()), TimerCheck::Running { .. }));
    }
}
