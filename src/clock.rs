//! Injected clock abstraction (DESIGN NOTES §9).
//!
//! The coordinator needs two different notions of time: a wall clock
//! for `RoutingDecision::timestamp` (RFC3339, nanosecond) and a
//! monotonic clock for `latency` measurement (§3, §4.5 step 1/8).
//! Injecting both behind a trait — rather than calling
//! `Instant::now()`/`Utc::now()` inline the way the teacher calls
//! `Instant::now()` directly in `UpstreamHealth` — makes the
//! concurrency properties in §8 deterministic under test.

use std::time::Instant;

/// A source of wall-clock and monotonic time.
pub trait Clock: Send + Sync {
    /// A monotonic instant, used only for measuring elapsed duration.
    fn now_instant(&self) -> Instant;

    /// The current wall-clock time, used for timestamps and for
    /// bid-expiry comparisons.
    fn now_utc(&self) -> chrono::DateTime<chrono::Utc>;
}

/// The default clock: `std::time::Instant` and `chrono::Utc::now()`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_instant(&self) -> Instant {
        Instant::now()
    }

    fn now_utc(&self) -> chrono::DateTime<chrono::Utc> {
        chrono::Utc::now()
    }
}

#[cfg(any(test, feature = "test-util"))]
pub mod test_util {
    //! A deterministic clock for property tests (S1–S8).

    use super::Clock;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::time::Instant;

    /// A clock whose wall-clock time can be advanced manually; the
    /// monotonic instant is always `Instant::now()` since `Instant`
    /// cannot be constructed from an arbitrary point without `unsafe`.
    pub struct FixedClock {
        epoch_millis: AtomicI64,
    }

    impl FixedClock {
        pub fn new(start: chrono::DateTime<chrono::Utc>) -> Self {
            Self {
                epoch_millis: AtomicI64::new(start.timestamp_millis()),
            }
        }

        pub fn advance(&self, delta: chrono::Duration) {
            self.epoch_millis
                .fetch_add(delta.num_milliseconds(), Ordering::SeqCst);
        }
    }

    impl Clock for FixedClock {
        fn now_instant(&self) -> Instant {
            Instant::now()
        }

        fn now_utc(&self) -> chrono::DateTime<chrono::Utc> {
            let millis = self.epoch_millis.load(Ordering::SeqCst);
            chrono::DateTime::from_timestamp_millis(millis).unwrap_or_else(chrono::Utc::now)
        }
    }
}
