//! Clock adapters.
//!
//! Provides monotonic time for the utilities.
//!
//! - [`MonotonicClock`] wraps `std::time::Instant` and really sleeps.
//! - [`SimClock`] is a shared, manually advanced clock for simulation and
//!   tests. Its `sleep_ms` advances simulated time instead of blocking.

use core::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::ports::Clock;

/// Wall-clock backed monotonic time source.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Microseconds since construction (monotonic).
    pub fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    fn sleep_ms(&self, millis: u64) {
        std::thread::sleep(Duration::from_millis(millis));
    }
}

/// Simulated clock with microsecond resolution.
///
/// Clones share the same time base, so a test can hand one clone to the
/// component under test and advance time through another.
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    micros: Arc<AtomicU64>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the clock at `secs` seconds.
    pub fn starting_at(secs: f64) -> Self {
        let clock = Self::new();
        clock.set(secs);
        clock
    }

    /// Jump to an absolute time in seconds. Negative values clamp to zero.
    pub fn set(&self, secs: f64) {
        self.micros.store(Self::to_micros(secs), Ordering::Release);
    }

    /// Move time forward by `secs` seconds.
    pub fn advance(&self, secs: f64) {
        self.micros
            .fetch_add(Self::to_micros(secs), Ordering::AcqRel);
    }

    pub fn advance_ms(&self, millis: u64) {
        self.micros
            .fetch_add(millis.saturating_mul(1000), Ordering::AcqRel);
    }

    fn to_micros(secs: f64) -> u64 {
        (secs.max(0.0) * 1_000_000.0).round() as u64
    }
}

impl Clock for SimClock {
    fn now(&self) -> f64 {
        self.micros.load(Ordering::Acquire) as f64 / 1_000_000.0
    }

    fn sleep_ms(&self, millis: u64) {
        self.advance_ms(millis);
    }
}
