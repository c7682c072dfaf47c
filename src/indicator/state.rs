//! Per-pattern blink/one-shot state machine.
//!
//! | on_duration | off_duration | behaviour                              |
//! |-------------|--------------|----------------------------------------|
//! | 0           | (forced 0)   | ON indefinitely                        |
//! | > 0         | 0            | one-shot: ON, then disables itself     |
//! | > 0         | > 0          | blink: ON/OFF until disabled           |
//!
//! Blink cycles always start in the ON phase.

use core::fmt;

/// What a state advance did, for tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PhaseChange {
    None,
    OnExpired,
    OffExpired,
    Finished,
}

#[derive(Debug, Clone)]
pub(crate) struct PatternState<T> {
    pub(crate) pattern: T,
    pub(crate) enabled: bool,
    pub(crate) on: bool,
    pub(crate) on_duration: f64,
    pub(crate) off_duration: f64,
    /// Absolute time the current phase ends; 0 means no expiry.
    pub(crate) expired_time: f64,
}

impl<T> PatternState<T> {
    pub(crate) fn new(pattern: T) -> Self {
        Self {
            pattern,
            enabled: false,
            on: false,
            on_duration: 0.0,
            off_duration: 0.0,
            expired_time: 0.0,
        }
    }

    pub(crate) fn enable(&mut self, now: f64, on_duration: f64, off_duration: f64) {
        let on_duration = on_duration.max(0.0);
        self.enabled = true;
        self.on = true;
        self.on_duration = on_duration;
        self.off_duration = if on_duration > 0.0 { off_duration.max(0.0) } else { 0.0 };
        self.expired_time = if on_duration > 0.0 { now + on_duration } else { 0.0 };
    }

    pub(crate) fn disable(&mut self) {
        self.enabled = false;
        self.on = false;
        self.on_duration = 0.0;
        self.off_duration = 0.0;
        self.expired_time = 0.0;
    }

    /// Clear the live state but keep the configured durations.
    pub(crate) fn clear(&mut self) {
        self.enabled = false;
        self.on = false;
        self.expired_time = 0.0;
    }

    /// Advance the phase if it has expired at `now`.
    pub(crate) fn advance(&mut self, now: f64) -> PhaseChange {
        if !self.enabled || self.expired_time <= 0.0 || now < self.expired_time {
            return PhaseChange::None;
        }

        self.expired_time = 0.0;
        if self.on {
            self.on = false;
            if self.off_duration > 0.0 {
                self.expired_time = now + self.off_duration;
                PhaseChange::OnExpired
            } else {
                self.enabled = false;
                PhaseChange::Finished
            }
        } else if self.on_duration > 0.0 {
            self.on = true;
            self.expired_time = now + self.on_duration;
            PhaseChange::OffExpired
        } else {
            PhaseChange::None
        }
    }
}

impl<T: fmt::Display> fmt::Display for PatternState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: enabled={}, on={}, expiredTime={:.3}",
            self.pattern, self.enabled, self.on, self.expired_time
        )
    }
}
