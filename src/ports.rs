//! Port traits: the boundary between the utilities and the robot they run on.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ PriorityIndicator / SensorCalibrator / PidController
//! ```
//!
//! Clocks, indicator devices and sensors implement these traits. The
//! utilities consume them via generics, so none of them touches hardware
//! directly.

use core::fmt;

use crate::error::{DeviceError, SensorError};

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic time source.
pub trait Clock {
    /// Seconds since an arbitrary, fixed epoch.
    fn now(&self) -> f64;

    /// Block the calling thread for `millis` milliseconds.
    fn sleep_ms(&self, millis: u64);
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> f64 {
        (**self).now()
    }

    fn sleep_ms(&self, millis: u64) {
        (**self).sleep_ms(millis);
    }
}

// ───────────────────────────────────────────────────────────────
// Indicator device port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// A physical indicator (LED strip, RGB light, buzzer) that displays one
/// pattern at a time.
pub trait IndicatorDevice {
    /// Opaque pattern identity. The `Display` form is the name used for
    /// name-based lookup and must be unique within a priority list.
    type Pattern: Clone + PartialEq + fmt::Display;

    /// The pattern currently shown, `None` when the indicator is off.
    fn pattern(&self) -> Option<&Self::Pattern>;

    /// Write a pattern to the hardware. `None` turns the indicator off.
    fn set_pattern(&mut self, pattern: Option<&Self::Pattern>) -> Result<(), DeviceError>;
}

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// One raw sample from a sensor axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorData {
    /// Clock time the sample was taken, in seconds.
    pub timestamp: f64,
    pub value: f64,
}

/// Multi-axis sensor that yields raw, uncalibrated values.
pub trait Sensor {
    /// Selector for the kind of data to read (e.g. rotation rate vs. heading).
    type DataType: Copy;

    fn raw_data(&mut self, axis: usize, data_type: Self::DataType)
    -> Result<SensorData, SensorError>;
}
