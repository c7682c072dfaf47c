//! Unified error types for the robokit utilities.
//!
//! A single `Error` enum that every subsystem converts into, so callers
//! handle indicator, calibrator and scheduler failures uniformly. All
//! variants are `Copy`.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A pattern name is not present in the installed priority list.
    PatternNotFound,
    /// Two patterns in a priority list share the same display name.
    DuplicatePatternName,
    /// A calibrator axis index is past the configured number of axes.
    AxisOutOfRange { axis: usize, num_axes: usize },
    /// A caller-supplied argument is outside its allowed range.
    InvalidParameter(&'static str),
    /// The task manager has no free slot for another registration.
    TaskSlotsFull,
    /// Configuration is invalid.
    Config(&'static str),
    /// The indicator device rejected a write.
    Device(DeviceError),
    /// A sensor could not be read.
    Sensor(SensorError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PatternNotFound => write!(f, "pattern not found"),
            Self::DuplicatePatternName => write!(f, "duplicate pattern name in priority list"),
            Self::AxisOutOfRange { axis, num_axes } => {
                write!(f, "axis {axis} out of range (num_axes={num_axes})")
            }
            Self::InvalidParameter(msg) => write!(f, "invalid parameter: {msg}"),
            Self::TaskSlotsFull => write!(f, "task slots full"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Device(e) => write!(f, "device: {e}"),
            Self::Sensor(e) => write!(f, "sensor: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Device errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceError {
    /// Writing the pattern to the hardware failed.
    WriteFailed,
    /// The device is not connected or not initialised.
    Unavailable,
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteFailed => write!(f, "write failed"),
            Self::Unavailable => write!(f, "device unavailable"),
        }
    }
}

impl From<DeviceError> for Error {
    fn from(e: DeviceError) -> Self {
        Self::Device(e)
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The raw read returned an error or timed out.
    ReadFailed,
    /// The sensor does not provide the requested axis.
    NoSuchAxis,
    /// The sensor does not support the requested data type.
    UnsupportedDataType,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed => write!(f, "read failed"),
            Self::NoSuchAxis => write!(f, "no such axis"),
            Self::UnsupportedDataType => write!(f, "unsupported data type"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
