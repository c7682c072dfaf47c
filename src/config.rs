//! Configuration parameters
//!
//! Tunable parameters for the indicator, calibrator and cascade PID.
//! Every struct is serde-serialisable so robot code can load it from
//! whatever store it already uses.

use serde::{Deserialize, Serialize};

use crate::control::pid::PidCoefficients;
use crate::error::{Error, Result};

/// Priority indicator refresh settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    /// Minimum time between two refreshes run by the periodic task (seconds)
    pub refresh_interval_secs: f64,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 0.05, // 20 Hz
        }
    }
}

impl IndicatorConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.refresh_interval_secs.is_finite() || self.refresh_interval_secs < 0.0 {
            return Err(Error::Config("refresh_interval_secs must be finite and >= 0"));
        }
        Ok(())
    }
}

/// Sensor calibration run settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Samples taken per axis
    pub num_samples: u32,
    /// Sleep between samples (milliseconds)
    pub interval_ms: u64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            num_samples: 100,
            interval_ms: 10, // ~1 s total
        }
    }
}

impl CalibrationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.num_samples == 0 {
            return Err(Error::Config("num_samples must be >= 1"));
        }
        Ok(())
    }
}

/// Settings for a single PID loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidConfig {
    pub coefficients: PidCoefficients,
    /// Absolute error considered on target
    pub tolerance: f64,
    /// Time the error must stay within tolerance (seconds)
    pub settling_time_secs: f64,
    pub output_min: f64,
    pub output_max: f64,
}

impl Default for PidConfig {
    fn default() -> Self {
        Self {
            coefficients: PidCoefficients::default(),
            tolerance: 0.0,
            settling_time_secs: 0.2,
            output_min: f64::NEG_INFINITY,
            output_max: f64::INFINITY,
        }
    }
}

impl PidConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.coefficients.is_finite() {
            return Err(Error::Config("PID coefficients must be finite"));
        }
        if !(self.tolerance >= 0.0) {
            return Err(Error::Config("tolerance must be >= 0"));
        }
        if !(self.settling_time_secs >= 0.0) {
            return Err(Error::Config("settling_time_secs must be >= 0"));
        }
        if !(self.output_min <= self.output_max) {
            return Err(Error::Config("output_min must not exceed output_max"));
        }
        Ok(())
    }
}

/// Primary (outer) and secondary (inner) loop settings for a cascade.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CascadeConfig {
    pub primary: PidConfig,
    pub secondary: PidConfig,
}

impl CascadeConfig {
    pub fn validate(&self) -> Result<()> {
        self.primary.validate()?;
        self.secondary.validate()
    }
}
