//! Sensor helpers: offline calibration and the deadband filter it applies.

pub mod calibrator;

pub use calibrator::SensorCalibrator;

/// Null out small signals: returns `0.0` when `|value| <= deadband`,
/// otherwise `value` unchanged (no ramp).
pub fn apply_deadband(value: f64, deadband: f64) -> f64 {
    if value.abs() <= deadband { 0.0 } else { value }
}
