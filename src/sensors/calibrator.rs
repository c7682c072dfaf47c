//! Per-axis zero-offset and deadband calibration.
//!
//! `calibrate()` samples the sensor while it is held still and records,
//! for every axis, the mean reading (zero offset) and the spread of the
//! readings (deadband). Later reads subtract the offset and null out
//! anything inside the deadband.
//!
//! Calibration blocks the caller for roughly `num_samples × interval_ms`;
//! run it from a context that tolerates blocking.

use log::{debug, info};

use crate::config::CalibrationConfig;
use crate::error::{Error, Result};
use crate::ports::{Clock, Sensor};
use crate::sensors::apply_deadband;

pub struct SensorCalibrator<S: Sensor, C> {
    name: String,
    sensor: S,
    data_type: S::DataType,
    clock: C,
    zero_offsets: Vec<f64>,
    deadbands: Vec<f64>,
}

impl<S: Sensor, C: Clock> SensorCalibrator<S, C> {
    /// Create a calibrator for the first `num_axes` axes of `sensor`.
    /// Until `calibrate()` runs, offsets and deadbands are zero.
    pub fn new(name: impl Into<String>, sensor: S, num_axes: usize, data_type: S::DataType, clock: C) -> Self {
        Self {
            name: name.into(),
            sensor,
            data_type,
            clock,
            zero_offsets: vec![0.0; num_axes],
            deadbands: vec![0.0; num_axes],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_axes(&self) -> usize {
        self.zero_offsets.len()
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    /// Sample every axis `num_samples` times, sleeping `interval_ms`
    /// after each round, then store the per-axis mean and range.
    ///
    /// The min/max seed comes from one extra read per axis before the
    /// sampling loop. On error the previous calibration is kept.
    pub fn calibrate(&mut self, num_samples: u32, interval_ms: u64) -> Result<()> {
        if num_samples == 0 {
            return Err(Error::InvalidParameter("num_samples must be >= 1"));
        }

        let num_axes = self.num_axes();
        let mut mins = vec![0.0; num_axes];
        let mut maxs = vec![0.0; num_axes];
        let mut sums = vec![0.0; num_axes];

        for axis in 0..num_axes {
            let seed = self.sensor.raw_data(axis, self.data_type)?.value;
            mins[axis] = seed;
            maxs[axis] = seed;
        }

        for _ in 0..num_samples {
            for axis in 0..num_axes {
                let value = self.sensor.raw_data(axis, self.data_type)?.value;
                sums[axis] += value;
                mins[axis] = mins[axis].min(value);
                maxs[axis] = maxs[axis].max(value);
            }
            self.clock.sleep_ms(interval_ms);
        }

        for axis in 0..num_axes {
            self.zero_offsets[axis] = sums[axis] / f64::from(num_samples);
            self.deadbands[axis] = maxs[axis] - mins[axis];
            debug!(
                "{}: axis {} zero_offset={:.6}, deadband={:.6}",
                self.name, axis, self.zero_offsets[axis], self.deadbands[axis]
            );
        }
        info!("{}: calibrated {} axes over {} samples", self.name, num_axes, num_samples);

        Ok(())
    }

    /// Calibrate with the sample count and interval from `config`.
    pub fn calibrate_with(&mut self, config: &CalibrationConfig) -> Result<()> {
        config.validate()?;
        self.calibrate(config.num_samples, config.interval_ms)
    }

    /// Subtract the axis zero offset from `raw` and apply the axis deadband.
    pub fn calibrated_data(&self, axis: usize, raw: f64) -> Result<f64> {
        self.check_axis(axis)?;
        Ok(apply_deadband(raw - self.zero_offsets[axis], self.deadbands[axis]))
    }

    /// Read `axis` from the sensor and return the calibrated value.
    pub fn read_calibrated(&mut self, axis: usize) -> Result<f64> {
        self.check_axis(axis)?;
        let raw = self.sensor.raw_data(axis, self.data_type)?.value;
        self.calibrated_data(axis, raw)
    }

    pub fn zero_offset(&self, axis: usize) -> Result<f64> {
        self.check_axis(axis)?;
        Ok(self.zero_offsets[axis])
    }

    pub fn deadband(&self, axis: usize) -> Result<f64> {
        self.check_axis(axis)?;
        Ok(self.deadbands[axis])
    }

    fn check_axis(&self, axis: usize) -> Result<()> {
        if axis < self.num_axes() {
            Ok(())
        } else {
            Err(Error::AxisOutOfRange {
                axis,
                num_axes: self.num_axes(),
            })
        }
    }
}
