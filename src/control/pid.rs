//! PID controller
//!
//! Proportional-integral-derivative controller with feed-forward that
//! reads its own process variable through a [`PidInput`] and its own
//! time step through a [`Clock`], so callers only ask for `output()`.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::PidConfig;
use crate::error::Result;
use crate::ports::Clock;

/// PID gains plus feed-forward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PidCoefficients {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    pub kf: f64,
}

impl PidCoefficients {
    pub const fn new(kp: f64, ki: f64, kd: f64, kf: f64) -> Self {
        Self { kp, ki, kd, kf }
    }

    /// Proportional-only gains.
    pub const fn p(kp: f64) -> Self {
        Self::new(kp, 0.0, 0.0, 0.0)
    }

    pub fn is_finite(&self) -> bool {
        self.kp.is_finite() && self.ki.is_finite() && self.kd.is_finite() && self.kf.is_finite()
    }
}

/// Source of the process variable a PID loop regulates.
pub trait PidInput {
    fn read(&mut self) -> f64;
}

impl<F: FnMut() -> f64> PidInput for F {
    fn read(&mut self) -> f64 {
        self()
    }
}

/// The surface shared by single and cascaded PID loops.
pub trait PidControl {
    fn set_target(&mut self, target: f64);

    fn target(&self) -> f64;

    /// Read the input, advance the loop one step and return the control output.
    fn output(&mut self) -> f64;

    /// Clear accumulated integral, derivative history and settling state.
    fn reset(&mut self);

    /// True once the error has stayed within tolerance for the settling time.
    fn on_target(&self) -> bool;

    fn set_tolerance(&mut self, tolerance: f64);

    fn set_settling_time(&mut self, secs: f64);
}

/// PID controller
pub struct PidController<I, C> {
    name: &'static str,
    coefficients: PidCoefficients,
    input: I,
    clock: C,
    target: f64,
    tolerance: f64,
    settling_time: f64,
    output_min: f64,
    output_max: f64,
    integral: f64,
    prev_error: f64,
    prev_time: Option<f64>,
    /// Clock time the error last entered the tolerance band.
    settling_start: Option<f64>,
    last_time: f64,
}

impl<I: PidInput, C: Clock> PidController<I, C> {
    pub fn new(name: &'static str, coefficients: PidCoefficients, input: I, clock: C) -> Self {
        Self {
            name,
            coefficients,
            input,
            clock,
            target: 0.0,
            tolerance: 0.0,
            settling_time: 0.0,
            output_min: f64::NEG_INFINITY,
            output_max: f64::INFINITY,
            integral: 0.0,
            prev_error: 0.0,
            prev_time: None,
            settling_start: None,
            last_time: 0.0,
        }
    }

    /// Build a controller from validated configuration.
    pub fn from_config(name: &'static str, config: &PidConfig, input: I, clock: C) -> Result<Self> {
        config.validate()?;
        let mut pid = Self::new(name, config.coefficients, input, clock);
        pid.tolerance = config.tolerance;
        pid.settling_time = config.settling_time_secs;
        pid.set_output_limits(config.output_min, config.output_max);
        Ok(pid)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn coefficients(&self) -> PidCoefficients {
        self.coefficients
    }

    pub fn set_coefficients(&mut self, coefficients: PidCoefficients) {
        self.coefficients = coefficients;
    }

    /// Set output limits
    pub fn set_output_limits(&mut self, min: f64, max: f64) {
        self.output_min = min;
        self.output_max = max;
    }

    /// Error from the most recent `output()` call.
    pub fn last_error(&self) -> f64 {
        self.prev_error
    }

    fn update_settling(&mut self, error: f64, now: f64) {
        if error.abs() <= self.tolerance {
            self.settling_start.get_or_insert(now);
        } else {
            self.settling_start = None;
        }
        self.last_time = now;
    }
}

impl<I: PidInput, C: Clock> PidControl for PidController<I, C> {
    fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    fn target(&self) -> f64 {
        self.target
    }

    fn output(&mut self) -> f64 {
        let now = self.clock.now();
        let measurement = self.input.read();
        let error = self.target - measurement;
        let dt = self.prev_time.map_or(0.0, |prev| now - prev);

        // Proportional
        let p = self.coefficients.kp * error;

        // Integral (with anti-windup)
        self.integral += error * dt;
        let i = self.coefficients.ki * self.integral;

        // Derivative
        let derivative = if dt > 0.0 {
            (error - self.prev_error) / dt
        } else {
            0.0
        };
        let d = self.coefficients.kd * derivative;

        let f = self.coefficients.kf * self.target;

        self.prev_error = error;
        self.prev_time = Some(now);

        let output = (p + i + d + f).clamp(self.output_min, self.output_max);

        // Anti-windup: if output is saturated, stop integrating
        if output >= self.output_max || output <= self.output_min {
            self.integral -= error * dt;
        }

        self.update_settling(error, now);
        debug!(
            "{}: target={:.3}, input={:.3}, error={:.3}, output={:.3}",
            self.name, self.target, measurement, error, output
        );

        output
    }

    /// Reset controller state
    fn reset(&mut self) {
        self.integral = 0.0;
        self.prev_error = 0.0;
        self.prev_time = None;
        self.settling_start = None;
    }

    fn on_target(&self) -> bool {
        self.settling_start
            .is_some_and(|start| self.last_time - start >= self.settling_time)
    }

    fn set_tolerance(&mut self, tolerance: f64) {
        self.tolerance = tolerance.abs();
    }

    fn set_settling_time(&mut self, secs: f64) {
        self.settling_time = secs.max(0.0);
    }
}
