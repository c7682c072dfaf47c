//! Cascade PID controller
//!
//! Two PID loops where the primary (outer) loop's output becomes the
//! secondary (inner) loop's target. The primary regulates a high-level
//! quantity such as distance in terms of a lower-level command such as
//! speed, which the secondary actuates.
//!
//! ```text
//!   target ──▶ primary ──(setpoint)──▶ secondary ──▶ output
//!                ▲                        ▲
//!           primary input          secondary input
//! ```

use log::debug;

use crate::config::CascadeConfig;
use crate::control::pid::{PidControl, PidController, PidInput};
use crate::error::Result;
use crate::ports::Clock;

/// A primary and a secondary PID loop presented as one controller.
///
/// Target, tolerance and settling time apply to the primary loop.
pub struct CascadePid<P, S> {
    primary: P,
    secondary: S,
}

impl<P: PidControl, S: PidControl> CascadePid<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn primary_mut(&mut self) -> &mut P {
        &mut self.primary
    }

    pub fn secondary(&self) -> &S {
        &self.secondary
    }

    pub fn secondary_mut(&mut self) -> &mut S {
        &mut self.secondary
    }

    pub fn into_parts(self) -> (P, S) {
        (self.primary, self.secondary)
    }
}

impl<I1, I2, C> CascadePid<PidController<I1, C>, PidController<I2, C>>
where
    I1: PidInput,
    I2: PidInput,
    C: Clock + Clone,
{
    /// Build both loops from configuration, sharing one clock.
    pub fn from_config(
        config: &CascadeConfig,
        primary_input: I1,
        secondary_input: I2,
        clock: C,
    ) -> Result<Self> {
        config.validate()?;
        let primary =
            PidController::from_config("cascade.primary", &config.primary, primary_input, clock.clone())?;
        let secondary =
            PidController::from_config("cascade.secondary", &config.secondary, secondary_input, clock)?;
        Ok(Self::new(primary, secondary))
    }
}

impl<P: PidControl, S: PidControl> PidControl for CascadePid<P, S> {
    fn set_target(&mut self, target: f64) {
        self.primary.set_target(target);
    }

    fn target(&self) -> f64 {
        self.primary.target()
    }

    fn output(&mut self) -> f64 {
        let setpoint = self.primary.output();
        self.secondary.set_target(setpoint);
        let output = self.secondary.output();
        debug!("cascade: setpoint={:.3}, output={:.3}", setpoint, output);
        output
    }

    fn reset(&mut self) {
        // Secondary first so it never holds a stale integral against a fresh primary.
        self.secondary.reset();
        self.primary.reset();
    }

    fn on_target(&self) -> bool {
        self.primary.on_target()
    }

    fn set_tolerance(&mut self, tolerance: f64) {
        self.primary.set_tolerance(tolerance);
    }

    fn set_settling_time(&mut self, secs: f64) {
        self.primary.set_settling_time(secs);
    }
}
