//! Robot support utilities.
//!
//! - [`indicator::PriorityIndicator`]: shows the highest-priority enabled
//!   pattern on an indicator device, with blink and one-shot timing.
//! - [`control::CascadePid`]: two PID loops composed so the outer loop's
//!   output is the inner loop's setpoint.
//! - [`sensors::SensorCalibrator`]: per-axis zero offset and deadband
//!   estimated from a batch of samples.
//!
//! Hardware, time and scheduling are reached only through the traits in
//! [`ports`] and the [`scheduler::TaskManager`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod indicator;
pub mod ports;
pub mod scheduler;
pub mod sensors;

pub use error::{Error, Result};
