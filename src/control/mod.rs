//! Closed-loop control: the base PID loop and the cascade built on it.

pub mod cascade;
pub mod pid;

pub use cascade::CascadePid;
pub use pid::{PidCoefficients, PidControl, PidController, PidInput};
