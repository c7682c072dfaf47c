//! Priority-arbitrated indicator control.

pub mod priority;
mod state;

pub use priority::PriorityIndicator;
