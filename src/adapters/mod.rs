//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter | Implements | Connects to                          |
//! |---------|------------|--------------------------------------|
//! | `time`  | Clock      | `std::time::Instant` / simulated time |

pub mod time;

pub use time::{MonotonicClock, SimClock};
