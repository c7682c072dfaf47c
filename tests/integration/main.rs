//! Integration test driver for `tests/integration/` submodules.
//!
//! Each `mod` below maps to a file that exercises one utility against the
//! mock hardware in `mock_hw`. Everything runs on the host with a
//! simulated clock.

mod indicator_tests;
mod mock_hw;
