//! Common types and constants shared by every construction step.
//!
//! 1. **Constants:** The canonical Teensy 4.1 memory map, clock, and core defaults.
//! 2. **Error Handling:** One error type per construction step plus the wrappers above them.

/// Memory map, clock and core constants.
pub mod constants;

/// Error types for clock, map, realize, SoC and boot failures.
pub mod error;

pub use error::{BootError, ClockError, MapError, RealizeError, SocError};
