//! System-on-Chip Components.
//!
//! This module organizes the components that make up the Teensy 4.1 SoC: the clock inputs,
//! the memory regions, the address space they are mapped into, and the builder that
//! realizes them together with the processor core.

/// SoC aggregate and realization lifecycle.
pub mod builder;

/// Clock signals and clock-tree validation.
pub mod clock;

/// Physical address space and access routing.
pub mod interconnect;

/// Memory regions, backing storage and the region composer.
pub mod memory;

pub use builder::{Soc, SocState};
