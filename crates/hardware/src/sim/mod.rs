//! Firmware loading and machine bootstrap.
//!
//! Provides the top-level entry points that build a complete machine and place a firmware
//! image in its boot region.

/// Reading firmware images and placing them in the boot region.
pub mod loader;

/// Machine assembly: root clock, SoC realization and firmware load.
pub mod machine;

pub use machine::{MachineInstance, boot, boot_image, boot_with_config};
