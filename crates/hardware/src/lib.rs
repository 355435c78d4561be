//! Teensy 4.1 machine construction library.
//!
//! This crate builds the system architecture of an i.MX RT1062 (Cortex-M7) emulator:
//! 1. **Memory:** Named RAM/ROM regions composed into a flat physical address space.
//! 2. **Clocks:** The board-driven `sysclk` and the internally derived `refclk`.
//! 3. **Core:** The processor core bound to the address space with its boot-time properties.
//! 4. **Machine:** Root clock, SoC realization and firmware loading into the boot ROM.

/// Common constants and error types.
pub mod common;
/// Machine configuration (defaults and serde structures).
pub mod config;
/// Processor core configuration, realization, reset and bit-band decoding.
pub mod core;
/// Firmware loader and machine bootstrap.
pub mod sim;
/// System-on-chip (builder, clocks, address space, memory regions).
pub mod soc;

/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// Realized processor core.
pub use crate::core::CoreHandle;
/// Booted machine; construct with `sim::boot`.
pub use crate::sim::MachineInstance;
/// SoC device; construct with `Soc::new` or `Soc::default`.
pub use crate::soc::Soc;
