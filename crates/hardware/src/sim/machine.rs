//! Teensy 4.1 machine bootstrap.
//!
//! Builds one machine per emulation session:
//! 1. **Root clock:** A fixed-frequency `SYSCLK` oscillator (24 MHz unless configured).
//! 2. **SoC:** Constructed from the configuration, `sysclk` connected, then realized.
//! 3. **Firmware:** The image is copied into the boot region once the SoC is realized.
//!
//! Any failure aborts the remaining steps and is returned as a `BootError`.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::common::error::BootError;
use crate::config::Config;
use crate::core::{CoreHandle, ResetVector};
use crate::sim::loader;
use crate::soc::builder::Soc;
use crate::soc::clock::{Clock, ClockPort};
use crate::soc::interconnect::AddressSpace;
use crate::soc::memory::MemoryRegion;

/// Name of the board oscillator.
pub const ROOT_CLOCK_NAME: &str = "SYSCLK";

/// A booted machine: root clock, realized SoC, its core, and the loaded firmware.
#[derive(Debug)]
pub struct MachineInstance {
    root_clock: Arc<Clock>,
    soc: Soc,
    core: CoreHandle,
    boot_region: String,
    firmware_len: usize,
}

/// Boots the default Teensy 4.1 machine with `core_variant` and the image at `firmware_path`.
///
/// # Errors
///
/// See [`boot_with_config`].
pub fn boot(
    firmware_path: impl AsRef<Path>,
    core_variant: &str,
) -> Result<MachineInstance, BootError> {
    let mut config = Config::default();
    config.soc.cpu_type = core_variant.to_string();
    boot_with_config(&config, firmware_path)
}

/// Builds and realizes the machine described by `config`, then loads `firmware_path`.
///
/// The image is only read once the SoC has realized.
///
/// # Errors
///
/// `Soc` for any clock, map or core failure, `ImageRead` if the file cannot be read,
/// `ImageTooLarge` if it exceeds the boot region, and `MissingBootRegion` if the table has
/// no region with the configured boot name.
pub fn boot_with_config(
    config: &Config,
    firmware_path: impl AsRef<Path>,
) -> Result<MachineInstance, BootError> {
    let mut machine = realize(config)?;
    let image = loader::load_binary(firmware_path.as_ref())?;
    machine.load(&image)?;
    Ok(machine)
}

/// Same as [`boot_with_config`] with the firmware image already in memory.
///
/// # Errors
///
/// As [`boot_with_config`], minus `ImageRead`.
pub fn boot_image(config: &Config, image: &[u8]) -> Result<MachineInstance, BootError> {
    let mut machine = realize(config)?;
    machine.load(image)?;
    Ok(machine)
}

fn realize(config: &Config) -> Result<MachineInstance, BootError> {
    let table = config.region_table();
    let boot_region = config.memory.boot_region.clone();
    let boot_base = table
        .iter()
        .find(|spec| spec.name == boot_region)
        .map(|spec| spec.base)
        .ok_or_else(|| BootError::MissingBootRegion(boot_region.clone()))?;

    let root_clock = Arc::new(Clock::fixed(ROOT_CLOCK_NAME, config.clock.sysclk_hz));

    let mut soc = Soc::new(config.core_config(boot_base), table);
    soc.connect_clock(ClockPort::Sysclk, &root_clock)?;
    let core = soc.realize()?;

    Ok(MachineInstance {
        root_clock,
        soc,
        core,
        boot_region,
        firmware_len: 0,
    })
}

impl MachineInstance {
    fn load(&mut self, image: &[u8]) -> Result<(), BootError> {
        let addr = loader::load_firmware(self.soc.address_space(), &self.boot_region, image)?;
        self.firmware_len = image.len();
        info!(
            cpu = self.core.cpu_type().name(),
            entry = %format!("{addr:#010x}"),
            "machine ready"
        );
        Ok(())
    }

    /// The board oscillator driving `sysclk`.
    pub const fn root_clock(&self) -> &Arc<Clock> {
        &self.root_clock
    }

    /// The realized SoC.
    pub const fn soc(&self) -> &Soc {
        &self.soc
    }

    /// The realized processor core.
    pub const fn core(&self) -> &CoreHandle {
        &self.core
    }

    /// The physical address space.
    pub const fn address_space(&self) -> &Arc<AddressSpace> {
        self.soc.address_space()
    }

    /// The region holding the firmware image.
    pub fn boot_region(&self) -> Option<&Arc<MemoryRegion>> {
        self.soc.region(&self.boot_region)
    }

    /// Size of the loaded firmware image in bytes.
    pub const fn firmware_len(&self) -> usize {
        self.firmware_len
    }

    /// Initial stack pointer and reset handler the core would start from.
    pub fn reset_vector(&self) -> ResetVector {
        self.core.reset_vector()
    }
}
