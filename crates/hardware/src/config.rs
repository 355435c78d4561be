//! Configuration system for the machine.
//!
//! This module defines the configuration structures used to parameterize machine construction.
//! It provides:
//! 1. **Defaults:** The Teensy 4.1 board values (24 MHz oscillator, Cortex-M7, 160 IRQs, canonical map).
//! 2. **Structures:** Hierarchical config for the clock, the SoC core properties and the memory map.
//!
//! Configuration is deserialized from JSON (the CLI's `--config`) or built with `Config::default()`.
//! Every field has a default, so partial documents are accepted.

use serde::Deserialize;

use crate::common::constants;
use crate::core::CoreConfig;
use crate::soc::memory::{RegionSpec, canonical_region_table};

/// Default configuration values.
mod defaults {
    use crate::common::constants;

    /// Root oscillator frequency (24 MHz).
    pub const SYSCLK_HZ: u64 = constants::SYSCLK_HZ;

    /// Processor variant fitted to the board.
    pub const CPU_TYPE: &str = constants::CPU_TYPE;

    /// NVIC external interrupt lines.
    pub const NUM_IRQ: u32 = constants::NUM_IRQ;

    /// Bit-band decoding enabled.
    pub const ENABLE_BITBAND: bool = true;

    /// Region that receives the firmware image and holds the reset vector table.
    pub const BOOT_REGION: &str = constants::BOOT_REGION;

    /// Boot ROM size in bytes.
    pub const ROM_SIZE: u64 = constants::ROM_SIZE;
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use rtsim_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.clock.sysclk_hz, 24_000_000);
/// assert_eq!(config.soc.num_irq, 160);
/// ```
///
/// Partial JSON documents fill the rest from defaults:
///
/// ```
/// use rtsim_core::config::Config;
///
/// let config = Config::from_json(r#"{ "soc": { "cpu_type": "cortex-m4" } }"#).unwrap();
/// assert_eq!(config.soc.cpu_type, "cortex-m4");
/// assert_eq!(config.memory.boot_region, "rom");
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Root clock settings
    #[serde(default)]
    pub clock: ClockConfig,
    /// Core container properties
    #[serde(default)]
    pub soc: SocConfig,
    /// Memory map layout
    #[serde(default)]
    pub memory: MemoryMapConfig,
}

impl Config {
    /// Parses a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed documents or mistyped fields.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Region table to map: the explicit `memory.regions` list, or the canonical layout sized
    /// by `memory.rom_size`. An explicit list is returned as given.
    pub fn region_table(&self) -> Vec<RegionSpec> {
        self.memory
            .regions
            .clone()
            .unwrap_or_else(|| canonical_region_table(self.memory.rom_size))
    }

    /// Resolves the core properties, defaulting the vector table to `boot_base`.
    pub fn core_config(&self, boot_base: u64) -> CoreConfig {
        CoreConfig {
            cpu_type: self.soc.cpu_type.clone(),
            num_irq: self.soc.num_irq,
            vector_table_base: self.soc.vector_table_base.unwrap_or(boot_base),
            bitband_enabled: self.soc.enable_bitband,
        }
    }
}

/// Root clock configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ClockConfig {
    /// Frequency of the board oscillator driving `sysclk`, in Hz
    #[serde(default = "ClockConfig::default_sysclk_hz")]
    pub sysclk_hz: u64,
}

impl ClockConfig {
    fn default_sysclk_hz() -> u64 {
        defaults::SYSCLK_HZ
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            sysclk_hz: defaults::SYSCLK_HZ,
        }
    }
}

/// Core container properties set by the board.
#[derive(Debug, Clone, Deserialize)]
pub struct SocConfig {
    /// Processor variant (`cpu-type`)
    #[serde(default = "SocConfig::default_cpu_type")]
    pub cpu_type: String,

    /// External interrupt line count (`num-irq`)
    #[serde(default = "SocConfig::default_num_irq")]
    pub num_irq: u32,

    /// Reset vector table base; defaults to the boot region base when unset
    #[serde(default)]
    pub vector_table_base: Option<u64>,

    /// Decode the bit-band alias windows (`enable-bitband`)
    #[serde(default = "SocConfig::default_enable_bitband")]
    pub enable_bitband: bool,
}

impl SocConfig {
    fn default_cpu_type() -> String {
        defaults::CPU_TYPE.to_string()
    }

    fn default_num_irq() -> u32 {
        defaults::NUM_IRQ
    }

    fn default_enable_bitband() -> bool {
        defaults::ENABLE_BITBAND
    }
}

impl Default for SocConfig {
    fn default() -> Self {
        Self {
            cpu_type: defaults::CPU_TYPE.to_string(),
            num_irq: defaults::NUM_IRQ,
            vector_table_base: None,
            enable_bitband: defaults::ENABLE_BITBAND,
        }
    }
}

/// Memory map configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryMapConfig {
    /// Name of the region firmware is loaded into
    #[serde(default = "MemoryMapConfig::default_boot_region")]
    pub boot_region: String,

    /// Boot ROM size in bytes, used by the canonical table only.
    ///
    /// Has no effect when `regions` is set; the explicit table carries its own sizes.
    #[serde(default = "MemoryMapConfig::default_rom_size")]
    pub rom_size: u64,

    /// Full replacement for the canonical region table; `rom_size` is ignored when set
    #[serde(default)]
    pub regions: Option<Vec<RegionSpec>>,
}

impl MemoryMapConfig {
    fn default_boot_region() -> String {
        defaults::BOOT_REGION.to_string()
    }

    fn default_rom_size() -> u64 {
        defaults::ROM_SIZE
    }
}

impl Default for MemoryMapConfig {
    /// Canonical Teensy 4.1 layout with `rom` as the boot region.
    fn default() -> Self {
        Self {
            boot_region: defaults::BOOT_REGION.to_string(),
            rom_size: defaults::ROM_SIZE,
            regions: None,
        }
    }
}

const _: () = assert!(constants::ROM_BASE % constants::VECTOR_TABLE_ALIGN == 0);
