//! Processor core configuration and realization.
//!
//! This module models the ARMv7-M core container the SoC instantiates. It provides:
//! 1. **Configuration:** `CoreConfig` with the device properties the board sets
//!    (`cpu-type`, `num-irq`, `init-vector-table-base`, `enable-bitband`).
//! 2. **Realization:** `configure_and_realize`, which validates the configuration and binds the
//!    core to the shared address space and its two clock inputs.
//! 3. **Reset:** Fetching the initial stack pointer and reset handler from the vector table.
//! 4. **Bit-band:** Translating alias-window accesses to single-bit operations when enabled.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::info;

use crate::common::constants::{
    BITBAND_ALIAS_OFFSET, BITBAND_ALIAS_SIZE, BITBAND_PERIPH_BASE, BITBAND_SRAM_BASE, CPU_TYPE,
    MAX_NUM_IRQ, NUM_IRQ, ROM_BASE, VECTOR_TABLE_ALIGN,
};
use crate::common::error::RealizeError;
use crate::soc::clock::Clock;
use crate::soc::interconnect::AddressSpace;

/// Suffix QEMU-style type names append to CPU models.
const CPU_TYPE_SUFFIX: &str = "-arm-cpu";

/// M-profile processor variants the core container accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CpuType {
    /// Cortex-M0 (ARMv6-M).
    CortexM0,
    /// Cortex-M3 (ARMv7-M).
    CortexM3,
    /// Cortex-M4 (ARMv7E-M).
    CortexM4,
    /// Cortex-M7 (ARMv7E-M).
    CortexM7,
    /// Cortex-M33 (ARMv8-M Mainline).
    CortexM33,
    /// Cortex-M55 (ARMv8.1-M).
    CortexM55,
}

impl CpuType {
    /// Canonical model name, e.g. `"cortex-m7"`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::CortexM0 => "cortex-m0",
            Self::CortexM3 => "cortex-m3",
            Self::CortexM4 => "cortex-m4",
            Self::CortexM7 => "cortex-m7",
            Self::CortexM33 => "cortex-m33",
            Self::CortexM55 => "cortex-m55",
        }
    }
}

impl fmt::Display for CpuType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CpuType {
    type Err = RealizeError;

    /// Accepts both `"cortex-m7"` and the type name `"cortex-m7-arm-cpu"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let model = s.strip_suffix(CPU_TYPE_SUFFIX).unwrap_or(s);
        match model {
            "cortex-m0" => Ok(Self::CortexM0),
            "cortex-m3" => Ok(Self::CortexM3),
            "cortex-m4" => Ok(Self::CortexM4),
            "cortex-m7" => Ok(Self::CortexM7),
            "cortex-m33" => Ok(Self::CortexM33),
            "cortex-m55" => Ok(Self::CortexM55),
            _ => Err(RealizeError::UnsupportedCpuType(s.to_string())),
        }
    }
}

/// Boot-time properties of the core container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Processor variant identifier (`cpu-type`).
    pub cpu_type: String,
    /// External interrupt line count (`num-irq`).
    pub num_irq: u32,
    /// Reset value of VTOR (`init-vector-table-base`).
    pub vector_table_base: u64,
    /// Whether the bit-band alias windows are decoded (`enable-bitband`).
    pub bitband_enabled: bool,
}

impl Default for CoreConfig {
    /// Teensy 4.1 settings: Cortex-M7, 160 IRQs, VTOR at the boot ROM, bit-band on.
    fn default() -> Self {
        Self {
            cpu_type: CPU_TYPE.to_string(),
            num_irq: NUM_IRQ,
            vector_table_base: ROM_BASE,
            bitband_enabled: true,
        }
    }
}

/// Initial register state read from the vector table at reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetVector {
    /// Initial main stack pointer (vector table word 0).
    pub initial_sp: u32,
    /// Reset handler address with the Thumb bit cleared (word 1).
    pub reset_pc: u32,
    /// Whether the reset handler entry had the Thumb bit set.
    pub thumb: bool,
}

/// A realized processor core bound to an address space and two clocks.
#[derive(Debug)]
pub struct CoreHandle {
    cpu_type: CpuType,
    num_irq: u32,
    vector_table_base: u64,
    bitband_enabled: bool,
    memory: Arc<AddressSpace>,
    cpuclk: Arc<Clock>,
    refclk: Arc<Clock>,
}

/// Validates `config` and realizes a core bound to `address_space`.
///
/// The address space is shared with the caller, not copied. `sysclk` drives the processor
/// clock input and `refclk` the SysTick reference input.
///
/// # Errors
///
/// `UnsupportedCpuType`, `TooManyIrqs`, `MisalignedVectorTable` or `UnmappedVectorTable`,
/// checked in that order.
pub fn configure_and_realize(
    config: CoreConfig,
    address_space: Arc<AddressSpace>,
    sysclk: &Arc<Clock>,
    refclk: &Arc<Clock>,
) -> Result<CoreHandle, RealizeError> {
    let cpu_type: CpuType = config.cpu_type.parse()?;

    if config.num_irq > MAX_NUM_IRQ {
        return Err(RealizeError::TooManyIrqs {
            requested: config.num_irq,
            max: MAX_NUM_IRQ,
        });
    }

    let vtor = config.vector_table_base;
    if vtor % VECTOR_TABLE_ALIGN != 0 {
        return Err(RealizeError::MisalignedVectorTable(vtor));
    }
    if !address_space.is_valid_address(vtor) {
        return Err(RealizeError::UnmappedVectorTable(vtor));
    }

    info!(
        cpu = cpu_type.name(),
        num_irq = config.num_irq,
        vtor = %format!("{vtor:#010x}"),
        bitband = config.bitband_enabled,
        "realized core"
    );

    Ok(CoreHandle {
        cpu_type,
        num_irq: config.num_irq,
        vector_table_base: vtor,
        bitband_enabled: config.bitband_enabled,
        memory: address_space,
        cpuclk: Arc::clone(sysclk),
        refclk: Arc::clone(refclk),
    })
}

/// Translates a bit-band alias address to `(byte address, bit index)`.
///
/// Each 32-bit word in an alias window stands for one bit of its target window:
/// `alias = alias_base + byte_offset * 32 + bit * 4`.
pub const fn bitband_target(addr: u64) -> Option<(u64, u8)> {
    let windows = [BITBAND_SRAM_BASE, BITBAND_PERIPH_BASE];
    let mut i = 0;
    while i < windows.len() {
        let target = windows[i];
        let alias = target + BITBAND_ALIAS_OFFSET;
        if addr >= alias && addr < alias + BITBAND_ALIAS_SIZE {
            let offset = addr - alias;
            return Some((target + (offset >> 5), ((offset >> 2) & 7) as u8));
        }
        i += 1;
    }
    None
}

impl CoreHandle {
    /// Processor variant.
    pub const fn cpu_type(&self) -> CpuType {
        self.cpu_type
    }

    /// External interrupt line count.
    pub const fn num_irq(&self) -> u32 {
        self.num_irq
    }

    /// Vector table base used at reset.
    pub const fn vector_table_base(&self) -> u64 {
        self.vector_table_base
    }

    /// Whether bit-band aliases are decoded.
    pub const fn bitband_enabled(&self) -> bool {
        self.bitband_enabled
    }

    /// Address space the core fetches from and accesses data through.
    pub const fn memory(&self) -> &Arc<AddressSpace> {
        &self.memory
    }

    /// Processor clock input.
    pub const fn cpuclk(&self) -> &Arc<Clock> {
        &self.cpuclk
    }

    /// SysTick reference clock input.
    pub const fn refclk(&self) -> &Arc<Clock> {
        &self.refclk
    }

    /// Reads the initial stack pointer and reset handler from the vector table.
    pub fn reset_vector(&self) -> ResetVector {
        let initial_sp = self.memory.read_u32(self.vector_table_base);
        let entry = self.memory.read_u32(self.vector_table_base + 4);
        ResetVector {
            initial_sp,
            reset_pc: entry & !1,
            thumb: entry & 1 == 1,
        }
    }

    fn alias(&self, addr: u64) -> Option<(u64, u8)> {
        if self.bitband_enabled {
            bitband_target(addr)
        } else {
            None
        }
    }

    /// Data read of one word, decoding bit-band aliases when enabled.
    pub fn read_u32(&self, addr: u64) -> u32 {
        match self.alias(addr) {
            Some((byte, bit)) => u32::from((self.memory.read_u8(byte) >> bit) & 1),
            None => self.memory.read_u32(addr),
        }
    }

    /// Data write of one word; an alias write sets or clears the target bit from bit 0 of `val`.
    pub fn write_u32(&self, addr: u64, val: u32) {
        match self.alias(addr) {
            Some((byte, bit)) => {
                let old = self.memory.read_u8(byte);
                let new = if val & 1 == 1 {
                    old | (1 << bit)
                } else {
                    old & !(1 << bit)
                };
                self.memory.write_u8(byte, new);
            }
            None => self.memory.write_u32(addr, val),
        }
    }
}
