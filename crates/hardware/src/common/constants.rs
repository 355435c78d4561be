//! Global System Constants.
//!
//! This module defines the fixed parameters of the Teensy 4.1 (i.MX RT1062) machine. It includes:
//! 1. **Memory Map:** Base address and size of every canonical region.
//! 2. **Clocking:** Default oscillator frequency fed into the SoC.
//! 3. **Core:** Interrupt line count, NVIC limit, and vector table alignment.
//! 4. **Bit-band:** Alias windows and the regions they shadow.

/// One kibibyte.
pub const KIB: u64 = 1024;

/// One mebibyte.
pub const MIB: u64 = 1024 * KIB;

/// Instruction tightly-coupled memory base address.
pub const ITCM_BASE: u64 = 0x0000_0000;
/// Instruction tightly-coupled memory size (512 KiB).
pub const ITCM_SIZE: u64 = 512 * KIB;

/// Boot ROM base address; also the reset vector table base.
pub const ROM_BASE: u64 = 0x0020_0000;
/// Boot ROM size (128 KiB).
///
/// The reference manual quotes two different sizes for this window; the larger
/// one is used and can be overridden through `MemoryMapConfig::rom_size`.
pub const ROM_SIZE: u64 = 128 * KIB;

/// Data tightly-coupled memory base address.
pub const DTCM_BASE: u64 = 0x2000_0000;
/// Data tightly-coupled memory size (512 KiB).
pub const DTCM_SIZE: u64 = 512 * KIB;

/// On-chip RAM (OCRAM) base address.
pub const RAM_BASE: u64 = 0x2020_0000;
/// On-chip RAM size (512 KiB).
pub const RAM_SIZE: u64 = 512 * KIB;

/// External QSPI flash window base address.
pub const FLASH_BASE: u64 = 0x6000_0000;
/// External flash size (7936 KiB).
pub const FLASH_SIZE: u64 = 7936 * KIB;

/// Peripheral bridge 1 base address.
pub const AIPS1_BASE: u64 = 0x4000_0000;
/// Peripheral bridge 2 base address.
pub const AIPS2_BASE: u64 = 0x4010_0000;
/// Peripheral bridge 3 base address.
pub const AIPS3_BASE: u64 = 0x4020_0000;
/// Peripheral bridge 4 base address.
pub const AIPS4_BASE: u64 = 0x4030_0000;
/// Size of each peripheral bridge window (1 MiB).
pub const AIPS_SIZE: u64 = MIB;

/// Cortex-M7 private peripheral bus base address.
pub const CM7_PPB_BASE: u64 = 0xE000_0000;
/// Private peripheral bus size (1 MiB).
pub const CM7_PPB_SIZE: u64 = MIB;

/// Name of the region firmware is loaded into.
pub const BOOT_REGION: &str = "rom";

/// Default system oscillator frequency (24 MHz).
pub const SYSCLK_HZ: u64 = 24 * 1000 * 1000;

/// Default processor variant.
pub const CPU_TYPE: &str = "cortex-m7";

/// External interrupt lines wired to the NVIC.
pub const NUM_IRQ: u32 = 160;

/// Upper bound on external interrupt lines for an M-profile NVIC.
pub const MAX_NUM_IRQ: u32 = 480;

/// Required alignment of the vector table base (VTOR bits [6:0] are reserved).
pub const VECTOR_TABLE_ALIGN: u64 = 128;

/// SRAM bit-band target window start.
pub const BITBAND_SRAM_BASE: u64 = 0x2000_0000;
/// Peripheral bit-band target window start.
pub const BITBAND_PERIPH_BASE: u64 = 0x4000_0000;
/// Size of each bit-band target window (1 MiB).
pub const BITBAND_TARGET_SIZE: u64 = MIB;
/// Offset from a target window to its alias window.
pub const BITBAND_ALIAS_OFFSET: u64 = 0x0200_0000;
/// Size of each alias window (one 32-bit word per target bit).
pub const BITBAND_ALIAS_SIZE: u64 = 32 * MIB;
