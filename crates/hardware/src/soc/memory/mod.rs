//! Memory Regions.
//!
//! This module implements the named spans of storage that make up the physical map. It provides:
//! 1. **Buffer:** Backing storage (`RegionBuffer`) for region contents.
//! 2. **Region:** A sized buffer with a name, base address and RAM/ROM kind.
//! 3. **Specs:** The declarative `RegionSpec` table and the canonical Teensy 4.1 layout.
//! 4. **Composer:** `map_all`, which turns a `RegionSpec` table into regions inside an address space.

/// Zero-initialized host storage for one region.
pub mod buffer;

/// Data-driven allocation and insertion of a region table.
pub mod composer;

use serde::Deserialize;

use self::buffer::RegionBuffer;
use crate::common::constants::{
    AIPS_SIZE, AIPS1_BASE, AIPS2_BASE, AIPS3_BASE, AIPS4_BASE, CM7_PPB_BASE, CM7_PPB_SIZE,
    DTCM_BASE, DTCM_SIZE, FLASH_BASE, FLASH_SIZE, ITCM_BASE, ITCM_SIZE, RAM_BASE, RAM_SIZE,
    ROM_BASE,
};
use crate::common::error::MapError;

/// Access kind of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RegionKind {
    /// Read/write memory.
    #[default]
    #[serde(alias = "Ram", alias = "ram")]
    Ram,
    /// Read-only memory; written only by privileged loads.
    #[serde(alias = "Rom", alias = "rom")]
    Rom,
}

/// Declarative description of one region to be mapped.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegionSpec {
    /// Region name (e.g. `"itcm"`).
    pub name: String,
    /// Physical base address.
    pub base: u64,
    /// Size in bytes.
    pub size: u64,
    /// RAM or ROM.
    #[serde(default)]
    pub kind: RegionKind,
}

impl RegionSpec {
    /// Creates a spec.
    pub fn new(name: impl Into<String>, base: u64, size: u64, kind: RegionKind) -> Self {
        Self {
            name: name.into(),
            base,
            size,
            kind,
        }
    }

    /// Returns the exclusive end address, or `None` if it overflows.
    pub const fn end(&self) -> Option<u64> {
        self.base.checked_add(self.size)
    }
}

/// Returns the Teensy 4.1 region table in its canonical order.
///
/// `rom_size` sets the size of the boot ROM; everything else is fixed.
pub fn canonical_region_table(rom_size: u64) -> Vec<RegionSpec> {
    vec![
        RegionSpec::new("itcm", ITCM_BASE, ITCM_SIZE, RegionKind::Ram),
        RegionSpec::new("rom", ROM_BASE, rom_size, RegionKind::Rom),
        RegionSpec::new("dtcm", DTCM_BASE, DTCM_SIZE, RegionKind::Ram),
        RegionSpec::new("ram", RAM_BASE, RAM_SIZE, RegionKind::Ram),
        RegionSpec::new("flash", FLASH_BASE, FLASH_SIZE, RegionKind::Ram),
        RegionSpec::new("aips1", AIPS1_BASE, AIPS_SIZE, RegionKind::Ram),
        RegionSpec::new("aips2", AIPS2_BASE, AIPS_SIZE, RegionKind::Ram),
        RegionSpec::new("aips3", AIPS3_BASE, AIPS_SIZE, RegionKind::Ram),
        RegionSpec::new("aips4", AIPS4_BASE, AIPS_SIZE, RegionKind::Ram),
        RegionSpec::new("cm7_ppb", CM7_PPB_BASE, CM7_PPB_SIZE, RegionKind::Ram),
    ]
}

/// A named span of backing storage mapped at a fixed base address.
///
/// Immutable in shape once created. The SoC owns its regions; the address space and the
/// core only hold shared references to them.
#[derive(Debug)]
pub struct MemoryRegion {
    name: String,
    base: u64,
    kind: RegionKind,
    buffer: RegionBuffer,
}

impl MemoryRegion {
    /// Allocates backing storage for `spec`.
    ///
    /// # Errors
    ///
    /// `EmptyRegion` for a zero size, `AddressOverflow` when the range wraps the 64-bit
    /// space, and `AllocationFailure` when the host cannot provide the storage.
    pub fn allocate(spec: &RegionSpec) -> Result<Self, MapError> {
        if spec.size == 0 {
            return Err(MapError::EmptyRegion {
                region: spec.name.clone(),
            });
        }
        if spec.end().is_none() {
            return Err(MapError::AddressOverflow {
                region: spec.name.clone(),
                base: spec.base,
                size: spec.size,
            });
        }
        let buffer = usize::try_from(spec.size)
            .ok()
            .and_then(RegionBuffer::try_new)
            .ok_or_else(|| MapError::AllocationFailure {
                region: spec.name.clone(),
                size: spec.size,
            })?;

        Ok(Self {
            name: spec.name.clone(),
            base: spec.base,
            kind: spec.kind,
            buffer,
        })
    }

    /// Region name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Physical base address.
    pub const fn base(&self) -> u64 {
        self.base
    }

    /// Size in bytes.
    pub const fn size(&self) -> u64 {
        self.buffer.len() as u64
    }

    /// Exclusive end address.
    pub const fn end(&self) -> u64 {
        self.base + self.size()
    }

    /// RAM or ROM.
    pub const fn kind(&self) -> RegionKind {
        self.kind
    }

    /// Returns `true` if `addr` falls inside this region.
    pub const fn contains(&self, addr: u64) -> bool {
        addr >= self.base && addr < self.end()
    }

    /// Returns `true` if `[base, end)` intersects this region.
    pub const fn overlaps(&self, base: u64, end: u64) -> bool {
        base < self.end() && self.base < end
    }

    /// Borrows `len` bytes of contents starting at region-relative `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset + len` exceeds the region size.
    pub fn contents(&self, offset: u64, len: usize) -> &[u8] {
        self.buffer.read_slice(host_offset(offset), len)
    }

    // Region-relative accessors below panic on an out-of-range offset. Routed access through
    // `AddressSpace` checks the span first and never reaches them out of range.

    /// Reads one byte at a region-relative offset.
    ///
    /// # Panics
    ///
    /// Panics if `offset` is outside the region.
    pub fn read_u8(&self, offset: u64) -> u8 {
        self.buffer.read_u8(host_offset(offset))
    }

    /// Reads two bytes (little-endian) at a region-relative offset.
    ///
    /// # Panics
    ///
    /// Panics if the two bytes are not inside the region.
    pub fn read_u16(&self, offset: u64) -> u16 {
        let mut bytes = [0u8; 2];
        bytes.copy_from_slice(self.buffer.read_slice(host_offset(offset), 2));
        u16::from_le_bytes(bytes)
    }

    /// Reads four bytes (little-endian) at a region-relative offset.
    ///
    /// # Panics
    ///
    /// Panics if the four bytes are not inside the region.
    pub fn read_u32(&self, offset: u64) -> u32 {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(self.buffer.read_slice(host_offset(offset), 4));
        u32::from_le_bytes(bytes)
    }

    /// Writes one byte; ignored for ROM.
    ///
    /// # Panics
    ///
    /// Panics if a RAM write falls outside the region.
    pub fn write_u8(&self, offset: u64, val: u8) {
        if self.kind == RegionKind::Ram {
            self.buffer.write_u8(host_offset(offset), val);
        }
    }

    /// Writes two bytes (little-endian); ignored for ROM.
    ///
    /// # Panics
    ///
    /// Panics if a RAM write falls outside the region.
    pub fn write_u16(&self, offset: u64, val: u16) {
        if self.kind == RegionKind::Ram {
            self.buffer.write_slice(host_offset(offset), &val.to_le_bytes());
        }
    }

    /// Writes four bytes (little-endian); ignored for ROM.
    ///
    /// # Panics
    ///
    /// Panics if a RAM write falls outside the region.
    pub fn write_u32(&self, offset: u64, val: u32) {
        if self.kind == RegionKind::Ram {
            self.buffer.write_slice(host_offset(offset), &val.to_le_bytes());
        }
    }

    /// Privileged load: copies `data` in at `offset` regardless of region kind.
    ///
    /// # Errors
    ///
    /// `OutOfRange` if the data does not fit between `offset` and the end of the region.
    pub fn load(&self, data: &[u8], offset: u64) -> Result<(), MapError> {
        let len = data.len() as u64;
        let fits = offset
            .checked_add(len)
            .is_some_and(|end| end <= self.size());
        if !fits {
            return Err(MapError::OutOfRange {
                addr: self.base.saturating_add(offset),
                len,
            });
        }
        self.buffer.write_slice(host_offset(offset), data);
        Ok(())
    }
}

/// Converts a region offset to a host index. Offsets beyond `usize` saturate, so the buffer
/// bounds check rejects them instead of wrapping.
fn host_offset(offset: u64) -> usize {
    usize::try_from(offset).unwrap_or(usize::MAX)
}
