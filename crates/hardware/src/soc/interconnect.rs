//! Physical address space.
//!
//! This module implements the flat address space that regions are mapped into. It provides:
//! 1. **Insertion:** Regions are added by range, rejected on a repeated name or an overlap, and kept
//!    sorted by base. Names are unique, so lookup by name is unambiguous.
//! 2. **Access routing:** Little-endian reads and writes are routed to the region that owns the address.
//! 3. **Privileged load:** Firmware is copied into a region regardless of its RAM/ROM kind.
//! 4. **Inspection:** The mapped regions can be listed in ascending address order.
//!
//! Insertion needs `&mut self`. Once a core is realized the space is shared behind an `Arc`
//! and only routed access remains possible.

use std::sync::Arc;

use crate::common::error::MapError;
use crate::soc::memory::MemoryRegion;

/// Set of disjoint memory regions keyed by address range.
#[derive(Debug, Default)]
pub struct AddressSpace {
    regions: Vec<Arc<MemoryRegion>>,
}

impl AddressSpace {
    /// Creates an empty address space.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a region at its base address.
    ///
    /// # Errors
    ///
    /// `DuplicateRegion` if a region with the same name is present, otherwise
    /// `OverlapViolation` if the region's range intersects one. The address space is left
    /// unchanged on either error.
    pub fn insert(&mut self, region: Arc<MemoryRegion>) -> Result<(), MapError> {
        if self.region(region.name()).is_some() {
            return Err(MapError::DuplicateRegion {
                region: region.name().to_string(),
            });
        }
        if let Some(existing) = self
            .regions
            .iter()
            .find(|r| r.overlaps(region.base(), region.end()))
        {
            return Err(MapError::OverlapViolation {
                region: region.name().to_string(),
                base: region.base(),
                end: region.end(),
                existing: existing.name().to_string(),
            });
        }
        self.regions.push(region);
        self.regions.sort_by_key(|r| r.base());
        Ok(())
    }

    /// Number of mapped regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Returns `true` if nothing is mapped.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Mapped regions in ascending base-address order.
    pub fn regions(&self) -> impl Iterator<Item = &Arc<MemoryRegion>> {
        self.regions.iter()
    }

    /// Looks up a region by name.
    pub fn region(&self, name: &str) -> Option<&Arc<MemoryRegion>> {
        self.regions.iter().find(|r| r.name() == name)
    }

    /// Returns the region containing `paddr` and the offset into it.
    pub fn find(&self, paddr: u64) -> Option<(&MemoryRegion, u64)> {
        let idx = self.regions.partition_point(|r| r.end() <= paddr);
        let region = self.regions.get(idx)?;
        region
            .contains(paddr)
            .then(|| (region.as_ref(), paddr - region.base()))
    }

    /// Returns whether `paddr` is backed by a region.
    pub fn is_valid_address(&self, paddr: u64) -> bool {
        self.find(paddr).is_some()
    }

    /// Returns the region and offset if all `len` bytes at `paddr` lie in one region.
    fn find_span(&self, paddr: u64, len: u64) -> Option<(&MemoryRegion, u64)> {
        let (region, offset) = self.find(paddr)?;
        let end = offset.checked_add(len)?;
        (end <= region.size()).then_some((region, offset))
    }

    /// Privileged load of `data` at `addr`; writes ROM as well as RAM.
    ///
    /// # Errors
    ///
    /// `OutOfRange` unless the whole range lies inside a single region.
    pub fn load_binary_at(&self, data: &[u8], addr: u64) -> Result<(), MapError> {
        let len = data.len() as u64;
        let (region, offset) = self
            .find_span(addr, len)
            .ok_or(MapError::OutOfRange { addr, len })?;
        region.load(data, offset)
    }

    /// Reads one byte; returns 0 if unmapped.
    pub fn read_u8(&self, paddr: u64) -> u8 {
        self.find_span(paddr, 1)
            .map_or(0, |(region, offset)| region.read_u8(offset))
    }

    /// Reads two bytes (little-endian); returns 0 if unmapped.
    pub fn read_u16(&self, paddr: u64) -> u16 {
        self.find_span(paddr, 2)
            .map_or(0, |(region, offset)| region.read_u16(offset))
    }

    /// Reads four bytes (little-endian); returns 0 if unmapped.
    pub fn read_u32(&self, paddr: u64) -> u32 {
        self.find_span(paddr, 4)
            .map_or(0, |(region, offset)| region.read_u32(offset))
    }

    /// Writes one byte; dropped if unmapped or read-only.
    pub fn write_u8(&self, paddr: u64, val: u8) {
        if let Some((region, offset)) = self.find_span(paddr, 1) {
            region.write_u8(offset, val);
        }
    }

    /// Writes two bytes (little-endian); dropped if unmapped or read-only.
    pub fn write_u16(&self, paddr: u64, val: u16) {
        if let Some((region, offset)) = self.find_span(paddr, 2) {
            region.write_u16(offset, val);
        }
    }

    /// Writes four bytes (little-endian); dropped if unmapped or read-only.
    pub fn write_u32(&self, paddr: u64, val: u32) {
        if let Some((region, offset)) = self.find_span(paddr, 4) {
            region.write_u32(offset, val);
        }
    }
}
