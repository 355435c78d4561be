//! Region table composition.
//!
//! Walks a `RegionSpec` table in order, allocating each region and inserting it into the
//! address space. The first failure stops the walk; regions inserted before it stay mapped.

use std::sync::Arc;

use tracing::debug;

use super::{MemoryRegion, RegionSpec};
use crate::common::error::MapError;
use crate::soc::interconnect::AddressSpace;

/// Allocates and maps every region in `specs`, in table order.
///
/// Returns the created regions in the same order as `specs`.
///
/// # Errors
///
/// Propagates the first `MapError` from allocation or insertion.
pub fn map_all(
    address_space: &mut AddressSpace,
    specs: &[RegionSpec],
) -> Result<Vec<Arc<MemoryRegion>>, MapError> {
    let mut mapped = Vec::with_capacity(specs.len());
    for spec in specs {
        let region = Arc::new(MemoryRegion::allocate(spec)?);
        address_space.insert(Arc::clone(&region))?;
        debug!(
            region = spec.name.as_str(),
            base = %format!("{:#010x}", spec.base),
            size = spec.size,
            kind = ?spec.kind,
            "mapped region"
        );
        mapped.push(region);
    }
    Ok(mapped)
}
