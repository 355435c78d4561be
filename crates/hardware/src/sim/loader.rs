//! Firmware image loading.
//!
//! This module provides:
//! 1. **Image reading:** Reads a raw firmware binary from disk in one piece.
//! 2. **Boot-region load:** Copies the image verbatim to the start of the boot region,
//!    rejecting images larger than the region instead of truncating them.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::common::error::BootError;
use crate::soc::interconnect::AddressSpace;

/// Reads a firmware image from disk.
///
/// # Errors
///
/// `ImageRead` if the file cannot be read.
pub fn load_binary(path: &Path) -> Result<Vec<u8>, BootError> {
    fs::read(path).map_err(|source| BootError::ImageRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Copies `image` into the region named `boot_region`, starting at its base address.
///
/// Returns the load address. The region is left untouched when the image is rejected.
///
/// # Errors
///
/// `MissingBootRegion` if no such region is mapped, `ImageTooLarge` if the image exceeds
/// the region size.
pub fn load_firmware(
    address_space: &AddressSpace,
    boot_region: &str,
    image: &[u8],
) -> Result<u64, BootError> {
    let region = address_space
        .region(boot_region)
        .ok_or_else(|| BootError::MissingBootRegion(boot_region.to_string()))?;

    let size = image.len() as u64;
    if size > region.size() {
        return Err(BootError::ImageTooLarge {
            size,
            limit: region.size(),
        });
    }

    let addr = region.base();
    address_space.load_binary_at(image, addr)?;
    info!(
        region = boot_region,
        addr = %format!("{addr:#010x}"),
        bytes = size,
        "loaded firmware"
    );
    Ok(addr)
}
