//! Machine construction errors.
//!
//! Every step of building the machine reports its own error type. It provides:
//! 1. **Clock errors:** Ownership violations on the SoC clock ports.
//! 2. **Map errors:** Backing storage and address-range failures while composing the map.
//! 3. **Realize errors:** Core configurations the processor model cannot accept.
//! 4. **SoC and boot errors:** Lifecycle misuse and firmware loading, wrapping the above.
//!
//! None of these are recoverable. Each is returned once to the immediate caller and
//! halts the remaining construction steps.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::soc::builder::SocState;

/// Clock-tree validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockError {
    /// An internally derived clock was connected by the caller before realization.
    #[error("{clock} clock must not be wired up by the board code")]
    ExternallyDrivenInternalClock {
        /// Name of the offending clock port.
        clock: String,
    },
    /// A clock that must be supplied externally has no source or frequency.
    #[error("{clock} clock must be wired up by the board code")]
    MissingRequiredSource {
        /// Name of the unconnected clock port.
        clock: String,
    },
}

/// Failures while allocating regions and inserting them into an address space.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    /// Backing storage for a region could not be obtained.
    #[error("failed to allocate {size:#x} bytes of backing storage for region '{region}'")]
    AllocationFailure {
        /// Region name.
        region: String,
        /// Requested size in bytes.
        size: u64,
    },
    /// A region's range intersects a region already in the address space.
    #[error("region '{region}' [{base:#010x}, {end:#010x}) overlaps region '{existing}'")]
    OverlapViolation {
        /// Region being inserted.
        region: String,
        /// Inclusive start of the rejected range.
        base: u64,
        /// Exclusive end of the rejected range.
        end: u64,
        /// Region already occupying part of the range.
        existing: String,
    },
    /// A region with the same name is already in the address space.
    #[error("region name '{region}' is already mapped")]
    DuplicateRegion {
        /// Repeated region name.
        region: String,
    },
    /// A region was declared with zero size.
    #[error("region '{region}' has zero size")]
    EmptyRegion {
        /// Region name.
        region: String,
    },
    /// `base + size` does not fit in the 64-bit address space.
    #[error("region '{region}' at {base:#x} with size {size:#x} overflows the address space")]
    AddressOverflow {
        /// Region name.
        region: String,
        /// Requested base address.
        base: u64,
        /// Requested size in bytes.
        size: u64,
    },
    /// The address space is already referenced by a realized core and can no longer be mutated.
    #[error("address space is shared and can no longer be modified")]
    AddressSpaceShared,
    /// A privileged load does not fit inside a single mapped region.
    #[error("load of {len:#x} bytes at {addr:#010x} is not contained in a mapped region")]
    OutOfRange {
        /// Target address of the load.
        addr: u64,
        /// Length of the data in bytes.
        len: u64,
    },
}

/// Failures while configuring and realizing the processor core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RealizeError {
    /// The requested `cpu-type` is not an M-profile core this model implements.
    #[error("unsupported cpu-type '{0}'")]
    UnsupportedCpuType(String),
    /// More interrupt lines were requested than the NVIC supports.
    #[error("num-irq {requested} exceeds the NVIC limit of {max}")]
    TooManyIrqs {
        /// Requested line count.
        requested: u32,
        /// Maximum supported line count.
        max: u32,
    },
    /// The vector table base does not meet VTOR alignment.
    #[error("init-vector-table-base {0:#010x} is not 128-byte aligned")]
    MisalignedVectorTable(u64),
    /// The vector table base is not backed by any mapped region.
    #[error("init-vector-table-base {0:#010x} is not inside a mapped region")]
    UnmappedVectorTable(u64),
}

/// Failures of the SoC device as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SocError {
    /// Clock validation failed before anything was mapped.
    #[error(transparent)]
    Clock(#[from] ClockError),
    /// Region composition failed.
    #[error(transparent)]
    Map(#[from] MapError),
    /// The processor core could not be realized.
    #[error(transparent)]
    Realize(#[from] RealizeError),
    /// The operation is only legal in another lifecycle state.
    #[error("SoC is {actual:?}, operation requires {expected:?}")]
    InvalidState {
        /// State the operation requires.
        expected: SocState,
        /// State the SoC is in.
        actual: SocState,
    },
}

/// Failures of the top-level machine bootstrap.
#[derive(Debug, Error)]
pub enum BootError {
    /// SoC realization failed.
    #[error("SoC realization failed: {0}")]
    Soc(#[from] SocError),
    /// The firmware image could not be read.
    #[error("could not read firmware image '{}': {source}", .path.display())]
    ImageRead {
        /// Path of the image.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The firmware image does not fit in the boot region.
    #[error("firmware image is {size} bytes, boot region holds {limit}")]
    ImageTooLarge {
        /// Image size in bytes.
        size: u64,
        /// Boot region size in bytes.
        limit: u64,
    },
    /// The region table has no region with the configured boot name.
    #[error("no boot region named '{0}' in the region table")]
    MissingBootRegion(String),
    /// Writing the image into the boot region failed.
    #[error("firmware load failed: {0}")]
    Load(#[from] MapError),
}
