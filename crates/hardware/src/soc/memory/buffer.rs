//! Region Backing Storage.
//!
//! This module provides a wrapper around raw host memory used as the contents of one
//! emulated memory region. On Unix systems it uses an anonymous `mmap`, so pages are only
//! committed by the host when first touched and start out zeroed. Allocation failure is
//! reported to the caller instead of aborting, since the region composer treats it as a
//! construction error.
//!
//! The buffer has interior mutability: the address space holds shared references to its
//! regions and writes through `&self`. Construction is single-threaded and nothing writes
//! to a buffer concurrently.

use std::slice;

/// A zero-initialized, fixed-size block of host memory.
#[derive(Debug)]
pub struct RegionBuffer {
    ptr: *mut u8,
    size: usize,
}

// SAFETY: the buffer owns its allocation exclusively; the raw pointer is never handed out
// beyond the borrow of `&self`, and machine construction never accesses it from two threads.
unsafe impl Send for RegionBuffer {}
// SAFETY: see the `Send` impl above.
unsafe impl Sync for RegionBuffer {}

impl RegionBuffer {
    /// Allocates a zeroed buffer of `size` bytes.
    ///
    /// Returns `None` if the host refuses the allocation or `size` is zero.
    pub fn try_new(size: usize) -> Option<Self> {
        if size == 0 {
            return None;
        }

        #[cfg(unix)]
        {
            // SAFETY: anonymous private mapping with no fixed address; the result is
            // checked against MAP_FAILED before use.
            let ptr = unsafe {
                libc::mmap(
                    std::ptr::null_mut(),
                    size,
                    libc::PROT_READ | libc::PROT_WRITE,
                    libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                    -1,
                    0,
                )
            };
            if ptr == libc::MAP_FAILED {
                return None;
            }
            Some(Self {
                ptr: ptr.cast::<u8>(),
                size,
            })
        }

        #[cfg(not(unix))]
        {
            let mut vec: Vec<u8> = Vec::new();
            vec.try_reserve_exact(size).ok()?;
            vec.resize(size, 0);
            let mut boxed = vec.into_boxed_slice();
            let ptr = boxed.as_mut_ptr();
            std::mem::forget(boxed);
            Some(Self { ptr, size })
        }
    }

    /// Returns the size of the buffer in bytes.
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Always `false`; empty buffers cannot be constructed.
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Reads a single byte.
    ///
    /// # Panics
    ///
    /// Panics if `offset` is past the end of the buffer.
    pub fn read_u8(&self, offset: usize) -> u8 {
        assert!(offset < self.size, "region read out of bounds");
        // SAFETY: offset checked against the allocation size above.
        unsafe { *self.ptr.add(offset) }
    }

    /// Writes a single byte.
    ///
    /// # Panics
    ///
    /// Panics if `offset` is past the end of the buffer.
    pub fn write_u8(&self, offset: usize, val: u8) {
        assert!(offset < self.size, "region write out of bounds");
        // SAFETY: offset checked against the allocation size above.
        unsafe {
            *self.ptr.add(offset) = val;
        }
    }

    /// Borrows `len` bytes starting at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if the range extends past the end of the buffer.
    pub fn read_slice(&self, offset: usize, len: usize) -> &[u8] {
        assert!(
            offset.checked_add(len).is_some_and(|end| end <= self.size),
            "region read out of bounds"
        );
        // SAFETY: range checked against the allocation size above.
        unsafe { slice::from_raw_parts(self.ptr.add(offset), len) }
    }

    /// Copies `data` into the buffer at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if the range extends past the end of the buffer.
    pub fn write_slice(&self, offset: usize, data: &[u8]) {
        assert!(
            offset
                .checked_add(data.len())
                .is_some_and(|end| end <= self.size),
            "region write out of bounds"
        );
        // SAFETY: range checked against the allocation size above; `data` is a distinct
        // host allocation so the two ranges cannot overlap.
        unsafe {
            std::ptr::copy_nonoverlapping(data.as_ptr(), self.ptr.add(offset), data.len());
        }
    }
}

impl Drop for RegionBuffer {
    fn drop(&mut self) {
        #[cfg(unix)]
        // SAFETY: `ptr`/`size` describe exactly the mapping created in `try_new`.
        unsafe {
            let _ = libc::munmap(self.ptr.cast::<libc::c_void>(), self.size);
        }

        #[cfg(not(unix))]
        // SAFETY: reconstructs the boxed slice leaked in `try_new`.
        unsafe {
            drop(Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                self.ptr, self.size,
            )));
        }
    }
}
