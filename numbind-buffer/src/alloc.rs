use crate::error::{Error, Result};
use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::ptr::NonNull;

/// All memory allocations are aligned to at least 16 bytes.
pub const MIN_ALIGN: usize = 16;

/// Round up value to multiple of given alignment.
/// Returns None on overflow.
#[inline]
pub fn align_up(v: usize, align: usize) -> Option<usize> {
    debug_assert!(align.is_power_of_two());
    v.checked_add(align - 1).map(|v| v & !(align - 1))
}

/// This method allocates zeroed memory area with given alignment.
/// The unit of input capacity is byte.
/// If it's not multiple of alignment, it will be rounded up to.
///
/// The memory is leaked, and raw pointer is returned.
/// Caller should always call free_aligned to release the memory.
#[inline]
pub(crate) fn alloc_aligned(cap: usize, align: usize) -> Result<(NonNull<u8>, usize)> {
    let cap = align_up(usize::max(align, cap), align).ok_or(Error::InsufficientMemory(cap))?;
    let layout = Layout::from_size_align(cap, align).map_err(|_| Error::InsufficientMemory(cap))?;
    // # SAFETY
    //
    // Layout always has non-zero size.
    let ptr = unsafe { alloc_zeroed(layout) };
    NonNull::new(ptr)
        .map(|ptr| (ptr, cap))
        .ok_or(Error::InsufficientMemory(cap))
}

/// Release memory allocated by [`alloc_aligned`].
///
/// # Safety
///
/// Caller must guarantee the input pointer, size and alignment are identical
/// to the values used and returned by `alloc_aligned`, and only call this
/// method once. After this call, the memory must not be used.
#[inline]
pub(crate) unsafe fn free_aligned(ptr: NonNull<u8>, cap: usize, align: usize) {
    debug_assert!(cap % align == 0);
    dealloc(ptr.as_ptr(), Layout::from_size_align_unchecked(cap, align))
}

/// RawArray is a safe abstraction of an aligned, zero initialized byte array.
/// It never reallocates, so the address stays stable until it's dropped.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct RawArray {
    ptr: NonNull<u8>,
    cap_u8: usize,
    align: usize,
}

impl Drop for RawArray {
    #[inline]
    fn drop(&mut self) {
        // # SAFETY
        //
        // The pointer, capacity and alignment are guaranteed to be always valid.
        unsafe { free_aligned(self.ptr, self.cap_u8, self.align) }
    }
}

impl RawArray {
    /// Create a new raw array with given capacity and alignment.
    /// Note: capacity is always aligned to multiple of the alignment.
    #[inline]
    pub fn with_capacity(cap_u8: usize, align: usize) -> Result<Self> {
        let (ptr, cap_u8) = alloc_aligned(cap_u8, align)?;
        Ok(RawArray { ptr, cap_u8, align })
    }

    /// Returns byte capacity.
    #[inline]
    pub fn cap_u8(&self) -> usize {
        self.cap_u8
    }

    #[inline]
    pub fn align(&self) -> usize {
        self.align
    }

    /// Returns the start address.
    /// Writing through the pointer does not require exclusive borrow of
    /// the array, as the array never hands out references itself except
    /// via `as_slice`.
    #[inline]
    pub fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// Returns immutable byte slice.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        // # SAFETY
        //
        // RawArray is not allowed to realloc, so capacity is always valid.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr() as *const u8, self.cap_u8) }
    }
}

/// Options of buffer allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocOpts {
    align: usize,
    max_bytes: Option<usize>,
}

impl Default for AllocOpts {
    #[inline]
    fn default() -> Self {
        AllocOpts {
            align: MIN_ALIGN,
            max_bytes: None,
        }
    }
}

impl AllocOpts {
    /// Set alignment of allocated storage.
    /// It must be power of two and no less than [`MIN_ALIGN`].
    #[inline]
    pub fn alignment(mut self, align: usize) -> Self {
        self.align = align;
        self
    }

    /// Set upper bound of bytes a single allocation can request.
    #[inline]
    pub fn max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }

    /// Remove the allocation limit.
    #[inline]
    pub fn unlimited(mut self) -> Self {
        self.max_bytes = None;
        self
    }

    #[inline]
    pub fn align(&self) -> usize {
        self.align
    }

    #[inline]
    pub fn limit(&self) -> Option<usize> {
        self.max_bytes
    }

    #[inline]
    pub fn validate(&self) -> Result<()> {
        if !self.align.is_power_of_two() || self.align < MIN_ALIGN {
            return Err(Error::InvalidArgument(format!(
                "alignment {} is not a power of two no less than {}",
                self.align, MIN_ALIGN
            )));
        }
        Ok(())
    }

    /// Allocate zeroed storage of given bytes.
    pub fn allocate(&self, bytes: usize) -> Result<RawArray> {
        self.validate()?;
        if let Some(limit) = self.max_bytes {
            if bytes > limit {
                log::warn!("allocation of {} bytes exceeds limit {}", bytes, limit);
                return Err(Error::InsufficientMemory(bytes));
            }
        }
        let arr = RawArray::with_capacity(bytes, self.align)?;
        log::debug!(
            "allocated {} bytes aligned to {} for {} requested",
            arr.cap_u8(),
            arr.align(),
            bytes
        );
        Ok(arr)
    }
}
