use crate::error::{Error, Result};
use crate::format::FormatTag;
use smallvec::SmallVec;
use std::ptr::NonNull;

/// Shape or strides of a buffer.
/// Arrays with more than four dimensions spill to heap.
pub type Dims = SmallVec<[usize; 4]>;

/// Maximum dimension count a buffer can have.
pub const MAX_NDIM: usize = 32;

/// BufferDescriptor describes the memory layout of a buffer to create.
///
/// If the pointer is absent, a new storage with given format and shape
/// is allocated. Otherwise the descriptor is a view of external memory,
/// which is not owned by handles created from it.
/// Strides are in bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferDescriptor {
    ptr: Option<NonNull<u8>>,
    item_size: usize,
    format: FormatTag,
    ndim: usize,
    shape: Dims,
    strides: Dims,
}

impl BufferDescriptor {
    /// Describe a new storage to allocate.
    #[inline]
    pub fn alloc(format: FormatTag, shape: &[usize], strides: &[usize]) -> Self {
        BufferDescriptor {
            ptr: None,
            item_size: format.item_size(),
            format,
            ndim: shape.len(),
            shape: Dims::from_slice(shape),
            strides: Dims::from_slice(strides),
        }
    }

    /// Describe a new row-major storage to allocate.
    #[inline]
    pub fn contiguous(format: FormatTag, shape: &[usize]) -> Self {
        let strides = contiguous_strides(format.item_size(), shape);
        Self::alloc(format, shape, &strides)
    }

    /// Describe external memory.
    ///
    /// # Safety
    ///
    /// Caller must guarantee the memory area covered by the shape and
    /// strides is valid for reads and writes, outlives every handle
    /// created from this descriptor, and is not accessed other than through
    /// these handles while any of them lives.
    #[inline]
    pub unsafe fn from_raw_parts(
        ptr: NonNull<u8>,
        format: FormatTag,
        shape: &[usize],
        strides: &[usize],
    ) -> Self {
        let mut desc = Self::alloc(format, shape, strides);
        desc.ptr = Some(ptr);
        desc
    }

    #[inline]
    pub fn ptr(&self) -> Option<NonNull<u8>> {
        self.ptr
    }

    #[inline]
    pub fn item_size(&self) -> usize {
        self.item_size
    }

    #[inline]
    pub fn format(&self) -> FormatTag {
        self.format
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.ndim
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Returns total element count.
    #[inline]
    pub fn size(&self) -> usize {
        self.shape.iter().product()
    }

    /// Validate the descriptor and returns bytes spanned by the buffer.
    pub fn validate(&self) -> Result<usize> {
        if self.ndim > MAX_NDIM {
            return Err(Error::InvalidShape(format!(
                "dimension count {} exceeds {}",
                self.ndim, MAX_NDIM
            )));
        }
        if self.shape.len() != self.ndim || self.strides.len() != self.ndim {
            return Err(Error::InvalidShape(format!(
                "ndim {} with shape {:?} and strides {:?}",
                self.ndim, self.shape, self.strides
            )));
        }
        if self.item_size != self.format.item_size() {
            return Err(Error::InvalidShape(format!(
                "item size {} of format {}",
                self.item_size, self.format
            )));
        }
        if let Some(ptr) = self.ptr {
            if ptr.as_ptr() as usize % self.item_size != 0 {
                return Err(Error::InvalidArgument(format!(
                    "pointer {:p} is not aligned to {}",
                    ptr, self.item_size
                )));
            }
        }
        self.span_bytes().ok_or_else(|| {
            Error::InvalidShape(format!(
                "shape {:?} with strides {:?} overflows",
                self.shape, self.strides
            ))
        })
    }

    /// Bytes from the start address to the end of the last element.
    fn span_bytes(&self) -> Option<usize> {
        let mut elems = 1usize;
        let mut last = 0usize;
        for (&n, &stride) in self.shape.iter().zip(self.strides.iter()) {
            elems = elems.checked_mul(n)?;
            if n > 0 {
                last = last.checked_add((n - 1).checked_mul(stride)?)?;
            }
        }
        if elems == 0 {
            return Some(0);
        }
        // byte length must be addressable
        let bytes = last.checked_add(self.item_size)?;
        if bytes > isize::MAX as usize {
            return None;
        }
        Some(bytes)
    }
}

/// Returns row-major strides in bytes of given shape.
#[inline]
pub fn contiguous_strides(item_size: usize, shape: &[usize]) -> Dims {
    let mut strides: Dims = smallvec::smallvec![0; shape.len()];
    let mut stride = item_size;
    for (s, &n) in strides.iter_mut().zip(shape.iter()).rev() {
        *s = stride;
        stride = stride.saturating_mul(n);
    }
    strides
}
