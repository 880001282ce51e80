use crate::alloc::{AllocOpts, RawArray};
use crate::descriptor::{BufferDescriptor, Dims};
use crate::error::Result;
use crate::format::FormatTag;
use crate::handle::WrappeeHandle;
use crate::view::BufferView;
use std::ptr::NonNull;
use std::rc::Rc;

/// SharedArray is a reference counted handle of a strided buffer.
///
/// The count is not atomic, so the handle is neither `Send` nor `Sync`.
/// Writes through the buffer pointer are visible to all clones.
/// Borrowed memory is treated as exclusively lent to the handle and its
/// clones, see [`BufferDescriptor::from_raw_parts`].
#[derive(Debug, Clone, Default)]
pub struct SharedArray {
    inner: Option<Rc<ArrayData>>,
}

#[derive(Debug)]
struct ArrayData {
    storage: Storage,
    format: FormatTag,
    shape: Dims,
    strides: Dims,
}

#[derive(Debug)]
enum Storage {
    /// Memory allocated and released by the array.
    Owned(RawArray),
    /// Memory owned by someone else.
    Borrowed(NonNull<u8>),
}

impl Storage {
    #[inline]
    fn as_ptr(&self) -> *mut u8 {
        match self {
            Storage::Owned(inner) => inner.as_ptr(),
            Storage::Borrowed(ptr) => ptr.as_ptr(),
        }
    }
}

impl SharedArray {
    /// Create a new array with given allocation options.
    pub fn with_opts(desc: &BufferDescriptor, opts: &AllocOpts) -> Result<Self> {
        let bytes = desc.validate()?;
        let storage = match desc.ptr() {
            Some(ptr) => Storage::Borrowed(ptr),
            None => Storage::Owned(opts.allocate(bytes)?),
        };
        let data = ArrayData {
            storage,
            format: desc.format(),
            shape: Dims::from_slice(desc.shape()),
            strides: Dims::from_slice(desc.strides()),
        };
        Ok(SharedArray {
            inner: Some(Rc::new(data)),
        })
    }

    /// Returns whether the handle is bound to no storage.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_none()
    }

    /// Returns number of handles sharing the storage.
    #[inline]
    pub fn ref_count(&self) -> usize {
        self.inner.as_ref().map(Rc::strong_count).unwrap_or(0)
    }

    /// Returns whether two handles are clones of each other.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.inner, &other.inner) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Returns whether the storage is allocated by this array.
    #[inline]
    pub fn is_owned(&self) -> bool {
        matches!(
            self.inner.as_deref(),
            Some(ArrayData {
                storage: Storage::Owned(_),
                ..
            })
        )
    }

    #[inline]
    pub fn format(&self) -> Option<FormatTag> {
        self.inner.as_ref().map(|data| data.format)
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.inner
            .as_ref()
            .map(|data| &data.shape[..])
            .unwrap_or(&[])
    }
}

// # SAFETY
//
// Owned storage lives as long as the last clone. Borrowed storage is valid
// by contract of BufferDescriptor::from_raw_parts. Shape and strides are
// checked against the storage by BufferDescriptor::validate.
unsafe impl WrappeeHandle for SharedArray {
    #[inline]
    fn from_descriptor(desc: &BufferDescriptor) -> Result<Self> {
        Self::with_opts(desc, &AllocOpts::default())
    }

    #[inline]
    fn request(&self) -> BufferView {
        match &self.inner {
            None => BufferView::default(),
            Some(data) => BufferView {
                ptr: data.storage.as_ptr(),
                item_size: data.format.item_size(),
                format: Some(data.format),
                ndim: data.shape.len(),
                shape: data.shape.clone(),
                strides: data.strides.clone(),
                size: data.shape.iter().product(),
            },
        }
    }

    #[inline]
    fn is_unique(&self) -> bool {
        self.inner
            .as_ref()
            .map(|data| Rc::strong_count(data) == 1)
            .unwrap_or(true)
    }
}
