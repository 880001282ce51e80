use numbind_buffer::{BufferDescriptor, BufferView, Error, Result, Scalar, WrappeeHandle};
use std::mem::align_of;

/// Allocate a row-major handle of given shape for element type T.
#[inline]
pub(crate) fn alloc_wrappee<T: Scalar, H: WrappeeHandle>(shape: &[usize]) -> Result<H> {
    let desc = BufferDescriptor::contiguous(T::FORMAT, shape);
    H::from_descriptor(&desc)
}

/// Check the view of an adopted handle can be read as a contiguous
/// row-major array of T with given dimension count.
/// Unbound views are always accepted.
pub(crate) fn check_view<T: Scalar>(view: BufferView, ndim: usize) -> Result<BufferView> {
    if view.is_null() {
        return Ok(view);
    }
    match view.format {
        Some(format) if format == T::FORMAT => (),
        Some(format) => {
            return Err(Error::FormatMismatch {
                expected: T::FORMAT,
                actual: format,
            })
        }
        None => return Err(Error::InvalidLayout("missing format".to_string())),
    }
    if view.ndim != ndim || view.shape.len() != ndim || view.strides.len() != ndim {
        return Err(Error::InvalidLayout(format!(
            "expected {} dimension(s), got shape {:?}",
            ndim, view.shape
        )));
    }
    if !view.is_contiguous() {
        return Err(Error::InvalidLayout(format!(
            "strides {:?} of shape {:?} are not row-major contiguous",
            view.strides, view.shape
        )));
    }
    if view.ptr as usize % align_of::<T>() != 0 {
        return Err(Error::InvalidLayout(format!(
            "pointer {:p} is not aligned to {}",
            view.ptr,
            align_of::<T>()
        )));
    }
    Ok(view)
}
