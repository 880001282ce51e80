use crate::descriptor::Dims;
use crate::format::{FormatTag, Scalar};

/// BufferView is a snapshot of the current state of a handle.
///
/// It does not own the memory it points to. The pointer is only valid
/// until the handle it's requested from is reassigned or dropped, so
/// owners must request a new view after each such mutation.
/// Strides are in bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferView {
    pub ptr: *mut u8,
    pub item_size: usize,
    /// None if the handle is not bound to any storage.
    pub format: Option<FormatTag>,
    pub ndim: usize,
    pub shape: Dims,
    pub strides: Dims,
    /// Total element count.
    pub size: usize,
}

impl Default for BufferView {
    #[inline]
    fn default() -> Self {
        BufferView {
            ptr: std::ptr::null_mut(),
            item_size: 0,
            format: None,
            ndim: 0,
            shape: Dims::new(),
            strides: Dims::new(),
            size: 0,
        }
    }
}

impl BufferView {
    /// Returns whether the view is bound to storage.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.ptr.is_null()
    }

    /// Returns typed start pointer.
    #[inline]
    pub fn cast_ptr<T: Scalar>(&self) -> *mut T {
        debug_assert!(self.is_null() || self.format == Some(T::FORMAT));
        self.ptr as *mut T
    }

    /// Returns whether elements are laid out in row-major order without gaps.
    /// Strides of dimensions with single element are ignored.
    pub fn is_contiguous(&self) -> bool {
        if self.size == 0 {
            return true;
        }
        let mut expected = self.item_size;
        for (&n, &stride) in self.shape.iter().zip(self.strides.iter()).rev() {
            if n != 1 && stride != expected {
                return false;
            }
            expected *= n;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn test_default_view() {
        let view = BufferView::default();
        assert!(view.is_null());
        assert_eq!(0, view.size);
        assert_eq!(None, view.format);
        assert!(view.is_contiguous());
    }

    #[test]
    fn test_view_contiguous() {
        let mut view = BufferView {
            ptr: std::ptr::null_mut(),
            item_size: 8,
            format: Some(FormatTag::F64),
            ndim: 2,
            shape: smallvec![2, 3],
            strides: smallvec![24, 8],
            size: 6,
        };
        assert!(view.is_contiguous());
        // column-major
        view.strides = smallvec![8, 16];
        assert!(!view.is_contiguous());
        // single row ignores row stride
        view.shape = smallvec![1, 3];
        view.strides = smallvec![0, 8];
        view.size = 3;
        assert!(view.is_contiguous());
    }
}
