use crate::layout::{alloc_wrappee, check_view};
use numbind_buffer::{BufferView, Error, Result, Scalar, SharedArray, WrappeeHandle};
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// Array2D is a row-major matrix of scalars stored in a foreign buffer.
///
/// Element `(i, j)` is located at offset `i * ncol + j`.
/// Handle management and aliasing follow [`Array1D`](crate::Array1D):
/// safe writes need storage no other handle refers to.
/// The matrix does not support iteration.
pub struct Array2D<T: Scalar, H: WrappeeHandle = SharedArray> {
    wrappee: H,
    view: BufferView,
    _marker: PhantomData<T>,
}

impl<T: Scalar, H: WrappeeHandle> Array2D<T, H> {
    #[inline]
    pub fn new() -> Self {
        Array2D {
            wrappee: H::default(),
            view: BufferView::default(),
            _marker: PhantomData,
        }
    }

    /// Create a matrix with storage of given shape.
    /// Contents are left as the handle allocates them.
    #[inline]
    pub fn with_shape(nrow: usize, ncol: usize) -> Result<Self> {
        let wrappee = alloc_wrappee::<T, H>(&[nrow, ncol])?;
        Ok(Self::bind(wrappee))
    }

    #[inline]
    pub fn from_elem(nrow: usize, ncol: usize, value: T) -> Result<Self> {
        let mut arr = Self::with_shape(nrow, ncol)?;
        arr.fill(value)?;
        Ok(arr)
    }

    /// Adopt an existing handle.
    /// The handle must be unbound, or two-dimensional and row-major
    /// contiguous with element type T.
    #[inline]
    pub fn from_wrappee(wrappee: H) -> Result<Self> {
        let view = check_view::<T>(wrappee.request(), 2)?;
        Ok(Array2D {
            wrappee,
            view,
            _marker: PhantomData,
        })
    }

    /// Replace the handle with given one.
    /// On failure the matrix is unchanged.
    #[inline]
    pub fn assign_wrappee(&mut self, wrappee: H) -> Result<()> {
        self.view = check_view::<T>(wrappee.request(), 2)?;
        self.wrappee = wrappee;
        log::trace!(
            "2-D array adopted handle of shape {}x{}",
            self.nrow(),
            self.ncol()
        );
        Ok(())
    }

    #[inline]
    pub fn assign_wrappee_ref(&mut self, wrappee: &H) -> Result<()> {
        self.assign_wrappee(wrappee.clone())
    }

    #[inline]
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    #[inline]
    pub fn wrappee(&self) -> &H {
        &self.wrappee
    }

    #[inline]
    pub fn to_wrappee(&self) -> H {
        self.wrappee.clone()
    }

    #[inline]
    pub fn into_wrappee(self) -> H {
        self.wrappee
    }

    #[inline]
    pub fn view(&self) -> &BufferView {
        &self.view
    }

    #[inline]
    pub fn is_bound(&self) -> bool {
        !self.view.is_null()
    }

    #[inline]
    pub fn nrow(&self) -> usize {
        self.view.shape.first().copied().unwrap_or(0)
    }

    #[inline]
    pub fn ncol(&self) -> usize {
        self.view.shape.get(1).copied().unwrap_or(0)
    }

    /// Returns `(nrow, ncol)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.nrow(), self.ncol())
    }

    /// Returns total element count.
    #[inline]
    pub fn len(&self) -> usize {
        self.view.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns whether no other handle refers to the storage.
    #[inline]
    pub fn is_unique(&self) -> bool {
        self.wrappee.is_unique()
    }

    /// Reallocate storage if either dimension changes.
    ///
    /// All contents are discarded on reallocation, because rows shift
    /// when column count changes. Same shape is a no-op.
    pub fn resize(&mut self, nrow: usize, ncol: usize) -> Result<()> {
        if (nrow, ncol) == self.shape() {
            return Ok(());
        }
        let wrappee = alloc_wrappee::<T, H>(&[nrow, ncol])?;
        log::debug!(
            "reallocate 2-D array of {} from {}x{} to {}x{}",
            T::FORMAT,
            self.nrow(),
            self.ncol(),
            nrow,
            ncol
        );
        self.wrappee = wrappee;
        self.refresh();
        Ok(())
    }

    /// Resize and set every element to value.
    /// Fails with [`Error::SharedStorage`] if the shape is unchanged and
    /// the storage is shared.
    #[inline]
    pub fn resize_fill(&mut self, nrow: usize, ncol: usize, value: T) -> Result<()> {
        self.resize(nrow, ncol)?;
        self.fill(value)
    }

    #[inline]
    pub fn fill(&mut self, value: T) -> Result<()> {
        self.flat_mut()?.fill(value);
        Ok(())
    }

    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.view.cast_ptr::<T>()
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.view.cast_ptr::<T>()
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<&T> {
        if i < self.nrow() && j < self.ncol() {
            // # SAFETY
            //
            // Both indexes are checked.
            Some(unsafe { self.get_unchecked(i, j) })
        } else {
            None
        }
    }

    /// Returns None if either index is out of bound or the storage is shared.
    #[inline]
    pub fn get_mut(&mut self, i: usize, j: usize) -> Option<&mut T> {
        if i < self.nrow() && j < self.ncol() && self.is_unique() {
            // # SAFETY
            //
            // Both indexes are checked, and no other handle can reach
            // the storage.
            Some(unsafe { self.get_unchecked_mut(i, j) })
        } else {
            None
        }
    }

    /// # Safety
    ///
    /// Requires `i < nrow` and `j < ncol`.
    #[inline]
    pub unsafe fn get_unchecked(&self, i: usize, j: usize) -> &T {
        debug_assert!(i < self.nrow() && j < self.ncol());
        &*self.as_ptr().add(i * self.ncol() + j)
    }

    /// # Safety
    ///
    /// Requires `i < nrow` and `j < ncol`. No other reference to the
    /// element, including one obtained from a clone, may be used while
    /// the returned one is alive.
    #[inline]
    pub unsafe fn get_unchecked_mut(&mut self, i: usize, j: usize) -> &mut T {
        debug_assert!(i < self.nrow() && j < self.ncol());
        let offset = i * self.ncol() + j;
        &mut *self.as_mut_ptr().add(offset)
    }

    #[inline]
    fn flat(&self) -> &[T] {
        if self.view.is_null() {
            return &[];
        }
        // # SAFETY
        //
        // View is refreshed after each handle change, and the handle keeps
        // the storage alive as long as self.
        unsafe { std::slice::from_raw_parts(self.as_ptr(), self.len()) }
    }

    #[inline]
    fn flat_mut(&mut self) -> Result<&mut [T]> {
        if !self.wrappee.is_unique() {
            return Err(Error::SharedStorage);
        }
        if self.view.is_null() {
            return Ok(&mut []);
        }
        // # SAFETY
        //
        // Same as flat(). No other handle can reach the storage.
        Ok(unsafe { std::slice::from_raw_parts_mut(self.as_mut_ptr(), self.len()) })
    }

    #[inline]
    fn bind(wrappee: H) -> Self {
        let mut arr = Array2D {
            wrappee,
            view: BufferView::default(),
            _marker: PhantomData,
        };
        arr.refresh();
        arr
    }

    #[inline]
    fn refresh(&mut self) {
        self.view = self.wrappee.request();
        log::trace!(
            "refresh view of 2-D array: shape {}x{}",
            self.nrow(),
            self.ncol()
        );
    }
}

impl<T: Scalar, H: WrappeeHandle> Default for Array2D<T, H> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar, H: WrappeeHandle> Clone for Array2D<T, H> {
    /// The clone shares storage with self.
    #[inline]
    fn clone(&self) -> Self {
        Self::bind(self.wrappee.clone())
    }

    #[inline]
    fn clone_from(&mut self, source: &Self) {
        self.wrappee = source.wrappee.clone();
        self.refresh();
    }
}

impl<T: Scalar, H: WrappeeHandle> Index<(usize, usize)> for Array2D<T, H> {
    type Output = T;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &T {
        match self.get(i, j) {
            Some(v) => v,
            None => panic!(
                "index ({}, {}) out of bound of shape {}x{}",
                i,
                j,
                self.nrow(),
                self.ncol()
            ),
        }
    }
}

impl<T: Scalar, H: WrappeeHandle> IndexMut<(usize, usize)> for Array2D<T, H> {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        let (nrow, ncol) = self.shape();
        if !self.is_unique() {
            panic!("index ({}, {}) of 2-D array with shared storage", i, j);
        }
        match self.get_mut(i, j) {
            Some(v) => v,
            None => panic!(
                "index ({}, {}) out of bound of shape {}x{}",
                i, j, nrow, ncol
            ),
        }
    }
}

impl<T: Scalar, H: WrappeeHandle> PartialEq for Array2D<T, H> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape() && self.flat() == other.flat()
    }
}

impl<T: Scalar, H: WrappeeHandle> fmt::Debug for Array2D<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("[]");
        }
        f.debug_list()
            .entries(self.flat().chunks_exact(self.ncol()))
            .finish()
    }
}
