use crate::cursor::RandomAccessCursor;
use crate::iter::{Cursor, CursorMut, Iter, IterMut, RangeIter};
use crate::layout::{alloc_wrappee, check_view};
use numbind_buffer::{BufferView, Error, Result, Scalar, SharedArray, WrappeeHandle};
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// Array1D is a contiguous sequence of scalars stored in a foreign buffer.
///
/// The array owns one handle and caches the view of it. Every operation
/// replacing the handle (construction, resize, assignment) requests a new
/// view, and takes `&mut self`, so slices, references and cursors obtained
/// before cannot be used afterwards.
///
/// # Aliasing
///
/// Clones share storage with the original at the same address. Safe
/// writes (`IndexMut`, `get_mut`, `as_mut_slice`, `iter_mut`, `fill`)
/// need storage no other handle refers to. While it is shared they return
/// `None` or [`Error::SharedStorage`], or panic for `IndexMut` and
/// `iter_mut`. Writes through mutable cursors or `get_unchecked_mut` are
/// observed by every clone.
///
/// # Indexing
///
/// `Index` and `get` are bounds checked. The zero-overhead unchecked path
/// is available as `get_unchecked` and cursors.
pub struct Array1D<T: Scalar, H: WrappeeHandle = SharedArray> {
    wrappee: H,
    view: BufferView,
    _marker: PhantomData<T>,
}

impl<T: Scalar, H: WrappeeHandle> Array1D<T, H> {
    /// Create an empty array without storage.
    #[inline]
    pub fn new() -> Self {
        Array1D {
            wrappee: H::default(),
            view: BufferView::default(),
            _marker: PhantomData,
        }
    }

    /// Create an array with storage of given length.
    /// Contents are left as the handle allocates them.
    #[inline]
    pub fn with_len(len: usize) -> Result<Self> {
        let wrappee = alloc_wrappee::<T, H>(&[len])?;
        Ok(Self::bind(wrappee))
    }

    /// Create an array of given length with every element set to value.
    #[inline]
    pub fn from_elem(len: usize, value: T) -> Result<Self> {
        let mut arr = Self::with_len(len)?;
        arr.fill(value)?;
        Ok(arr)
    }

    /// Create an array holding all values of the iterator in order.
    pub fn from_exact_iter<I>(iter: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        let iter = iter.into_iter();
        let len = iter.len();
        let mut arr = Self::with_len(len)?;
        let mut written = 0;
        for (dst, v) in arr.try_mut_slice()?.iter_mut().zip(iter) {
            *dst = v;
            written += 1;
        }
        debug_assert_eq!(len, written, "iterator yields fewer items than its length");
        Ok(arr)
    }

    #[inline]
    pub fn from_slice(src: &[T]) -> Result<Self> {
        let mut arr = Self::with_len(src.len())?;
        arr.try_mut_slice()?.copy_from_slice(src);
        Ok(arr)
    }

    /// Adopt an existing handle.
    /// The handle must be unbound, or one-dimensional and contiguous
    /// with element type T.
    #[inline]
    pub fn from_wrappee(wrappee: H) -> Result<Self> {
        let view = check_view::<T>(wrappee.request(), 1)?;
        Ok(Array1D {
            wrappee,
            view,
            _marker: PhantomData,
        })
    }

    /// Replace the handle with given one.
    /// On failure the array is unchanged.
    #[inline]
    pub fn assign_wrappee(&mut self, wrappee: H) -> Result<()> {
        self.view = check_view::<T>(wrappee.request(), 1)?;
        self.wrappee = wrappee;
        log::trace!("1-D array adopted handle of {} elements", self.view.size);
        Ok(())
    }

    /// Replace the handle with a new reference to given one.
    /// The source handle is left untouched.
    #[inline]
    pub fn assign_wrappee_ref(&mut self, wrappee: &H) -> Result<()> {
        self.assign_wrappee(wrappee.clone())
    }

    /// Detach the storage, leaving this array empty without storage.
    #[inline]
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    #[inline]
    pub fn wrappee(&self) -> &H {
        &self.wrappee
    }

    /// Returns a new reference to the handle.
    #[inline]
    pub fn to_wrappee(&self) -> H {
        self.wrappee.clone()
    }

    #[inline]
    pub fn into_wrappee(self) -> H {
        self.wrappee
    }

    /// Returns cached view of the handle.
    #[inline]
    pub fn view(&self) -> &BufferView {
        &self.view
    }

    /// Returns whether the array holds storage.
    #[inline]
    pub fn is_bound(&self) -> bool {
        !self.view.is_null()
    }

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

    /// Reallocate storage if length changes.
    ///
    /// Old contents are discarded, contents of new storage are left as
    /// the handle allocates them. Same length is a no-op.
    pub fn resize(&mut self, len: usize) -> Result<()> {
        if len == self.len() {
            return Ok(());
        }
        let wrappee = alloc_wrappee::<T, H>(&[len])?;
        log::debug!(
            "reallocate 1-D array of {} from {} to {} elements",
            T::FORMAT,
            self.len(),
            len
        );
        self.wrappee = wrappee;
        self.refresh();
        Ok(())
    }

    /// Resize and set every element, not only new ones, to value.
    /// Fails with [`Error::SharedStorage`] if the length is unchanged
    /// and the storage is shared.
    #[inline]
    pub fn resize_fill(&mut self, len: usize, value: T) -> Result<()> {
        self.resize(len)?;
        self.fill(value)
    }

    #[inline]
    pub fn fill(&mut self, value: T) -> Result<()> {
        self.try_mut_slice()?.fill(value);
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
    pub fn as_slice(&self) -> &[T] {
        if self.view.is_null() {
            return &[];
        }
        // # SAFETY
        //
        // View is refreshed after each handle change, and the handle keeps
        // the storage alive as long as self.
        unsafe { std::slice::from_raw_parts(self.as_ptr(), self.len()) }
    }

    /// Returns None if the storage is shared.
    #[inline]
    pub fn as_mut_slice(&mut self) -> Option<&mut [T]> {
        self.try_mut_slice().ok()
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Option<&T> {
        self.as_slice().get(idx)
    }

    /// Returns None if index is out of bound or the storage is shared.
    #[inline]
    pub fn get_mut(&mut self, idx: usize) -> Option<&mut T> {
        self.as_mut_slice()?.get_mut(idx)
    }

    /// # Safety
    ///
    /// Index must be less than length.
    #[inline]
    pub unsafe fn get_unchecked(&self, idx: usize) -> &T {
        debug_assert!(idx < self.len());
        &*self.as_ptr().add(idx)
    }

    /// # Safety
    ///
    /// Index must be less than length, and no other reference to the
    /// element, including one obtained from a clone, may be used while
    /// the returned one is alive.
    #[inline]
    pub unsafe fn get_unchecked_mut(&mut self, idx: usize) -> &mut T {
        debug_assert!(idx < self.len());
        &mut *self.as_mut_ptr().add(idx)
    }

    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.as_slice().first()
    }

    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice()?.first_mut()
    }

    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.as_slice().last()
    }

    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice()?.last_mut()
    }

    /// Returns cursor of first element.
    #[inline]
    pub fn begin(&self) -> Cursor<'_, T> {
        Cursor::new(self.view.cast_ptr::<T>())
    }

    /// Returns cursor past the last element.
    #[inline]
    pub fn end(&self) -> Cursor<'_, T> {
        self.begin().plus(self.len() as isize)
    }

    /// Returns mutable cursor of first element.
    /// The cursor may write to storage shared with clones.
    #[inline]
    pub fn begin_mut(&mut self) -> CursorMut<'_, T> {
        CursorMut::new(self.view.cast_ptr::<T>())
    }

    /// Returns mutable cursors of first element and past the last element.
    #[inline]
    pub fn cursors_mut(&mut self) -> (CursorMut<'_, T>, CursorMut<'_, T>) {
        let len = self.len() as isize;
        let begin = self.begin_mut();
        (begin, begin.plus(len))
    }

    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        // # SAFETY
        //
        // Cursors cover exactly the elements of the array.
        unsafe { RangeIter::new(self.begin(), self.end()) }
    }

    /// # Panics
    ///
    /// Panics if the storage is shared.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        assert!(self.is_unique(), "mutable iteration over shared storage");
        let (begin, end) = self.cursors_mut();
        // # SAFETY
        //
        // Cursors cover exactly the elements of the array, which is
        // exclusively borrowed and the only owner of the storage.
        unsafe { RangeIter::new(begin, end) }
    }

    /// Returns the elements for writing, which requires unique storage.
    #[inline]
    fn try_mut_slice(&mut self) -> Result<&mut [T]> {
        if !self.wrappee.is_unique() {
            return Err(Error::SharedStorage);
        }
        if self.view.is_null() {
            return Ok(&mut []);
        }
        // # SAFETY
        //
        // Same as as_slice(). No other handle can reach the storage, and
        // self is exclusively borrowed.
        Ok(unsafe { std::slice::from_raw_parts_mut(self.as_mut_ptr(), self.len()) })
    }

    #[inline]
    fn bind(wrappee: H) -> Self {
        let mut arr = Array1D {
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
        log::trace!("refresh view of 1-D array: {} elements", self.view.size);
    }
}

impl<T: Scalar, H: WrappeeHandle> Default for Array1D<T, H> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar, H: WrappeeHandle> Clone for Array1D<T, H> {
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

impl<T: Scalar, H: WrappeeHandle> Index<usize> for Array1D<T, H> {
    type Output = T;

    #[inline]
    fn index(&self, idx: usize) -> &T {
        &self.as_slice()[idx]
    }
}

impl<T: Scalar, H: WrappeeHandle> IndexMut<usize> for Array1D<T, H> {
    #[inline]
    fn index_mut(&mut self, idx: usize) -> &mut T {
        match self.as_mut_slice() {
            Some(slice) => &mut slice[idx],
            None => panic!("index {} of 1-D array with shared storage", idx),
        }
    }
}

impl<T: Scalar, H: WrappeeHandle> PartialEq for Array1D<T, H> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Scalar, H: WrappeeHandle> PartialEq<[T]> for Array1D<T, H> {
    #[inline]
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T: Scalar, H: WrappeeHandle> fmt::Debug for Array1D<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, T: Scalar, H: WrappeeHandle> IntoIterator for &'a Array1D<T, H> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T: Scalar, H: WrappeeHandle> IntoIterator for &'a mut Array1D<T, H> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    #[inline]
    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}
