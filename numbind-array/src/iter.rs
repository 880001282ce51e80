use crate::cursor::RandomAccessCursor;
use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::mem::size_of;

mod sealed {
    pub trait Sealed {}
}

/// Constness selects pointer and reference types exposed by a cursor.
pub trait Constness: sealed::Sealed {
    type Ptr<T>: Copy;
    type Ref<'a, T: 'a>;

    fn cast_ptr<T>(ptr: *mut T) -> Self::Ptr<T>;

    /// # Safety
    ///
    /// Pointer must be valid and properly aligned for lifetime `'a`.
    unsafe fn cast_ref<'a, T: 'a>(ptr: *mut T) -> Self::Ref<'a, T>;
}

/// Marker of read-only cursors.
#[derive(Debug, Clone, Copy)]
pub enum Const {}

/// Marker of mutable cursors.
#[derive(Debug, Clone, Copy)]
pub enum Mut {}

impl sealed::Sealed for Const {}
impl sealed::Sealed for Mut {}

impl Constness for Const {
    type Ptr<T> = *const T;
    type Ref<'a, T: 'a> = &'a T;

    #[inline]
    fn cast_ptr<T>(ptr: *mut T) -> *const T {
        ptr as *const T
    }

    #[inline]
    unsafe fn cast_ref<'a, T: 'a>(ptr: *mut T) -> &'a T {
        &*ptr
    }
}

impl Constness for Mut {
    type Ptr<T> = *mut T;
    type Ref<'a, T: 'a> = &'a mut T;

    #[inline]
    fn cast_ptr<T>(ptr: *mut T) -> *mut T {
        ptr
    }

    #[inline]
    unsafe fn cast_ref<'a, T: 'a>(ptr: *mut T) -> &'a mut T {
        &mut *ptr
    }
}

/// ArrayCursor points to an element of a contiguous array.
///
/// Read-only and mutable cursors share the same logic and differ only in
/// the pointer and reference types, selected by `M`.
/// Lifetime `'a` ties the cursor to a borrow of the array, so the cursor
/// cannot outlive a resize or reassignment of the array.
///
/// A default cursor holds a null pointer, which can only be compared with
/// another null cursor.
pub struct ArrayCursor<'a, T, M: Constness> {
    ptr: *mut T,
    _marker: PhantomData<(&'a mut T, M)>,
}

pub type Cursor<'a, T> = ArrayCursor<'a, T, Const>;
pub type CursorMut<'a, T> = ArrayCursor<'a, T, Mut>;

impl<'a, T, M: Constness> ArrayCursor<'a, T, M> {
    #[inline]
    pub(crate) fn new(ptr: *mut T) -> Self {
        ArrayCursor {
            ptr,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.ptr.is_null()
    }
}

impl<'a, T, M: Constness> Clone for ArrayCursor<'a, T, M> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T, M: Constness> Copy for ArrayCursor<'a, T, M> {}

impl<'a, T, M: Constness> Default for ArrayCursor<'a, T, M> {
    #[inline]
    fn default() -> Self {
        Self::new(std::ptr::null_mut())
    }
}

impl<'a, T, M: Constness> fmt::Debug for ArrayCursor<'a, T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ArrayCursor").field(&self.ptr).finish()
    }
}

impl<'a, T: 'a, M: Constness> RandomAccessCursor for ArrayCursor<'a, T, M> {
    type Ref = M::Ref<'a, T>;
    type Ptr = M::Ptr<T>;

    #[inline]
    fn step_forward(&mut self) {
        self.ptr = self.ptr.wrapping_add(1);
    }

    #[inline]
    fn step_backward(&mut self) {
        self.ptr = self.ptr.wrapping_sub(1);
    }

    #[inline]
    fn forward(&mut self, n: isize) {
        self.ptr = self.ptr.wrapping_offset(n);
    }

    #[inline]
    fn backward(&mut self, n: isize) {
        self.ptr = self.ptr.wrapping_offset(n.wrapping_neg());
    }

    #[inline]
    unsafe fn deref(&self) -> M::Ref<'a, T> {
        M::cast_ref(self.ptr)
    }

    #[inline]
    fn as_ptr(&self) -> M::Ptr<T> {
        M::cast_ptr(self.ptr)
    }

    #[inline]
    fn same(&self, other: &Self) -> bool {
        self.ptr == other.ptr
    }

    #[inline]
    fn before(&self, other: &Self) -> bool {
        self.ptr < other.ptr
    }

    #[inline]
    fn distance(&self, origin: &Self) -> isize {
        let bytes = (self.ptr as isize).wrapping_sub(origin.ptr as isize);
        bytes / size_of::<T>().max(1) as isize
    }
}

crate::impl_cursor_ops!(['a, T: 'a, M: Constness] ArrayCursor<'a, T, M>);

/// RangeIter walks elements between two cursors of the same array.
/// Reverse iteration is available via [`Iterator::rev`].
pub struct RangeIter<'a, T, M: Constness> {
    head: ArrayCursor<'a, T, M>,
    tail: ArrayCursor<'a, T, M>,
}

pub type Iter<'a, T> = RangeIter<'a, T, Const>;
pub type IterMut<'a, T> = RangeIter<'a, T, Mut>;

impl<'a, T: 'a, M: Constness> RangeIter<'a, T, M> {
    /// Create an iterator over `[head, tail)`.
    ///
    /// # Safety
    ///
    /// Both cursors must come from the same array with `head <= tail`, all
    /// elements in between must be live for `'a`, and for mutable cursors
    /// no other reference to these elements may exist during `'a`.
    #[inline]
    pub unsafe fn new(head: ArrayCursor<'a, T, M>, tail: ArrayCursor<'a, T, M>) -> Self {
        debug_assert!(head <= tail);
        RangeIter { head, tail }
    }
}

impl<'a, T: 'a, M: Constness> Iterator for RangeIter<'a, T, M> {
    type Item = M::Ref<'a, T>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.head == self.tail {
            return None;
        }
        let cursor = self.head.post_inc();
        // # SAFETY
        //
        // Cursor is within the range and every element is yielded once.
        Some(unsafe { cursor.deref() })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = (self.tail - self.head) as usize;
        (n, Some(n))
    }

    #[inline]
    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        if n >= self.len() {
            self.head = self.tail;
            return None;
        }
        self.head += n as isize;
        self.next()
    }
}

impl<'a, T: 'a, M: Constness> DoubleEndedIterator for RangeIter<'a, T, M> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.head == self.tail {
            return None;
        }
        self.tail.step_backward();
        // # SAFETY
        //
        // Cursor is within the range and every element is yielded once.
        Some(unsafe { self.tail.deref() })
    }
}

impl<'a, T: 'a, M: Constness> ExactSizeIterator for RangeIter<'a, T, M> {}

impl<'a, T: 'a, M: Constness> FusedIterator for RangeIter<'a, T, M> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_primitives() {
        let mut data = vec![10, 20, 30, 40, 50];
        let mut c = CursorMut::<i32>::new(data.as_mut_ptr());
        unsafe {
            assert_eq!(10, *c.deref());
            c.step_forward();
            assert_eq!(20, *c.deref());
            c.forward(3);
            assert_eq!(50, *c.deref());
            c.backward(2);
            assert_eq!(30, *c.deref());
            c.step_backward();
            *c.deref() = 21;
            assert_eq!(40, *c.at(2));
            assert_eq!(21, *c.as_ptr());
        }
        assert_eq!(vec![10, 21, 30, 40, 50], data);
    }

    #[test]
    fn test_cursor_arithmetic() {
        let data = vec![1u64, 2, 3, 4, 5, 6];
        let begin = Cursor::<u64>::new(data.as_ptr() as *mut u64);
        let end = begin + data.len() as isize;
        assert_eq!(6, end - begin);
        assert_eq!(-6, begin - end);
        for k in 0..6isize {
            let mut stepped = begin;
            for _ in 0..k {
                stepped.step_forward();
            }
            assert_eq!(stepped, begin + k);
            assert_eq!(stepped, k + begin);
            assert_eq!(stepped, end - (6 - k));
            assert_eq!(data[k as usize], unsafe { *begin.at(k) });
            assert_eq!(data[k as usize], unsafe { *(end - 1).at(k - 5) });
        }
        assert!(begin < end);
        assert!(begin <= begin);
        assert!(end > begin);
        assert!(end >= end);
        assert!(begin != end);
    }

    #[test]
    fn test_null_cursor() {
        let a = Cursor::<f64>::default();
        let b = CursorMut::<f64>::default();
        assert!(a.is_null());
        assert!(b.is_null());
        assert_eq!(a, Cursor::default());
        assert_eq!(0, a - Cursor::default());
    }

    #[test]
    fn test_range_iter() {
        let data = vec![1i16, 2, 3, 4];
        let begin = Cursor::<i16>::new(data.as_ptr() as *mut i16);
        let iter = unsafe { Iter::new(begin, begin + 4) };
        assert_eq!(4, iter.len());
        assert_eq!(vec![1, 2, 3, 4], iter.copied().collect::<Vec<_>>());
        let iter = unsafe { Iter::new(begin, begin + 4) };
        assert_eq!(vec![4, 3, 2, 1], iter.rev().copied().collect::<Vec<_>>());

        let mut iter = unsafe { Iter::new(begin, begin + 4) };
        assert_eq!(Some(&1), iter.next());
        assert_eq!(Some(&4), iter.next_back());
        assert_eq!(2, iter.len());
        assert_eq!(Some(&3), iter.nth(1));
        assert_eq!(None, iter.next());
        assert_eq!(None, iter.next_back());

        let mut iter = unsafe { Iter::new(begin, begin + 4) };
        assert_eq!(None, iter.nth(4));
        assert_eq!(0, iter.len());
    }

    #[test]
    fn test_range_iter_mut() {
        let mut data = vec![1i32, 2, 3];
        let begin = CursorMut::<i32>::new(data.as_mut_ptr());
        let iter = unsafe { IterMut::new(begin, begin + 3) };
        for v in iter.rev() {
            *v *= 10;
        }
        assert_eq!(vec![10, 20, 30], data);
    }

    #[test]
    fn test_empty_range_iter() {
        let iter = unsafe { Iter::<u8>::new(Cursor::default(), Cursor::default()) };
        assert_eq!(0, iter.len());
        assert_eq!(0, iter.count());
    }
}
