/// RandomAccessCursor derives the full set of random access operations
/// from a few primitives implemented by a concrete cursor.
///
/// A cursor is a position in a contiguous element range, similar to a raw
/// pointer. Moving a cursor outside the range it was created from is allowed,
/// dereferencing it afterwards is not.
///
/// Operator impls (`+`, `-`, `+=`, `-=`, comparison) can be derived from
/// this trait with [`impl_cursor_ops`](crate::impl_cursor_ops).
pub trait RandomAccessCursor: Copy {
    /// Reference returned by dereference.
    type Ref;
    /// Pointer returned by member access.
    type Ptr;

    /// Move to next element.
    fn step_forward(&mut self);

    /// Move to previous element.
    fn step_backward(&mut self);

    /// Move forward by n elements, n can be negative.
    fn forward(&mut self, n: isize);

    /// Move backward by n elements, n can be negative.
    fn backward(&mut self, n: isize);

    /// Returns reference to the pointed element.
    ///
    /// # Safety
    ///
    /// The cursor must point to a live element of the range it's created
    /// from, and the returned reference must not break aliasing rules.
    unsafe fn deref(&self) -> Self::Ref;

    /// Returns pointer to the pointed element.
    fn as_ptr(&self) -> Self::Ptr;

    /// Returns whether two cursors point to the same element.
    fn same(&self, other: &Self) -> bool;

    /// Returns whether this cursor precedes the other one.
    fn before(&self, other: &Self) -> bool;

    /// Returns signed element count from origin to this cursor.
    fn distance(&self, origin: &Self) -> isize;

    /// Move to next element and returns the cursor before moving.
    #[inline]
    fn post_inc(&mut self) -> Self {
        let tmp = *self;
        self.step_forward();
        tmp
    }

    /// Move to previous element and returns the cursor before moving.
    #[inline]
    fn post_dec(&mut self) -> Self {
        let tmp = *self;
        self.step_backward();
        tmp
    }

    #[inline]
    fn plus(mut self, n: isize) -> Self {
        self.forward(n);
        self
    }

    #[inline]
    fn minus(mut self, n: isize) -> Self {
        self.backward(n);
        self
    }

    /// Returns reference to the element n positions away.
    ///
    /// # Safety
    ///
    /// Same as [`deref`](RandomAccessCursor::deref), applied to the
    /// offset cursor.
    #[inline]
    unsafe fn at(&self, n: isize) -> Self::Ref {
        self.plus(n).deref()
    }

    #[inline]
    fn differs(&self, other: &Self) -> bool {
        !self.same(other)
    }

    #[inline]
    fn not_after(&self, other: &Self) -> bool {
        !other.before(self)
    }

    #[inline]
    fn not_before(&self, other: &Self) -> bool {
        !self.before(other)
    }

    #[inline]
    fn after(&self, other: &Self) -> bool {
        other.before(self)
    }
}

/// Implement arithmetic and comparison operators for a cursor type
/// in terms of its [`RandomAccessCursor`] impl.
///
/// Generic parameters of the impls are given in brackets:
///
/// ```ignore
/// impl_cursor_ops!(['a, T: 'a, M: Constness] ArrayCursor<'a, T, M>);
/// ```
#[macro_export]
macro_rules! impl_cursor_ops {
    ([$($gen:tt)*] $ty:ty) => {
        impl<$($gen)*> ::core::ops::Add<isize> for $ty {
            type Output = $ty;
            #[inline]
            fn add(self, n: isize) -> $ty {
                $crate::cursor::RandomAccessCursor::plus(self, n)
            }
        }

        impl<$($gen)*> ::core::ops::Add<$ty> for isize {
            type Output = $ty;
            #[inline]
            fn add(self, cursor: $ty) -> $ty {
                $crate::cursor::RandomAccessCursor::plus(cursor, self)
            }
        }

        impl<$($gen)*> ::core::ops::Sub<isize> for $ty {
            type Output = $ty;
            #[inline]
            fn sub(self, n: isize) -> $ty {
                $crate::cursor::RandomAccessCursor::minus(self, n)
            }
        }

        impl<$($gen)*> ::core::ops::Sub for $ty {
            type Output = isize;
            #[inline]
            fn sub(self, origin: $ty) -> isize {
                $crate::cursor::RandomAccessCursor::distance(&self, &origin)
            }
        }

        impl<$($gen)*> ::core::ops::AddAssign<isize> for $ty {
            #[inline]
            fn add_assign(&mut self, n: isize) {
                $crate::cursor::RandomAccessCursor::forward(self, n)
            }
        }

        impl<$($gen)*> ::core::ops::SubAssign<isize> for $ty {
            #[inline]
            fn sub_assign(&mut self, n: isize) {
                $crate::cursor::RandomAccessCursor::backward(self, n)
            }
        }

        impl<$($gen)*> ::core::cmp::PartialEq for $ty {
            #[inline]
            fn eq(&self, other: &$ty) -> bool {
                $crate::cursor::RandomAccessCursor::same(self, other)
            }
        }

        impl<$($gen)*> ::core::cmp::Eq for $ty {}

        impl<$($gen)*> ::core::cmp::PartialOrd for $ty {
            #[inline]
            fn partial_cmp(&self, other: &$ty) -> Option<::core::cmp::Ordering> {
                Some(::core::cmp::Ord::cmp(self, other))
            }

            #[inline]
            fn lt(&self, other: &$ty) -> bool {
                $crate::cursor::RandomAccessCursor::before(self, other)
            }

            #[inline]
            fn le(&self, other: &$ty) -> bool {
                $crate::cursor::RandomAccessCursor::not_after(self, other)
            }

            #[inline]
            fn gt(&self, other: &$ty) -> bool {
                $crate::cursor::RandomAccessCursor::after(self, other)
            }

            #[inline]
            fn ge(&self, other: &$ty) -> bool {
                $crate::cursor::RandomAccessCursor::not_before(self, other)
            }
        }

        impl<$($gen)*> ::core::cmp::Ord for $ty {
            #[inline]
            fn cmp(&self, other: &$ty) -> ::core::cmp::Ordering {
                if $crate::cursor::RandomAccessCursor::before(self, other) {
                    ::core::cmp::Ordering::Less
                } else if $crate::cursor::RandomAccessCursor::same(self, other) {
                    ::core::cmp::Ordering::Equal
                } else {
                    ::core::cmp::Ordering::Greater
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Cursor over positions of a virtual sequence, without any storage.
    #[derive(Debug, Clone, Copy)]
    struct PosCursor(isize);

    impl RandomAccessCursor for PosCursor {
        type Ref = isize;
        type Ptr = isize;

        fn step_forward(&mut self) {
            self.0 += 1;
        }

        fn step_backward(&mut self) {
            self.0 -= 1;
        }

        fn forward(&mut self, n: isize) {
            self.0 += n;
        }

        fn backward(&mut self, n: isize) {
            self.0 -= n;
        }

        unsafe fn deref(&self) -> isize {
            self.0 * 10
        }

        fn as_ptr(&self) -> isize {
            self.0
        }

        fn same(&self, other: &Self) -> bool {
            self.0 == other.0
        }

        fn before(&self, other: &Self) -> bool {
            self.0 < other.0
        }

        fn distance(&self, origin: &Self) -> isize {
            self.0 - origin.0
        }
    }

    crate::impl_cursor_ops!([] PosCursor);

    #[test]
    fn test_derived_steps() {
        let mut c = PosCursor(3);
        let old = c.post_inc();
        assert_eq!(3, old.as_ptr());
        assert_eq!(4, c.as_ptr());
        let old = c.post_dec();
        assert_eq!(4, old.as_ptr());
        assert_eq!(3, c.as_ptr());
        assert_eq!(8, c.plus(5).as_ptr());
        assert_eq!(-2, c.minus(5).as_ptr());
        assert_eq!(50, unsafe { c.at(2) });
        assert_eq!(0, unsafe { c.at(-3) });
    }

    #[test]
    fn test_derived_comparison() {
        let a = PosCursor(1);
        let b = PosCursor(2);
        assert!(a.differs(&b));
        assert!(!a.differs(&a));
        assert!(a.not_after(&b));
        assert!(a.not_after(&a));
        assert!(!b.not_after(&a));
        assert!(b.not_before(&a));
        assert!(a.not_before(&a));
        assert!(!a.not_before(&b));
        assert!(b.after(&a));
        assert!(!a.after(&a));
    }

    #[test]
    fn test_derived_operators() {
        let a = PosCursor(1);
        let b = a + 4;
        assert_eq!(5, b.as_ptr());
        assert_eq!(b, 4 + a);
        assert_eq!(a, b - 4);
        assert_eq!(4, b - a);
        assert_eq!(-4, a - b);
        let mut c = a;
        c += 3;
        assert_eq!(PosCursor(4), c);
        c -= 5;
        assert_eq!(PosCursor(-1), c);
        assert!(c < a);
        assert!(c <= a);
        assert!(a <= a);
        assert!(b > a);
        assert!(b >= b);
        assert_ne!(a, b);
        assert_eq!(Some(std::cmp::Ordering::Less), a.partial_cmp(&b));
        assert_eq!(std::cmp::Ordering::Equal, a.cmp(&PosCursor(1)));
        assert_eq!(PosCursor(5), std::cmp::max(a, b));
    }
}
