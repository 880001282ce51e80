//! Containers over shared foreign numeric buffers.
//!
//! [`Array1D`] and [`Array2D`] adapt a [`WrappeeHandle`] into value types
//! with indexing, resizing and, for the 1-D array, random access cursors
//! and iterators. Both cache the handle's [`BufferView`] and refresh it
//! whenever the handle is replaced.
//!
//! Cursor operators are derived from a small set of primitives by
//! [`RandomAccessCursor`] and [`impl_cursor_ops`].
pub mod array1d;
pub mod array2d;
pub mod cursor;
pub mod iter;
mod layout;

pub use array1d::Array1D;
pub use array2d::Array2D;
pub use cursor::RandomAccessCursor;
pub use iter::{ArrayCursor, Const, Constness, Cursor, CursorMut, Iter, IterMut, Mut, RangeIter};
pub use numbind_buffer::{
    BufferDescriptor, BufferView, Error, FormatTag, Result, Scalar, SharedArray, WrappeeHandle,
};
