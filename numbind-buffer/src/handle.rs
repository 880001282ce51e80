use crate::descriptor::BufferDescriptor;
use crate::error::Result;
use crate::view::BufferView;

/// WrappeeHandle is a shared-ownership handle of a foreign array.
///
/// Cloning a handle shares the underlying storage, and the storage is
/// released when the last handle referring to it is dropped.
/// `Default` creates a handle bound to no storage, whose view is
/// [`BufferView::default`].
///
/// # Safety
///
/// Containers read and write the memory described by `request()` without
/// further checks. Implementors must guarantee that a non-null view
/// describes live storage of at least `shape` and `strides` in size, valid
/// for reads and writes as long as any clone of the handle lives.
/// `is_unique()` must return true only if no other handle, clone or not,
/// can reach the same storage.
pub unsafe trait WrappeeHandle: Clone + Default {
    /// Create a handle from given descriptor, allocating storage
    /// if the descriptor does not carry a pointer.
    fn from_descriptor(desc: &BufferDescriptor) -> Result<Self>;

    /// Returns a snapshot of the current state.
    fn request(&self) -> BufferView;

    /// Returns whether this handle is the only one referring to its storage.
    /// Unbound handles are unique.
    fn is_unique(&self) -> bool;
}
