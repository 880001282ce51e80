//! Strided numeric buffers shared between handles.
//!
//! A buffer is described by a [`BufferDescriptor`] and held by a
//! [`WrappeeHandle`]. Handles hand out [`BufferView`] snapshots of
//! pointer, format, shape and strides, which higher level containers
//! cache and refresh whenever the handle changes.
pub mod alloc;
pub mod descriptor;
pub mod error;
pub mod format;
pub mod handle;
pub mod shared;
pub mod view;

pub use alloc::AllocOpts;
pub use descriptor::{BufferDescriptor, Dims};
pub use error::{Error, Result};
pub use format::{FormatTag, Scalar};
pub use handle::WrappeeHandle;
pub use shared::SharedArray;
pub use view::BufferView;
