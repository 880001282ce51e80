use crate::format::FormatTag;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("insufficient memory({0})")]
    InsufficientMemory(usize),
    #[error("invalid shape: {0}")]
    InvalidShape(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("format mismatch: expected {expected}, actual {actual}")]
    FormatMismatch { expected: FormatTag, actual: FormatTag },
    #[error("invalid layout: {0}")]
    InvalidLayout(String),
    #[error("storage is shared by other handles")]
    SharedStorage,
}
