//! Error types for structure operations.

use thiserror::Error;

use crate::kind::StructureKind;

/// Errors returned by grid structures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A name is already in use by a structure of another kind.
    #[error("'{name}' is a {actual}, not a {expected}")]
    TypeMismatch {
        name: String,
        expected: StructureKind,
        actual: StructureKind,
    },

    #[error("index {index} is out of bounds for size {size}")]
    IndexOutOfBounds { index: usize, size: usize },

    /// The requested sequence has already been overwritten.
    #[error("sequence {sequence} is no longer available, oldest is {head}")]
    StaleSequence { sequence: i64, head: i64 },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl StoreError {
    pub fn invalid(message: impl Into<String>) -> Self {
        StoreError::InvalidArgument(message.into())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
