use thiserror::Error;

/// Errors from vector collection operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VectorError {
    /// The vector's length differs from the collection's dimension, which is
    /// fixed by the first document stored.
    #[error("dimension mismatch: collection has {expected}, vector has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invalid vector: {0}")]
    InvalidVector(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),
}

pub type Result<T> = std::result::Result<T, VectorError>;
