//! Error types for the persistent merkle tree crate.

use thiserror::Error;

/// Errors raised by tree navigation, rebinding and views.
///
/// Every error is a usage defect detected before any new node is built, so a
/// failed call never leaves a view or tree partially updated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Navigation went past the declared tree shape or the logical length.
    #[error("index {index} out of bounds at depth {depth}")]
    OutOfBounds { depth: usize, index: usize },

    /// Element index past the logical length of a view.
    #[error("index {index} out of range for length {length}")]
    IndexOutOfRange { index: usize, length: usize },

    /// Malformed call (mismatched lengths, unsorted indices, oversize input).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A list is already at its fixed capacity.
    #[error("list limit {limit} exceeded")]
    LimitExceeded { limit: usize },

    /// Proof does not match the shape it claims to prove.
    #[error("invalid proof: {0}")]
    InvalidProof(String),
}

/// Result type alias for tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;
