//! Error types for the diff crate.

use sift_store::StoreError;
use sift_types::ObjectId;

/// Errors that can occur during diff operations.
///
/// An empty [`TreeChanges`](crate::TreeChanges) is a legitimate "no
/// differences" result; none of these variants is ever used to signal it.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// An object referenced during the comparison was not found in the store.
    #[error("object not found: {0:?}")]
    ObjectNotFound(ObjectId),

    /// A tree's entry list is malformed (duplicate names, unsorted entries,
    /// or an entry whose mode disagrees with the referenced object's kind).
    #[error("corrupt tree {id:?}: {reason}")]
    CorruptTree { id: ObjectId, reason: String },

    /// The object had an unexpected kind (e.g., expected blob, got tree).
    #[error("unexpected object kind for {id:?}: expected {expected}, got {actual}")]
    UnexpectedObjectKind {
        id: ObjectId,
        expected: String,
        actual: String,
    },

    /// The caller requested cancellation; partial results are discarded.
    #[error("comparison cancelled")]
    Cancelled,

    /// Rejected at `DiffOptions` construction; never reaches the algorithms.
    #[error("invalid diff options: {0}")]
    InvalidOptions(String),

    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
