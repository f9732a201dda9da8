//! Diff engine for sift.
//!
//! Computes structured differences between two snapshots of a
//! content-addressable object store: tree-to-tree change sets and
//! blob-to-blob line diffs. Results are plain immutable values owned by the
//! caller; the engine holds no global state and only ever reads from the
//! store.
//!
//! # Key Types
//!
//! - [`Diff`] -- comparison facade bound to a store and a [`DiffOptions`]
//! - [`TreeChanges`] / [`TreeChange`] / [`ChangeKind`] -- per-path tree diff
//! - [`ContentChanges`] / [`Hunk`] / [`DiffLine`] -- line-level content diff
//! - [`CancelToken`] -- caller-driven abort for large tree walks
//!
//! Rename and copy detection is out of scope by design: a renamed file
//! appears as a Deleted/Added pair.

pub mod cancel;
pub mod content_diff;
pub mod error;
pub mod facade;
pub mod options;
pub mod tree_diff;

pub use cancel::CancelToken;
pub use content_diff::{diff_content, ContentChanges, DiffLine, Hunk};
pub use error::{DiffError, DiffResult};
pub use facade::Diff;
pub use options::{BinaryDetection, DiffOptions, MAX_LINE_SETTING};
pub use tree_diff::{
    diff_trees, diff_trees_cancellable, ChangeKind, TreeChange, TreeChanges,
};
