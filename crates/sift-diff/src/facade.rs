//! The `Diff` entry point: comparison operations bound to one store and one
//! immutable options value.

use sift_store::{Blob, ObjectKind, ObjectStore};
use sift_types::ObjectId;

use crate::cancel::CancelToken;
use crate::content_diff::{diff_content, ContentChanges};
use crate::error::{DiffError, DiffResult};
use crate::options::DiffOptions;
use crate::tree_diff::{diff_trees, diff_trees_cancellable, TreeChanges};

/// Comparison facade over an object store.
///
/// Borrows the store for the facade's lifetime and is read-only against it.
/// Object buffers are scoped to each call and released on every exit path,
/// success or failure. Options are fixed at construction; build a second
/// facade for a different sensitivity.
pub struct Diff<'a> {
    store: &'a dyn ObjectStore,
    options: DiffOptions,
}

impl<'a> Diff<'a> {
    /// Create a facade using the default [`DiffOptions`].
    pub fn new(store: &'a dyn ObjectStore) -> Self {
        Self::with_options(store, DiffOptions::default())
    }

    /// Create a facade with explicit options.
    pub fn with_options(store: &'a dyn ObjectStore, options: DiffOptions) -> Self {
        Self { store, options }
    }

    /// The options this facade applies to content comparisons.
    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    /// Show changes between two trees.
    ///
    /// Renames are not detected; a renamed file surfaces as a
    /// Deleted/Added pair.
    pub fn tree_to_tree(&self, old: &ObjectId, new: &ObjectId) -> DiffResult<TreeChanges> {
        diff_trees(self.store, old, new)
    }

    /// Like [`tree_to_tree`](Self::tree_to_tree), aborting with
    /// [`DiffError::Cancelled`] once `cancel` is tripped.
    pub fn tree_to_tree_cancellable(
        &self,
        old: &ObjectId,
        new: &ObjectId,
        cancel: &CancelToken,
    ) -> DiffResult<TreeChanges> {
        diff_trees_cancellable(self.store, old, new, cancel)
    }

    /// Show changes between two blobs' content.
    pub fn blob_to_blob(&self, old: &ObjectId, new: &ObjectId) -> DiffResult<ContentChanges> {
        let old_data = self.resolve_blob(old)?;
        let new_data = self.resolve_blob(new)?;
        Ok(diff_content(&old_data, &new_data, &self.options))
    }

    fn resolve_blob(&self, id: &ObjectId) -> DiffResult<Vec<u8>> {
        let stored = self
            .store
            .read(id)?
            .ok_or(DiffError::ObjectNotFound(*id))?;
        match stored.kind {
            ObjectKind::Blob => Ok(Blob::from_stored_object(&stored)?.data),
            ObjectKind::Tree => Err(DiffError::UnexpectedObjectKind {
                id: *id,
                expected: ObjectKind::Blob.to_string(),
                actual: stored.kind.to_string(),
            }),
        }
    }
}
