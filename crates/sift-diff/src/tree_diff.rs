//! Tree-level diff: synchronized walk of two trees producing per-path
//! change records.
//!
//! The walker merge-walks the name-sorted entry lists of both trees,
//! recursing into subtree pairs and pruning any pair with equal ids in O(1)
//! (content-addressing: identical id means identical content). Only blob
//! paths appear in the output; a subtree present on one side alone is
//! expanded into one record per descendant blob. Renames are not detected
//! and surface as a Deleted/Added pair.

use serde::{Deserialize, Serialize};
use sift_store::{EntryMode, ObjectKind, ObjectStore, StoredObject, Tree, TreeEntry};
use sift_types::ObjectId;
use tracing::trace;

use crate::cancel::CancelToken;
use crate::error::{DiffError, DiffResult};

/// Classification of a single changed path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeKind {
    /// Path exists only in the new tree.
    Added,
    /// Path exists only in the old tree.
    Deleted,
    /// Path exists in both; content or mode differs.
    Modified,
    /// Path exists in both; the entry switched between symlink and regular
    /// file. Tree/blob switches are a Deleted/Added pair instead.
    TypeChanged,
    /// Path exists in both, identical on both sides. Suppressed from output.
    Unmodified,
}

/// A single change between two trees.
///
/// Exactly one of `old_id`/`new_id` is `None` for `Added`/`Deleted`; both
/// are present for `Modified` and `TypeChanged`. A mode-only change keeps
/// `old_id == new_id` with differing modes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeChange {
    /// Slash-separated path from the compared roots.
    pub path: String,
    /// What happened at this path.
    pub kind: ChangeKind,
    /// Blob id on the old side, if the path existed there.
    pub old_id: Option<ObjectId>,
    /// Blob id on the new side, if the path exists there.
    pub new_id: Option<ObjectId>,
    /// File mode on the old side.
    pub old_mode: Option<EntryMode>,
    /// File mode on the new side.
    pub new_mode: Option<EntryMode>,
}

impl TreeChange {
    fn added(path: String, entry: &TreeEntry) -> Self {
        Self {
            path,
            kind: ChangeKind::Added,
            old_id: None,
            new_id: Some(entry.object_id),
            old_mode: None,
            new_mode: Some(entry.mode),
        }
    }

    fn deleted(path: String, entry: &TreeEntry) -> Self {
        Self {
            path,
            kind: ChangeKind::Deleted,
            old_id: Some(entry.object_id),
            new_id: None,
            old_mode: Some(entry.mode),
            new_mode: None,
        }
    }

    fn modified(path: String, old: &TreeEntry, new: &TreeEntry) -> Self {
        Self {
            path,
            kind: ChangeKind::Modified,
            old_id: Some(old.object_id),
            new_id: Some(new.object_id),
            old_mode: Some(old.mode),
            new_mode: Some(new.mode),
        }
    }

    fn type_changed(path: String, old: &TreeEntry, new: &TreeEntry) -> Self {
        Self {
            path,
            kind: ChangeKind::TypeChanged,
            old_id: Some(old.object_id),
            new_id: Some(new.object_id),
            old_mode: Some(old.mode),
            new_mode: Some(new.mode),
        }
    }
}

/// The result of comparing two trees: one record per changed blob path, in
/// traversal order (lexicographic per tree level, depth-first).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeChanges {
    /// The list of changes between the old and new trees.
    pub changes: Vec<TreeChange>,
}

impl TreeChanges {
    /// Create an empty change set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if there are no changes.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of changed paths.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Iterate over all changes in traversal order.
    pub fn iter(&self) -> std::slice::Iter<'_, TreeChange> {
        self.changes.iter()
    }

    /// Changes with kind `Added`.
    pub fn added(&self) -> impl Iterator<Item = &TreeChange> {
        self.of_kind(ChangeKind::Added)
    }

    /// Changes with kind `Deleted`.
    pub fn deleted(&self) -> impl Iterator<Item = &TreeChange> {
        self.of_kind(ChangeKind::Deleted)
    }

    /// Changes with kind `Modified`.
    pub fn modified(&self) -> impl Iterator<Item = &TreeChange> {
        self.of_kind(ChangeKind::Modified)
    }

    /// Changes with kind `TypeChanged`.
    pub fn type_changed(&self) -> impl Iterator<Item = &TreeChange> {
        self.of_kind(ChangeKind::TypeChanged)
    }

    fn of_kind(&self, kind: ChangeKind) -> impl Iterator<Item = &TreeChange> {
        self.changes.iter().filter(move |c| c.kind == kind)
    }
}

impl<'a> IntoIterator for &'a TreeChanges {
    type Item = &'a TreeChange;
    type IntoIter = std::slice::Iter<'a, TreeChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}

/// Compare two trees and produce their change set.
///
/// Both roots are resolved through the store. Equal root ids short-circuit
/// to an empty result without resolving anything.
pub fn diff_trees(
    store: &dyn ObjectStore,
    old_tree: &ObjectId,
    new_tree: &ObjectId,
) -> DiffResult<TreeChanges> {
    Walker {
        store,
        cancel: None,
        changes: Vec::new(),
    }
    .run(old_tree, new_tree)
}

/// Like [`diff_trees`], but checks `cancel` at every tree-node boundary and
/// aborts with [`DiffError::Cancelled`] once it is tripped.
pub fn diff_trees_cancellable(
    store: &dyn ObjectStore,
    old_tree: &ObjectId,
    new_tree: &ObjectId,
    cancel: &CancelToken,
) -> DiffResult<TreeChanges> {
    Walker {
        store,
        cancel: Some(cancel.clone()),
        changes: Vec::new(),
    }
    .run(old_tree, new_tree)
}

/// Which side of the comparison a one-sided entry belongs to.
#[derive(Clone, Copy)]
enum Side {
    Old,
    New,
}

struct Walker<'a> {
    store: &'a dyn ObjectStore,
    cancel: Option<CancelToken>,
    changes: Vec<TreeChange>,
}

impl Walker<'_> {
    fn run(mut self, old_id: &ObjectId, new_id: &ObjectId) -> DiffResult<TreeChanges> {
        if old_id == new_id {
            return Ok(TreeChanges::new());
        }
        let old_tree = self.load_root(old_id)?;
        let new_tree = self.load_root(new_id)?;
        self.walk(&old_tree, &new_tree, "")?;
        Ok(TreeChanges {
            changes: self.changes,
        })
    }

    fn check_cancel(&self) -> DiffResult<()> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(DiffError::Cancelled),
            _ => Ok(()),
        }
    }

    /// Resolve and decode a root tree id. A blob here is a caller mistake,
    /// not tree corruption.
    fn load_root(&self, id: &ObjectId) -> DiffResult<Tree> {
        let stored = self
            .store
            .read(id)?
            .ok_or(DiffError::ObjectNotFound(*id))?;
        match stored.kind {
            ObjectKind::Tree => self.decode_tree(id, &stored),
            ObjectKind::Blob => Err(DiffError::UnexpectedObjectKind {
                id: *id,
                expected: ObjectKind::Tree.to_string(),
                actual: stored.kind.to_string(),
            }),
        }
    }

    /// Resolve and decode a subtree referenced by a directory-mode entry.
    fn load_subtree(&self, entry: &TreeEntry, path: &str) -> DiffResult<Tree> {
        let id = &entry.object_id;
        let stored = self
            .store
            .read(id)?
            .ok_or(DiffError::ObjectNotFound(*id))?;
        match stored.kind {
            ObjectKind::Tree => self.decode_tree(id, &stored),
            ObjectKind::Blob => Err(DiffError::CorruptTree {
                id: *id,
                reason: format!("entry '{path}' has directory mode but references a blob"),
            }),
        }
    }

    fn decode_tree(&self, id: &ObjectId, stored: &StoredObject) -> DiffResult<Tree> {
        let tree = Tree::from_stored_object(stored).map_err(|e| DiffError::CorruptTree {
            id: *id,
            reason: e.to_string(),
        })?;
        // Sorted, duplicate-free names are what make the merge walk (and the
        // tree's own hash) deterministic.
        for pair in tree.entries.windows(2) {
            if pair[0].name >= pair[1].name {
                return Err(DiffError::CorruptTree {
                    id: *id,
                    reason: format!(
                        "entry names not strictly ordered: '{}' then '{}'",
                        pair[0].name, pair[1].name
                    ),
                });
            }
        }
        Ok(tree)
    }

    fn walk(&mut self, old: &Tree, new: &Tree, prefix: &str) -> DiffResult<()> {
        self.check_cancel()?;

        let (mut i, mut j) = (0, 0);
        loop {
            match (old.entries.get(i), new.entries.get(j)) {
                (Some(o), Some(n)) => match o.name.cmp(&n.name) {
                    std::cmp::Ordering::Less => {
                        self.emit_one_sided(o, prefix, Side::Old)?;
                        i += 1;
                    }
                    std::cmp::Ordering::Greater => {
                        self.emit_one_sided(n, prefix, Side::New)?;
                        j += 1;
                    }
                    std::cmp::Ordering::Equal => {
                        self.pair(o, n, prefix)?;
                        i += 1;
                        j += 1;
                    }
                },
                (Some(o), None) => {
                    self.emit_one_sided(o, prefix, Side::Old)?;
                    i += 1;
                }
                (None, Some(n)) => {
                    self.emit_one_sided(n, prefix, Side::New)?;
                    j += 1;
                }
                (None, None) => return Ok(()),
            }
        }
    }

    /// Classify two entries sharing a name.
    fn pair(&mut self, old: &TreeEntry, new: &TreeEntry, prefix: &str) -> DiffResult<()> {
        let path = join(prefix, &old.name);
        match (old.mode.is_tree(), new.mode.is_tree()) {
            (true, true) => {
                if old.object_id == new.object_id {
                    trace!(path = %path, "pruned unchanged subtree");
                    return Ok(());
                }
                let old_sub = self.load_subtree(old, &path)?;
                let new_sub = self.load_subtree(new, &path)?;
                self.walk(&old_sub, &new_sub, &path)
            }
            // Tree replaced by blob or vice versa: the two sides are not
            // diffable against each other, so each surfaces on its own side.
            (true, false) | (false, true) => {
                self.emit_one_sided(old, prefix, Side::Old)?;
                self.emit_one_sided(new, prefix, Side::New)
            }
            (false, false) => {
                match classify_blob_pair(old, new) {
                    ChangeKind::Unmodified => {}
                    ChangeKind::TypeChanged => {
                        self.changes.push(TreeChange::type_changed(path, old, new));
                    }
                    ChangeKind::Modified => {
                        self.changes.push(TreeChange::modified(path, old, new));
                    }
                    ChangeKind::Added | ChangeKind::Deleted => unreachable!(
                        "blob pair classification never yields one-sided kinds"
                    ),
                }
                Ok(())
            }
        }
    }

    /// Record an entry present on only one side. Directories expand into one
    /// record per descendant blob; the directory itself is never a record.
    fn emit_one_sided(&mut self, entry: &TreeEntry, prefix: &str, side: Side) -> DiffResult<()> {
        let path = join(prefix, &entry.name);
        if entry.mode.is_tree() {
            self.check_cancel()?;
            let subtree = self.load_subtree(entry, &path)?;
            for child in &subtree.entries {
                self.emit_one_sided(child, &path, side)?;
            }
            return Ok(());
        }
        self.changes.push(match side {
            Side::Old => TreeChange::deleted(path, entry),
            Side::New => TreeChange::added(path, entry),
        });
        Ok(())
    }
}

/// Classify two blob entries sharing a path.
fn classify_blob_pair(old: &TreeEntry, new: &TreeEntry) -> ChangeKind {
    if old.object_id == new.object_id && old.mode == new.mode {
        return ChangeKind::Unmodified;
    }
    let old_is_link = old.mode == EntryMode::Symlink;
    let new_is_link = new.mode == EntryMode::Symlink;
    if old_is_link != new_is_link {
        ChangeKind::TypeChanged
    } else {
        // Covers content changes and mode-only changes (regular <->
        // executable), where old_id == new_id with differing modes.
        ChangeKind::Modified
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_store::{Blob, InMemoryObjectStore};
    use std::sync::Mutex;

    fn write_blob(store: &InMemoryObjectStore, content: &[u8]) -> ObjectId {
        store.write(&Blob::new(content.to_vec()).to_stored_object()).unwrap()
    }

    fn write_tree(store: &InMemoryObjectStore, entries: Vec<TreeEntry>) -> ObjectId {
        store
            .write(&Tree::new(entries).to_stored_object().unwrap())
            .unwrap()
    }

    fn file(name: &str, id: ObjectId) -> TreeEntry {
        TreeEntry::new(EntryMode::Regular, name, id)
    }

    fn dir(name: &str, id: ObjectId) -> TreeEntry {
        TreeEntry::new(EntryMode::Directory, name, id)
    }

    /// Store wrapper recording every id resolved through it.
    struct CountingStore {
        inner: InMemoryObjectStore,
        reads: Mutex<Vec<ObjectId>>,
    }

    impl CountingStore {
        fn new(inner: InMemoryObjectStore) -> Self {
            Self {
                inner,
                reads: Mutex::new(Vec::new()),
            }
        }

        fn was_read(&self, id: &ObjectId) -> bool {
            self.reads.lock().unwrap().contains(id)
        }
    }

    impl ObjectStore for CountingStore {
        fn read(&self, id: &ObjectId) -> sift_store::StoreResult<Option<StoredObject>> {
            self.reads.lock().unwrap().push(*id);
            self.inner.read(id)
        }

        fn write(&self, object: &StoredObject) -> sift_store::StoreResult<ObjectId> {
            self.inner.write(object)
        }

        fn exists(&self, id: &ObjectId) -> sift_store::StoreResult<bool> {
            self.inner.exists(id)
        }
    }

    #[test]
    fn identical_roots_produce_empty_changes() {
        let store = InMemoryObjectStore::new();
        let blob = write_blob(&store, b"hi\n");
        let tree = write_tree(&store, vec![file("a.txt", blob)]);

        let changes = diff_trees(&store, &tree, &tree).unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn added_file_is_reported() {
        let store = InMemoryObjectStore::new();
        let hi = write_blob(&store, b"hi\n");
        let yo = write_blob(&store, b"yo\n");
        let old = write_tree(&store, vec![file("a.txt", hi)]);
        let new = write_tree(&store, vec![file("a.txt", hi), file("b.txt", yo)]);

        let changes = diff_trees(&store, &old, &new).unwrap();
        assert_eq!(changes.len(), 1);
        let change = &changes.changes[0];
        assert_eq!(change.path, "b.txt");
        assert_eq!(change.kind, ChangeKind::Added);
        assert_eq!(change.old_id, None);
        assert_eq!(change.new_id, Some(yo));
    }

    #[test]
    fn deleted_file_is_reported() {
        let store = InMemoryObjectStore::new();
        let hi = write_blob(&store, b"hi\n");
        let old = write_tree(&store, vec![file("gone.txt", hi)]);
        let new = write_tree(&store, vec![]);

        let changes = diff_trees(&store, &old, &new).unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes.changes[0].kind, ChangeKind::Deleted);
        assert_eq!(changes.changes[0].old_id, Some(hi));
        assert_eq!(changes.changes[0].new_id, None);
    }

    #[test]
    fn modified_file_carries_both_ids() {
        let store = InMemoryObjectStore::new();
        let v1 = write_blob(&store, b"one\n");
        let v2 = write_blob(&store, b"two\n");
        let old = write_tree(&store, vec![file("f.txt", v1)]);
        let new = write_tree(&store, vec![file("f.txt", v2)]);

        let changes = diff_trees(&store, &old, &new).unwrap();
        assert_eq!(changes.len(), 1);
        let change = &changes.changes[0];
        assert_eq!(change.kind, ChangeKind::Modified);
        assert_eq!(change.old_id, Some(v1));
        assert_eq!(change.new_id, Some(v2));
        assert_ne!(change.old_id, change.new_id);
    }

    #[test]
    fn mode_only_change_is_modified_with_equal_ids() {
        let store = InMemoryObjectStore::new();
        let blob = write_blob(&store, b"#!/bin/sh\n");
        let old = write_tree(
            &store,
            vec![TreeEntry::new(EntryMode::Regular, "run.sh", blob)],
        );
        let new = write_tree(
            &store,
            vec![TreeEntry::new(EntryMode::Executable, "run.sh", blob)],
        );

        let changes = diff_trees(&store, &old, &new).unwrap();
        assert_eq!(changes.len(), 1);
        let change = &changes.changes[0];
        assert_eq!(change.kind, ChangeKind::Modified);
        assert_eq!(change.old_id, change.new_id);
        assert_eq!(change.old_mode, Some(EntryMode::Regular));
        assert_eq!(change.new_mode, Some(EntryMode::Executable));
    }

    #[test]
    fn symlink_to_regular_is_type_changed() {
        let store = InMemoryObjectStore::new();
        let target = write_blob(&store, b"target");
        let content = write_blob(&store, b"real content\n");
        let old = write_tree(
            &store,
            vec![TreeEntry::new(EntryMode::Symlink, "link", target)],
        );
        let new = write_tree(
            &store,
            vec![TreeEntry::new(EntryMode::Regular, "link", content)],
        );

        let changes = diff_trees(&store, &old, &new).unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes.changes[0].kind, ChangeKind::TypeChanged);
        assert_eq!(changes.type_changed().count(), 1);
        assert_eq!(changes.modified().count(), 0);
    }

    #[test]
    fn tree_replaced_by_blob_is_delete_add_pair() {
        let store = InMemoryObjectStore::new();
        let inner = write_blob(&store, b"inner\n");
        let sub = write_tree(&store, vec![file("inner.txt", inner)]);
        let flat = write_blob(&store, b"flat\n");
        let old = write_tree(&store, vec![dir("thing", sub)]);
        let new = write_tree(&store, vec![file("thing", flat)]);

        let changes = diff_trees(&store, &old, &new).unwrap();
        assert_eq!(changes.len(), 2);
        assert_eq!(changes.changes[0].path, "thing/inner.txt");
        assert_eq!(changes.changes[0].kind, ChangeKind::Deleted);
        assert_eq!(changes.changes[1].path, "thing");
        assert_eq!(changes.changes[1].kind, ChangeKind::Added);
    }

    #[test]
    fn deleted_subtree_expands_to_descendant_blobs() {
        let store = InMemoryObjectStore::new();
        let a = write_blob(&store, b"a\n");
        let b = write_blob(&store, b"b\n");
        let deep = write_tree(&store, vec![file("b.txt", b)]);
        let sub = write_tree(&store, vec![file("a.txt", a), dir("deep", deep)]);
        let old = write_tree(&store, vec![dir("src", sub)]);
        let new = write_tree(&store, vec![]);

        let changes = diff_trees(&store, &old, &new).unwrap();
        let paths: Vec<_> = changes.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["src/a.txt", "src/deep/b.txt"]);
        assert!(changes.iter().all(|c| c.kind == ChangeKind::Deleted));
    }

    #[test]
    fn unchanged_subtree_is_never_resolved() {
        let store = InMemoryObjectStore::new();
        let shared = write_blob(&store, b"shared\n");
        let sub = write_tree(&store, vec![file("shared.txt", shared)]);
        let v1 = write_blob(&store, b"v1\n");
        let v2 = write_blob(&store, b"v2\n");
        let old = write_tree(&store, vec![file("top.txt", v1), dir("lib", sub)]);
        let new = write_tree(&store, vec![file("top.txt", v2), dir("lib", sub)]);

        let counting = CountingStore::new(store);
        let changes = diff_trees(&counting, &old, &new).unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes.changes[0].path, "top.txt");
        assert!(!counting.was_read(&sub), "pruned subtree was resolved");
        assert!(!counting.was_read(&shared));
    }

    #[test]
    fn changes_come_out_in_traversal_order() {
        let store = InMemoryObjectStore::new();
        let x = write_blob(&store, b"x\n");
        let y = write_blob(&store, b"y\n");
        let sub_old = write_tree(&store, vec![]);
        let sub_new = write_tree(&store, vec![file("z.txt", x)]);
        let old = write_tree(&store, vec![dir("a", sub_old)]);
        let new = write_tree(&store, vec![dir("a", sub_new), file("b.txt", y)]);

        let changes = diff_trees(&store, &old, &new).unwrap();
        let paths: Vec<_> = changes.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["a/z.txt", "b.txt"]);
    }

    #[test]
    fn swap_symmetry() {
        let store = InMemoryObjectStore::new();
        let v1 = write_blob(&store, b"v1\n");
        let v2 = write_blob(&store, b"v2\n");
        let extra = write_blob(&store, b"extra\n");
        let old = write_tree(&store, vec![file("mod.txt", v1)]);
        let new = write_tree(&store, vec![file("mod.txt", v2), file("new.txt", extra)]);

        let forward = diff_trees(&store, &old, &new).unwrap();
        let backward = diff_trees(&store, &new, &old).unwrap();

        for added in forward.added() {
            assert!(backward
                .deleted()
                .any(|d| d.path == added.path && d.old_id == added.new_id));
        }
        for modified in forward.modified() {
            let mirrored = backward
                .modified()
                .find(|m| m.path == modified.path)
                .expect("modified path present in both directions");
            assert_eq!(mirrored.old_id, modified.new_id);
            assert_eq!(mirrored.new_id, modified.old_id);
        }
    }

    #[test]
    fn repeated_runs_are_identical() {
        let store = InMemoryObjectStore::new();
        let a = write_blob(&store, b"a\n");
        let b = write_blob(&store, b"b\n");
        let c = write_blob(&store, b"c\n");
        let sub = write_tree(&store, vec![file("x.txt", a)]);
        let old = write_tree(&store, vec![dir("d", sub), file("y.txt", b)]);
        let new = write_tree(&store, vec![file("y.txt", c)]);

        let first = diff_trees(&store, &old, &new).unwrap();
        let second = diff_trees(&store, &old, &new).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_subtree_object_is_object_not_found() {
        let store = InMemoryObjectStore::new();
        let dangling = ObjectId::from_bytes(b"never written");
        let other = write_tree(&store, vec![]);
        let old = write_tree(&store, vec![dir("lost", dangling)]);

        let err = diff_trees(&store, &old, &other).unwrap_err();
        assert!(matches!(err, DiffError::ObjectNotFound(id) if id == dangling));
    }

    #[test]
    fn duplicate_entry_names_are_corrupt() {
        let store = InMemoryObjectStore::new();
        let blob = write_blob(&store, b"x\n");
        // Bypass Tree::new to keep the duplicate pair.
        let tree = Tree {
            entries: vec![file("same.txt", blob), file("same.txt", blob)],
        };
        let id = store.write(&tree.to_stored_object().unwrap()).unwrap();
        let empty = write_tree(&store, vec![]);

        let err = diff_trees(&store, &id, &empty).unwrap_err();
        assert!(matches!(err, DiffError::CorruptTree { .. }));
    }

    #[test]
    fn directory_mode_entry_referencing_blob_is_corrupt() {
        let store = InMemoryObjectStore::new();
        let blob = write_blob(&store, b"not a tree");
        let old = write_tree(&store, vec![dir("broken", blob)]);
        let new = write_tree(&store, vec![]);

        let err = diff_trees(&store, &old, &new).unwrap_err();
        assert!(matches!(err, DiffError::CorruptTree { .. }));
    }

    #[test]
    fn blob_root_is_unexpected_kind() {
        let store = InMemoryObjectStore::new();
        let blob = write_blob(&store, b"not a tree");
        let tree = write_tree(&store, vec![]);

        let err = diff_trees(&store, &blob, &tree).unwrap_err();
        assert!(matches!(err, DiffError::UnexpectedObjectKind { .. }));
    }

    #[test]
    fn cancelled_token_aborts_the_walk() {
        let store = InMemoryObjectStore::new();
        let v1 = write_blob(&store, b"v1\n");
        let v2 = write_blob(&store, b"v2\n");
        let old = write_tree(&store, vec![file("f.txt", v1)]);
        let new = write_tree(&store, vec![file("f.txt", v2)]);

        let token = CancelToken::new();
        token.cancel();
        let err = diff_trees_cancellable(&store, &old, &new, &token).unwrap_err();
        assert!(matches!(err, DiffError::Cancelled));
    }

    #[test]
    fn change_records_serialize() {
        let store = InMemoryObjectStore::new();
        let v1 = write_blob(&store, b"v1\n");
        let old = write_tree(&store, vec![file("f.txt", v1)]);
        let new = write_tree(&store, vec![]);

        let changes = diff_trees(&store, &old, &new).unwrap();
        let json = serde_json::to_string(&changes).unwrap();
        let parsed: TreeChanges = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, changes);
    }
}
