//! Content-addressed object model and store capability for sift.
//!
//! Snapshots are made of two object kinds, both immutable and keyed by the
//! BLAKE3 hash of their content (domain-separated by kind):
//!
//! - [`Blob`] -- raw file content
//! - [`Tree`] -- directory listing mapping names to blob or subtree ids
//!
//! The diff engine consumes storage through the [`ObjectStore`] trait and
//! never cares where objects live (disk, memory, network). This crate ships
//! one backend, [`InMemoryObjectStore`], for tests and embedding.
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written (content-addressing guarantees this).
//! 2. Concurrent reads are always safe.
//! 3. The store never interprets object contents -- it is a pure key-value
//!    store; decoding happens in [`Tree::from_stored_object`] and friends.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod hasher;
pub mod memory;
pub mod object;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use hasher::ContentHasher;
pub use memory::InMemoryObjectStore;
pub use object::{Blob, EntryMode, ObjectKind, StoredObject, Tree, TreeEntry};
pub use traits::ObjectStore;
