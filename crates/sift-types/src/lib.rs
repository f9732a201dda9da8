//! Foundation types for sift.
//!
//! Everything sift stores or compares is addressed by content hash. This
//! crate provides the identifier type shared by every other sift crate.
//!
//! # Key Types
//!
//! - [`ObjectId`] -- Content-addressed identifier (BLAKE3 hash)

pub mod error;
pub mod object;

pub use error::TypeError;
pub use object::ObjectId;
