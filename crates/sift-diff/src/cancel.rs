//! Caller-driven cancellation for long tree comparisons.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cloneable cancellation flag.
///
/// Clones share the same flag, so a caller can hand one clone to a
/// comparison and trip the other from a different thread. The tree walker
/// checks the flag at every tree-node boundary and aborts with
/// [`DiffError::Cancelled`](crate::DiffError::Cancelled); partial results
/// are never returned.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once `cancel` has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
