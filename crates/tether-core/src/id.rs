//! Strongly-typed identity keys for sequences and tracked iterators.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`IterKey`] allocation.
static ITER_KEY_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Opaque key identifying one tracked-iterator entry in a registry.
///
/// Allocated from a monotonic atomic counter via [`IterKey::next`]. Two
/// distinct tracked iterators always have different keys, even when they
/// denote the same logical position — copying an iterator allocates a
/// fresh entry, never an alias.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IterKey(u64);

impl IterKey {
    /// Allocate a fresh, unique key.
    ///
    /// Each call returns a key that has never been returned before within
    /// this process. Thread-safe.
    pub fn next() -> Self {
        Self(ITER_KEY_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for IterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Counter for unique [`SequenceId`] allocation.
static SEQUENCE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for a sequence object.
///
/// Allocated from a monotonic atomic counter via [`SequenceId::next`].
/// Used for cross-container identity checks and for deterministic lock
/// ordering in whole-container swaps. Address comparison alone is not
/// enough: a dropped sequence's address can be reused (ABA), while an
/// ID never recurs within a process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SequenceId(u64);

impl SequenceId {
    /// Allocate a fresh, unique instance ID. Thread-safe.
    pub fn next() -> Self {
        Self(SEQUENCE_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
