//! Structural-edit reports.

use std::fmt;

/// Describes one structural edit of a [`crate::Buffer`].
///
/// The report is not cosmetic: the rebase pass that keeps tracked
/// iterators consistent needs the *pre-edit* length and the affected
/// range, and deriving them after the fact from the post-edit buffer is
/// impossible in general. Every structural operation therefore captures
/// them as it runs and hands them back to the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct MutationReport {
    /// Length before the edit.
    pub old_len: usize,
    /// Capacity before the edit.
    pub old_capacity: usize,
    /// First index affected by the edit.
    pub start: usize,
    /// Number of elements removed at `start`.
    pub removed: usize,
    /// Number of elements inserted at `start`.
    pub inserted: usize,
    /// Whether the storage was reallocated (elements moved in memory).
    pub reallocated: bool,
}

impl MutationReport {
    /// Net length change: `inserted - removed`.
    pub fn delta(&self) -> isize {
        self.inserted as isize - self.removed as isize
    }

    /// Length after the edit.
    pub fn new_len(&self) -> usize {
        self.old_len - self.removed + self.inserted
    }

    /// Whether the edit changed the length or moved elements.
    ///
    /// A pure capacity reservation reallocates without shifting logical
    /// positions; it is structural for raw-pointer purposes but a no-op
    /// for the rebase pass.
    pub fn shifted_positions(&self) -> bool {
        self.removed != 0 || self.inserted != 0
    }
}

impl fmt::Display for MutationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "edit at {}: -{} +{} (len {} -> {}, realloc: {})",
            self.start,
            self.removed,
            self.inserted,
            self.old_len,
            self.new_len(),
            self.reallocated
        )
    }
}
