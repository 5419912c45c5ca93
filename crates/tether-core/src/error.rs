//! Error types for the Tether safe-sequence workspace.
//!
//! One enum covers the whole taxonomy: range violations, empty-container
//! access, invalidated-iterator access, and structure-lock refusal. The
//! range family (everything except [`SeqError::StructureLocked`] and
//! [`SeqError::UnknownIter`]) is distinguishable via
//! [`SeqError::is_range_error`].
//!
//! All failures are synchronous and surfaced at the call that detects
//! them. Nothing is retried internally and nothing is swallowed; the
//! caller decides whether to retry with corrected arguments, propagate,
//! or abort.

use std::error::Error;
use std::fmt;

use crate::id::IterKey;

/// Errors that can occur during sequence and iterator operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeqError {
    /// Index or position outside `[0, len]` (or `[0, len)` for element
    /// access).
    OutOfRange {
        /// The offending index.
        index: usize,
        /// Sequence length at the time of the check.
        len: usize,
    },
    /// A half-open `[start, end)` range with `start > end` or `end > len`.
    InvalidRange {
        /// Requested range start.
        start: usize,
        /// Requested range end (exclusive).
        end: usize,
        /// Sequence length at the time of the check.
        len: usize,
    },
    /// Iterator comparison or arithmetic across two different owning
    /// sequences. Cross-container comparison is never silently false.
    MismatchedOwners,
    /// Dereference of the end sentinel (`index == len`).
    EndDeref {
        /// Sequence length at the time of the dereference.
        len: usize,
    },
    /// Front/back/pop on a zero-length sequence.
    Empty,
    /// Dereference of a tracked iterator whose element was removed.
    ///
    /// Invalidation itself is silent bookkeeping; this error surfaces at
    /// the dereference call site, not at invalidation time.
    Invalidated,
    /// A structural mutation was attempted while read pins are
    /// outstanding. Proceeding could relocate storage out from under the
    /// raw references the pins license.
    StructureLocked {
        /// Number of live pins observed at refusal time.
        pins: usize,
    },
    /// The registry was asked about a key it does not hold. Indicates an
    /// iterator outliving its registry, which the ownership contract
    /// forbids.
    UnknownIter {
        /// The unrecognised key.
        key: IterKey,
    },
}

impl SeqError {
    /// Whether this error belongs to the range-violation family.
    ///
    /// [`SeqError::Empty`] and [`SeqError::Invalidated`] are range-error
    /// subtypes: they describe access to a position that holds no
    /// element.
    pub fn is_range_error(&self) -> bool {
        !matches!(
            self,
            Self::StructureLocked { .. } | Self::UnknownIter { .. }
        )
    }
}

impl fmt::Display for SeqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
            Self::InvalidRange { start, end, len } => {
                write!(f, "invalid range [{start}, {end}) for length {len}")
            }
            Self::MismatchedOwners => {
                write!(f, "iterators belong to different sequences")
            }
            Self::EndDeref { len } => {
                write!(f, "dereference of end sentinel (length {len})")
            }
            Self::Empty => write!(f, "operation on empty sequence"),
            Self::Invalidated => {
                write!(f, "tracked iterator invalidated: its element was removed")
            }
            Self::StructureLocked { pins } => {
                write!(
                    f,
                    "structural mutation refused: {pins} read pin(s) outstanding"
                )
            }
            Self::UnknownIter { key } => {
                write!(f, "unknown tracked-iterator key {key}")
            }
        }
    }
}

impl Error for SeqError {}
