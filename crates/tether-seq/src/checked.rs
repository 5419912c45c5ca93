//! Bounds-revalidated iterator.

use std::cmp::Ordering;

use tether_core::{OwnerRef, SeqError};

use crate::sequence::SafeSequence;

/// An (owner-handle, logical-index) pair that re-validates the index
/// against the owner's current length on every access.
///
/// There is no persistent registration: each dereference and comparison
/// independently re-reads the owner's length. That makes the iterator
/// consistent under owner mutation in the sense that out-of-range access
/// is always *detected* — but it is not *rebased*. If an element is
/// erased in front of it, its numeric index now denotes a different
/// logical element. [`crate::TrackedIter`] is the rebased counterpart.
///
/// `H` is any owner handle ([`OwnerRef`]); the iterator works the same
/// over a borrowed `&SafeSequence` or an `Arc<SafeSequence>`.
#[derive(Clone, Debug)]
pub struct CheckedIter<H> {
    owner: H,
    index: usize,
}

impl<T, H> CheckedIter<H>
where
    T: Clone,
    H: OwnerRef<Target = SafeSequence<T>>,
{
    /// Iterator at position 0.
    pub fn begin(owner: H) -> Self {
        Self { owner, index: 0 }
    }

    /// Iterator at the end sentinel (`index == len`).
    pub fn end(owner: H) -> Self {
        let index = owner.target().len();
        Self { owner, index }
    }

    /// Iterator at `index` (`index == len` is the end sentinel).
    pub fn at(owner: H, index: usize) -> Result<Self, SeqError> {
        let len = owner.target().len();
        if index > len {
            return Err(SeqError::OutOfRange { index, len });
        }
        Ok(Self { owner, index })
    }

    /// Current logical index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether the iterator sits at position 0.
    pub fn at_start(&self) -> bool {
        self.index == 0
    }

    /// Whether the iterator sits at the end sentinel, against the
    /// owner's *current* length.
    pub fn at_end(&self) -> bool {
        self.index == self.owner.target().len()
    }

    /// Step forward by `n`. The destination must lie in `[0, len]`;
    /// stepping past the sentinel is an error and leaves the position
    /// unchanged.
    pub fn advance(&mut self, n: usize) -> Result<(), SeqError> {
        let len = self.owner.target().len();
        let dest = self.index.saturating_add(n);
        if dest > len {
            return Err(SeqError::OutOfRange { index: dest, len });
        }
        self.index = dest;
        Ok(())
    }

    /// Step backward by `n`. Stepping before position 0 is an error and
    /// leaves the position unchanged.
    pub fn regress(&mut self, n: usize) -> Result<(), SeqError> {
        let len = self.owner.target().len();
        match self.index.checked_sub(n) {
            Some(dest) => {
                self.index = dest;
                Ok(())
            }
            None => Err(SeqError::OutOfRange {
                index: self.index,
                len,
            }),
        }
    }

    /// Dereference: clone of the element at the current index.
    ///
    /// The end sentinel dereferences to [`SeqError::EndDeref`]; an index
    /// stranded past the end by owner shrinkage dereferences to
    /// [`SeqError::OutOfRange`].
    pub fn get(&self) -> Result<T, SeqError> {
        let index = self.index;
        self.owner.target().with_buffer(|buf| {
            let len = buf.len();
            if index == len {
                return Err(SeqError::EndDeref { len });
            }
            buf.get(index).cloned()
        })
    }

    /// Offset dereference: clone of the element at `index + offset`.
    pub fn get_at(&self, offset: isize) -> Result<T, SeqError> {
        let index = self.index;
        self.owner.target().with_buffer(|buf| {
            let len = buf.len();
            let dest = checked_offset(index, offset)
                .ok_or(SeqError::OutOfRange { index: 0, len })?;
            if dest == len {
                return Err(SeqError::EndDeref { len });
            }
            buf.get(dest).cloned()
        })
    }

    /// Ordering against another iterator of the same owner.
    ///
    /// Comparing iterators of different sequences is an error, never a
    /// silent `false`.
    pub fn try_cmp(&self, other: &Self) -> Result<Ordering, SeqError> {
        if !self.owner.same_target(&other.owner) {
            return Err(SeqError::MismatchedOwners);
        }
        Ok(self.index.cmp(&other.index))
    }

    /// Equality against another iterator of the same owner.
    pub fn try_eq(&self, other: &Self) -> Result<bool, SeqError> {
        Ok(self.try_cmp(other)? == Ordering::Equal)
    }
}

/// Signed offset from an unsigned index, `None` on underflow/overflow.
fn checked_offset(index: usize, offset: isize) -> Option<usize> {
    if offset >= 0 {
        index.checked_add(offset as usize)
    } else {
        index.checked_sub(offset.unsigned_abs())
    }
}
