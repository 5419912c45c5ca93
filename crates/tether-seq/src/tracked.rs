//! Registry-backed iterator with out-of-band rebasing.

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

use tether_core::{IterKey, OwnerRef, SeqError};

use crate::sequence::SafeSequence;

/// An iterator whose position is kept consistent across mutation.
///
/// The iterator itself stores only an owner handle and a registry key;
/// its logical index lives in the owner's registry entry and is rewritten
/// by the rebase pass on every structural edit. Insert two elements in
/// front of it and it shifts right by two; erase its element and it
/// drops into the end-sentinel state, where dereference reports
/// [`SeqError::Invalidated`] (the invalidation itself is silent).
///
/// Cloning allocates an independent registry entry copying the logical
/// position — two tracked iterators are never aliases of one slot.
/// Dropping releases the entry. The owner handle keeps the sequence (and
/// with it the registry) alive for the iterator's lifetime, so an entry
/// can never outlive its registry.
pub struct TrackedIter<T, H>
where
    H: OwnerRef<Target = SafeSequence<T>>,
{
    owner: H,
    key: IterKey,
    _elem: PhantomData<fn() -> T>,
}

impl<T, H> TrackedIter<T, H>
where
    T: Clone,
    H: OwnerRef<Target = SafeSequence<T>>,
{
    /// Tracked iterator at `index` (`index == len` is the end sentinel).
    pub fn at(owner: H, index: usize) -> Result<Self, SeqError> {
        let key = owner.target().tracked_allocate(index)?;
        Ok(Self {
            owner,
            key,
            _elem: PhantomData,
        })
    }

    /// This iterator's registry key. Diagnostic.
    pub fn key(&self) -> IterKey {
        self.key
    }

    /// Whether the iterator currently denotes a live element.
    ///
    /// False means the end-sentinel state: created at the end, stepped
    /// to it, or invalidated by removal of its element.
    pub fn points_to_item(&self) -> bool {
        self.entry().points_to_item
    }

    /// Current logical index. For a sentinel entry this is the sequence
    /// length at the last rebase.
    pub fn index(&self) -> usize {
        self.entry().index
    }

    /// Dereference: clone of the element this iterator denotes.
    ///
    /// An entry in the end-sentinel state dereferences to
    /// [`SeqError::Invalidated`] — surfaced here, at the call site, not
    /// at invalidation time.
    pub fn get(&self) -> Result<T, SeqError> {
        let entry = self.owner.target().tracked_entry(self.key)?;
        if !entry.points_to_item {
            return Err(SeqError::Invalidated);
        }
        self.owner.target().get(entry.index)
    }

    /// Step forward by `n`. The destination must lie in `[0, len]`;
    /// landing exactly on `len` puts the iterator in the end-sentinel
    /// state.
    pub fn advance(&mut self, n: usize) -> Result<(), SeqError> {
        self.step(|index| index.checked_add(n))
    }

    /// Step backward by `n`. Stepping before position 0 is an error and
    /// leaves the position unchanged.
    pub fn regress(&mut self, n: usize) -> Result<(), SeqError> {
        self.step(|index| index.checked_sub(n))
    }

    fn step(&mut self, dest: impl FnOnce(usize) -> Option<usize>) -> Result<(), SeqError> {
        let owner = self.owner.target();
        let entry = owner.tracked_entry(self.key)?;
        let len = owner.len();
        let dest = dest(entry.index).ok_or(SeqError::OutOfRange {
            index: entry.index,
            len,
        })?;
        if dest > len {
            return Err(SeqError::OutOfRange { index: dest, len });
        }
        owner.tracked_set(self.key, dest, dest < len)
    }

    /// Ordering against another tracked iterator of the same owner.
    pub fn try_cmp(&self, other: &Self) -> Result<Ordering, SeqError> {
        if !self.owner.same_target(&other.owner) {
            return Err(SeqError::MismatchedOwners);
        }
        Ok(self.index().cmp(&other.index()))
    }

    /// Equality against another tracked iterator of the same owner.
    pub fn try_eq(&self, other: &Self) -> Result<bool, SeqError> {
        Ok(self.try_cmp(other)? == Ordering::Equal)
    }

    /// Fetch this iterator's entry. The owner handle keeps the registry
    /// alive, so a missing entry is an internal-consistency bug, not a
    /// caller error.
    fn entry(&self) -> crate::registry::RegistryEntry {
        self.owner
            .target()
            .tracked_entry(self.key)
            .expect("tracked iterator entry missing from its registry")
    }
}

impl<T, H> Clone for TrackedIter<T, H>
where
    T: Clone,
    H: OwnerRef<Target = SafeSequence<T>> + Clone,
{
    fn clone(&self) -> Self {
        let entry = self.entry();
        let key = self
            .owner
            .target()
            .tracked_allocate_raw(entry.index, entry.points_to_item);
        Self {
            owner: self.owner.clone(),
            key,
            _elem: PhantomData,
        }
    }
}

impl<T, H> Drop for TrackedIter<T, H>
where
    H: OwnerRef<Target = SafeSequence<T>>,
{
    fn drop(&mut self) {
        // The entry must exist for the iterator's whole life; a failed
        // release here would mean the contract was already broken, and
        // drop has nowhere to report it.
        let _ = self.owner.target().tracked_release(self.key);
    }
}

impl<T, H> fmt::Debug for TrackedIter<T, H>
where
    H: OwnerRef<Target = SafeSequence<T>>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackedIter").field("key", &self.key).finish()
    }
}
