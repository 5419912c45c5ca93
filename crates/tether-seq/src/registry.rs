//! Per-sequence bookkeeping of live tracked iterators.
//!
//! [`IterRegistry`] holds one [`RegistryEntry`] per live
//! [`crate::TrackedIter`] and rewrites entry positions whenever the
//! owning sequence is structurally edited. The sequence facade drives it
//! with two primitives inside the same critical section as the buffer
//! edit: [`IterRegistry::invalidate_range`] for entries whose elements
//! were destroyed, then [`IterRegistry::shift_range`] for entries whose
//! elements survived but moved.
//!
//! Most sequences accumulate zero or a handful of tracked iterators at a
//! time, so the entry store starts as a fixed-capacity inline array and
//! promotes to a keyed map only once that capacity is exceeded. Promotion
//! is one-directional: the store never demotes back to inline. This is a
//! performance optimization, not a correctness requirement — behavior is
//! identical in both states.

use indexmap::IndexMap;
use smallvec::SmallVec;

use tether_core::{IterKey, SeqError};

/// Number of entries the inline fast path holds before promoting to the
/// keyed map.
pub const INLINE_CAP: usize = 6;

/// One tracked iterator's authoritative position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegistryEntry {
    /// Key of the owning tracked iterator.
    pub key: IterKey,
    /// Logical index into the owning sequence. When `points_to_item` is
    /// false this equals the sequence length at the time the entry was
    /// last rebased (the end-sentinel position).
    pub index: usize,
    /// Whether the entry denotes a live element. False means the entry
    /// is in the end-sentinel state: either it was created at the end,
    /// or its element was removed.
    pub points_to_item: bool,
}

/// The two-state entry store: inline array first, keyed map once the
/// inline capacity is exceeded.
#[derive(Clone, Debug)]
enum EntryStore {
    Inline(SmallVec<[RegistryEntry; INLINE_CAP]>),
    Mapped(IndexMap<IterKey, RegistryEntry>),
}

/// Registry of all live tracked iterators of one sequence.
#[derive(Clone, Debug)]
pub struct IterRegistry {
    store: EntryStore,
}

impl Default for IterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl IterRegistry {
    /// Create an empty registry (inline state, no allocation).
    pub fn new() -> Self {
        Self {
            store: EntryStore::Inline(SmallVec::new()),
        }
    }

    /// Number of live entries.
    pub fn live_count(&self) -> usize {
        match &self.store {
            EntryStore::Inline(v) => v.len(),
            EntryStore::Mapped(m) => m.len(),
        }
    }

    /// Whether the store has promoted to the keyed map. Diagnostic only;
    /// behavior is identical in both states.
    pub fn is_mapped(&self) -> bool {
        matches!(self.store, EntryStore::Mapped(_))
    }

    /// Allocate a fresh entry at `index` and return its key.
    ///
    /// Promotes the store to the keyed map when the inline capacity is
    /// exceeded. The store never demotes.
    pub fn allocate(&mut self, index: usize, points_to_item: bool) -> IterKey {
        let key = IterKey::next();
        let entry = RegistryEntry {
            key,
            index,
            points_to_item,
        };
        match &mut self.store {
            EntryStore::Inline(v) if v.len() < INLINE_CAP => v.push(entry),
            EntryStore::Inline(v) => {
                let mut map: IndexMap<IterKey, RegistryEntry> =
                    v.drain(..).map(|e| (e.key, e)).collect();
                map.insert(key, entry);
                self.store = EntryStore::Mapped(map);
            }
            EntryStore::Mapped(m) => {
                m.insert(key, entry);
            }
        }
        key
    }

    /// Release the entry for `key`.
    pub fn release(&mut self, key: IterKey) -> Result<(), SeqError> {
        match &mut self.store {
            EntryStore::Inline(v) => {
                let pos = v
                    .iter()
                    .position(|e| e.key == key)
                    .ok_or(SeqError::UnknownIter { key })?;
                v.remove(pos);
                Ok(())
            }
            EntryStore::Mapped(m) => m
                .shift_remove(&key)
                .map(|_| ())
                .ok_or(SeqError::UnknownIter { key }),
        }
    }

    /// Look up the entry for `key`.
    pub fn entry(&self, key: IterKey) -> Result<RegistryEntry, SeqError> {
        match &self.store {
            EntryStore::Inline(v) => v.iter().find(|e| e.key == key).copied(),
            EntryStore::Mapped(m) => m.get(&key).copied(),
        }
        .ok_or(SeqError::UnknownIter { key })
    }

    /// Reposition the entry for `key`. Used by the tracked iterator's own
    /// advance/regress, not by the rebase pass.
    pub fn set_position(
        &mut self,
        key: IterKey,
        index: usize,
        points_to_item: bool,
    ) -> Result<(), SeqError> {
        let entry = match &mut self.store {
            EntryStore::Inline(v) => v.iter_mut().find(|e| e.key == key),
            EntryStore::Mapped(m) => m.get_mut(&key),
        }
        .ok_or(SeqError::UnknownIter { key })?;
        entry.index = index;
        entry.points_to_item = points_to_item;
        Ok(())
    }

    /// Force every entry whose index falls in the inclusive range
    /// `[first, last]` into the end-sentinel state at `end_index`.
    ///
    /// Used when the elements in that index range are being destroyed;
    /// `end_index` is the sequence length after the removal. Invalidation
    /// is silent bookkeeping — the affected iterators only surface an
    /// error if they are later dereferenced.
    pub fn invalidate_range(&mut self, first: usize, last: usize, end_index: usize) {
        self.for_each(|e| {
            if e.index >= first && e.index <= last {
                e.index = end_index;
                e.points_to_item = false;
            }
        });
    }

    /// Shift by `delta` every entry whose index falls in the inclusive
    /// range `[first, last]`.
    ///
    /// Sentinel entries (not pointing to an item) shift only when they
    /// sit exactly at `last` — the old end position — so that end
    /// iterators and previously invalidated iterators follow the end of
    /// the sequence, while entries invalidated earlier in the same rebase
    /// pass (already re-homed below `last`) are left alone.
    pub fn shift_range(&mut self, first: usize, last: usize, delta: isize) {
        self.for_each(|e| {
            if e.index >= first && e.index <= last && (e.points_to_item || e.index == last) {
                e.index = apply_delta(e.index, delta);
            }
        });
    }

    /// Force every entry into the end-sentinel state at `end_index`.
    ///
    /// Used by whole-container replacement, where no partial
    /// correspondence between old and new contents is meaningful.
    pub fn reset(&mut self, end_index: usize) {
        self.for_each(|e| {
            e.index = end_index;
            e.points_to_item = false;
        });
    }

    fn for_each(&mut self, mut f: impl FnMut(&mut RegistryEntry)) {
        match &mut self.store {
            EntryStore::Inline(v) => v.iter_mut().for_each(&mut f),
            EntryStore::Mapped(m) => m.values_mut().for_each(&mut f),
        }
    }
}

/// Apply a signed delta to an index. The rebase pass only ever produces
/// deltas that keep indices in `[0, new_len]`, so saturation is a
/// defect-containment measure, not a semantic.
fn apply_delta(index: usize, delta: isize) -> usize {
    if delta >= 0 {
        index.saturating_add(delta as usize)
    } else {
        index.saturating_sub(delta.unsigned_abs())
    }
}
