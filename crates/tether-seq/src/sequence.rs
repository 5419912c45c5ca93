//! The sequence facade: sole writer of the buffer, sole driver of the
//! iterator registry.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};

use tether_buffer::{Buffer, MutationReport};
use tether_core::{IterKey, SeqError, SequenceId};

use crate::checked::CheckedIter;
use crate::pin::ReadPin;
use crate::registry::{IterRegistry, RegistryEntry};
use crate::tracked::TrackedIter;

/// A growable sequence whose iterators survive mutation.
///
/// All mutation goes through this facade. Every mutating operation runs
/// under the exclusive side of the structure lock and, inside the same
/// critical section, drives the registry rebase with the range and delta
/// captured *before* the edit. A reader acquiring the lock after a
/// mutation completes therefore always observes a fully rebased registry;
/// there is no window in which a length change is visible without its
/// matching rebase.
///
/// Structural mutation is refused (not blocked) while any [`ReadPin`] is
/// outstanding: proceeding could reallocate storage out from under the
/// borrowed references the pin licenses. Mutators otherwise block only on
/// each other and on transient readers.
///
/// Checked and tracked iterator operations are not themselves serialized
/// against writers beyond their individual lock acquisitions; callers
/// who interleave iterator use with concurrent writers get the documented
/// per-call guarantees (errors, never unchecked access), not snapshot
/// semantics.
#[derive(Debug)]
pub struct SafeSequence<T> {
    /// The structure lock and the storage it protects.
    buffer: RwLock<Buffer<T>>,
    /// Tracked-iterator registry. A separate lock so that iterator
    /// construction and drop never contend with a same-thread pin.
    registry: Mutex<IterRegistry>,
    /// Number of live read pins.
    pins: AtomicUsize,
    /// Process-unique identity, used for cross-container checks and
    /// deterministic lock ordering in [`SafeSequence::swap`].
    id: SequenceId,
}

// Compile-time assertion: SafeSequence must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<SafeSequence<char>>();
};

impl<T: Clone> Default for SafeSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> SafeSequence<T> {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Self::from_buffer(Buffer::new())
    }

    /// Create an empty sequence with at least `capacity` slots reserved.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_buffer(Buffer::with_capacity(capacity))
    }

    /// Create a sequence holding a copy of `slice`.
    pub fn from_slice(slice: &[T]) -> Self {
        Self::from_buffer(Buffer::from_slice(slice))
    }

    fn from_buffer(buffer: Buffer<T>) -> Self {
        Self {
            buffer: RwLock::new(buffer),
            registry: Mutex::new(IterRegistry::new()),
            pins: AtomicUsize::new(0),
            id: SequenceId::next(),
        }
    }

    /// Process-unique identity of this sequence.
    pub fn id(&self) -> SequenceId {
        self.id
    }

    // ── Read side ───────────────────────────────────────────────

    /// Current length.
    pub fn len(&self) -> usize {
        self.buffer.read().unwrap().len()
    }

    /// Whether the sequence holds no elements.
    pub fn is_empty(&self) -> bool {
        self.buffer.read().unwrap().is_empty()
    }

    /// Current storage capacity.
    pub fn capacity(&self) -> usize {
        self.buffer.read().unwrap().capacity()
    }

    /// Checked element access, returning a clone.
    ///
    /// Borrowed access requires a [`ReadPin`]; see
    /// [`SafeSequence::read_pin`].
    pub fn get(&self, index: usize) -> Result<T, SeqError> {
        self.buffer.read().unwrap().get(index).cloned()
    }

    /// Clone of the first element, or [`SeqError::Empty`].
    pub fn front(&self) -> Result<T, SeqError> {
        self.buffer.read().unwrap().front().cloned()
    }

    /// Clone of the last element, or [`SeqError::Empty`].
    pub fn back(&self) -> Result<T, SeqError> {
        self.buffer.read().unwrap().back().cloned()
    }

    /// Copy of the entire contents. This is the constructor interface
    /// for read-only views: a length-snapshot plus contents, with no
    /// mutation rights attached.
    pub fn snapshot(&self) -> Vec<T> {
        self.buffer.read().unwrap().as_slice().to_vec()
    }

    /// Copy up to `count` elements starting at `offset` into `out`,
    /// returning the number copied. The count is clamped to the
    /// remaining length and to the size of `out`.
    pub fn copy_into(&self, out: &mut [T], count: usize, offset: usize) -> Result<usize, SeqError> {
        self.buffer.read().unwrap().copy_into(out, count, offset)
    }

    // ── Iterator factories ──────────────────────────────────────

    /// Checked iterator at position 0.
    pub fn checked_begin(&self) -> CheckedIter<&Self> {
        CheckedIter::begin(self)
    }

    /// Checked iterator at the end sentinel.
    pub fn checked_end(&self) -> CheckedIter<&Self> {
        CheckedIter::end(self)
    }

    /// Checked iterator at `index` (`index == len` is the end sentinel).
    pub fn checked_at(&self, index: usize) -> Result<CheckedIter<&Self>, SeqError> {
        CheckedIter::at(self, index)
    }

    /// Tracked iterator at `index` (`index == len` is the end sentinel).
    ///
    /// The iterator's position is rebased across every subsequent
    /// structural edit of this sequence until it is dropped.
    pub fn tracked_at(&self, index: usize) -> Result<TrackedIter<T, &Self>, SeqError> {
        TrackedIter::at(self, index)
    }

    /// Acquire a shared-mode structure pin.
    ///
    /// While the pin is alive, borrowed element access is licensed and
    /// every structural mutation of this sequence fails with
    /// [`SeqError::StructureLocked`]. Released on drop, on every exit
    /// path.
    pub fn read_pin(&self) -> ReadPin<'_, T> {
        self.pins.fetch_add(1, Ordering::AcqRel);
        let guard = self.buffer.read().unwrap();
        ReadPin::new(self, guard)
    }

    // ── Mutating side ───────────────────────────────────────────

    /// Append one element.
    pub fn push_back(&self, value: T) -> Result<(), SeqError> {
        self.mutate(|buf, reg| {
            let report = buf.push_back(value);
            rebase(reg, &report);
            Ok(())
        })
    }

    /// Remove and return the last element.
    pub fn pop_back(&self) -> Result<T, SeqError> {
        self.mutate(|buf, reg| {
            let (value, report) = buf.pop_back()?;
            rebase(reg, &report);
            Ok(value)
        })
    }

    /// Insert a copy of `values` at `pos` (`pos == len` appends).
    ///
    /// Every tracked position at or after `pos` shifts right by
    /// `values.len()`.
    pub fn insert_slice(&self, pos: usize, values: &[T]) -> Result<(), SeqError> {
        self.mutate(|buf, reg| {
            let report = buf.insert_slice(pos, values)?;
            rebase(reg, &report);
            Ok(())
        })
    }

    /// Remove the half-open range `[from, to)`.
    ///
    /// Tracked positions inside the range are invalidated; tracked
    /// positions past it shift left by `to - from`.
    pub fn erase(&self, from: usize, to: usize) -> Result<(), SeqError> {
        self.mutate(|buf, reg| {
            let report = buf.erase(from, to)?;
            rebase(reg, &report);
            Ok(())
        })
    }

    /// Resize to `new_len`, filling growth with clones of `fill`.
    pub fn resize(&self, new_len: usize, fill: T) -> Result<(), SeqError> {
        self.mutate(|buf, reg| {
            let report = buf.resize(new_len, fill);
            rebase(reg, &report);
            Ok(())
        })
    }

    /// Shorten to at most `new_len` elements.
    pub fn truncate(&self, new_len: usize) -> Result<(), SeqError> {
        self.mutate(|buf, reg| {
            let report = buf.truncate(new_len);
            rebase(reg, &report);
            Ok(())
        })
    }

    /// Replace the entire contents with a copy of `values`.
    ///
    /// Whole-container replacement: every tracked iterator is reset to
    /// the end sentinel, since no correspondence between old and new
    /// contents is meaningful.
    pub fn assign(&self, values: &[T]) -> Result<(), SeqError> {
        self.mutate(|buf, reg| {
            let report = buf.assign(values);
            reg.reset(report.new_len());
            Ok(())
        })
    }

    /// Remove all elements.
    pub fn clear(&self) -> Result<(), SeqError> {
        self.mutate(|buf, reg| {
            let report = buf.clear();
            rebase(reg, &report);
            Ok(())
        })
    }

    /// Append a copy of `values`.
    pub fn extend_from_slice(&self, values: &[T]) -> Result<(), SeqError> {
        self.mutate(|buf, reg| {
            let report = buf.append_from(values.iter().cloned());
            rebase(reg, &report);
            Ok(())
        })
    }

    /// Reserve capacity for at least `additional` more elements.
    ///
    /// Shifts no logical positions (tracked iterators are unaffected)
    /// but may reallocate, which is exactly what read pins forbid — so
    /// this is a structural mutation like any other.
    pub fn reserve(&self, additional: usize) -> Result<(), SeqError> {
        self.mutate(|buf, _reg| {
            let _report = buf.reserve(additional);
            Ok(())
        })
    }

    /// Swap contents with another sequence.
    ///
    /// Both registries are reset: tracked iterators do not follow
    /// elements across containers. Locks are acquired in [`SequenceId`]
    /// order, so two concurrent swaps of the same pair cannot deadlock.
    pub fn swap(&self, other: &Self) -> Result<(), SeqError> {
        if std::ptr::eq(self, other) {
            return Ok(());
        }
        let self_pins = self.pins.load(Ordering::Acquire);
        if self_pins > 0 {
            return Err(SeqError::StructureLocked { pins: self_pins });
        }
        let other_pins = other.pins.load(Ordering::Acquire);
        if other_pins > 0 {
            return Err(SeqError::StructureLocked { pins: other_pins });
        }

        let (first, second) = if self.id <= other.id {
            (self, other)
        } else {
            (other, self)
        };
        let mut buf_a = first.buffer.write().unwrap();
        let mut buf_b = second.buffer.write().unwrap();
        let mut reg_a = first.registry.lock().unwrap();
        let mut reg_b = second.registry.lock().unwrap();

        buf_a.swap(&mut buf_b);
        reg_a.reset(buf_a.len());
        reg_b.reset(buf_b.len());
        Ok(())
    }

    /// Run one mutating operation: refuse under pins, then hold the
    /// exclusive lock and the registry for the whole edit + rebase.
    ///
    /// The registry rebase must not run when the buffer edit itself
    /// failed; the closure returns the buffer error before touching the
    /// registry, so either both complete or neither does.
    fn mutate<R>(
        &self,
        f: impl FnOnce(&mut Buffer<T>, &mut IterRegistry) -> Result<R, SeqError>,
    ) -> Result<R, SeqError> {
        let pins = self.pins.load(Ordering::Acquire);
        if pins > 0 {
            return Err(SeqError::StructureLocked { pins });
        }
        let mut buf = self.buffer.write().unwrap();
        let mut reg = self.registry.lock().unwrap();
        f(&mut buf, &mut reg)
    }
}

/// Plumbing shared with iterators and pins. Deliberately free of the
/// `T: Clone` bound so that iterator drop glue works for any element.
impl<T> SafeSequence<T> {
    /// Number of live tracked iterators. Diagnostic.
    pub fn tracked_count(&self) -> usize {
        self.registry.lock().unwrap().live_count()
    }

    pub(crate) fn release_pin(&self) {
        self.pins.fetch_sub(1, Ordering::AcqRel);
    }

    pub(crate) fn with_buffer<R>(&self, f: impl FnOnce(&Buffer<T>) -> R) -> R {
        let buf = self.buffer.read().unwrap();
        f(&buf)
    }

    /// Allocate a registry entry without validating the index. Used by
    /// tracked-iterator cloning, which copies an already-valid position.
    pub(crate) fn tracked_allocate_raw(&self, index: usize, points_to_item: bool) -> IterKey {
        self.registry.lock().unwrap().allocate(index, points_to_item)
    }

    /// Allocate a registry entry at `index`, validating it against the
    /// current length (`index == len` is the end sentinel).
    pub(crate) fn tracked_allocate(&self, index: usize) -> Result<IterKey, SeqError> {
        let len = self.buffer.read().unwrap().len();
        if index > len {
            return Err(SeqError::OutOfRange { index, len });
        }
        Ok(self.tracked_allocate_raw(index, index < len))
    }

    pub(crate) fn tracked_entry(&self, key: IterKey) -> Result<RegistryEntry, SeqError> {
        self.registry.lock().unwrap().entry(key)
    }

    pub(crate) fn tracked_set(
        &self,
        key: IterKey,
        index: usize,
        points_to_item: bool,
    ) -> Result<(), SeqError> {
        self.registry.lock().unwrap().set_position(key, index, points_to_item)
    }

    pub(crate) fn tracked_release(&self, key: IterKey) -> Result<(), SeqError> {
        self.registry.lock().unwrap().release(key)
    }
}

impl<T: Clone> From<&[T]> for SafeSequence<T> {
    fn from(slice: &[T]) -> Self {
        Self::from_slice(slice)
    }
}

impl<T: Clone> FromIterator<T> for SafeSequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut buf = Buffer::new();
        let _report = buf.append_from(iter);
        Self::from_buffer(buf)
    }
}

/// Translate one edit report into the registry's invalidate/shift pass.
///
/// Invalidation runs first: entries whose elements were destroyed are
/// re-homed to the post-edit end. The shift then relocates survivors in
/// `[start + removed, old_len]`, a range that cannot contain the
/// just-invalidated entries, whose sentinel index sits below the old end
/// whenever anything was removed.
fn rebase(reg: &mut IterRegistry, report: &MutationReport) {
    if !report.shifted_positions() {
        return;
    }
    if report.removed > 0 {
        reg.invalidate_range(
            report.start,
            report.start + report.removed - 1,
            report.new_len(),
        );
    }
    reg.shift_range(report.start + report.removed, report.old_len, report.delta());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abcdef() -> SafeSequence<char> {
        SafeSequence::from_slice(&['a', 'b', 'c', 'd', 'e', 'f'])
    }

    #[test]
    fn read_side_basics() {
        let s = abcdef();
        assert_eq!(s.len(), 6);
        assert!(!s.is_empty());
        assert_eq!(s.get(0).unwrap(), 'a');
        assert_eq!(s.get(5).unwrap(), 'f');
        assert_eq!(s.get(6), Err(SeqError::OutOfRange { index: 6, len: 6 }));
        assert_eq!(s.front().unwrap(), 'a');
        assert_eq!(s.back().unwrap(), 'f');
        assert_eq!(s.snapshot(), vec!['a', 'b', 'c', 'd', 'e', 'f']);
    }

    #[test]
    fn mutators_edit_contents() {
        let s = abcdef();
        s.erase(1, 3).unwrap();
        assert_eq!(s.snapshot(), vec!['a', 'd', 'e', 'f']);
        s.insert_slice(1, &['x', 'y']).unwrap();
        assert_eq!(s.snapshot(), vec!['a', 'x', 'y', 'd', 'e', 'f']);
        s.push_back('g').unwrap();
        assert_eq!(s.pop_back().unwrap(), 'g');
        s.assign(&['q']).unwrap();
        assert_eq!(s.snapshot(), vec!['q']);
        s.clear().unwrap();
        assert!(s.is_empty());
        assert_eq!(s.pop_back(), Err(SeqError::Empty));
    }

    #[test]
    fn bad_ranges_are_refused_before_rebase() {
        let s = abcdef();
        assert!(matches!(s.erase(4, 2), Err(SeqError::InvalidRange { .. })));
        assert!(matches!(
            s.insert_slice(9, &['x']),
            Err(SeqError::OutOfRange { .. })
        ));
        // Failed edit left nothing half-done.
        assert_eq!(s.snapshot(), vec!['a', 'b', 'c', 'd', 'e', 'f']);
    }

    #[test]
    fn swap_exchanges_contents_and_resets_iterators() {
        let a = SafeSequence::from_slice(&[1, 2, 3]);
        let b = SafeSequence::from_slice(&[9]);
        let it = a.tracked_at(1).unwrap();
        a.swap(&b).unwrap();
        assert_eq!(a.snapshot(), vec![9]);
        assert_eq!(b.snapshot(), vec![1, 2, 3]);
        assert!(!it.points_to_item());
        assert_eq!(it.get(), Err(SeqError::Invalidated));
    }

    #[test]
    fn swap_with_self_is_noop() {
        let a = SafeSequence::from_slice(&[1, 2, 3]);
        a.swap(&a).unwrap();
        assert_eq!(a.snapshot(), vec![1, 2, 3]);
    }

    #[test]
    fn from_iterator_collects() {
        let s: SafeSequence<char> = "abc".chars().collect();
        assert_eq!(s.snapshot(), vec!['a', 'b', 'c']);
    }

    #[test]
    fn ids_distinguish_instances() {
        let a: SafeSequence<u8> = SafeSequence::new();
        let b: SafeSequence<u8> = SafeSequence::new();
        assert_ne!(a.id(), b.id());
    }
}
