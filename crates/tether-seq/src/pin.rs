//! Shared-mode structure pin licensing borrowed element access.

use std::sync::RwLockReadGuard;

use tether_buffer::Buffer;
use tether_core::SeqError;

use crate::sequence::SafeSequence;

/// A scoped shared lock over a sequence's structure.
///
/// While any pin is alive, every structural mutation of the pinned
/// sequence fails with [`SeqError::StructureLocked`]: proceeding could
/// grow, shrink, or relocate the storage out from under the `&T`
/// references this pin hands out. Multiple pins may coexist and permit
/// concurrent reads.
///
/// The pin holds the structure lock's read side for its whole lifetime,
/// so the borrowed references it returns are valid for exactly that
/// lifetime. Release is RAII: the lock and the pin count are released
/// exactly once, on drop, on every exit path including unwinds.
#[derive(Debug)]
pub struct ReadPin<'a, T> {
    seq: &'a SafeSequence<T>,
    guard: RwLockReadGuard<'a, Buffer<T>>,
}

impl<'a, T: Clone> ReadPin<'a, T> {
    pub(crate) fn new(seq: &'a SafeSequence<T>, guard: RwLockReadGuard<'a, Buffer<T>>) -> Self {
        Self { seq, guard }
    }

    /// Length of the pinned sequence. Stable for the pin's lifetime.
    pub fn len(&self) -> usize {
        self.guard.len()
    }

    /// Whether the pinned sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.guard.is_empty()
    }

    /// Borrowed element access, checked once; the reference stays valid
    /// for the pin's lifetime.
    pub fn get(&self, index: usize) -> Result<&T, SeqError> {
        self.guard.get(index)
    }

    /// The whole contents as a borrowed slice — the read-only
    /// `[begin, end)` range a view type is built from.
    pub fn as_slice(&self) -> &[T] {
        self.guard.as_slice()
    }
}

impl<T> Drop for ReadPin<'_, T> {
    fn drop(&mut self) {
        self.seq.release_pin();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> SafeSequence<char> {
        SafeSequence::from_slice(&['a', 'b', 'c'])
    }

    #[test]
    fn pinned_borrows_read_elements() {
        let s = abc();
        let pin = s.read_pin();
        assert_eq!(pin.len(), 3);
        assert_eq!(*pin.get(0).unwrap(), 'a');
        assert_eq!(pin.as_slice(), &['a', 'b', 'c']);
        assert_eq!(pin.get(3), Err(SeqError::OutOfRange { index: 3, len: 3 }));
    }

    #[test]
    fn mutation_refused_while_pinned_then_allowed() {
        let s = abc();
        {
            let _pin = s.read_pin();
            assert_eq!(
                s.push_back('d'),
                Err(SeqError::StructureLocked { pins: 1 })
            );
            assert_eq!(s.erase(0, 1), Err(SeqError::StructureLocked { pins: 1 }));
            assert_eq!(s.reserve(64), Err(SeqError::StructureLocked { pins: 1 }));
        }
        s.push_back('d').unwrap();
        assert_eq!(s.snapshot(), vec!['a', 'b', 'c', 'd']);
    }

    #[test]
    fn pins_stack() {
        let s = abc();
        let p1 = s.read_pin();
        let p2 = s.read_pin();
        assert_eq!(s.clear(), Err(SeqError::StructureLocked { pins: 2 }));
        drop(p1);
        assert_eq!(s.clear(), Err(SeqError::StructureLocked { pins: 1 }));
        drop(p2);
        s.clear().unwrap();
    }

    #[test]
    fn reads_remain_allowed_while_pinned() {
        let s = abc();
        let pin = s.read_pin();
        // Non-structural reads go through unhindered.
        assert_eq!(s.len(), 3);
        assert_eq!(s.get(1).unwrap(), 'b');
        // Tracked-iterator bookkeeping is off the structure lock, so
        // creating and dropping iterators under a pin is fine.
        let it = s.tracked_at(1).unwrap();
        assert_eq!(it.get().unwrap(), 'b');
        drop(it);
        drop(pin);
    }
}
