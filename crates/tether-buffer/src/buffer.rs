//! The element buffer.

use tether_core::SeqError;

use crate::report::MutationReport;

/// Growable contiguous storage of elements.
///
/// Invariant: `len() <= capacity()`; storage is reallocated only when
/// capacity must grow. Bounds violations are reported as errors, never
/// silently clamped, except where clamping is the documented semantic
/// ([`Buffer::copy_into`]).
///
/// The buffer is a passive collaborator: it performs edits and reports
/// them, but the iterator-rebase bookkeeping driven by those reports
/// lives entirely in the sequence facade.
#[derive(Clone, Debug)]
pub struct Buffer<T> {
    data: Vec<T>,
}

impl<T> Default for Buffer<T> {
    fn default() -> Self {
        Self { data: Vec::new() }
    }
}

impl<T> Buffer<T> {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Create an empty buffer with at least `capacity` slots reserved.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current storage capacity in elements.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Read-only view of the current contents.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Checked element access.
    pub fn get(&self, index: usize) -> Result<&T, SeqError> {
        self.data.get(index).ok_or(SeqError::OutOfRange {
            index,
            len: self.data.len(),
        })
    }

    /// First element, or [`SeqError::Empty`].
    pub fn front(&self) -> Result<&T, SeqError> {
        self.data.first().ok_or(SeqError::Empty)
    }

    /// Last element, or [`SeqError::Empty`].
    pub fn back(&self) -> Result<&T, SeqError> {
        self.data.last().ok_or(SeqError::Empty)
    }

    /// Swap contents with another buffer. O(1); no elements move in
    /// memory relative to their own allocation.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.data, &mut other.data);
    }
}

impl<T: Clone> Buffer<T> {
    /// Create a buffer holding a copy of `slice`.
    pub fn from_slice(slice: &[T]) -> Self {
        Self {
            data: slice.to_vec(),
        }
    }

    /// Reserve capacity for at least `additional` more elements.
    ///
    /// Shifts no logical positions, but may reallocate — the report's
    /// `reallocated` flag tells the caller whether raw pointers into the
    /// storage were left behind.
    pub fn reserve(&mut self, additional: usize) -> MutationReport {
        let old_len = self.data.len();
        let old_capacity = self.data.capacity();
        self.data.reserve(additional);
        MutationReport {
            old_len,
            old_capacity,
            start: old_len,
            removed: 0,
            inserted: 0,
            reallocated: self.data.capacity() != old_capacity,
        }
    }

    /// Append one element.
    pub fn push_back(&mut self, value: T) -> MutationReport {
        let old_len = self.data.len();
        let old_capacity = self.data.capacity();
        self.data.push(value);
        MutationReport {
            old_len,
            old_capacity,
            start: old_len,
            removed: 0,
            inserted: 1,
            reallocated: self.data.capacity() != old_capacity,
        }
    }

    /// Remove and return the last element, or [`SeqError::Empty`].
    pub fn pop_back(&mut self) -> Result<(T, MutationReport), SeqError> {
        let old_len = self.data.len();
        let old_capacity = self.data.capacity();
        let value = self.data.pop().ok_or(SeqError::Empty)?;
        Ok((
            value,
            MutationReport {
                old_len,
                old_capacity,
                start: old_len - 1,
                removed: 1,
                inserted: 0,
                reallocated: false,
            },
        ))
    }

    /// Insert a copy of `values` at position `pos` (`pos == len` appends).
    ///
    /// Errors with [`SeqError::OutOfRange`] when `pos > len`.
    pub fn insert_slice(&mut self, pos: usize, values: &[T]) -> Result<MutationReport, SeqError> {
        let old_len = self.data.len();
        let old_capacity = self.data.capacity();
        if pos > old_len {
            return Err(SeqError::OutOfRange {
                index: pos,
                len: old_len,
            });
        }
        self.data.splice(pos..pos, values.iter().cloned());
        Ok(MutationReport {
            old_len,
            old_capacity,
            start: pos,
            removed: 0,
            inserted: values.len(),
            reallocated: self.data.capacity() != old_capacity,
        })
    }

    /// Remove the half-open range `[from, to)`.
    ///
    /// Errors with [`SeqError::InvalidRange`] when `from > to` or
    /// `to > len`. An empty range is a no-op edit (reported with
    /// `removed == 0`).
    pub fn erase(&mut self, from: usize, to: usize) -> Result<MutationReport, SeqError> {
        let old_len = self.data.len();
        let old_capacity = self.data.capacity();
        if from > to || to > old_len {
            return Err(SeqError::InvalidRange {
                start: from,
                end: to,
                len: old_len,
            });
        }
        self.data.drain(from..to);
        Ok(MutationReport {
            old_len,
            old_capacity,
            start: from,
            removed: to - from,
            inserted: 0,
            reallocated: false,
        })
    }

    /// Resize to exactly `new_len` elements, filling growth with clones
    /// of `fill`.
    pub fn resize(&mut self, new_len: usize, fill: T) -> MutationReport {
        let old_len = self.data.len();
        let old_capacity = self.data.capacity();
        let (start, removed, inserted) = if new_len >= old_len {
            (old_len, 0, new_len - old_len)
        } else {
            (new_len, old_len - new_len, 0)
        };
        self.data.resize(new_len, fill);
        MutationReport {
            old_len,
            old_capacity,
            start,
            removed,
            inserted,
            reallocated: self.data.capacity() != old_capacity,
        }
    }

    /// Shorten to at most `new_len` elements. Longer requests are a
    /// no-op, matching `Vec::truncate`.
    pub fn truncate(&mut self, new_len: usize) -> MutationReport {
        let old_len = self.data.len();
        let old_capacity = self.data.capacity();
        self.data.truncate(new_len);
        let kept = self.data.len();
        MutationReport {
            old_len,
            old_capacity,
            start: kept,
            removed: old_len - kept,
            inserted: 0,
            reallocated: false,
        }
    }

    /// Replace the entire contents with a copy of `values`.
    ///
    /// Whole-container replacement: no partial correspondence between
    /// old and new contents is meaningful, which is why the facade pairs
    /// this with a registry reset rather than a shift.
    pub fn assign(&mut self, values: &[T]) -> MutationReport {
        let old_len = self.data.len();
        let old_capacity = self.data.capacity();
        self.data.clear();
        self.data.extend_from_slice(values);
        MutationReport {
            old_len,
            old_capacity,
            start: 0,
            removed: old_len,
            inserted: values.len(),
            reallocated: self.data.capacity() != old_capacity,
        }
    }

    /// Remove all elements, keeping capacity.
    pub fn clear(&mut self) -> MutationReport {
        let old_len = self.data.len();
        let old_capacity = self.data.capacity();
        self.data.clear();
        MutationReport {
            old_len,
            old_capacity,
            start: 0,
            removed: old_len,
            inserted: 0,
            reallocated: false,
        }
    }

    /// Append every element yielded by `iter`.
    pub fn append_from<I>(&mut self, iter: I) -> MutationReport
    where
        I: IntoIterator<Item = T>,
    {
        let old_len = self.data.len();
        let old_capacity = self.data.capacity();
        self.data.extend(iter);
        MutationReport {
            old_len,
            old_capacity,
            start: old_len,
            removed: 0,
            inserted: self.data.len() - old_len,
            reallocated: self.data.capacity() != old_capacity,
        }
    }

    /// Copy up to `count` elements starting at `offset` into `out`.
    ///
    /// Returns the number of elements copied. The count is clamped to
    /// both the remaining length and `out.len()` — this clamping is the
    /// documented semantic, matching the classic `copy` contract. An
    /// `offset` beyond the end is still an error.
    pub fn copy_into(&self, out: &mut [T], count: usize, offset: usize) -> Result<usize, SeqError> {
        let len = self.data.len();
        if offset > len {
            return Err(SeqError::OutOfRange { index: offset, len });
        }
        let n = count.min(len - offset).min(out.len());
        for (dst, src) in out.iter_mut().zip(&self.data[offset..offset + n]) {
            *dst = src.clone();
        }
        Ok(n)
    }
}
