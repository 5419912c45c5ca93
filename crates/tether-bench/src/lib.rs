//! Benchmark workloads and utilities for the Tether safe sequence.
//!
//! Provides deterministic randomized edit streams so benchmarks and
//! stress tests measure the same workload run-to-run:
//!
//! - [`edit_stream`]: a seeded mix of inserts, erases, and pushes
//! - [`apply_edit`]: apply one edit to a sequence, in-bounds by
//!   construction

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use tether_seq::SafeSequence;

/// One structural edit in a benchmark workload.
#[derive(Clone, Copy, Debug)]
pub enum BenchEdit {
    /// Insert `count` elements at `pos` (reduced modulo len+1 at apply).
    Insert {
        /// Raw position draw.
        pos: usize,
        /// Number of elements to insert.
        count: usize,
    },
    /// Erase up to `span` elements starting at `from`.
    Erase {
        /// Raw position draw.
        from: usize,
        /// Maximum number of elements to erase.
        span: usize,
    },
    /// Append one element.
    Push,
}

/// Generate a deterministic stream of `n` edits from `seed`.
///
/// ChaCha-seeded so the workload is identical across runs and platforms.
pub fn edit_stream(seed: u64, n: usize) -> Vec<BenchEdit> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| match rng.random_range(0..3u8) {
            0 => BenchEdit::Insert {
                pos: rng.random_range(0..1024),
                count: rng.random_range(1..4),
            },
            1 => BenchEdit::Erase {
                from: rng.random_range(0..1024),
                span: rng.random_range(1..4),
            },
            _ => BenchEdit::Push,
        })
        .collect()
}

/// Apply one edit to `seq`, reducing raw position draws into bounds.
pub fn apply_edit(seq: &SafeSequence<u64>, edit: BenchEdit) {
    match edit {
        BenchEdit::Insert { pos, count } => {
            let pos = pos % (seq.len() + 1);
            let payload = vec![0u64; count];
            seq.insert_slice(pos, &payload).expect("in-bounds insert");
        }
        BenchEdit::Erase { from, span } => {
            let len = seq.len();
            if len == 0 {
                return;
            }
            let from = from % len;
            let to = (from + span).min(len);
            seq.erase(from, to).expect("in-bounds erase");
        }
        BenchEdit::Push => seq.push_back(0).expect("push"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_stream_is_deterministic() {
        let a = edit_stream(42, 100);
        let b = edit_stream(42, 100);
        assert_eq!(format!("{a:?}"), format!("{b:?}"));
    }

    #[test]
    fn apply_edit_keeps_sequence_consistent() {
        let seq = SafeSequence::from_slice(&[0u64; 16]);
        for edit in edit_stream(7, 500) {
            apply_edit(&seq, edit);
        }
        // Whatever the final shape, access stays checked.
        let len = seq.len();
        assert!(seq.get(len).is_err());
    }
}
