//! Criterion micro-benchmarks for registry rebase cost.
//!
//! The interesting axis is the number of live tracked iterators: zero
//! (the common case — the rebase pass must be near-free), a handful
//! (inline fast path), just past the promotion boundary, and many
//! (keyed-map slow path).

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tether_bench::{apply_edit, edit_stream};
use tether_seq::registry::INLINE_CAP;
use tether_seq::{SafeSequence, TrackedIter};

/// Build a 4K-element sequence.
fn make_seq_4k() -> SafeSequence<u64> {
    let data: Vec<u64> = (0..4096).collect();
    SafeSequence::from_slice(&data)
}

/// Benchmark one mixed edit workload with `live` tracked iterators held
/// across the whole run.
fn bench_workload(c: &mut Criterion, name: &str, live: usize) {
    let edits = edit_stream(0xBEEF, 256);
    c.bench_function(name, |b| {
        b.iter(|| {
            let seq = make_seq_4k();
            let iters: Vec<TrackedIter<u64, &SafeSequence<u64>>> = (0..live)
                .map(|i| seq.tracked_at(i * 13 % 4096).unwrap())
                .collect();
            for &edit in &edits {
                apply_edit(&seq, edit);
            }
            black_box(iters.iter().filter(|it| it.points_to_item()).count());
        });
    });
}

fn bench_rebase_zero_iters(c: &mut Criterion) {
    bench_workload(c, "rebase_0_iters", 0);
}

fn bench_rebase_inline(c: &mut Criterion) {
    bench_workload(c, "rebase_inline_5_iters", INLINE_CAP - 1);
}

fn bench_rebase_promoted(c: &mut Criterion) {
    bench_workload(c, "rebase_promoted_7_iters", INLINE_CAP + 1);
}

fn bench_rebase_many(c: &mut Criterion) {
    bench_workload(c, "rebase_64_iters", 64);
}

/// Benchmark iterator construction/drop churn, which stresses the
/// allocate/release path rather than the rebase pass.
fn bench_iter_churn(c: &mut Criterion) {
    let seq = make_seq_4k();
    c.bench_function("tracked_iter_churn", |b| {
        b.iter(|| {
            for i in 0..64 {
                let it = seq.tracked_at(i * 31 % 4096).unwrap();
                black_box(it.index());
            }
        });
    });
}

criterion_group!(
    benches,
    bench_rebase_zero_iters,
    bench_rebase_inline,
    bench_rebase_promoted,
    bench_rebase_many,
    bench_iter_churn
);
criterion_main!(benches);
