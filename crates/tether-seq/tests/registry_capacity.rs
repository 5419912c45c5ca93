//! Fast/slow registry equivalence at the promotion boundary.
//!
//! The registry stores entries inline up to a fixed capacity and
//! promotes to a keyed map on the next allocation. Rebase, invalidation,
//! and release behavior must be indistinguishable below, at, and above
//! that boundary — the storage state is a performance detail, never a
//! semantic one.

use tether_core::SeqError;
use tether_seq::registry::INLINE_CAP;
use tether_seq::SafeSequence;
use tether_test_utils::marked;

/// One full rebase cycle (insert before, erase across, release all) at a
/// given live-iterator count.
fn exercise_at(count: usize) {
    let seq = marked(20);
    let iters: Vec<_> = (0..count)
        .map(|i| seq.tracked_at(i % 20).unwrap())
        .collect();
    assert_eq!(seq.tracked_count(), count);

    // Insert 2 at the front: everything shifts right by 2.
    seq.insert_slice(0, &[tether_test_utils::Marker::new(900, 0); 2])
        .unwrap();
    for (i, it) in iters.iter().enumerate() {
        assert_eq!(it.index(), (i % 20) + 2, "count={count} iter={i}");
    }

    // Erase [2, 5): original positions 0..3 invalidated, the rest shift
    // back by 3.
    seq.erase(2, 5).unwrap();
    for (i, it) in iters.iter().enumerate() {
        let orig = i % 20;
        if orig < 3 {
            assert!(!it.points_to_item(), "count={count} iter={i}");
            assert_eq!(it.get(), Err(SeqError::Invalidated));
        } else {
            assert_eq!(it.index(), orig - 1, "count={count} iter={i}");
            assert_eq!(it.get().unwrap().tag, orig as u64);
        }
    }

    drop(iters);
    assert_eq!(seq.tracked_count(), 0);
}

#[test]
fn below_at_and_above_inline_capacity() {
    for count in [INLINE_CAP - 1, INLINE_CAP, INLINE_CAP + 1] {
        exercise_at(count);
    }
}

#[test]
fn behavior_unchanged_far_past_promotion() {
    exercise_at(INLINE_CAP * 8);
}

#[test]
fn promotion_is_one_way() {
    use tether_seq::IterRegistry;
    let mut reg = IterRegistry::new();
    let keys: Vec<_> = (0..=INLINE_CAP).map(|i| reg.allocate(i, true)).collect();
    assert!(reg.is_mapped());
    for k in keys {
        reg.release(k).unwrap();
    }
    // Empty again, but still mapped.
    assert_eq!(reg.live_count(), 0);
    assert!(reg.is_mapped());
}

#[test]
fn many_iterators_released_out_of_order() {
    let seq = SafeSequence::from_slice(&[0u8; 32]);
    let mut iters: Vec<_> = (0..16).map(|i| seq.tracked_at(i).unwrap()).collect();
    // Release every other one, then mutate, then check the rest.
    let mut i = 0;
    iters.retain(|_| {
        i += 1;
        i % 2 == 0
    });
    assert_eq!(seq.tracked_count(), 8);
    seq.insert_slice(0, &[7]).unwrap();
    for it in &iters {
        assert!(it.points_to_item());
        assert_eq!(it.get().unwrap(), 0);
    }
}
