//! Property suites over arbitrary mutation histories.
//!
//! Bounds soundness must hold for every reachable state, not just the
//! initial one: after any sequence of inserts, erases, resizes, and
//! assigns, checked access at `i` succeeds iff `i < len`, and a tracked
//! iterator either denotes exactly the element it was planted on or
//! reports invalidation — never a different element, never unchecked
//! access.

use proptest::prelude::*;
use tether_core::SeqError;
use tether_seq::SafeSequence;
use tether_test_utils::Marker;

/// A structural edit chosen by proptest. Positions are raw draws,
/// reduced modulo the live length at application time so that most
/// operations are in-bounds while out-of-bounds draws still occur.
#[derive(Clone, Debug)]
enum Edit {
    Insert { pos: usize, count: usize },
    Erase { from: usize, span: usize },
    Push,
    Pop,
    Resize { len: usize },
    Assign { len: usize },
}

fn arb_edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (0usize..64, 1usize..4).prop_map(|(pos, count)| Edit::Insert { pos, count }),
        (0usize..64, 0usize..6).prop_map(|(from, span)| Edit::Erase { from, span }),
        Just(Edit::Push),
        Just(Edit::Pop),
        (0usize..48).prop_map(|len| Edit::Resize { len }),
        (0usize..16).prop_map(|len| Edit::Assign { len }),
    ]
}

/// Apply an edit, ignoring the expected out-of-range refusals. Fresh
/// elements get tags >= 1000 so they can never be confused with the
/// planted marker.
fn apply(seq: &SafeSequence<Marker>, edit: &Edit, fresh_tag: &mut u64) {
    let filler = |tag: &mut u64| {
        *tag += 1;
        Marker::new(1000 + *tag, 0)
    };
    match edit {
        Edit::Insert { pos, count } => {
            let payload: Vec<Marker> = (0..*count).map(|_| filler(fresh_tag)).collect();
            let pos = pos % (seq.len() + 1);
            seq.insert_slice(pos, &payload).unwrap();
        }
        Edit::Erase { from, span } => {
            let len = seq.len();
            let from = if len == 0 { 0 } else { from % (len + 1) };
            let to = (from + span).min(len);
            seq.erase(from, to.max(from)).unwrap();
        }
        Edit::Push => seq.push_back(filler(fresh_tag)).unwrap(),
        Edit::Pop => match seq.pop_back() {
            Ok(_) => {}
            Err(SeqError::Empty) => {}
            Err(other) => panic!("unexpected pop error: {other}"),
        },
        Edit::Resize { len } => seq.resize(*len, filler(fresh_tag)).unwrap(),
        Edit::Assign { len } => {
            let payload: Vec<Marker> = (0..*len).map(|_| filler(fresh_tag)).collect();
            seq.assign(&payload).unwrap();
        }
    }
}

proptest! {
    /// Checked access is sound in every reachable state.
    #[test]
    fn checked_access_sound_across_histories(
        init_len in 0u64..24,
        edits in proptest::collection::vec(arb_edit(), 0..24),
        probe in 0usize..64,
    ) {
        let seq: SafeSequence<Marker> =
            (0..init_len).map(|i| Marker::new(i, i as i32)).collect();
        let mut fresh_tag = 0;
        for edit in &edits {
            apply(&seq, edit, &mut fresh_tag);
            let len = seq.len();
            match seq.get(probe) {
                Ok(_) => prop_assert!(probe < len),
                Err(SeqError::OutOfRange { index, len: l }) => {
                    prop_assert_eq!(index, probe);
                    prop_assert_eq!(l, len);
                    prop_assert!(probe >= len);
                }
                Err(other) => prop_assert!(false, "unexpected error: {other}"),
            }
        }
    }

    /// A tracked iterator either still denotes its planted element or is
    /// invalidated — it never silently denotes a different element.
    #[test]
    fn tracked_iterator_never_drifts(
        init_len in 1u64..24,
        plant in 0u64..24,
        edits in proptest::collection::vec(arb_edit(), 0..24),
    ) {
        let plant = plant % init_len;
        let seq: SafeSequence<Marker> =
            (0..init_len).map(|i| Marker::new(i, i as i32)).collect();
        let it = seq.tracked_at(plant as usize).unwrap();
        let planted_tag = plant;

        let mut fresh_tag = 0;
        for edit in &edits {
            apply(&seq, edit, &mut fresh_tag);
            match it.get() {
                Ok(m) => prop_assert_eq!(m.tag, planted_tag),
                Err(SeqError::Invalidated) => {
                    prop_assert!(!it.points_to_item());
                    // Invalidation only ever follows actual removal of
                    // the planted element.
                    prop_assert!(seq.snapshot().iter().all(|m| m.tag != planted_tag));
                    break;
                }
                Err(other) => prop_assert!(false, "unexpected error: {other}"),
            }
        }
    }

    /// Tracked index always stays within [0, len].
    #[test]
    fn tracked_index_stays_in_bounds(
        init_len in 0u64..16,
        at in 0usize..17,
        edits in proptest::collection::vec(arb_edit(), 0..24),
    ) {
        let seq: SafeSequence<Marker> =
            (0..init_len).map(|i| Marker::new(i, i as i32)).collect();
        prop_assume!(at <= seq.len());
        let it = seq.tracked_at(at).unwrap();
        let mut fresh_tag = 0;
        for edit in &edits {
            apply(&seq, edit, &mut fresh_tag);
            prop_assert!(it.index() <= seq.len(), "index {} len {}", it.index(), seq.len());
        }
    }
}
