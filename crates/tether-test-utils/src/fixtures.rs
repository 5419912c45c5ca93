//! Reusable sequence fixtures.

use tether_seq::SafeSequence;

/// An element carrying a unique tag, for asserting that a tracked
/// iterator still denotes the *same logical element* after mutation —
/// value equality alone cannot distinguish two equal elements at
/// different positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Marker {
    /// Unique tag assigned at construction.
    pub tag: u64,
    /// Payload, free for the test to choose.
    pub value: i32,
}

impl Marker {
    pub fn new(tag: u64, value: i32) -> Self {
        Self { tag, value }
    }
}

/// The classic six-element scenario sequence: `"abcdef"`.
pub fn abcdef() -> SafeSequence<char> {
    SafeSequence::from_slice(&['a', 'b', 'c', 'd', 'e', 'f'])
}

/// A sequence of `n` markers tagged `0..n`, each with `value == tag`.
pub fn marked(n: u64) -> SafeSequence<Marker> {
    (0..n).map(|i| Marker::new(i, i as i32)).collect()
}
