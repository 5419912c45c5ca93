//! Tether: a mutation-safe sequence with checked and self-healing iterators.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Tether sub-crates. For most users, adding `tether` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use tether::prelude::*;
//!
//! let seq = SafeSequence::from_slice(&['a', 'b', 'c', 'd', 'e', 'f']);
//!
//! // A tracked iterator keeps denoting the same logical element across
//! // structural edits elsewhere in the sequence.
//! let it = seq.tracked_at(3).unwrap();
//! assert_eq!(it.get().unwrap(), 'd');
//!
//! seq.erase(1, 3).unwrap(); // remove 'b', 'c'
//! assert_eq!(seq.snapshot(), vec!['a', 'd', 'e', 'f']);
//! assert_eq!(it.index(), 1);
//! assert_eq!(it.get().unwrap(), 'd'); // still 'd'
//!
//! // Erasing its element invalidates it — detected at the dereference.
//! seq.erase(1, 2).unwrap();
//! assert!(!it.points_to_item());
//! assert_eq!(it.get(), Err(SeqError::Invalidated));
//!
//! // A read pin licenses borrowed access and refuses structural edits.
//! let pin = seq.read_pin();
//! assert_eq!(pin.as_slice(), &['a', 'e', 'f']);
//! assert!(matches!(
//!     seq.push_back('x'),
//!     Err(SeqError::StructureLocked { .. })
//! ));
//! drop(pin);
//! seq.push_back('x').unwrap();
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the
//! prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`seq`] | `tether-seq` | `SafeSequence`, iterators, `ReadPin`, registry |
//! | [`buffer`] | `tether-buffer` | `Buffer`, `MutationReport` |
//! | [`types`] | `tether-core` | IDs, errors, the `OwnerRef` handle trait |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Element storage and structural-edit reports (`tether-buffer`).
pub mod buffer {
    pub use tether_buffer::{Buffer, MutationReport};
}

/// The sequence facade and its iterators (`tether-seq`).
pub mod seq {
    pub use tether_seq::{
        registry, CheckedIter, IterRegistry, ReadPin, RegistryEntry, SafeSequence, TrackedIter,
    };
}

/// IDs, errors, and the owner-handle trait (`tether-core`).
pub mod types {
    pub use tether_core::{IterKey, OwnerRef, SeqError, SequenceId};
}

/// The types most programs need.
pub mod prelude {
    pub use tether_core::{OwnerRef, SeqError};
    pub use tether_seq::{CheckedIter, ReadPin, SafeSequence, TrackedIter};
}
