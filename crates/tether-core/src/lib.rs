//! Core types and traits for the Tether safe-sequence workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Tether workspace:
//! iterator and sequence identity keys, the error taxonomy, and the
//! owner-handle capability trait.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod handle;
pub mod id;

pub use error::SeqError;
pub use handle::OwnerRef;
pub use id::{IterKey, SequenceId};
