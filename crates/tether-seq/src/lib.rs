//! Safe sequence with checked and self-healing iterators.
//!
//! This crate is the orchestration layer of the Tether workspace. It
//! composes the element storage from `tether-buffer` with an iterator
//! registry into [`SafeSequence`], the sole entry point for mutation.
//!
//! Three read-side collaborators hang off a sequence:
//!
//! - [`CheckedIter`] re-validates its index against the owner's current
//!   length on every access. It always *detects* out-of-range access,
//!   but it is not rebased: erase an element in front of it and its
//!   numeric index now denotes a different logical element.
//! - [`TrackedIter`] registers itself with the owner. Every structural
//!   edit rewrites (or invalidates) its position out-of-band, so it
//!   keeps denoting the same logical element across arbitrary inserts
//!   and erases elsewhere.
//! - [`ReadPin`] holds the structure lock in shared mode, licensing
//!   borrowed `&T` access; while any pin is live, structural mutation
//!   is refused rather than allowed to relocate storage underneath it.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod checked;
mod pin;
pub mod registry;
mod sequence;
mod tracked;

pub use checked::CheckedIter;
pub use pin::ReadPin;
pub use registry::{IterRegistry, RegistryEntry};
pub use sequence::SafeSequence;
pub use tracked::TrackedIter;
