//! Growable contiguous storage for the Tether safe sequence.
//!
//! [`Buffer`] is the storage leaf: it owns the element array and exposes
//! the structural primitives (insert, erase, resize, assign) that the
//! sequence facade composes. It knows nothing about iterators or locks.
//! What it does know is how to describe its own edits: every structural
//! operation returns a [`MutationReport`] capturing the pre-edit state
//! and the affected index range, which is exactly the input the iterator
//! registry's rebase pass consumes.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod buffer;
mod report;

pub use buffer::Buffer;
pub use report::MutationReport;
