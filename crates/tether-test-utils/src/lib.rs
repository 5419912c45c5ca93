//! Test fixtures for Tether development.
//!
//! Provides the [`Marker`] element type used by rebase-correctness tests
//! and shared sequence constructors.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod fixtures;

pub use fixtures::{abcdef, marked, Marker};
