//! The owner-handle capability trait.
//!
//! Iterators and pins do not care how their owning sequence's lifetime is
//! managed — borrowed, reference-counted, or arena-held. The core
//! algorithm needs exactly two capabilities from a handle: dereference to
//! the owner, and identity comparison. [`OwnerRef`] captures both; the
//! blanket impls cover the common ownership idioms.

use std::ptr;
use std::sync::Arc;

/// A reference-like value that can reach its target and be compared for
/// target identity.
///
/// Implementors must guarantee the target stays alive for the handle's
/// lifetime (this is what makes a handle suitable for building tracked
/// iterators: the registry entry must be released before the registry
/// is dropped).
pub trait OwnerRef {
    /// The owned/borrowed target type.
    type Target;

    /// Dereference to the target.
    fn target(&self) -> &Self::Target;

    /// Whether two handles denote the very same target object.
    ///
    /// Identity, not equality: two sequences with equal contents are
    /// still distinct targets.
    fn same_target(&self, other: &Self) -> bool {
        ptr::eq(self.target(), other.target())
    }
}

impl<S> OwnerRef for &S {
    type Target = S;

    fn target(&self) -> &S {
        self
    }
}

impl<S> OwnerRef for Arc<S> {
    type Target = S;

    fn target(&self) -> &S {
        self.as_ref()
    }
}
