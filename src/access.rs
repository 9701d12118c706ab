//! Type-level element access of an [`Array`](crate::Array).
//!
//! The second type parameter of `Array<T, M>` says whether elements may be
//! written through the array. Both kinds share one representation; they only
//! convert into each other through [`dup`](crate::Array::dup) and
//! [`idup`](crate::Array::idup), which allocate.

use core::marker::PhantomData;

mod private {
    pub trait Sealed {}
}

/// Marker trait for [`Mut`] and [`Imm`].
/// This is a sealed trait - it cannot be implemented outside this crate.
pub trait Access: private::Sealed + 'static {
    /// Whether elements can be written through arrays of this kind.
    const MUTABLE: bool;
}

/// Elements can be written through any alias, `Cell`-style.
///
/// Arrays of this kind are neither `Send` nor `Sync`: all aliases that can
/// write to a buffer live on one thread.
pub struct Mut {
    _not_send_sync: PhantomData<*const ()>,
}

/// Elements are never written after construction; arrays can hand out `&T`
/// and be shared across threads.
pub struct Imm {
    _private: (),
}

impl private::Sealed for Mut {}
impl private::Sealed for Imm {}

impl Access for Mut {
    const MUTABLE: bool = true;
}

impl Access for Imm {
    const MUTABLE: bool = false;
}
