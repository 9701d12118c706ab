//! rcarray - Reference-counted array slices for a world without a GC
//!
//! # Overview
//!
//! [`Array<T>`] behaves like a dynamic array in a garbage-collected language:
//! copying one gives you another reference to the same elements, slicing
//! gives you a window into them, and duplicating is an explicit operation.
//! Storage is a single fixed-size allocation shared through an atomic
//! reference count and released exactly once, when the last alias goes away.
//! Arrays never grow in place; [`concat`](Array::concat) builds a new one.
//!
//! ```
//! use rcarray::{Array, arr};
//!
//! let arr = arr![1, 2, 3, 4, 5];
//! assert_eq!(arr.len(), 5);
//!
//! // Aliases share elements.
//! let alias = arr.alias();
//! alias.set(0, -1);
//! assert_eq!(arr.get(0), -1);
//!
//! // Duplicates don't.
//! let copy = arr.dup();
//! copy.set(0, 7);
//! assert_eq!(arr.get(0), -1);
//!
//! // Slices are aliases of a window, relative to the current view.
//! let tail = arr.slice(1..);
//! assert_eq!(tail, [2, 3, 4, 5]);
//! assert!(tail.shares_buffer(&arr));
//! ```
//!
//! # Mutable and immutable elements
//!
//! `Array<T>` is shorthand for `Array<T, Mut>`: elements can be written
//! through any alias. Because of that it works like a `Cell`: elements are
//! read by copy ([`get`](Array::get), [`front`](Array::front)) and written by
//! value ([`set`](Array::set), [`replace`](Array::replace)), and the type is
//! neither `Send` nor `Sync`.
//!
//! [`ImmArray<T>`] (`Array<T, Imm>`) never changes after construction. It
//! derefs to `[T]`, can be indexed, and is `Send + Sync` for thread-safe
//! `T`. The two kinds only convert through [`dup`](Array::dup) and
//! [`idup`](Array::idup), which always copy:
//!
//! ```
//! use rcarray::{Array, ImmArray, arr};
//!
//! let arr = arr![1, 2, 3];
//! let frozen: ImmArray<i32> = arr.idup();
//! assert_eq!(frozen[0], 1);
//! assert_eq!(&frozen[1..], &[2, 3]);
//!
//! let thawed: Array<i32> = frozen.dup();
//! thawed.set(0, 75);
//! assert_eq!(frozen[0], 1);
//! ```
//!
//! Writing through an `ImmArray` does not compile:
//!
//! ```compile_fail
//! let frozen = rcarray::iarr![1, 2, 3];
//! frozen.set(0, 5);
//! ```
//!
//! Nor does converting the element type, or concatenating across kinds:
//!
//! ```compile_fail
//! let arr = rcarray::arr![1i32, 2, 3];
//! let wide: rcarray::Array<i64> = arr.dup();
//! ```
//!
//! ```compile_fail
//! let arr = rcarray::arr![1, 2, 3];
//! let frozen = arr.idup();
//! let both = arr.concat(&frozen);
//! ```
//!
//! A mutable array stays on its thread:
//!
//! ```compile_fail
//! let arr = rcarray::arr![1, 2, 3];
//! std::thread::spawn(move || arr.get(0));
//! ```
//!
//! and cannot be coerced to a shorter element lifetime while aliases of the
//! longer one are alive:
//!
//! ```compile_fail
//! fn shorten<'a>(arr: rcarray::Array<&'static str>) -> rcarray::Array<&'a str> {
//!     arr
//! }
//! ```
//!
//! # Contract violations
//!
//! Out-of-range indices, bad slice bounds and pops from an empty view panic
//! with an [`Error`] message. Each such method has a `try_` twin that returns
//! [`Result`] instead:
//!
//! ```
//! use rcarray::{Error, arr};
//!
//! let mut arr = arr![1, 2, 3];
//! assert_eq!(
//!     arr.try_slice(2..5).err(),
//!     Some(Error::InvalidRange { start: 2, end: 5, len: 3 })
//! );
//! arr.slice_in_place(3..);
//! assert_eq!(arr.try_pop_front(), Err(Error::Empty));
//! ```
//!
//! Allocation failure is fatal.

#![no_std]
#![deny(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]

extern crate alloc;

mod access;
mod array;
mod buffer;
mod error;
mod iter;
mod view;

pub use access::{Access, Imm, Mut};
pub use array::{Array, ImmArray};
pub use error::{Error, Result};
pub use iter::Iter;

/// Creates an [`Array`] with mutable elements, like `vec!`.
///
/// `arr![]` is an array without a buffer, `arr![a, b, c]` holds the listed
/// elements and `arr![value; n]` holds `n` clones of `value`.
///
/// ```
/// use rcarray::arr;
///
/// let empty: rcarray::Array<i32> = arr![];
/// assert!(!empty.has_buffer());
///
/// let zeros = arr![0u8; 4];
/// assert_eq!(zeros, [0, 0, 0, 0]);
/// ```
#[macro_export]
macro_rules! arr {
    () => {
        $crate::Array::<_, $crate::Mut>::new()
    };
    ($elem:expr; $n:expr) => {
        $crate::Array::<_, $crate::Mut>::from_elem($n, $elem)
    };
    ($($x:expr),+ $(,)?) => {
        $crate::Array::<_, $crate::Mut>::from_iter_exact([$($x),+])
    };
}

/// Creates an [`ImmArray`]; same forms as [`arr!`].
#[macro_export]
macro_rules! iarr {
    () => {
        $crate::Array::<_, $crate::Imm>::new()
    };
    ($elem:expr; $n:expr) => {
        $crate::Array::<_, $crate::Imm>::from_elem($n, $elem)
    };
    ($($x:expr),+ $(,)?) => {
        $crate::Array::<_, $crate::Imm>::from_iter_exact([$($x),+])
    };
}
