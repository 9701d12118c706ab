#![allow(unsafe_code)]

//! The reference-counted array slice.
//!
//! An [`Array`] is a shared handle to a fixed-size [`Buffer`] plus a window
//! ([`View`]) into it:
//!
//! ```text
//!  a ─┐                        view of a: [0, 5)
//!     ├──▶ Arc<Buffer> ──▶ [1, 2, 3, 4, 5]
//!  b ─┘                        view of b: [1, 3)
//! ```
//!
//! Copying an array with [`alias`](Array::alias) (or `clone`) shares the
//! buffer, so writes through one alias are seen by every other. Only
//! [`dup`](Array::dup), [`idup`](Array::idup) and `concat` allocate.
//!
//! Methods shared by both access kinds live here; the element accessors that
//! depend on the kind are in `mutable.rs` and `immutable.rs`.

use alloc::{sync::Arc, vec::Vec};
use core::{fmt, marker::PhantomData, mem, ops::RangeBounds, ptr::NonNull};

use crate::{
    access::{Access, Imm, Mut},
    buffer::Buffer,
    error::{Result, contract},
    view::View,
};

mod immutable;
mod mutable;

/// A fixed-capacity, reference-counted slice of `T`.
///
/// `Array<T>` (the default, [`Mut`]) allows writes through any alias;
/// [`ImmArray<T>`] never changes after construction. See the
/// [crate-level docs](crate) for an overview.
///
/// Reads from an `Array<T>` copy elements out, so `get`, `front`, `back`,
/// `iter`, `dup`, `idup`, `concat` and `==` need `T: Copy`. Other element
/// types can still be written and moved out with `set`, `replace` and `take`.
/// To read, compare or duplicate them, keep them in an `ImmArray`, which
/// hands out references and only needs `T: Clone` to duplicate:
///
/// ```
/// use std::rc::Rc;
/// use rcarray::{Array, ImmArray};
///
/// let frozen: ImmArray<Rc<str>> = Array::from_iter_exact(["a", "b"].map(Rc::from));
/// let copy = frozen.idup();
/// assert_eq!(&*copy[1], "b");
/// assert!(!copy.shares_buffer(&frozen));
///
/// // Thaw into a mutable array and swap elements in and out.
/// let thawed: Array<Rc<str>> = frozen.dup();
/// let old = thawed.replace(0, Rc::from("z"));
/// assert_eq!(&*old, "a");
/// ```
pub struct Array<T, M: Access = Mut> {
    buffer: Option<Arc<Buffer<T>>>,
    view: View,
    // Invariant in `T`: a mutable alias must not be coerced to a shorter
    // lifetime while another alias still reads the longer one.
    marker: PhantomData<(M, fn(T) -> T)>,
}

/// An array whose elements are never written after construction.
pub type ImmArray<T> = Array<T, Imm>;

static_assertions::assert_eq_size!(Array<u8>, [usize; 3]);
static_assertions::assert_eq_size!(ImmArray<u128>, [usize; 3]);
static_assertions::assert_not_impl_any!(Array<i32>: Send, Sync);
static_assertions::assert_impl_all!(ImmArray<i32>: Send, Sync);
static_assertions::assert_not_impl_any!(ImmArray<core::cell::Cell<i32>>: Send, Sync);

impl<T, M: Access> Array<T, M> {
    /// An array with no backing buffer.
    ///
    /// It has length zero and shares a buffer with nothing, not even another
    /// empty array; see [`has_buffer`](Array::has_buffer).
    #[inline]
    pub const fn new() -> Self {
        Array {
            buffer: None,
            view: View::EMPTY,
            marker: PhantomData,
        }
    }

    fn from_buffer(buffer: Buffer<T>) -> Self {
        Array {
            view: View::full(buffer.len()),
            buffer: Some(Arc::new(buffer)),
            marker: PhantomData,
        }
    }

    /// Allocates an array from an iterator with a known length.
    ///
    /// ```
    /// use rcarray::Array;
    ///
    /// let arr: Array<i32> = Array::from_iter_exact(vec![1, 2, 3]);
    /// assert_eq!(arr, [1, 2, 3]);
    /// ```
    pub fn from_iter_exact(
        values: impl IntoIterator<Item = T, IntoIter: ExactSizeIterator>,
    ) -> Self {
        Self::from_buffer(Buffer::from_iter_exact(values))
    }

    pub(crate) fn from_iter_len(len: usize, values: impl Iterator<Item = T>) -> Self {
        Self::from_buffer(Buffer::from_iter_len(len, values))
    }

    /// Allocates `len` elements, each a clone of `value`.
    pub fn from_elem(len: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::from_buffer(Buffer::from_elem(len, value))
    }

    /// Allocates `len` default-valued elements.
    pub fn with_len(len: usize) -> Self
    where
        T: Default,
    {
        Self::from_iter_len(len, core::iter::repeat_with(T::default))
    }

    /// Allocates `len` elements, the `i`-th produced by `f(i)`.
    pub fn from_fn(len: usize, f: impl FnMut(usize) -> T) -> Self {
        Self::from_iter_len(len, (0..len).map(f))
    }

    /// Number of elements in the current view.
    #[inline]
    pub fn len(&self) -> usize {
        self.view.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    /// Whether this array holds a buffer at all.
    ///
    /// Only [`Array::new`] (and `Default`) produce arrays without one; an
    /// empty slice of a real buffer still keeps that buffer alive.
    #[inline]
    pub fn has_buffer(&self) -> bool {
        self.buffer.is_some()
    }

    /// Element count of the backing buffer, regardless of the view.
    pub fn buffer_len(&self) -> usize {
        self.buffer.as_ref().map_or(0, |buffer| buffer.len())
    }

    /// Number of live arrays sharing this array's buffer, itself included.
    pub fn alias_count(&self) -> usize {
        self.buffer.as_ref().map_or(0, Arc::strong_count)
    }

    /// Whether both arrays alias the same buffer. Arrays without a buffer
    /// share nothing.
    pub fn shares_buffer<N: Access>(&self, other: &Array<T, N>) -> bool {
        match (&self.buffer, &other.buffer) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// A new handle to the same buffer and view. Never copies elements.
    ///
    /// This is what `clone` does too; the separate name makes the sharing
    /// explicit at call sites.
    #[inline]
    pub fn alias(&self) -> Self {
        Array {
            buffer: self.buffer.clone(),
            view: self.view,
            marker: PhantomData,
        }
    }

    /// An alias of the part of this view selected by `range`.
    ///
    /// `range` is relative to the current view, and an open end means the
    /// current length: `arr.slice(1..)` drops the first element.
    ///
    /// # Panics
    ///
    /// If the range starts after it ends or ends past `len()`.
    #[track_caller]
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Self {
        contract(self.try_slice(range))
    }

    pub fn try_slice(&self, range: impl RangeBounds<usize>) -> Result<Self> {
        let view = self.view.narrow(range)?;
        Ok(Array {
            buffer: self.buffer.clone(),
            view,
            marker: PhantomData,
        })
    }

    /// Narrows this array's own view to `range`.
    ///
    /// Other aliases of the buffer are unaffected.
    ///
    /// # Panics
    ///
    /// Under the same conditions as [`slice`](Array::slice).
    #[track_caller]
    pub fn slice_in_place(&mut self, range: impl RangeBounds<usize>) -> &mut Self {
        contract(self.try_slice_in_place(range))
    }

    pub fn try_slice_in_place(&mut self, range: impl RangeBounds<usize>) -> Result<&mut Self> {
        self.view = self.view.narrow(range)?;
        Ok(self)
    }

    /// Drops the first element from the view.
    ///
    /// # Panics
    ///
    /// If the view is empty.
    #[track_caller]
    pub fn pop_front(&mut self) {
        contract(self.try_pop_front())
    }

    pub fn try_pop_front(&mut self) -> Result<()> {
        self.view.pop_front()
    }

    /// Drops the last element from the view.
    ///
    /// # Panics
    ///
    /// If the view is empty.
    #[track_caller]
    pub fn pop_back(&mut self) {
        contract(self.try_pop_back())
    }

    pub fn try_pop_back(&mut self) -> Result<()> {
        self.view.pop_back()
    }

    /// Exchanges buffers and views with `other`. Nothing is allocated,
    /// copied or released.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Raw pointer to the first element of the view.
    ///
    /// The pointer does not keep the buffer alive; it stays valid while any
    /// alias of the buffer does.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.base().cast_const()
    }

    /// Pointer to the first element of the buffer, dangling without one.
    #[inline]
    fn buffer_ptr(&self) -> *mut T {
        match &self.buffer {
            Some(buffer) => buffer.as_ptr(),
            None => NonNull::dangling().as_ptr(),
        }
    }

    /// Pointer to the first element of the view.
    #[inline]
    fn base(&self) -> *mut T {
        // SAFETY: `view.start <= buffer.len()`, and an array without a buffer
        // has an empty view at offset zero.
        unsafe { self.buffer_ptr().add(self.view.start()) }
    }

    /// Pointer to the `index`-th element of the view.
    #[inline]
    fn slot(&self, index: usize) -> Result<*mut T> {
        let offset = self.view.offset(index)?;
        // SAFETY: `offset` lies inside the view, hence inside the buffer.
        Ok(unsafe { self.buffer_ptr().add(offset) })
    }

    /// Bitwise copy of the `index`-th element; no user code runs while the
    /// buffer is read.
    ///
    /// # Safety
    ///
    /// `index < self.len()`.
    #[inline]
    unsafe fn read_unchecked(&self, index: usize) -> T
    where
        T: Copy,
    {
        debug_assert!(index < self.len());
        // SAFETY: guaranteed by the caller.
        unsafe { self.base().add(index).read() }
    }
}

/// Length of a concatenation, panicking like any other layout overflow.
fn concat_len<M: Access>(left: usize, right: usize) -> usize {
    tracing::debug!(left, right, mutable = M::MUTABLE, "concat");
    match left.checked_add(right) {
        Some(len) => len,
        None => panic!("capacity overflow"),
    }
}

impl<T, M: Access> Default for Array<T, M> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Same as [`Array::alias`]: the clone shares the buffer.
impl<T, M: Access> Clone for Array<T, M> {
    #[inline]
    fn clone(&self) -> Self {
        self.alias()
    }
}

impl<T, M: Access> FromIterator<T> for Array<T, M> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let values: Vec<T> = iter.into_iter().collect();
        Self::from_iter_exact(values)
    }
}

impl<T, M: Access> From<Vec<T>> for Array<T, M> {
    fn from(values: Vec<T>) -> Self {
        Self::from_iter_exact(values)
    }
}

impl<T, M: Access, const LEN: usize> From<[T; LEN]> for Array<T, M> {
    fn from(values: [T; LEN]) -> Self {
        Self::from_iter_exact(values)
    }
}

impl<T: Clone, M: Access> From<&[T]> for Array<T, M> {
    fn from(values: &[T]) -> Self {
        Self::from_iter_exact(values.iter().cloned())
    }
}

// Element-wise equality over the current views; buffer identity is ignored.
// Reading a mutable array copies its elements out, hence the `Copy` bounds.

impl<T: Copy + PartialEq, N: Access> PartialEq<Array<T, N>> for Array<T, Mut> {
    fn eq(&self, other: &Array<T, N>) -> bool {
        self.len() == other.len()
            // SAFETY: `i` is below both lengths.
            && (0..self.len()).all(|i| unsafe { self.read_unchecked(i) == other.read_unchecked(i) })
    }
}

impl<T: Copy + PartialEq> PartialEq<Array<T, Mut>> for Array<T, Imm> {
    fn eq(&self, other: &Array<T, Mut>) -> bool {
        other == self
    }
}

impl<T: PartialEq> PartialEq for Array<T, Imm> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Copy + Eq> Eq for Array<T, Mut> {}

impl<T: Eq> Eq for Array<T, Imm> {}

impl<T: Copy + PartialEq> PartialEq<[T]> for Array<T, Mut> {
    fn eq(&self, other: &[T]) -> bool {
        self.len() == other.len()
            // SAFETY: `i` is below both lengths.
            && (0..self.len()).all(|i| unsafe { self.read_unchecked(i) } == other[i])
    }
}

impl<T: PartialEq> PartialEq<[T]> for Array<T, Imm> {
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T, M: Access> PartialEq<&[T]> for Array<T, M>
where
    Array<T, M>: PartialEq<[T]>,
{
    fn eq(&self, other: &&[T]) -> bool {
        *self == **other
    }
}

impl<T, M: Access, const LEN: usize> PartialEq<[T; LEN]> for Array<T, M>
where
    Array<T, M>: PartialEq<[T]>,
{
    fn eq(&self, other: &[T; LEN]) -> bool {
        *self == other[..]
    }
}

impl<T, M: Access> PartialEq<Vec<T>> for Array<T, M>
where
    Array<T, M>: PartialEq<[T]>,
{
    fn eq(&self, other: &Vec<T>) -> bool {
        *self == other[..]
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for Array<T, Mut> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Debug> fmt::Debug for Array<T, Imm> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_slice().fmt(f)
    }
}

#[cfg(test)]
#[path = "array_test.rs"]
mod array_test;
