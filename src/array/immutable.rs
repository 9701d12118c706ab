#![allow(unsafe_code)]

//! Element access for arrays with immutable elements.
//!
//! An `ImmArray` buffer is only ever reachable from other `ImmArray`s (the
//! sole ways to build one allocate), so borrowing its elements is sound.

use core::{
    hash::{Hash, Hasher},
    iter::once,
    ops::{Deref, Index},
    slice::{self, SliceIndex},
};

use super::{Array, concat_len};
use crate::{
    access::{Imm, Mut},
    error::{Error, Result, contract},
    iter::Iter,
};

impl<T> Array<T, Imm> {
    /// Borrows the view as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the view is initialized and nothing writes to an immutable
        // buffer while `self` keeps it alive.
        unsafe { slice::from_raw_parts(self.base(), self.len()) }
    }

    /// The element at `index`.
    pub fn try_get(&self, index: usize) -> Result<&T> {
        let slot = self.slot(index)?;
        // SAFETY: as in `as_slice`.
        Ok(unsafe { &*slot })
    }

    /// The first element of the view.
    ///
    /// # Panics
    ///
    /// If the view is empty.
    #[track_caller]
    pub fn front(&self) -> &T {
        contract(self.try_front())
    }

    pub fn try_front(&self) -> Result<&T> {
        self.as_slice().first().ok_or(Error::Empty)
    }

    /// The last element of the view.
    ///
    /// # Panics
    ///
    /// If the view is empty.
    #[track_caller]
    pub fn back(&self) -> &T {
        contract(self.try_back())
    }

    pub fn try_back(&self) -> Result<&T> {
        self.as_slice().last().ok_or(Error::Empty)
    }
}

impl<T: Clone> Array<T, Imm> {
    /// Clones the view into a fresh buffer with mutable elements.
    pub fn dup(&self) -> Array<T, Mut> {
        Array::from_iter_exact(self.iter().cloned())
    }

    /// Clones the view into a fresh buffer with immutable elements.
    ///
    /// The result shares nothing with `self`; use [`alias`](Array::alias) to
    /// share instead.
    pub fn idup(&self) -> Self {
        Array::from_iter_exact(self.iter().cloned())
    }

    /// A new array holding this view followed by `other`'s.
    pub fn concat(&self, other: &Self) -> Self {
        let len = concat_len::<Imm>(self.len(), other.len());
        Self::from_iter_len(len, self.iter().chain(other.iter()).cloned())
    }

    /// A new array holding this view followed by `value`.
    pub fn concat_elem(&self, value: T) -> Self {
        let len = concat_len::<Imm>(self.len(), 1);
        Self::from_iter_len(len, self.iter().cloned().chain(once(value)))
    }
}

impl<T> Deref for Array<T, Imm> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AsRef<[T]> for Array<T, Imm> {
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<T, I: SliceIndex<[T]>> Index<I> for Array<T, Imm> {
    type Output = I::Output;

    #[inline]
    fn index(&self, index: I) -> &I::Output {
        &self.as_slice()[index]
    }
}

impl<T: Hash> Hash for Array<T, Imm> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state)
    }
}

impl<'a, T> IntoIterator for &'a Array<T, Imm> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> slice::Iter<'a, T> {
        self.as_slice().iter()
    }
}

/// Yields clones of the elements; the buffer is shared, so they cannot be
/// moved out.
impl<T: Clone> IntoIterator for Array<T, Imm> {
    type Item = T;
    type IntoIter = Iter<T, Imm>;

    fn into_iter(self) -> Iter<T, Imm> {
        Iter::new(self)
    }
}
