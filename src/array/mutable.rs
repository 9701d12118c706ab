#![allow(unsafe_code)]

//! Element access for arrays with mutable elements.
//!
//! Any alias may write, so these accessors follow the rules of `Cell`: values
//! are copied out (`T: Copy`) or swapped in and out, and no reference into the
//! buffer survives a call.

use alloc::{sync::Arc, vec::Vec};
use core::{marker::PhantomData, mem::MaybeUninit, ptr};

use super::{Array, concat_len};
use crate::{
    access::{Access, Imm, Mut},
    buffer::Buffer,
    error::{Error, Result, contract},
    iter::Iter,
};

impl<T> Array<T, Mut> {
    /// Allocates `len` uninitialized elements.
    ///
    /// Fill every slot with [`write`](Array::write), then call
    /// [`assume_init`](Array::assume_init).
    ///
    /// ```
    /// use rcarray::Array;
    ///
    /// let slots = Array::<String>::new_uninit(2);
    /// slots.write(0, "a".to_string());
    /// slots.write(1, "b".to_string());
    /// let arr = unsafe { slots.assume_init() };
    /// assert_eq!(arr.len(), 2);
    /// ```
    pub fn new_uninit(len: usize) -> Array<MaybeUninit<T>> {
        Array::from_buffer(Buffer::uninit(len))
    }

    /// Stores `value` at `index`, dropping the previous element.
    ///
    /// # Panics
    ///
    /// If `index >= len()`.
    #[track_caller]
    pub fn set(&self, index: usize, value: T) {
        contract(self.try_set(index, value))
    }

    pub fn try_set(&self, index: usize, value: T) -> Result<()> {
        drop(self.try_replace(index, value)?);
        Ok(())
    }

    /// Stores `value` at `index` and returns the previous element.
    ///
    /// # Panics
    ///
    /// If `index >= len()`.
    #[track_caller]
    pub fn replace(&self, index: usize, value: T) -> T {
        contract(self.try_replace(index, value))
    }

    pub fn try_replace(&self, index: usize, value: T) -> Result<T> {
        let slot = self.slot(index)?;
        // SAFETY: the slot is initialized and no reference into the buffer
        // is live.
        Ok(unsafe { ptr::replace(slot, value) })
    }

    /// Takes the element at `index`, leaving `T::default()` behind.
    ///
    /// # Panics
    ///
    /// If `index >= len()`.
    #[track_caller]
    pub fn take(&self, index: usize) -> T
    where
        T: Default,
    {
        self.replace(index, T::default())
    }

    /// Writes `value` without a bounds check.
    ///
    /// # Safety
    ///
    /// `index < len()`.
    pub unsafe fn set_unchecked(&self, index: usize, value: T) {
        debug_assert!(index < self.len());
        // SAFETY: guaranteed by the caller.
        drop(unsafe { ptr::replace(self.base().add(index), value) });
    }

    /// Overwrites the first element of the view.
    ///
    /// # Panics
    ///
    /// If the view is empty.
    #[track_caller]
    pub fn set_front(&self, value: T) {
        contract(self.try_set_front(value))
    }

    pub fn try_set_front(&self, value: T) -> Result<()> {
        self.try_set(0, value).map_err(|_| Error::Empty)
    }

    /// Overwrites the last element of the view.
    ///
    /// # Panics
    ///
    /// If the view is empty.
    #[track_caller]
    pub fn set_back(&self, value: T) {
        contract(self.try_set_back(value))
    }

    pub fn try_set_back(&self, value: T) -> Result<()> {
        let last = self.len().checked_sub(1).ok_or(Error::Empty)?;
        self.try_set(last, value)
    }

    /// Stores a clone of `value` in every element of the view.
    pub fn fill(&self, value: T)
    where
        T: Clone,
    {
        for index in 0..self.len() {
            // SAFETY: `index < len()`.
            unsafe { self.set_unchecked(index, value.clone()) };
        }
    }

    /// Raw mutable pointer to the first element of the view; see
    /// [`as_ptr`](Array::as_ptr).
    #[inline]
    pub fn as_mut_ptr(&self) -> *mut T {
        self.base()
    }

    /// Borrows the view as a slice.
    ///
    /// # Safety
    ///
    /// No alias may write to the buffer while the slice is alive.
    pub unsafe fn as_slice(&self) -> &[T] {
        // SAFETY: the view is initialized; the caller rules out writes.
        unsafe { core::slice::from_raw_parts(self.base(), self.len()) }
    }

    /// Borrows the view as a mutable slice.
    ///
    /// # Safety
    ///
    /// No alias may read or write the overlapping part of the buffer while
    /// the slice is alive.
    pub unsafe fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: the view is initialized; the caller rules out other access.
        unsafe { core::slice::from_raw_parts_mut(self.base(), self.len()) }
    }
}

impl<T: Copy> Array<T, Mut> {
    /// Copy of the element at `index`.
    ///
    /// # Panics
    ///
    /// If `index >= len()`.
    #[track_caller]
    pub fn get(&self, index: usize) -> T {
        contract(self.try_get(index))
    }

    pub fn try_get(&self, index: usize) -> Result<T> {
        let slot = self.slot(index)?;
        // SAFETY: the slot is initialized and `T: Copy`.
        Ok(unsafe { slot.read() })
    }

    /// Copy of the element at `index` without a bounds check.
    ///
    /// # Safety
    ///
    /// `index < len()`.
    #[inline]
    pub unsafe fn get_unchecked(&self, index: usize) -> T {
        // SAFETY: guaranteed by the caller.
        unsafe { self.read_unchecked(index) }
    }

    /// Copy of the first element of the view.
    ///
    /// # Panics
    ///
    /// If the view is empty.
    #[track_caller]
    pub fn front(&self) -> T {
        contract(self.try_front())
    }

    pub fn try_front(&self) -> Result<T> {
        self.try_get(0).map_err(|_| Error::Empty)
    }

    /// Copy of the last element of the view.
    ///
    /// # Panics
    ///
    /// If the view is empty.
    #[track_caller]
    pub fn back(&self) -> T {
        contract(self.try_back())
    }

    pub fn try_back(&self) -> Result<T> {
        let last = self.len().checked_sub(1).ok_or(Error::Empty)?;
        self.try_get(last)
    }

    /// Iterates over copies of the view's elements.
    ///
    /// The iterator holds its own alias, so writes made while iterating are
    /// seen by elements not yet yielded.
    pub fn iter(&self) -> Iter<T> {
        Iter::new(self.alias())
    }

    /// Copies the view into a fresh buffer with mutable elements.
    ///
    /// The result shares nothing with `self`.
    pub fn dup(&self) -> Array<T> {
        Array::from_iter_exact(self.iter())
    }

    /// Copies the view into a fresh buffer with immutable elements.
    pub fn idup(&self) -> Array<T, Imm> {
        Array::from_iter_exact(self.iter())
    }

    /// A new array holding this view followed by `other`'s.
    ///
    /// Both operands are left untouched; the result owns a fresh buffer.
    pub fn concat(&self, other: &Self) -> Self {
        let len = concat_len::<Mut>(self.len(), other.len());
        Self::from_iter_len(len, self.iter().chain(other.iter()))
    }

    /// A new array holding this view followed by `value`.
    pub fn concat_elem(&self, value: T) -> Self {
        let len = concat_len::<Mut>(self.len(), 1);
        Self::from_iter_len(len, self.iter().chain(core::iter::once(value)))
    }

    /// Copies `src` over this view, element by element.
    ///
    /// `src` may alias the same buffer, overlapping or not.
    ///
    /// # Panics
    ///
    /// If the lengths differ.
    #[track_caller]
    pub fn copy_from<N: Access>(&self, src: &Array<T, N>) {
        contract(self.try_copy_from(src))
    }

    pub fn try_copy_from<N: Access>(&self, src: &Array<T, N>) -> Result<()> {
        if src.len() != self.len() {
            return Err(Error::LengthMismatch {
                expected: self.len(),
                actual: src.len(),
            });
        }
        // SAFETY: both ranges hold `len()` initialized elements and `T: Copy`;
        // `ptr::copy` allows overlap.
        unsafe { ptr::copy(src.as_ptr(), self.base(), self.len()) };
        Ok(())
    }

    /// Copies the view into a `Vec`.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }
}

impl<T> Array<MaybeUninit<T>, Mut> {
    /// Initializes the slot at `index`. A value already there is overwritten
    /// without being dropped.
    ///
    /// # Panics
    ///
    /// If `index >= len()`.
    #[track_caller]
    pub fn write(&self, index: usize, value: T) {
        self.set(index, MaybeUninit::new(value));
    }

    /// Converts to an array of initialized elements, keeping the view.
    ///
    /// # Safety
    ///
    /// Every element of the backing buffer, not only those in the current
    /// view, must have been written.
    ///
    /// # Panics
    ///
    /// If another alias of the buffer is alive.
    #[track_caller]
    pub unsafe fn assume_init(self) -> Array<T> {
        let Array { buffer, view, .. } = self;
        let Some(buffer) = buffer else {
            return Array::new();
        };
        let buffer = match Arc::try_unwrap(buffer) {
            Ok(buffer) => buffer,
            Err(shared) => contract(Err(Error::Shared {
                aliases: Arc::strong_count(&shared),
            })),
        };
        Array {
            // SAFETY: guaranteed by the caller.
            buffer: Some(Arc::new(unsafe { buffer.assume_init() })),
            view,
            marker: PhantomData,
        }
    }
}

impl<T: Copy> IntoIterator for Array<T, Mut> {
    type Item = T;
    type IntoIter = Iter<T>;

    fn into_iter(self) -> Iter<T> {
        Iter::new(self)
    }
}

impl<T: Copy> IntoIterator for &Array<T, Mut> {
    type Item = T;
    type IntoIter = Iter<T>;

    fn into_iter(self) -> Iter<T> {
        self.iter()
    }
}
