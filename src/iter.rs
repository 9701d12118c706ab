//! Range traversal over an array.
//!
//! An array is its own range: [`front`](crate::Array::front) and
//! [`back`](crate::Array::back) observe, `pop_front` and `pop_back` shrink
//! the view. [`Iter`] packages that protocol as a Rust iterator holding its
//! own alias, so the source array is never consumed.

use core::{fmt, iter::FusedIterator};

use crate::{
    access::{Access, Imm, Mut},
    array::Array,
};

/// Iterator over the elements of an array's view, by value.
///
/// For [`Mut`] arrays elements are copied out when yielded, so writes through
/// other aliases show up in elements not yet reached. For [`Imm`] arrays
/// elements are cloned.
pub struct Iter<T, M: Access = Mut> {
    range: Array<T, M>,
}

impl<T, M: Access> Iter<T, M> {
    pub(crate) fn new(range: Array<T, M>) -> Self {
        Iter { range }
    }

    /// The part of the view not yet yielded, as an alias.
    pub fn as_array(&self) -> &Array<T, M> {
        &self.range
    }
}

impl<T, M: Access> Clone for Iter<T, M> {
    fn clone(&self) -> Self {
        Iter {
            range: self.range.alias(),
        }
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for Iter<T, Mut> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.range).finish()
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<T, Imm> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.range).finish()
    }
}

impl<T: Copy> Iterator for Iter<T, Mut> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let value = self.range.try_front().ok()?;
        self.range.pop_front();
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.range.len(), Some(self.range.len()))
    }
}

impl<T: Copy> DoubleEndedIterator for Iter<T, Mut> {
    fn next_back(&mut self) -> Option<T> {
        let value = self.range.try_back().ok()?;
        self.range.pop_back();
        Some(value)
    }
}

impl<T: Clone> Iterator for Iter<T, Imm> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let value = self.range.try_front().ok()?.clone();
        self.range.pop_front();
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.range.len(), Some(self.range.len()))
    }
}

impl<T: Clone> DoubleEndedIterator for Iter<T, Imm> {
    fn next_back(&mut self) -> Option<T> {
        let value = self.range.try_back().ok()?.clone();
        self.range.pop_back();
        Some(value)
    }
}

impl<T: Copy> ExactSizeIterator for Iter<T, Mut> {}
impl<T: Clone> ExactSizeIterator for Iter<T, Imm> {}
impl<T: Copy> FusedIterator for Iter<T, Mut> {}
impl<T: Clone> FusedIterator for Iter<T, Imm> {}
