//! The window an array exposes over its buffer.

use core::ops::{Bound, RangeBounds};

use crate::error::{Error, Result};

/// Half-open `[start, end)` element offsets into a buffer.
///
/// A view never owns memory and is always stored next to the handle of the
/// buffer it indexes, so `end <= buffer.len()` holds for as long as it lives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct View {
    start: usize,
    end: usize,
}

impl View {
    pub(crate) const EMPTY: View = View { start: 0, end: 0 };

    /// View covering the first `len` elements of a buffer.
    #[inline]
    pub(crate) fn full(len: usize) -> Self {
        View { start: 0, end: len }
    }

    #[inline]
    pub(crate) fn start(&self) -> usize {
        self.start
    }

    #[cfg(test)]
    pub(crate) fn end(&self) -> usize {
        self.end
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Buffer offset of the `index`-th element of the view.
    #[inline]
    pub(crate) fn offset(&self, index: usize) -> Result<usize> {
        if index < self.len() {
            Ok(self.start + index)
        } else {
            Err(Error::IndexOutOfBounds {
                index,
                len: self.len(),
            })
        }
    }

    /// Narrows to `range`, given relative to this view.
    ///
    /// An unbounded end stands for the current length of the view, so
    /// `narrow(2..)` keeps everything from the third element on.
    pub(crate) fn narrow(&self, range: impl RangeBounds<usize>) -> Result<View> {
        let len = self.len();
        let start = match range.start_bound() {
            Bound::Included(&start) => start,
            Bound::Excluded(&start) => start.checked_add(1).ok_or(Error::InvalidRange {
                start,
                end: len,
                len,
            })?,
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&end) => end.checked_add(1).ok_or(Error::InvalidRange {
                start,
                end,
                len,
            })?,
            Bound::Excluded(&end) => end,
            Bound::Unbounded => len,
        };
        if start > end || end > len {
            return Err(Error::InvalidRange { start, end, len });
        }
        Ok(View {
            start: self.start + start,
            end: self.start + end,
        })
    }

    /// Drops the first element from the view.
    pub(crate) fn pop_front(&mut self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::Empty);
        }
        self.start += 1;
        Ok(())
    }

    /// Drops the last element from the view.
    pub(crate) fn pop_back(&mut self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::Empty);
        }
        self.end -= 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_view() {
        let view = View::full(5);
        assert_eq!((view.start(), view.end(), view.len()), (0, 5, 5));
        assert!(!view.is_empty());
        assert!(View::default().is_empty());
    }

    #[test]
    fn narrow_is_relative_to_current_window() {
        let view = View::full(10).narrow(2..8).unwrap();
        assert_eq!((view.start(), view.end()), (2, 8));

        let inner = view.narrow(1..3).unwrap();
        assert_eq!((inner.start(), inner.end()), (3, 5));
    }

    #[test]
    fn narrow_accepts_every_range_form() {
        let view = View::full(5);
        assert_eq!(view.narrow(..).unwrap(), view);
        assert_eq!(view.narrow(1..).unwrap(), View { start: 1, end: 5 });
        assert_eq!(view.narrow(..2).unwrap(), View { start: 0, end: 2 });
        assert_eq!(view.narrow(1..=3).unwrap(), View { start: 1, end: 4 });
        assert_eq!(view.narrow(..=4).unwrap(), view);
        assert_eq!(view.narrow(5..).unwrap(), View { start: 5, end: 5 });
        assert_eq!(
            view.narrow((Bound::Excluded(0), Bound::Unbounded)).unwrap(),
            View { start: 1, end: 5 }
        );
    }

    #[test]
    #[allow(clippy::reversed_empty_ranges)]
    fn narrow_rejects_bad_bounds() {
        let view = View::full(5).narrow(1..4).unwrap();
        assert_eq!(
            view.narrow(2..1),
            Err(Error::InvalidRange {
                start: 2,
                end: 1,
                len: 3
            })
        );
        assert_eq!(
            view.narrow(0..4),
            Err(Error::InvalidRange {
                start: 0,
                end: 4,
                len: 3
            })
        );
        assert_eq!(
            view.narrow(4..),
            Err(Error::InvalidRange {
                start: 4,
                end: 3,
                len: 3
            })
        );
        assert!(view.narrow(..=usize::MAX).is_err());
    }

    #[test]
    fn offset_checks_bounds() {
        let view = View::full(4).narrow(1..3).unwrap();
        assert_eq!(view.offset(0), Ok(1));
        assert_eq!(view.offset(1), Ok(2));
        assert_eq!(
            view.offset(2),
            Err(Error::IndexOutOfBounds { index: 2, len: 2 })
        );
    }

    #[test]
    fn pops_shrink_until_empty() {
        let mut view = View::full(3);
        view.pop_front().unwrap();
        view.pop_back().unwrap();
        assert_eq!((view.start(), view.end()), (1, 2));
        view.pop_front().unwrap();
        assert!(view.is_empty());
        assert_eq!(view.pop_front(), Err(Error::Empty));
        assert_eq!(view.pop_back(), Err(Error::Empty));
    }
}
