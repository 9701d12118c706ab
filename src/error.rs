//! Contract violations reported by the checked (`try_*`) array operations.
//!
//! The unchecked-looking methods (`slice`, `pop_front`, `get`, ...) panic with
//! the `Display` of one of these values instead of returning it.

use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// Element access past the end of the current view.
    #[error("index out of bounds: the len is {len} but the index is {index}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Slice bounds with `start > end` or `end > len`.
    #[error("invalid range {start}..{end} for a view of len {len}")]
    InvalidRange { start: usize, end: usize, len: usize },

    /// A copy between views of different lengths.
    #[error("length mismatch: destination has {expected} elements, source has {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// `front`, `back` or a pop on an empty view.
    #[error("view is empty")]
    Empty,

    /// The buffer has other live aliases where sole ownership is required.
    #[error("buffer is shared by {aliases} aliases")]
    Shared { aliases: usize },
}

/// Unwraps a contract check, panicking at the caller's location on failure.
#[track_caller]
#[inline]
pub(crate) fn contract<T>(result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("{err}"),
    }
}
