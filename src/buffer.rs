#![allow(unsafe_code)]

//! Fixed-extent storage shared by every alias of an array.
//!
//! A `Buffer<T>` owns `len` initialized elements in a single heap allocation.
//! It is created once, never resized, and released exactly once by its `Drop`
//! impl when the last `Arc` handle to it goes away.
//!
//! ```text
//! Arc<Buffer<T>> ──▶ { ptr, len } ──▶ [T; len]
//! ```
//!
//! Elements are only ever reached through the raw pointer, never through a
//! reference to the `Buffer` itself, so arrays with mutable elements may write
//! through any alias.

use alloc::alloc::{Layout, alloc, dealloc, handle_alloc_error};
use core::{
    mem::{self, ManuallyDrop, MaybeUninit},
    ptr::{self, NonNull},
};

pub(crate) struct Buffer<T> {
    ptr: NonNull<T>,
    len: usize,
}

// SAFETY: a buffer owns its elements like `Box<[T]>`; sharing it across
// threads hands out `&T` and may drop `T` on another thread.
unsafe impl<T: Send + Sync> Send for Buffer<T> {}
unsafe impl<T: Send + Sync> Sync for Buffer<T> {}

impl<T> Buffer<T> {
    /// Builds a buffer from an iterator whose length is known upfront.
    pub(crate) fn from_iter_exact(
        values: impl IntoIterator<Item = T, IntoIter: ExactSizeIterator>,
    ) -> Self {
        let iter = values.into_iter();
        let len = iter.len();
        Self::from_iter_len(len, iter)
    }

    /// Builds a buffer of exactly `len` elements taken from `iter`.
    ///
    /// Items past `len` are left in the iterator. If the iterator runs dry
    /// before `len` items, or producing an item panics, the elements written
    /// so far are dropped and the storage is freed before unwinding.
    pub(crate) fn from_iter_len(len: usize, mut iter: impl Iterator<Item = T>) -> Self {
        let mut guard = InitGuard {
            ptr: Self::allocate(len),
            len,
            initialized: 0,
        };
        while guard.initialized < len {
            let Some(value) = iter.next() else {
                panic!("iterator exhausted too early");
            };
            // SAFETY: `initialized < len`, so the slot is inside the allocation
            // and has not been written yet.
            unsafe { guard.ptr.add(guard.initialized).write(value) };
            guard.initialized += 1;
        }
        guard.finish()
    }

    /// Builds a buffer of `len` clones of `value`, moving `value` itself into
    /// the last slot.
    pub(crate) fn from_elem(len: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::from_iter_len(len, core::iter::repeat_n(value, len))
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Pointer to the first element. Valid for `len` elements as long as
    /// `self` is alive.
    #[inline]
    pub(crate) fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    fn layout(len: usize) -> Layout {
        match Layout::array::<T>(len) {
            Ok(layout) => layout,
            Err(_) => panic!("capacity overflow"),
        }
    }

    /// Reserves uninitialized storage for `len` elements.
    ///
    /// Zero-sized layouts never reach the allocator. Allocation failure is
    /// fatal.
    fn allocate(len: usize) -> NonNull<T> {
        let layout = Self::layout(len);
        if layout.size() == 0 {
            return NonNull::dangling();
        }
        tracing::trace!(
            target: "rcarray::buffer",
            len,
            bytes = layout.size(),
            "allocate"
        );
        // SAFETY: layout has non-zero size.
        let raw = unsafe { alloc(layout) };
        match NonNull::new(raw.cast::<T>()) {
            Some(ptr) => ptr,
            None => handle_alloc_error(layout),
        }
    }

    /// Frees storage obtained from [`Buffer::allocate`].
    ///
    /// # Safety
    ///
    /// `ptr` and `len` must come from the same `allocate` call and the storage
    /// must not be used afterwards. Elements are not dropped.
    unsafe fn deallocate(ptr: NonNull<T>, len: usize) {
        let layout = Self::layout(len);
        if layout.size() != 0 {
            // SAFETY: guaranteed by the caller.
            unsafe { dealloc(ptr.as_ptr().cast::<u8>(), layout) };
        }
    }
}

impl<T> Buffer<MaybeUninit<T>> {
    /// Reserves storage for `len` elements without initializing them.
    pub(crate) fn uninit(len: usize) -> Self {
        Buffer {
            ptr: Self::allocate(len),
            len,
        }
    }

    /// Reinterprets the storage as initialized elements.
    ///
    /// # Safety
    ///
    /// Every one of the `len` elements must have been written.
    pub(crate) unsafe fn assume_init(self) -> Buffer<T> {
        let this = ManuallyDrop::new(self);
        // `MaybeUninit<T>` has the layout of `T`, so the allocation layout used
        // on release is unchanged.
        Buffer {
            ptr: this.ptr.cast::<T>(),
            len: this.len,
        }
    }
}

impl<T> Drop for Buffer<T> {
    fn drop(&mut self) {
        tracing::trace!(
            target: "rcarray::buffer",
            len = self.len,
            drops_elements = mem::needs_drop::<T>(),
            "release"
        );
        // SAFETY: all `len` elements are initialized and this is the only
        // release of the allocation.
        unsafe {
            if mem::needs_drop::<T>() {
                ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.ptr.as_ptr(), self.len));
            }
            Self::deallocate(self.ptr, self.len);
        }
    }
}

/// Owns a partially written allocation while a buffer is being built.
struct InitGuard<T> {
    ptr: NonNull<T>,
    len: usize,
    initialized: usize,
}

impl<T> InitGuard<T> {
    fn finish(self) -> Buffer<T> {
        debug_assert_eq!(self.initialized, self.len);
        let this = ManuallyDrop::new(self);
        Buffer {
            ptr: this.ptr,
            len: this.len,
        }
    }
}

impl<T> Drop for InitGuard<T> {
    fn drop(&mut self) {
        // SAFETY: exactly the first `initialized` slots were written, and the
        // allocation came from `Buffer::allocate(len)`.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.ptr.as_ptr(),
                self.initialized,
            ));
            Buffer::deallocate(self.ptr, self.len);
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::{rc::Rc, string::String, vec, vec::Vec};
    use core::cell::RefCell;
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use super::*;

    fn contents<T: Clone>(buffer: &Buffer<T>) -> Vec<T> {
        // SAFETY: the buffer is alive and fully initialized.
        unsafe { core::slice::from_raw_parts(buffer.as_ptr(), buffer.len()) }.to_vec()
    }

    /// Records its id into a shared log when dropped.
    struct Tracked {
        id: usize,
        log: Rc<RefCell<Vec<usize>>>,
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.log.borrow_mut().push(self.id);
        }
    }

    #[test]
    fn from_iter_exact_copies_in_order() {
        let buffer = Buffer::from_iter_exact([1, 2, 3, 4]);
        assert_eq!(buffer.len(), 4);
        assert_eq!(contents(&buffer), vec![1, 2, 3, 4]);
    }

    #[test]
    fn from_iter_len_leaves_surplus() {
        let mut source = 1..10;
        let buffer = Buffer::from_iter_len(3, &mut source);
        assert_eq!(contents(&buffer), vec![1, 2, 3]);
        assert_eq!(source.next(), Some(4));
    }

    #[test]
    fn from_elem_moves_original_into_last_slot() {
        let value = Rc::new(5);
        let buffer = Buffer::from_elem(3, Rc::clone(&value));
        assert_eq!(Rc::strong_count(&value), 4);
        drop(buffer);
        assert_eq!(Rc::strong_count(&value), 1);
    }

    #[test]
    fn from_elem_zero_len_drops_value() {
        let value = Rc::new(5);
        let buffer = Buffer::from_elem(0, Rc::clone(&value));
        assert_eq!(buffer.len(), 0);
        assert_eq!(Rc::strong_count(&value), 1);
    }

    #[test]
    fn release_drops_each_element_once_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let buffer = Buffer::from_iter_exact((0..4).map(|id| Tracked {
            id,
            log: Rc::clone(&log),
        }));
        assert!(log.borrow().is_empty());
        drop(buffer);
        assert_eq!(*log.borrow(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn short_iterator_cleans_up() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let items: Vec<Tracked> = (0..2)
            .map(|id| Tracked {
                id,
                log: Rc::clone(&log),
            })
            .collect();
        let result = catch_unwind(AssertUnwindSafe(|| Buffer::from_iter_len(5, items.into_iter())));
        let err = result.err().expect("construction should panic");
        assert_eq!(
            err.downcast_ref::<&str>().copied(),
            Some("iterator exhausted too early")
        );
        assert_eq!(*log.borrow(), vec![0, 1]);
    }

    #[test]
    fn panicking_producer_cleans_up() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let result = catch_unwind(AssertUnwindSafe(|| {
            Buffer::from_iter_exact((0..4).map(|id| {
                if id == 2 {
                    panic!("boom");
                }
                Tracked {
                    id,
                    log: Rc::clone(&log),
                }
            }))
        }));
        assert!(result.is_err());
        assert_eq!(*log.borrow(), vec![0, 1]);
    }

    #[test]
    fn trivial_elements_are_not_dropped() {
        assert!(!mem::needs_drop::<u64>());
        let buffer = Buffer::from_elem(16, 7u64);
        assert_eq!(contents(&buffer), vec![7; 16]);
    }

    #[test]
    fn zero_sized_elements_are_still_dropped() {
        use core::sync::atomic::{AtomicUsize, Ordering};

        static DROPS: AtomicUsize = AtomicUsize::new(0);
        struct Marker;
        impl Drop for Marker {
            fn drop(&mut self) {
                DROPS.fetch_add(1, Ordering::Relaxed);
            }
        }

        assert_eq!(mem::size_of::<Marker>(), 0);
        let buffer = Buffer::from_iter_exact([Marker, Marker, Marker]);
        assert_eq!(buffer.len(), 3);
        drop(buffer);
        assert_eq!(DROPS.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn empty_buffer() {
        let buffer: Buffer<String> = Buffer::from_iter_exact(Vec::new());
        assert_eq!(buffer.len(), 0);
        assert!(contents(&buffer).is_empty());
    }

    #[test]
    fn uninit_then_assume_init() {
        let buffer = Buffer::<MaybeUninit<String>>::uninit(2);
        // SAFETY: both slots are written before `assume_init`.
        let buffer = unsafe {
            buffer.as_ptr().write(MaybeUninit::new(String::from("a")));
            buffer.as_ptr().add(1).write(MaybeUninit::new(String::from("b")));
            buffer.assume_init()
        };
        assert_eq!(contents(&buffer), vec![String::from("a"), String::from("b")]);
    }
}
