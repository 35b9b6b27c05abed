//! Allocation strategies and raw storage for `slotset`.
//!
//! A [`Strategy`] hands out memory for one element at a time, builds the
//! element in place, tears it down and gives the memory back. [`Heap`] is the
//! general purpose default, [`Pool`] keeps released cells around for reuse.
mod block;
mod error;
mod pool;

use std::alloc::{self, Layout};
use std::mem;
use std::ptr::{self, NonNull};

pub use block::RawBlock;
pub use error::AllocError;
pub use pool::Pool;

/// Memory provider for single elements of type `T`.
///
/// # Safety
/// `allocate` must return a pointer aligned for `T` and valid for reads and
/// writes of one `T`, distinct from every other cell it handed out that has
/// not been passed to `deallocate` yet.
pub unsafe trait Strategy<T> {
    fn allocate(&mut self) -> Result<NonNull<T>, AllocError>;

    /// # Safety
    /// `ptr` must come from `allocate` on this strategy, must not be
    /// deallocated twice and must not hold a live element.
    unsafe fn deallocate(&mut self, ptr: NonNull<T>);

    /// # Safety
    /// `ptr` must be an allocated cell that holds no live element.
    unsafe fn construct(&mut self, ptr: NonNull<T>, value: T) {
        ptr::write(ptr.as_ptr(), value);
    }

    /// # Safety
    /// `ptr` must hold a live element, which is dead afterwards.
    unsafe fn destroy(&mut self, ptr: NonNull<T>) {
        ptr::drop_in_place(ptr.as_ptr());
    }
}

/// General purpose heap allocation through [`std::alloc`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Heap;

unsafe impl <T> Strategy<T> for Heap {
    fn allocate(&mut self) -> Result<NonNull<T>, AllocError> {
        let layout = Layout::new::<T>();
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }
        let raw = unsafe { alloc::alloc(layout) } as *mut T;
        NonNull::new(raw).ok_or(AllocError::OutOfMemory { layout })
    }

    unsafe fn deallocate(&mut self, ptr: NonNull<T>) {
        if mem::size_of::<T>() != 0 {
            alloc::dealloc(ptr.as_ptr() as *mut u8, Layout::new::<T>());
        }
    }
}


#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    struct Droplet(Rc<RefCell<usize>>);
    impl Drop for Droplet {
        fn drop(&mut self) {
            *self.0.borrow_mut() += 1;
        }
    }

    #[test]
    fn heap_lifecycle() {
        let mut heap = Heap;
        let cell: NonNull<String> = heap.allocate().unwrap();
        unsafe {
            heap.construct(cell, String::from("gate"));
            assert_eq!(cell.as_ref(), "gate");
            heap.destroy(cell);
            heap.deallocate(cell);
        }
    }

    #[test]
    fn destroy_runs_drop() {
        let count = Rc::new(RefCell::new(0));
        let mut heap = Heap;
        let cell: NonNull<Droplet> = heap.allocate().unwrap();
        unsafe {
            heap.construct(cell, Droplet(count.clone()));
            heap.destroy(cell);
            heap.deallocate(cell);
        }
        assert_eq!(*count.borrow(), 1);
        assert_eq!(Rc::strong_count(&count), 1);
    }

    #[test]
    fn zero_sized_cells() {
        let mut heap = Heap;
        let cell: NonNull<()> = heap.allocate().unwrap();
        unsafe {
            heap.construct(cell, ());
            heap.destroy(cell);
            heap.deallocate(cell);
        }
    }

    #[test]
    fn cells_are_distinct() {
        let mut heap = Heap;
        let a: NonNull<u64> = heap.allocate().unwrap();
        let b: NonNull<u64> = heap.allocate().unwrap();
        assert_ne!(a, b);
        unsafe {
            heap.deallocate(a);
            heap.deallocate(b);
        }
    }
}
