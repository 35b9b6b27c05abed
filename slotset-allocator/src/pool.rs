use std::alloc::Layout;
use std::fmt;
use std::ptr::NonNull;

use crate::{AllocError, Heap, Strategy};

/// Strategy that keeps released cells and hands them out again before
/// asking the heap for more.
///
/// Cells are reused last-released first. The cache is bounded by `limit`;
/// cells released past the limit go straight back to the heap.
pub struct Pool <T> {
    cells: Vec<NonNull<T>>,
    limit: usize,
    heap: Heap,
}

unsafe impl <T: Send> Send for Pool<T> {}
unsafe impl <T: Sync> Sync for Pool<T> {}

impl <T> Pool<T> {

    pub fn new() -> Self {
        Self::with_limit(usize::MAX)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self { cells: Vec::new(), limit, heap: Heap }
    }

    /// Number of released cells waiting for reuse.
    pub fn cached(&self) -> usize {
        self.cells.len()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Allocates `count` cells ahead of time.
    pub fn prefill(&mut self, count: usize) -> Result<(), AllocError> {
        let count = count.min(self.limit.saturating_sub(self.cells.len()));
        self.cells.try_reserve(count).map_err(|_| {
            let total = self.cells.len().saturating_add(count);
            match Layout::array::<NonNull<T>>(total) {
                Ok(layout) => AllocError::OutOfMemory { layout },
                Err(_) => AllocError::CapacityOverflow,
            }
        })?;
        for _ in 0..count {
            let cell = Strategy::<T>::allocate(&mut self.heap)?;
            self.cells.push(cell);
        }
        Ok(())
    }
}

unsafe impl <T> Strategy<T> for Pool<T> {
    fn allocate(&mut self) -> Result<NonNull<T>, AllocError> {
        match self.cells.pop() {
            Some(cell) => Ok(cell),
            None => Strategy::<T>::allocate(&mut self.heap),
        }
    }

    unsafe fn deallocate(&mut self, ptr: NonNull<T>) {
        if self.cells.len() < self.limit && self.cells.try_reserve(1).is_ok() {
            self.cells.push(ptr);
        } else {
            Strategy::<T>::deallocate(&mut self.heap, ptr);
        }
    }
}

impl <T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl <T> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("cached", &self.cells.len())
            .field("limit", &self.limit)
            .finish()
    }
}

impl <T> Drop for Pool<T> {
    fn drop(&mut self) {
        for cell in self.cells.drain(..) {
            unsafe { Strategy::<T>::deallocate(&mut self.heap, cell) };
        }
    }
}
