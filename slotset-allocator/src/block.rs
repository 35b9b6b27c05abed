use std::alloc::{self, Layout};
use std::marker::PhantomData;
use std::ptr::NonNull;
use std::{fmt, mem, ptr, slice};

use crate::AllocError;

/// Growable array of plain-copy entries whose growth can fail.
///
/// Capacity doubles whenever the block is full and never shrinks. A failed
/// growth leaves the block exactly as it was.
pub struct RawBlock <E: Copy> {
    ptr: NonNull<E>,
    len: usize,
    cap: usize,
    _marker: PhantomData<E>,
}

unsafe impl <E: Copy + Send> Send for RawBlock<E> {}
unsafe impl <E: Copy + Sync> Sync for RawBlock<E> {}

impl <E: Copy> RawBlock<E> {

    /// # Panics
    /// Panics if `cap` is zero or `E` is zero-sized
    pub fn with_capacity(cap: usize) -> Result<Self, AllocError> {
        assert!(mem::size_of::<E>() != 0, "E must not be ZST");
        assert!(cap != 0, "block capacity must be at least 1");
        let layout = Layout::array::<E>(cap).map_err(|_| AllocError::CapacityOverflow)?;
        let raw = unsafe { alloc::alloc(layout) } as *mut E;
        let ptr = NonNull::new(raw).ok_or(AllocError::OutOfMemory { layout })?;
        Ok(Self { ptr, len: 0, cap, _marker: PhantomData })
    }

    fn grow(&mut self) -> Result<(), AllocError> {
        let new_cap = self.cap.checked_mul(2).ok_or(AllocError::CapacityOverflow)?;
        let old_layout = Layout::array::<E>(self.cap).map_err(|_| AllocError::CapacityOverflow)?;
        let new_layout = Layout::array::<E>(new_cap).map_err(|_| AllocError::CapacityOverflow)?;
        let new_ptr = unsafe {
            alloc::realloc(self.ptr.as_ptr() as *mut u8, old_layout, new_layout.size())
        } as *mut E;

        // realloc keeps the old block alive on failure
        self.ptr = NonNull::new(new_ptr).ok_or(AllocError::OutOfMemory { layout: new_layout })?;
        log::trace!("raw block grown from {} to {} entries", self.cap, new_cap);
        self.cap = new_cap;
        Ok(())
    }

    /// Doubles the capacity until at least `total` entries fit.
    pub fn reserve(&mut self, total: usize) -> Result<(), AllocError> {
        while self.cap < total {
            self.grow()?;
        }
        Ok(())
    }

    pub fn push(&mut self, elem: E) -> Result<(), AllocError> {
        if self.len == self.cap {
            self.grow()?;
        }
        unsafe {
            ptr::write(self.ptr.as_ptr().add(self.len), elem);
        }
        self.len += 1;
        Ok(())
    }

    /// Appends without growing, handing `elem` back if the block is full.
    pub fn push_within_capacity(&mut self, elem: E) -> Result<(), E> {
        if self.len == self.cap {
            return Err(elem);
        }
        unsafe {
            ptr::write(self.ptr.as_ptr().add(self.len), elem);
        }
        self.len += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Option<E> {
        if self.len == 0 {
            None
        } else {
            self.len -= 1;
            unsafe { Some(ptr::read(self.ptr.as_ptr().add(self.len))) }
        }
    }

    pub fn as_slice(&self) -> &[E] {
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [E] {
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl <E: Copy + fmt::Debug> fmt::Debug for RawBlock<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawBlock")
            .field("entries", &self.as_slice())
            .field("cap", &self.cap)
            .finish()
    }
}

impl <E: Copy> Drop for RawBlock<E> {
    fn drop(&mut self) {
        // the layout was valid when this capacity was allocated
        if let Ok(layout) = Layout::array::<E>(self.cap) {
            unsafe {
                alloc::dealloc(self.ptr.as_ptr() as *mut u8, layout);
            }
        }
    }
}
