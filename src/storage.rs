use std::ptr::NonNull;

use slotset_allocator::{AllocError, RawBlock};

/// Slot table of owning element pointers. An empty slot is a hole.
pub(crate) struct StorageBlock <T> {
    slots: RawBlock<Option<NonNull<T>>>,
}

impl <T> StorageBlock<T> {

    pub(crate) fn with_capacity(cap: usize) -> Result<Self, AllocError> {
        Ok(Self { slots: RawBlock::with_capacity(cap)? })
    }

    pub(crate) fn get(&self, index: usize) -> Option<NonNull<T>> {
        self.slots.as_slice().get(index).copied().flatten()
    }

    /// Issues the next fresh index as a hole.
    pub(crate) fn append_slot(&mut self) -> Result<usize, AllocError> {
        let index = self.slots.len();
        self.slots.push(None)?;
        Ok(index)
    }

    /// Takes back the most recently issued index, which must still be a hole.
    pub(crate) fn retract_slot(&mut self, index: usize) {
        debug_assert_eq!(index + 1, self.slots.len());
        let popped = self.slots.pop();
        debug_assert!(matches!(popped, Some(None)));
    }

    /// # Panics
    /// Panics if `index` was never issued
    pub(crate) fn set(&mut self, index: usize, cell: Option<NonNull<T>>) {
        self.slots.as_mut_slice()[index] = cell;
    }

    /// Turns an occupied slot into a hole and returns its pointer.
    pub(crate) fn take(&mut self, index: usize) -> Option<NonNull<T>> {
        self.slots.as_mut_slice().get_mut(index)?.take()
    }

    pub(crate) fn slots(&self) -> &[Option<NonNull<T>>] {
        self.slots.as_slice()
    }

    pub(crate) fn occupied(&self) -> impl Iterator<Item = NonNull<T>> + '_ {
        self.slots().iter().filter_map(|slot| *slot)
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }
}
