use slotset_allocator::{AllocError, RawBlock};

/// LIFO stack of hole indices waiting to be reused.
pub(crate) struct FreeList {
    block: RawBlock<usize>,
}

impl FreeList {

    pub(crate) fn with_capacity(cap: usize) -> Result<Self, AllocError> {
        Ok(Self { block: RawBlock::with_capacity(cap)? })
    }

    /// Makes room for `total` entries, doubling as often as needed.
    pub(crate) fn reserve(&mut self, total: usize) -> Result<(), AllocError> {
        self.block.reserve(total)
    }

    /// # Panics
    /// Panics if no room was reserved for `index`
    pub(crate) fn push(&mut self, index: usize) {
        let pushed = self.block.push_within_capacity(index);
        assert!(pushed.is_ok(), "free-list capacity was not reserved for slot {index}");
    }

    pub(crate) fn pop(&mut self) -> Option<usize> {
        self.block.pop()
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, index: usize) -> bool {
        self.block.as_slice().contains(&index)
    }

    pub(crate) fn len(&self) -> usize {
        self.block.len()
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.block.capacity()
    }
}
