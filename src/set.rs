use std::fmt;
use std::ptr::NonNull;

use slotset_allocator::{AllocError, Heap, Strategy};

use crate::config::Config;
use crate::error::InsertError;
use crate::free_list::FreeList;
use crate::iter::{Cursor, Iter, IterMut};
use crate::storage::StorageBlock;

/// Indexed arena with stable `usize` handles.
///
/// Every element lives in its own cell obtained from the allocation
/// strategy `A`, so growing the slot table never moves an element. Removed
/// slots become holes and are handed out again, most recently freed first.
///
/// Handles carry no generation: once a slot is removed its index may be
/// issued again, and an old copy of the handle then names the new element.
pub struct OrderedSet <T, A: Strategy<T> = Heap> {
    live: usize,
    storage: StorageBlock<T>,
    free: FreeList,
    strategy: A,
}

unsafe impl <T: Send, A: Strategy<T> + Send> Send for OrderedSet<T, A> {}
unsafe impl <T: Sync, A: Strategy<T> + Sync> Sync for OrderedSet<T, A> {}

#[derive(Debug, Clone, Copy)]
enum Reserved {
    Fresh(usize),
    Recycled(usize),
}

impl Reserved {
    fn index(self) -> usize {
        match self {
            Self::Fresh(index) | Self::Recycled(index) => index,
        }
    }
}

impl <T> OrderedSet<T, Heap> {

    /// # Panics
    /// Aborts through [`std::alloc::handle_alloc_error`] if the initial
    /// blocks cannot be allocated
    pub fn new() -> Self {
        Self::new_in(Heap)
    }

    pub fn with_config(config: Config) -> Result<Self, AllocError> {
        Self::with_config_in(config, Heap)
    }
}

impl <T, A: Strategy<T>> OrderedSet<T, A> {

    /// # Panics
    /// Aborts through [`std::alloc::handle_alloc_error`] if the initial
    /// blocks cannot be allocated
    pub fn new_in(strategy: A) -> Self {
        Self::with_config_in(Config::default(), strategy).unwrap_or_else(|err| err.raise())
    }

    pub fn with_config_in(config: Config, strategy: A) -> Result<Self, AllocError> {
        let cap = config.initial_capacity();
        Ok(Self {
            live: 0,
            storage: StorageBlock::with_capacity(cap)?,
            free: FreeList::with_capacity(cap)?,
            strategy,
        })
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of indices ever issued, holes included.
    pub fn num_indices(&self) -> usize {
        self.storage.len()
    }

    /// Number of slots the table holds before it has to grow.
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Number of holes waiting to be reused.
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    pub fn allocation_strategy(&self) -> &A {
        &self.strategy
    }

    pub fn allocation_strategy_mut(&mut self) -> &mut A {
        &mut self.strategy
    }

    pub fn insert(&mut self, value: T) -> Result<usize, AllocError> {
        self.insert_with(|| value)
    }

    /// Inserts the value built by `init`. The cell is obtained before `init`
    /// runs, so a failed allocation never calls it.
    pub fn insert_with<F>(&mut self, init: F) -> Result<usize, AllocError>
    where
        F: FnOnce() -> T,
    {
        let pending = self.begin_insert()?;
        let value = init();
        Ok(pending.fill(value))
    }

    /// Like [`OrderedSet::insert_with`], for constructors that can fail.
    ///
    /// On any error, and when `init` panics, the reserved index goes back
    /// where it came from and the set is unchanged.
    pub fn try_insert_with<F, E>(&mut self, init: F) -> Result<usize, InsertError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let pending = self.begin_insert()?;
        let value = init().map_err(InsertError::Construction)?;
        Ok(pending.fill(value))
    }

    fn begin_insert(&mut self) -> Result<PendingInsert<'_, T, A>, AllocError> {
        let slot = self.reserve_slot()?;
        match self.strategy.allocate() {
            Ok(cell) => Ok(PendingInsert { set: self, slot, cell, armed: true }),
            Err(err) => {
                self.release_slot(slot);
                Err(err)
            }
        }
    }

    fn reserve_slot(&mut self) -> Result<Reserved, AllocError> {
        if let Some(index) = self.free.pop() {
            log::trace!("recycling slot {index}");
            return Ok(Reserved::Recycled(index));
        }
        // every issued index must fit in the free-list, so remove never grows it
        self.free.reserve(self.storage.len() + 1)?;
        Ok(Reserved::Fresh(self.storage.append_slot()?))
    }

    fn release_slot(&mut self, slot: Reserved) {
        log::debug!("rolling back insert into slot {}", slot.index());
        match slot {
            Reserved::Recycled(index) => self.free.push(index),
            Reserved::Fresh(index) => self.storage.retract_slot(index),
        }
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.storage.get(index).map(|cell| unsafe { cell.as_ref() })
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.storage.get(index).map(|mut cell| unsafe { cell.as_mut() })
    }

    pub fn contains(&self, index: usize) -> bool {
        self.storage.get(index).is_some()
    }

    /// Drops the element at `index`. Holes and indices that were never
    /// issued are ignored.
    pub fn remove(&mut self, index: usize) {
        let Some(cell) = self.vacate(index) else {
            return;
        };
        unsafe {
            self.strategy.destroy(cell);
            self.strategy.deallocate(cell);
        }
    }

    /// Moves the element at `index` out of the set and frees the slot.
    pub fn take(&mut self, index: usize) -> Option<T> {
        let cell = self.vacate(index)?;
        unsafe {
            let value = cell.as_ptr().read();
            self.strategy.deallocate(cell);
            Some(value)
        }
    }

    fn vacate(&mut self, index: usize) -> Option<NonNull<T>> {
        let cell = self.storage.take(index)?;
        self.live -= 1;
        self.free.push(index);
        Some(cell)
    }

    pub fn iter(&self) -> Iter<'_, T, A> {
        Iter::new(self.begin(), self.end())
    }

    /// Like [`OrderedSet::iter`], paired with each element's index.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        let mut cursor = self.begin();
        let end = self.end();
        std::iter::from_fn(move || {
            if cursor == end {
                return None;
            }
            let index = cursor.index();
            let value = cursor.get()?;
            cursor.advance();
            Some((index, value))
        })
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(&mut self.storage)
    }

    /// Position of the first live element among the indices issued so far.
    pub fn begin(&self) -> Cursor<'_, T, A> {
        Cursor::begin(self, self.storage.len())
    }

    pub fn end(&self) -> Cursor<'_, T, A> {
        Cursor::end(self, self.storage.len())
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        assert!(self.live <= self.storage.len());
        assert_eq!(self.live, self.storage.occupied().count());
        assert_eq!(self.live + self.free.len(), self.storage.len());
        assert!(self.free.capacity() >= self.storage.len());
        for index in 0..self.storage.len() {
            assert_ne!(self.contains(index), self.free.contains(index), "slot {index}");
        }
    }
}

/// A reserved slot and cell, waiting for its element. Dropping it undoes
/// the reservation.
struct PendingInsert <'a, T, A: Strategy<T>> {
    set: &'a mut OrderedSet<T, A>,
    slot: Reserved,
    cell: NonNull<T>,
    armed: bool,
}

impl <'a, T, A: Strategy<T>> PendingInsert<'a, T, A> {
    fn fill(mut self, value: T) -> usize {
        let index = self.slot.index();
        unsafe { self.set.strategy.construct(self.cell, value) };
        self.armed = false;
        self.set.storage.set(index, Some(self.cell));
        self.set.live += 1;
        index
    }
}

impl <'a, T, A: Strategy<T>> Drop for PendingInsert<'a, T, A> {
    fn drop(&mut self) {
        if self.armed {
            unsafe { self.set.strategy.deallocate(self.cell) };
            self.set.release_slot(self.slot);
        }
    }
}

impl <T, A: Strategy<T> + Default> Default for OrderedSet<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl <T: fmt::Debug, A: Strategy<T>> fmt::Debug for OrderedSet<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}

impl <T, A: Strategy<T>> Drop for OrderedSet<T, A> {
    fn drop(&mut self) {
        let OrderedSet { storage, strategy, .. } = self;
        for cell in storage.occupied() {
            unsafe {
                strategy.destroy(cell);
                strategy.deallocate(cell);
            }
        }
    }
}

impl <'a, T, A: Strategy<T>> IntoIterator for &'a OrderedSet<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl <'a, T, A: Strategy<T>> IntoIterator for &'a mut OrderedSet<T, A> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
