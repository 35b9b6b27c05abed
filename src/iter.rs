use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ptr::{self, NonNull};
use std::slice;

use slotset_allocator::{Heap, Strategy};

use crate::set::OrderedSet;
use crate::storage::StorageBlock;

/// Position over the live slots of an [`OrderedSet`].
///
/// The end boundary is the number of indices issued when the cursor was
/// made. Two cursors are equal when they sit on the same slot of the same set.
pub struct Cursor <'a, T, A: Strategy<T> = Heap> {
    set: &'a OrderedSet<T, A>,
    index: usize,
    end: usize,
}

impl <'a, T, A: Strategy<T>> Cursor<'a, T, A> {

    pub(crate) fn begin(set: &'a OrderedSet<T, A>, end: usize) -> Self {
        let mut cursor = Self { set, index: 0, end };
        cursor.skip_holes();
        cursor
    }

    pub(crate) fn end(set: &'a OrderedSet<T, A>, end: usize) -> Self {
        Self { set, index: end, end }
    }

    fn skip_holes(&mut self) {
        while self.index < self.end && !self.set.contains(self.index) {
            self.index += 1;
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// The element under the cursor, `None` at the end.
    pub fn get(&self) -> Option<&'a T> {
        if self.is_end() {
            None
        } else {
            self.set.get(self.index)
        }
    }

    /// Moves to the next live slot. Does nothing at the end.
    pub fn advance(&mut self) {
        if !self.is_end() {
            self.index += 1;
            self.skip_holes();
        }
    }

    pub fn is_end(&self) -> bool {
        self.index >= self.end
    }
}

impl <'a, T, A: Strategy<T>> Clone for Cursor<'a, T, A> {
    fn clone(&self) -> Self {
        Self { set: self.set, index: self.index, end: self.end }
    }
}

impl <'a, T, A: Strategy<T>> PartialEq for Cursor<'a, T, A> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.set, other.set) && self.index == other.index
    }
}

impl <'a, T, A: Strategy<T>> Eq for Cursor<'a, T, A> {}

impl <'a, T, A: Strategy<T>> fmt::Debug for Cursor<'a, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("index", &self.index)
            .field("end", &self.end)
            .finish()
    }
}

/// Live elements in ascending slot order.
pub struct Iter <'a, T, A: Strategy<T> = Heap> {
    front: Cursor<'a, T, A>,
    back: Cursor<'a, T, A>,
}

impl <'a, T, A: Strategy<T>> Iter<'a, T, A> {
    pub(crate) fn new(front: Cursor<'a, T, A>, back: Cursor<'a, T, A>) -> Self {
        Self { front, back }
    }
}

impl <'a, T, A: Strategy<T>> Iterator for Iter<'a, T, A> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let item = self.front.get();
        self.front.advance();
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.back.index().saturating_sub(self.front.index())))
    }
}

impl <'a, T, A: Strategy<T>> FusedIterator for Iter<'a, T, A> {}

impl <'a, T, A: Strategy<T>> Clone for Iter<'a, T, A> {
    fn clone(&self) -> Self {
        Self { front: self.front.clone(), back: self.back.clone() }
    }
}

impl <'a, T, A: Strategy<T>> fmt::Debug for Iter<'a, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("front", &self.front)
            .field("back", &self.back)
            .finish()
    }
}

/// Mutable access to the live elements in ascending slot order.
pub struct IterMut <'a, T> {
    slots: slice::Iter<'a, Option<NonNull<T>>>,
    _marker: PhantomData<&'a mut T>,
}

impl <'a, T> IterMut<'a, T> {
    pub(crate) fn new(storage: &'a mut StorageBlock<T>) -> Self {
        let storage: &'a StorageBlock<T> = storage;
        Self { slots: storage.slots().iter(), _marker: PhantomData }
    }
}

impl <'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        // each slot owns a distinct cell and is visited once
        self.slots.by_ref().find_map(|slot| slot.map(|cell| unsafe { &mut *cell.as_ptr() }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.slots.len()))
    }
}

impl <'a, T> FusedIterator for IterMut<'a, T> {}
