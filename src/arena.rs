// Copyright 2025 Lars Brubaker
// License: MIT
//
// Vec-backed record arena addressed by u32 handles.
//
// Edges, output records and output points all live in arenas owned by one
// Clipper. Links between records are handles, with NONE standing in for an
// absent link. Records are never freed one at a time: a run ends by
// clearing the whole arena, which is how the engine resets after both
// success and failure.

use std::ops::{Index, IndexMut};

/// Handle into an [`Arena`].
pub type Handle = u32;

/// The absent handle.
pub const NONE: Handle = u32::MAX;

pub struct Arena<T> {
    items: Vec<T>,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Store a record, returning its handle.
    pub fn alloc(&mut self, item: T) -> Handle {
        let idx = self.items.len() as Handle;
        self.items.push(item);
        idx
    }

    /// Drop every record. Outstanding handles become dangling.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Drop records allocated after the first `len`.
    pub fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, h: Handle) -> Option<&T> {
        self.items.get(h as usize)
    }

    pub fn get_mut(&mut self, h: Handle) -> Option<&mut T> {
        self.items.get_mut(h as usize)
    }

    /// Handles in allocation order.
    pub fn handles(&self) -> std::ops::Range<Handle> {
        0..self.items.len() as Handle
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<Handle> for Arena<T> {
    type Output = T;

    #[inline]
    fn index(&self, h: Handle) -> &T {
        &self.items[h as usize]
    }
}

impl<T> IndexMut<Handle> for Arena<T> {
    #[inline]
    fn index_mut(&mut self, h: Handle) -> &mut T {
        &mut self.items[h as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_returns_sequential_handles() {
        let mut a: Arena<i32> = Arena::new();
        let h0 = a.alloc(7);
        let h1 = a.alloc(9);
        assert_eq!((h0, h1), (0, 1));
        assert_eq!(a[h1], 9);
        a[h0] = 3;
        assert_eq!(a[h0], 3);
        assert_eq!(a.handles().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn clear_resets_everything() {
        let mut a: Arena<u8> = Arena::new();
        a.alloc(1);
        a.alloc(2);
        a.clear();
        assert!(a.is_empty());
        assert!(a.get(0).is_none());
        assert_eq!(a.alloc(5), 0);
    }

    #[test]
    fn none_is_never_a_valid_handle() {
        let a: Arena<u8> = Arena::new();
        assert!(a.get(NONE).is_none());
    }
}
