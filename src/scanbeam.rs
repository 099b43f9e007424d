// Copyright 2025 Lars Brubaker
// License: MIT
//
// Event queues for the sweep.
//
//   Scanbeam:    the Y values still to visit, largest first. Duplicate
//                inserts are allowed and coalesced on pop.
//   MaximaList:  X positions of local maxima seen in the current scanbeam,
//                kept sorted and unique. Only filled in strictly-simple mode.

use std::collections::BinaryHeap;

use crate::geom::CInt;

#[derive(Default)]
pub struct Scanbeam {
    heap: BinaryHeap<CInt>,
}

impl Scanbeam {
    pub fn new() -> Self {
        Self { heap: BinaryHeap::new() }
    }

    pub fn insert(&mut self, y: CInt) {
        self.heap.push(y);
    }

    /// Removes and returns the largest pending Y, discarding its duplicates.
    pub fn pop(&mut self) -> Option<CInt> {
        let y = self.heap.pop()?;
        while self.heap.peek() == Some(&y) {
            self.heap.pop();
        }
        Some(y)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

/// Sorted, duplicate-free X positions. Cursors are plain indices.
#[derive(Default)]
pub struct MaximaList {
    xs: Vec<CInt>,
}

impl MaximaList {
    pub fn new() -> Self {
        Self { xs: Vec::new() }
    }

    pub fn insert(&mut self, x: CInt) {
        if let Err(pos) = self.xs.binary_search(&x) {
            self.xs.insert(pos, x);
        }
    }

    pub fn clear(&mut self) {
        self.xs.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    #[inline]
    pub fn x(&self, i: usize) -> CInt {
        self.xs[i]
    }
}
