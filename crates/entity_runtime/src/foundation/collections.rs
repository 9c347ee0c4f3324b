//! Specialized collection types

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Issues and recycles integer identifiers
///
/// `allocate` hands out the smallest recycled id when one is available and
/// otherwise the next id after the largest one ever issued. Ids start at 1.
#[derive(Debug, Default)]
pub struct IdAllocator {
    max_issued: u32,
    free_ids: BinaryHeap<Reverse<u32>>,
}

impl IdAllocator {
    /// Create a new allocator
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an id
    pub fn allocate(&mut self) -> u32 {
        if let Some(Reverse(id)) = self.free_ids.pop() {
            id
        } else {
            self.max_issued += 1;
            self.max_issued
        }
    }

    /// Return an id to the recycle pool
    ///
    /// Must only be called once the owner of the id has been fully torn down.
    pub fn release(&mut self, id: u32) {
        debug_assert!(id != 0 && id <= self.max_issued, "releasing id {id} that was never issued");
        self.free_ids.push(Reverse(id));
    }

    /// Largest id issued so far
    pub fn max_issued(&self) -> u32 {
        self.max_issued
    }

    /// Number of ids waiting to be reused
    pub fn recycled_len(&self) -> usize {
        self.free_ids.len()
    }
}
