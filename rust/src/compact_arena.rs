//! Compact arena used for tree nodes and hash buckets.
//!
//! Storage is a plain `Vec<T>` with a separate allocation mask and free list,
//! so handles stay stable across allocations and freed slots are reused.

use std::convert::TryFrom;
use std::ops::{Index, IndexMut};

/// Stable handle into a [`CompactArena`].
pub type NodeId = u32;

/// Sentinel handle meaning "no node" (no parent, end of leaf chain).
pub const NULL_NODE: NodeId = u32::MAX;

/// Statistics for a compact arena
#[derive(Debug, Clone, Copy)]
pub struct CompactArenaStats {
    pub total_capacity: usize,
    pub allocated_count: usize,
    pub free_count: usize,
    pub utilization: f64,
}

/// Arena allocator keyed by [`NodeId`].
#[derive(Debug)]
pub struct CompactArena<T> {
    storage: Vec<T>,
    free_list: Vec<usize>,
    allocated_mask: Vec<bool>,
}

impl<T> CompactArena<T> {
    /// Create a new empty compact arena
    pub fn new() -> Self {
        Self {
            storage: Vec::new(),
            free_list: Vec::new(),
            allocated_mask: Vec::new(),
        }
    }

    /// Allocate a new item in the arena and return its ID
    #[inline]
    pub fn allocate(&mut self, item: T) -> NodeId {
        let index = if let Some(free_index) = self.free_list.pop() {
            self.storage[free_index] = item;
            self.allocated_mask[free_index] = true;
            free_index
        } else {
            let index = self.storage.len();
            self.storage.push(item);
            self.allocated_mask.push(true);
            index
        };

        match NodeId::try_from(index) {
            Ok(id) if id != NULL_NODE => id,
            _ => panic!("arena exhausted: slot {} does not fit in a NodeId", index),
        }
    }

    /// Deallocate an item from the arena and return it.
    #[inline]
    pub fn deallocate(&mut self, id: NodeId) -> Option<T>
    where
        T: Default,
    {
        let index = self.live_index(id)?;
        self.allocated_mask[index] = false;
        self.free_list.push(index);
        Some(std::mem::take(&mut self.storage[index]))
    }

    /// Get a reference to an item in the arena
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.live_index(id).map(|index| &self.storage[index])
    }

    /// Get a mutable reference to an item in the arena
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        match self.live_index(id) {
            Some(index) => Some(&mut self.storage[index]),
            None => None,
        }
    }

    /// Check if an ID is valid and allocated
    pub fn contains(&self, id: NodeId) -> bool {
        self.live_index(id).is_some()
    }

    fn live_index(&self, id: NodeId) -> Option<usize> {
        if id == NULL_NODE {
            return None;
        }
        let index = usize::try_from(id).ok()?;
        if self.allocated_mask.get(index).copied().unwrap_or(false) {
            Some(index)
        } else {
            None
        }
    }

    /// Iterate over the IDs of all allocated items.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.allocated_mask
            .iter()
            .enumerate()
            .filter(|(_, allocated)| **allocated)
            .map(|(index, _)| index as NodeId)
    }

    /// Get arena statistics
    pub fn stats(&self) -> CompactArenaStats {
        let total_capacity = self.storage.len();
        let allocated_count = self.len();
        let free_count = self.free_list.len();
        let utilization = if total_capacity > 0 {
            allocated_count as f64 / total_capacity as f64
        } else {
            0.0
        };

        CompactArenaStats {
            total_capacity,
            allocated_count,
            free_count,
            utilization,
        }
    }

    /// Get the number of allocated items
    pub fn len(&self) -> usize {
        self.storage.len() - self.free_list.len()
    }

    /// Check if the arena is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all items from the arena
    pub fn clear(&mut self) {
        self.storage.clear();
        self.allocated_mask.clear();
        self.free_list.clear();
    }
}

impl<T> Default for CompactArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Indexing is reserved for handles the structure itself maintains; a dangling
// handle means the index is corrupt and there is no recovery path.
impl<T> Index<NodeId> for CompactArena<T> {
    type Output = T;

    fn index(&self, id: NodeId) -> &T {
        match self.get(id) {
            Some(item) => item,
            None => panic!("dangling arena handle {}", id),
        }
    }
}

impl<T> IndexMut<NodeId> for CompactArena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut T {
        match self.live_index(id) {
            Some(index) => &mut self.storage[index],
            None => panic!("dangling arena handle {}", id),
        }
    }
}
