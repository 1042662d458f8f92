//! Tree structure management operations for BPlusTreeMap.
//!
//! This module contains all tree-level operations that manage the overall structure,
//! including size queries, clearing, node counting, and level snapshots.

use crate::compact_arena::CompactArenaStats;
use crate::types::{BPlusTreeMap, LeafNode, NodeRef, NULL_NODE};
use log::debug;

// ============================================================================
// TREE STRUCTURE OPERATIONS
// ============================================================================

impl<K, V> BPlusTreeMap<K, V> {
    /// Returns the number of elements in the tree.
    ///
    /// Walks the leaf chain, so the cost is linear in the number of leaves.
    pub fn len(&self) -> usize {
        let mut total = 0;
        let mut current = self.first_leaf_id();
        while current != NULL_NODE {
            let leaf = &self.leaf_arena[current];
            total += leaf.keys.len();
            current = leaf.next;
        }
        total
    }

    /// Returns true if the tree is empty.
    pub fn is_empty(&self) -> bool {
        match self.root {
            NodeRef::Leaf(id) => self.leaf_arena[id].keys.is_empty(),
            NodeRef::Branch(_) => false,
        }
    }

    /// Returns true if the root is a leaf node.
    pub fn is_leaf_root(&self) -> bool {
        self.root.is_leaf()
    }

    /// Number of levels, counting the leaf level. A lone root leaf is height 1.
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut current = self.root;
        while let NodeRef::Branch(id) = current {
            current = self.branch_arena[id].children[0];
            height += 1;
        }
        height
    }

    /// Returns the number of leaf nodes in the tree.
    pub fn leaf_count(&self) -> usize {
        self.count_nodes_in_tree().0
    }

    /// Count the leaf and branch nodes reachable from the root.
    pub fn count_nodes_in_tree(&self) -> (usize, usize) {
        let mut leaves = 0;
        let mut branches = 0;
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            match node {
                NodeRef::Leaf(_) => leaves += 1,
                NodeRef::Branch(id) => {
                    branches += 1;
                    stack.extend(self.branch_arena[id].children.iter().copied());
                }
            }
        }
        (leaves, branches)
    }

    /// Clear all items from the tree, leaving a single empty root leaf.
    pub fn clear(&mut self) {
        self.leaf_arena.clear();
        self.branch_arena.clear();

        let root_id = self.leaf_arena.allocate(LeafNode::new(self.order));
        self.root = NodeRef::Leaf(root_id);
        debug!("tree cleared");
    }

    /// Get statistics for the leaf node arena.
    pub fn leaf_arena_stats(&self) -> CompactArenaStats {
        self.leaf_arena.stats()
    }

    /// Get statistics for the branch node arena.
    pub fn branch_arena_stats(&self) -> CompactArenaStats {
        self.branch_arena.stats()
    }
}

impl<K: Clone, V> BPlusTreeMap<K, V> {
    /// Snapshot of the keys on every level, root first.
    ///
    /// Each level lists its nodes left to right and each node its keys, so a
    /// tree of order 4 holding `1..=4` reads `[[[3]], [[1, 2], [3, 4]]]`.
    pub fn levels(&self) -> Vec<Vec<Vec<K>>> {
        let mut levels = Vec::new();
        let mut frontier = vec![self.root];

        while !frontier.is_empty() {
            let mut keys = Vec::with_capacity(frontier.len());
            let mut next = Vec::new();
            for node in frontier {
                match node {
                    NodeRef::Leaf(id) => keys.push(self.leaf_arena[id].keys.clone()),
                    NodeRef::Branch(id) => {
                        let branch = &self.branch_arena[id];
                        keys.push(branch.keys.clone());
                        next.extend(branch.children.iter().copied());
                    }
                }
            }
            levels.push(keys);
            frontier = next;
        }

        levels
    }

    /// Keys of every leaf, in chain order.
    pub fn leaf_keys(&self) -> Vec<Vec<K>> {
        let mut leaves = Vec::new();
        let mut current = self.first_leaf_id();
        while current != NULL_NODE {
            let leaf = &self.leaf_arena[current];
            leaves.push(leaf.keys.clone());
            current = leaf.next;
        }
        leaves
    }
}
