//! Validation and debugging utilities for BPlusTreeMap.
//!
//! This module contains invariant checking for the B+ tree: key order and
//! separator bounds, node occupancy, parent back-references, uniform leaf
//! depth, the leaf chain, and arena bookkeeping.

use crate::error::{IndexError, TreeResult};
use crate::types::{BPlusTreeMap, NodeId, NodeRef, NULL_NODE};
use std::fmt::Debug;

/// A node waiting to be checked, with the key range its parent allows.
struct Pending<'a, K> {
    node: NodeRef,
    parent: NodeId,
    min_key: Option<&'a K>,
    max_key: Option<&'a K>,
    depth: usize,
}

// ============================================================================
// VALIDATION METHODS
// ============================================================================

impl<K: Ord + Debug, V> BPlusTreeMap<K, V> {
    /// Check if the tree maintains B+ tree invariants.
    /// Returns true if all invariants are satisfied.
    pub fn check_invariants(&self) -> bool {
        self.check_invariants_detailed().is_ok()
    }

    /// Check invariants with detailed error reporting.
    pub fn check_invariants_detailed(&self) -> Result<(), String> {
        self.check_structure().map_err(|e| e.to_string())
    }

    /// Walk the tree depth first, left to right, checking every node against
    /// the range its ancestors allow.
    fn check_structure(&self) -> TreeResult<()> {
        let mut stack = vec![Pending {
            node: self.root,
            parent: NULL_NODE,
            min_key: None,
            max_key: None,
            depth: 0,
        }];
        let mut leaves_in_order = Vec::new();
        let mut leaf_depth = None;
        let mut branch_count = 0;

        while let Some(pending) = stack.pop() {
            let is_root = pending.parent == NULL_NODE;
            if self.parent_of(pending.node) != pending.parent {
                return Err(IndexError::corrupted(
                    "Parent reference",
                    &format!(
                        "{:?} points at {} but is listed under {}",
                        pending.node,
                        self.parent_of(pending.node),
                        pending.parent
                    ),
                ));
            }

            match pending.node {
                NodeRef::Leaf(id) => {
                    let leaf = &self.leaf_arena[id];
                    let context = format!("Leaf {}", id);
                    if leaf.keys.len() != leaf.values.len() {
                        return Err(IndexError::data_integrity(
                            &context,
                            &format!("{} keys but {} values", leaf.keys.len(), leaf.values.len()),
                        ));
                    }
                    self.check_keys(&context, &leaf.keys, pending.min_key, pending.max_key)?;
                    if !is_root && leaf.is_underfull() {
                        return Err(IndexError::data_integrity(
                            &context,
                            &format!("{} keys, minimum is {}", leaf.keys.len(), leaf.min_keys()),
                        ));
                    }

                    match leaf_depth {
                        None => leaf_depth = Some(pending.depth),
                        Some(depth) if depth != pending.depth => {
                            return Err(IndexError::corrupted(
                                "Leaf depth",
                                &format!("leaf {} at depth {}, expected {}", id, pending.depth, depth),
                            ));
                        }
                        Some(_) => {}
                    }
                    leaves_in_order.push(id);
                }
                NodeRef::Branch(id) => {
                    let branch = &self.branch_arena[id];
                    let context = format!("Branch {}", id);
                    branch_count += 1;
                    if branch.children.len() != branch.keys.len() + 1 {
                        return Err(IndexError::data_integrity(
                            &context,
                            &format!(
                                "{} keys but {} children",
                                branch.keys.len(),
                                branch.children.len()
                            ),
                        ));
                    }
                    self.check_keys(&context, &branch.keys, pending.min_key, pending.max_key)?;
                    let too_few = if is_root {
                        branch.keys.is_empty()
                    } else {
                        branch.is_underfull()
                    };
                    if too_few {
                        return Err(IndexError::data_integrity(
                            &context,
                            &format!("only {} keys", branch.keys.len()),
                        ));
                    }

                    // Reversed so the leftmost child is checked first.
                    for (i, &child) in branch.children.iter().enumerate().rev() {
                        stack.push(Pending {
                            node: child,
                            parent: id,
                            min_key: if i == 0 {
                                pending.min_key
                            } else {
                                Some(&branch.keys[i - 1])
                            },
                            max_key: branch.keys.get(i).or(pending.max_key),
                            depth: pending.depth + 1,
                        });
                    }
                }
            }
        }

        self.check_leaf_chain(&leaves_in_order)?;
        self.check_arena_counts(leaves_in_order.len(), branch_count)
    }

    /// Keys must be strictly increasing, inside `[min, max)`, and within the
    /// node capacity.
    fn check_keys(
        &self,
        context: &str,
        keys: &[K],
        min_key: Option<&K>,
        max_key: Option<&K>,
    ) -> TreeResult<()> {
        if keys.len() > self.order - 1 {
            return Err(IndexError::data_integrity(
                context,
                &format!("{} keys exceed capacity {}", keys.len(), self.order - 1),
            ));
        }
        if let Some(pair) = keys.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(IndexError::data_integrity(
                context,
                &format!("keys out of order: {:?} before {:?}", pair[0], pair[1]),
            ));
        }
        if let (Some(min), Some(first)) = (min_key, keys.first()) {
            if first < min {
                return Err(IndexError::data_integrity(
                    context,
                    &format!("key {:?} below separator {:?}", first, min),
                ));
            }
        }
        if let (Some(max), Some(last)) = (max_key, keys.last()) {
            if last >= max {
                return Err(IndexError::data_integrity(
                    context,
                    &format!("key {:?} not below separator {:?}", last, max),
                ));
            }
        }
        Ok(())
    }

    /// The `next` links must visit exactly the leaves found by descent, in
    /// the same order.
    fn check_leaf_chain(&self, leaves_in_order: &[NodeId]) -> TreeResult<()> {
        let mut chain = Vec::with_capacity(leaves_in_order.len());
        let mut current = self.first_leaf_id();
        while current != NULL_NODE {
            if chain.len() > leaves_in_order.len() {
                return Err(IndexError::corrupted("Leaf chain", "chain is longer than the tree"));
            }
            chain.push(current);
            current = self.leaf_arena[current].next;
        }

        if chain != leaves_in_order {
            return Err(IndexError::corrupted(
                "Leaf chain",
                &format!("tree has {:?}, linked list has {:?}", leaves_in_order, chain),
            ));
        }
        Ok(())
    }

    /// Every live arena slot must be reachable from the root.
    fn check_arena_counts(&self, leaves: usize, branches: usize) -> TreeResult<()> {
        if leaves != self.leaf_arena.len() {
            return Err(IndexError::corrupted(
                "Leaf arena",
                &format!("{} in tree vs {} in arena", leaves, self.leaf_arena.len()),
            ));
        }
        if branches != self.branch_arena.len() {
            return Err(IndexError::corrupted(
                "Branch arena",
                &format!("{} in tree vs {} in arena", branches, self.branch_arena.len()),
            ));
        }
        Ok(())
    }
}

impl<K, V> BPlusTreeMap<K, V> {
    // ============================================================================
    // DEBUGGING AND TESTING UTILITIES
    // ============================================================================

    /// Returns the sizes of all leaf nodes in chain order.
    pub fn leaf_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::new();
        let mut current = self.first_leaf_id();
        while current != NULL_NODE {
            let leaf = &self.leaf_arena[current];
            sizes.push(leaf.keys.len());
            current = leaf.next;
        }
        sizes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(order: usize, count: i32) -> BPlusTreeMap<i32, i32> {
        let mut tree = BPlusTreeMap::new(order).unwrap();
        for i in 0..count {
            tree.insert(i, i);
        }
        tree
    }

    #[test]
    fn test_valid_trees_pass() {
        assert!(BPlusTreeMap::<i32, i32>::new(3).unwrap().check_invariants());
        for order in 3..7 {
            assert!(filled(order, 100).check_invariants());
        }
    }

    #[test]
    fn test_detects_out_of_order_keys() {
        let mut tree = filled(4, 20);
        let leaf_id = tree.first_leaf_id();
        tree.leaf_arena[leaf_id].keys.swap(0, 1);
        let err = tree.check_invariants_detailed().unwrap_err();
        assert!(err.contains("out of order"), "{}", err);
    }

    #[test]
    fn test_detects_broken_leaf_chain() {
        let mut tree = filled(4, 20);
        let leaf_id = tree.first_leaf_id();
        tree.leaf_arena[leaf_id].next = NULL_NODE;
        let err = tree.check_invariants_detailed().unwrap_err();
        assert!(err.contains("Leaf chain"), "{}", err);
    }

    #[test]
    fn test_detects_stale_parent() {
        let mut tree = filled(4, 20);
        let leaf_id = tree.first_leaf_id();
        tree.leaf_arena[leaf_id].parent = NULL_NODE;
        let err = tree.check_invariants_detailed().unwrap_err();
        assert!(err.contains("Parent reference"), "{}", err);
    }

    #[test]
    fn test_detects_underfull_leaf() {
        let mut tree = filled(5, 20);
        let leaf_id = tree.first_leaf_id();
        tree.leaf_arena[leaf_id].keys.truncate(1);
        tree.leaf_arena[leaf_id].values.truncate(1);
        let err = tree.check_invariants_detailed().unwrap_err();
        assert!(err.contains("minimum"), "{}", err);
    }

    #[test]
    fn test_leaf_sizes_sum_to_len() {
        let tree = filled(4, 37);
        let sizes = tree.leaf_sizes();
        assert_eq!(sizes.len(), tree.leaf_count());
        assert_eq!(sizes.iter().sum::<usize>(), 37);
    }
}
