//! DELETE operations for BPlusTreeMap.
//!
//! This module contains key removal and the rebalancing it triggers: borrowing
//! from a sibling, merging with a sibling, and collapsing the root when it is
//! left with a single child.

use crate::error::{IndexError, IndexResultExt, ModifyResult};
use crate::types::{BPlusTreeMap, BranchNode, LeafNode, NodeId, NodeRef, NULL_NODE};
use log::{debug, trace};
use std::fmt::Debug;

impl<K: Ord + Clone, V> BPlusTreeMap<K, V> {
    /// Remove a key from the tree. Returns true if the key existed.
    ///
    /// # Examples
    ///
    /// ```
    /// use storage_index::BPlusTreeMap;
    ///
    /// let mut tree = BPlusTreeMap::new(4).unwrap();
    /// tree.insert(20, "v20");
    /// assert!(tree.remove(&20));
    /// assert!(!tree.remove(&20));
    /// assert_eq!(tree.get(&20), None);
    /// ```
    pub fn remove(&mut self, key: &K) -> bool {
        self.take(key).is_some()
    }

    /// Remove a key from the tree and return its value.
    pub fn take(&mut self, key: &K) -> Option<V> {
        let leaf_id = self.find_leaf(key);
        let value = self.leaf_arena[leaf_id].remove(key)?;
        self.rebalance_from(NodeRef::Leaf(leaf_id));
        Some(value)
    }

    // ============================================================================
    // HELPERS FOR DELETE OPERATIONS
    // ============================================================================

    /// Restore occupancy starting at `start`, walking up the parent chain for
    /// as long as merges leave the parent underfull.
    fn rebalance_from(&mut self, start: NodeRef) {
        let mut node = start;
        loop {
            let parent_id = self.parent_of(node);
            if parent_id == NULL_NODE {
                self.collapse_root_if_needed();
                return;
            }

            let merged = match node {
                NodeRef::Leaf(id) => {
                    if !self.leaf_arena[id].is_underfull() {
                        return;
                    }
                    self.rebalance_leaf(id, parent_id)
                }
                NodeRef::Branch(id) => {
                    if !self.branch_arena[id].is_underfull() {
                        return;
                    }
                    self.rebalance_branch(id, parent_id)
                }
            };

            if !merged {
                return;
            }
            node = NodeRef::Branch(parent_id);
        }
    }

    /// Sibling IDs to the left and right of the child at `index`.
    fn siblings(&self, parent_id: NodeId, index: usize) -> (Option<NodeId>, Option<NodeId>) {
        let parent = &self.branch_arena[parent_id];
        let left = index.checked_sub(1).map(|i| parent.children[i].id());
        let right = parent.children.get(index + 1).map(|child| child.id());
        (left, right)
    }

    /// Fix an underfull leaf. Returns true if it merged, which removed a key
    /// from the parent.
    fn rebalance_leaf(&mut self, id: NodeId, parent_id: NodeId) -> bool {
        let index = self.branch_arena[parent_id].child_position(NodeRef::Leaf(id));
        let (left, right) = self.siblings(parent_id, index);

        if let Some(left_id) = left {
            if self.leaf_arena[left_id].can_donate() {
                if let Some((key, value)) = self.leaf_arena[left_id].pop_last() {
                    trace!("leaf {} borrowed from left leaf {}", id, left_id);
                    self.branch_arena[parent_id].keys[index - 1] = key.clone();
                    self.leaf_arena[id].accept_from_left(key, value);
                    return false;
                }
            }
        }

        if let Some(right_id) = right {
            if self.leaf_arena[right_id].can_donate() {
                if let Some((key, value)) = self.leaf_arena[right_id].pop_first() {
                    trace!("leaf {} borrowed from right leaf {}", id, right_id);
                    self.leaf_arena[id].accept_from_right(key, value);
                    let new_first = self.leaf_arena[right_id].keys[0].clone();
                    self.branch_arena[parent_id].keys[index] = new_first;
                    return false;
                }
            }
        }

        if let Some(left_id) = left {
            let mut gone = self.release_leaf(id);
            self.leaf_arena[left_id].merge_from(&mut gone);
            let parent = &mut self.branch_arena[parent_id];
            parent.keys.remove(index - 1);
            parent.children.remove(index);
            trace!("merged leaf {} into left leaf {}", id, left_id);
            return true;
        }

        if let Some(right_id) = right {
            let mut gone = self.release_leaf(right_id);
            self.leaf_arena[id].merge_from(&mut gone);
            let parent = &mut self.branch_arena[parent_id];
            parent.keys.remove(index);
            parent.children.remove(index + 1);
            trace!("merged right leaf {} into leaf {}", right_id, id);
            return true;
        }

        false
    }

    /// Fix an underfull branch by rotating through the parent separator or
    /// merging around it. Returns true if it merged.
    fn rebalance_branch(&mut self, id: NodeId, parent_id: NodeId) -> bool {
        let index = self.branch_arena[parent_id].child_position(NodeRef::Branch(id));
        let (left, right) = self.siblings(parent_id, index);

        if let Some(left_id) = left {
            if self.branch_arena[left_id].can_donate() {
                if let Some((moved_key, moved_child)) = self.branch_arena[left_id].pop_last() {
                    let separator = std::mem::replace(
                        &mut self.branch_arena[parent_id].keys[index - 1],
                        moved_key,
                    );
                    trace!("branch {} rotated a child in from left branch {}", id, left_id);
                    self.branch_arena[id].accept_from_left(separator, moved_child);
                    self.set_parent(moved_child, id);
                    return false;
                }
            }
        }

        if let Some(right_id) = right {
            if self.branch_arena[right_id].can_donate() {
                if let Some((moved_key, moved_child)) = self.branch_arena[right_id].pop_first() {
                    let separator = std::mem::replace(
                        &mut self.branch_arena[parent_id].keys[index],
                        moved_key,
                    );
                    trace!("branch {} rotated a child in from right branch {}", id, right_id);
                    self.branch_arena[id].accept_from_right(separator, moved_child);
                    self.set_parent(moved_child, id);
                    return false;
                }
            }
        }

        if let Some(left_id) = left {
            let mut gone = self.release_branch(id);
            let parent = &mut self.branch_arena[parent_id];
            let separator = parent.keys.remove(index - 1);
            parent.children.remove(index);
            for &child in &gone.children {
                self.set_parent(child, left_id);
            }
            self.branch_arena[left_id].merge_from(separator, &mut gone);
            trace!("merged branch {} into left branch {}", id, left_id);
            return true;
        }

        if let Some(right_id) = right {
            let mut gone = self.release_branch(right_id);
            let parent = &mut self.branch_arena[parent_id];
            let separator = parent.keys.remove(index);
            parent.children.remove(index + 1);
            for &child in &gone.children {
                self.set_parent(child, id);
            }
            self.branch_arena[id].merge_from(separator, &mut gone);
            trace!("merged right branch {} into branch {}", right_id, id);
            return true;
        }

        false
    }

    /// Replace a keyless branch root by its only child, shrinking the tree by
    /// one level.
    fn collapse_root_if_needed(&mut self) {
        while let NodeRef::Branch(root_id) = self.root {
            if !self.branch_arena[root_id].keys.is_empty() {
                return;
            }
            let old_root = self.release_branch(root_id);
            let child = old_root.children[0];
            self.set_parent(child, NULL_NODE);
            self.root = child;
            debug!("root collapsed, tree height now {}", self.height());
        }
    }

    fn release_leaf(&mut self, id: NodeId) -> LeafNode<K, V> {
        self.leaf_arena
            .deallocate(id)
            .expect("released leaf should be allocated")
    }

    fn release_branch(&mut self, id: NodeId) -> BranchNode<K> {
        self.branch_arena
            .deallocate(id)
            .expect("released branch should be allocated")
    }
}

impl<K: Ord + Clone + Debug, V> BPlusTreeMap<K, V> {
    /// Remove with invariant validation, reporting a miss as `KeyNotFound`.
    pub fn try_remove(&mut self, key: &K) -> ModifyResult<V> {
        self.check_invariants_detailed()
            .with_context("try_remove (before)")?;
        let value = self.take(key).ok_or(IndexError::KeyNotFound)?;
        self.check_invariants_detailed()
            .with_context("try_remove (after)")?;
        Ok(value)
    }
}
