//! INSERT operations for BPlusTreeMap.
//!
//! This module contains the insertion path for the B+ tree: upsert into the
//! target leaf, leaf splitting, and the upward propagation of promoted
//! separators that can split every ancestor up to and including the root.

use crate::error::{IndexResultExt, ModifyResult};
use crate::types::{BPlusTreeMap, BranchNode, NodeId, NodeRef, NULL_NODE};
use log::{debug, trace};
use std::fmt::Debug;

impl<K: Ord + Clone, V> BPlusTreeMap<K, V> {
    /// Insert a key-value pair into the tree.
    ///
    /// If the key already exists its value is overwritten and the old value
    /// returned; no structural change happens in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use storage_index::BPlusTreeMap;
    ///
    /// let mut tree = BPlusTreeMap::new(4).unwrap();
    /// assert_eq!(tree.insert(1, "one"), None);
    /// assert_eq!(tree.insert(1, "uno"), Some("one"));
    /// assert_eq!(tree.get(&1), Some(&"uno"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let leaf_id = self.find_leaf(&key);
        let leaf = &mut self.leaf_arena[leaf_id];

        if let Some(old_value) = leaf.upsert(key, value) {
            return Some(old_value);
        }

        if leaf.needs_split() {
            self.split_leaf(leaf_id);
        }
        None
    }

    // ============================================================================
    // HELPERS FOR INSERT OPERATIONS
    // ============================================================================

    /// Split an overfull leaf and hand a copy of the new right leaf's first
    /// key up to the parent.
    fn split_leaf(&mut self, leaf_id: NodeId) {
        let right = self.leaf_arena[leaf_id].split();
        let separator = right.keys[0].clone();
        let right_id = self.leaf_arena.allocate(right);
        self.leaf_arena[leaf_id].next = right_id;

        trace!("split leaf {}, new right leaf {}", leaf_id, right_id);
        self.promote(NodeRef::Leaf(leaf_id), separator, NodeRef::Leaf(right_id));
    }

    /// Install `separator` and the new sibling `right` next to `left` in
    /// their parent, splitting ancestors for as long as they overflow.
    fn promote(&mut self, mut left: NodeRef, mut separator: K, mut right: NodeRef) {
        loop {
            let parent_id = self.parent_of(left);
            if parent_id == NULL_NODE {
                self.new_root(left, separator, right);
                return;
            }

            let parent = &mut self.branch_arena[parent_id];
            let child_index = parent.child_position(left);
            parent.insert_child(child_index, separator, right);
            let needs_split = parent.needs_split();
            self.set_parent(right, parent_id);

            if !needs_split {
                return;
            }

            let (new_branch, promoted) = self.branch_arena[parent_id].split();
            let moved_children = new_branch.children.clone();
            let new_id = self.branch_arena.allocate(new_branch);
            for child in moved_children {
                self.set_parent(child, new_id);
            }

            trace!("split branch {}, new right branch {}", parent_id, new_id);
            left = NodeRef::Branch(parent_id);
            separator = promoted;
            right = NodeRef::Branch(new_id);
        }
    }

    /// Grow the tree by one level: a fresh root over the two halves of the
    /// old root.
    fn new_root(&mut self, left: NodeRef, separator: K, right: NodeRef) {
        let mut root = BranchNode::new(self.order);
        root.keys.push(separator);
        root.children.push(left);
        root.children.push(right);
        let root_id = self.branch_arena.allocate(root);

        self.set_parent(left, root_id);
        self.set_parent(right, root_id);
        self.root = NodeRef::Branch(root_id);
        debug!("tree grew to height {}", self.height());
    }
}

impl<K: Ord + Clone + Debug, V> BPlusTreeMap<K, V> {
    /// Insert with invariant validation before and after the mutation.
    pub fn try_insert(&mut self, key: K, value: V) -> ModifyResult<Option<V>> {
        self.check_invariants_detailed()
            .with_context("try_insert (before)")?;
        let old_value = self.insert(key, value);
        self.check_invariants_detailed()
            .with_context("try_insert (after)")?;
        Ok(old_value)
    }
}
