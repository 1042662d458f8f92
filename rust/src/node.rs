//! Node implementations for BPlusTreeMap.
//!
//! Node-local halves of the tree algorithms: sorted insertion, splitting,
//! removal, and the donate/accept/merge helpers used by rebalancing. Anything
//! that needs to look at a parent or sibling lives in the tree-level
//! operation modules.

use crate::types::{BranchNode, LeafNode, NodeId, NodeRef, NULL_NODE};

// ============================================================================
// LEAF NODE IMPLEMENTATION
// ============================================================================

impl<K, V> LeafNode<K, V> {
    /// Next leaf in key order, if any.
    pub fn next_leaf(&self) -> Option<NodeId> {
        if self.next == NULL_NODE {
            None
        } else {
            Some(self.next)
        }
    }
}

impl<K: Ord, V> LeafNode<K, V> {
    /// Returns the number of key-value pairs in this leaf.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if this leaf node is empty.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Get a reference to the keys in this leaf node.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Get a reference to the values in this leaf node.
    pub fn values(&self) -> &[V] {
        &self.values
    }

    // ============================================================================
    // INSERT OPERATIONS
    // ============================================================================

    /// Insert a pair at its sorted position, or overwrite the value if the key
    /// is already present. Returns the displaced value on overwrite.
    ///
    /// The leaf may be left holding `order` keys; the caller checks
    /// [`needs_split`](Self::needs_split) and resolves the overflow.
    pub fn upsert(&mut self, key: K, value: V) -> Option<V> {
        match self.keys.binary_search(&key) {
            Ok(index) => Some(std::mem::replace(&mut self.values[index], value)),
            Err(index) => {
                self.keys.insert(index, key);
                self.values.insert(index, value);
                None
            }
        }
    }

    /// Split this leaf, returning the new right sibling.
    ///
    /// The left half keeps `[0, ceil(len / 2))`. The right node inherits this
    /// leaf's successor and parent; linking this leaf to the right node is
    /// left to the caller, which is the only one that knows its arena ID.
    pub fn split(&mut self) -> LeafNode<K, V> {
        let mid = self.keys.len().div_ceil(2);

        let right_keys = self.keys.split_off(mid);
        let right_values = self.values.split_off(mid);

        let new_right = LeafNode {
            order: self.order,
            keys: right_keys,
            values: right_values,
            next: self.next,
            parent: self.parent,
        };
        self.next = NULL_NODE;

        new_right
    }

    // ============================================================================
    // DELETE OPERATIONS
    // ============================================================================

    /// Remove a key-value pair from this leaf node, returning the value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        match self.keys.binary_search(key) {
            Ok(index) => {
                self.keys.remove(index);
                Some(self.values.remove(index))
            }
            Err(_) => None,
        }
    }

    // ============================================================================
    // STATUS CHECKS
    // ============================================================================

    /// Returns true once the leaf holds `order` keys, one over the limit.
    pub fn needs_split(&self) -> bool {
        self.keys.len() >= self.order
    }

    /// Returns the minimum number of keys a non-root leaf must hold.
    pub fn min_keys(&self) -> usize {
        (self.order - 1).div_ceil(2)
    }

    /// Returns true if this leaf node is underfull (below minimum occupancy).
    pub fn is_underfull(&self) -> bool {
        self.keys.len() < self.min_keys()
    }

    /// Returns true if this leaf can give a pair to a sibling and stay legal.
    pub fn can_donate(&self) -> bool {
        self.keys.len() > self.min_keys()
    }

    // ============================================================================
    // BORROWING AND MERGING HELPERS
    // ============================================================================

    /// Take the last pair (this leaf is the left sibling of the borrower).
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let key = self.keys.pop()?;
        let value = self.values.pop()?;
        Some((key, value))
    }

    /// Take the first pair (this leaf is the right sibling of the borrower).
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        if self.keys.is_empty() {
            return None;
        }
        Some((self.keys.remove(0), self.values.remove(0)))
    }

    /// Accept a borrowed pair at the beginning (from the left sibling).
    pub fn accept_from_left(&mut self, key: K, value: V) {
        self.keys.insert(0, key);
        self.values.insert(0, value);
    }

    /// Accept a borrowed pair at the end (from the right sibling).
    pub fn accept_from_right(&mut self, key: K, value: V) {
        self.keys.push(key);
        self.values.push(value);
    }

    /// Append every pair of `other`, which must hold only larger keys, and
    /// take over its successor link.
    pub fn merge_from(&mut self, other: &mut LeafNode<K, V>) {
        self.keys.append(&mut other.keys);
        self.values.append(&mut other.values);
        self.next = other.next;
        other.next = NULL_NODE;
    }
}

// ============================================================================
// BRANCH NODE IMPLEMENTATION
// ============================================================================

impl<K: Ord> BranchNode<K> {
    /// Returns the number of separator keys in this branch node.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if this branch holds no separator keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Find the index of the child whose range contains `key`: the first
    /// index whose separator is strictly greater than the key, or the last
    /// child if there is none.
    pub fn find_child_index(&self, key: &K) -> usize {
        match self.keys.binary_search(key) {
            Ok(index) => index + 1,
            Err(index) => index,
        }
    }

    /// Position of `child` among this node's children.
    ///
    /// # Panics
    ///
    /// Panics if `child` is not a child of this node; its parent reference
    /// and this node's child list disagree and the tree is corrupt.
    pub fn child_position(&self, child: NodeRef) -> usize {
        self.children
            .iter()
            .position(|c| *c == child)
            .expect("child should be listed under its parent")
    }

    // ============================================================================
    // INSERT OPERATIONS
    // ============================================================================

    /// Insert a promoted separator and the new right sibling of the child at
    /// `child_index`.
    pub fn insert_child(&mut self, child_index: usize, separator: K, new_child: NodeRef) {
        self.keys.insert(child_index, separator);
        self.children.insert(child_index + 1, new_child);
    }

    /// Split this branch node, returning the new right node and the key moved
    /// up to the parent.
    ///
    /// With `mid = len / 2`, the left half keeps keys `[0, mid)` and children
    /// `[0, mid]`; the right half takes keys `(mid, len)` and children
    /// `[mid + 1, len]`. The key at `mid` belongs to neither half afterwards.
    pub fn split(&mut self) -> (BranchNode<K>, K) {
        let mid = self.keys.len() / 2;

        let right_keys = self.keys.split_off(mid + 1);
        let right_children = self.children.split_off(mid + 1);
        let promoted_key = self.keys.pop().expect("split branch should have keys");

        let new_right = BranchNode {
            order: self.order,
            keys: right_keys,
            children: right_children,
            parent: self.parent,
        };

        (new_right, promoted_key)
    }

    // ============================================================================
    // STATUS CHECKS
    // ============================================================================

    /// Returns true once the branch holds `order` keys, one over the limit.
    pub fn needs_split(&self) -> bool {
        self.keys.len() >= self.order
    }

    /// Returns the minimum number of keys a non-root branch must hold.
    pub fn min_keys(&self) -> usize {
        self.order.div_ceil(2) - 1
    }

    /// Returns true if this branch node is underfull (below minimum occupancy).
    pub fn is_underfull(&self) -> bool {
        self.keys.len() < self.min_keys()
    }

    /// Returns true if this branch can give a key and child to a sibling.
    pub fn can_donate(&self) -> bool {
        self.keys.len() > self.min_keys()
    }

    // ============================================================================
    // BORROWING AND MERGING HELPERS
    // ============================================================================

    /// Take the last key and child (this branch is the left sibling).
    pub fn pop_last(&mut self) -> Option<(K, NodeRef)> {
        let key = self.keys.pop()?;
        let child = self.children.pop()?;
        Some((key, child))
    }

    /// Take the first key and child (this branch is the right sibling).
    pub fn pop_first(&mut self) -> Option<(K, NodeRef)> {
        if self.keys.is_empty() {
            return None;
        }
        Some((self.keys.remove(0), self.children.remove(0)))
    }

    /// Rotate in from the left: the parent separator becomes the first key
    /// and the moved child the first child.
    pub fn accept_from_left(&mut self, separator: K, moved_child: NodeRef) {
        self.keys.insert(0, separator);
        self.children.insert(0, moved_child);
    }

    /// Rotate in from the right: the parent separator becomes the last key
    /// and the moved child the last child.
    pub fn accept_from_right(&mut self, separator: K, moved_child: NodeRef) {
        self.keys.push(separator);
        self.children.push(moved_child);
    }

    /// Merge all content from the right sibling `other` into this node, with
    /// the separator pulled down from the parent between the two key runs.
    pub fn merge_from(&mut self, separator: K, other: &mut BranchNode<K>) {
        self.keys.push(separator);
        self.keys.append(&mut other.keys);
        self.children.append(&mut other.children);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_with(order: usize, keys: &[i32]) -> LeafNode<i32, String> {
        let mut leaf = LeafNode::new(order);
        for &k in keys {
            leaf.upsert(k, format!("v{}", k));
        }
        leaf
    }

    #[test]
    fn test_leaf_upsert_keeps_order() {
        let mut leaf = leaf_with(4, &[20, 5, 10]);
        assert_eq!(leaf.keys(), &[5, 10, 20]);
        assert_eq!(leaf.upsert(10, "ten".to_string()), Some("v10".to_string()));
        assert_eq!(leaf.len(), 3);
        assert_eq!(leaf.values()[1], "ten");
        assert!(!leaf.needs_split());

        leaf.upsert(7, "v7".to_string());
        assert!(leaf.needs_split());
    }

    #[test]
    fn test_leaf_split_rounds_left_half_up() {
        let mut leaf = leaf_with(4, &[1, 2, 3, 4]);
        leaf.next = 9;
        leaf.parent = 3;
        let right = leaf.split();
        assert_eq!(leaf.keys(), &[1, 2]);
        assert_eq!(right.keys(), &[3, 4]);
        assert_eq!(right.next, 9);
        assert_eq!(right.parent, 3);
        assert_eq!(leaf.next, NULL_NODE);

        let mut odd = leaf_with(5, &[1, 2, 3, 4, 5]);
        let right = odd.split();
        assert_eq!(odd.keys(), &[1, 2, 3]);
        assert_eq!(right.keys(), &[4, 5]);
    }

    #[test]
    fn test_leaf_occupancy_bounds() {
        // ceil((m - 1) / 2)
        assert_eq!(LeafNode::<i32, i32>::new(3).min_keys(), 1);
        assert_eq!(LeafNode::<i32, i32>::new(4).min_keys(), 2);
        assert_eq!(LeafNode::<i32, i32>::new(5).min_keys(), 2);
        assert_eq!(LeafNode::<i32, i32>::new(6).min_keys(), 3);

        let leaf = leaf_with(4, &[1, 2]);
        assert!(!leaf.is_underfull());
        assert!(!leaf.can_donate());
    }

    #[test]
    fn test_leaf_borrow_and_merge() {
        let mut left = leaf_with(4, &[1, 2, 3]);
        let mut right = leaf_with(4, &[7]);
        let (k, v) = left.pop_last().unwrap();
        right.accept_from_left(k, v);
        assert_eq!(right.keys(), &[3, 7]);

        right.next = 42;
        left.merge_from(&mut right);
        assert_eq!(left.keys(), &[1, 2, 3, 7]);
        assert_eq!(left.next, 42);
        assert!(right.is_empty());
        assert_eq!(left.remove(&3), Some("v3".to_string()));
        assert_eq!(left.remove(&3), None);
    }

    fn branch_with(order: usize, keys: &[i32]) -> BranchNode<i32> {
        let mut branch = BranchNode::new(order);
        branch.keys = keys.to_vec();
        branch.children = (0..=keys.len() as u32).map(NodeRef::Leaf).collect();
        branch
    }

    #[test]
    fn test_branch_find_child_index() {
        let branch = branch_with(4, &[5, 10]);
        assert_eq!(branch.find_child_index(&3), 0);
        assert_eq!(branch.find_child_index(&5), 1);
        assert_eq!(branch.find_child_index(&7), 1);
        assert_eq!(branch.find_child_index(&10), 2);
        assert_eq!(branch.find_child_index(&15), 2);
        assert_eq!(branch.child_position(NodeRef::Leaf(2)), 2);
    }

    #[test]
    #[should_panic(expected = "child should be listed under its parent")]
    fn test_child_position_of_stranger_panics() {
        let branch = branch_with(4, &[5, 10]);
        branch.child_position(NodeRef::Branch(0));
    }

    #[test]
    fn test_branch_split_moves_middle_key_up() {
        let mut branch = branch_with(4, &[10, 20, 30, 40]);
        let (right, promoted) = branch.split();
        assert_eq!(promoted, 30);
        assert_eq!(branch.keys, vec![10, 20]);
        assert_eq!(branch.children.len(), 3);
        assert_eq!(right.keys, vec![40]);
        assert_eq!(right.children, vec![NodeRef::Leaf(3), NodeRef::Leaf(4)]);
    }

    #[test]
    fn test_branch_occupancy_bounds() {
        // ceil(m / 2) - 1
        assert_eq!(BranchNode::<i32>::new(3).min_keys(), 1);
        assert_eq!(BranchNode::<i32>::new(4).min_keys(), 1);
        assert_eq!(BranchNode::<i32>::new(5).min_keys(), 2);
        assert_eq!(BranchNode::<i32>::new(7).min_keys(), 3);
    }

    #[test]
    fn test_branch_rotate_and_merge() {
        let mut left = branch_with(4, &[1, 2]);
        let mut right = branch_with(4, &[]);
        right.children = vec![NodeRef::Leaf(10)];

        let (moved_key, moved_child) = left.pop_last().unwrap();
        right.accept_from_left(5, moved_child);
        assert_eq!(moved_key, 2);
        assert_eq!(right.keys, vec![5]);
        assert_eq!(right.children, vec![NodeRef::Leaf(2), NodeRef::Leaf(10)]);

        left.merge_from(moved_key, &mut right);
        assert_eq!(left.keys, vec![1, 2, 5]);
        assert_eq!(left.children.len(), 4);
    }
}
