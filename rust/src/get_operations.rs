//! GET operations for BPlusTreeMap.
//!
//! This module contains the read operations for the B+ tree: descent to the
//! target leaf, key lookup, and the arena accessors shared by the mutating
//! modules.

use crate::error::{IndexError, IndexResult, KeyResult};
use crate::types::{BPlusTreeMap, BranchNode, LeafNode, NodeId, NodeRef};

impl<K: Ord, V> BPlusTreeMap<K, V> {
    // ============================================================================
    // PUBLIC GET OPERATIONS
    // ============================================================================

    /// Get a reference to the value associated with a key.
    ///
    /// # Examples
    ///
    /// ```
    /// use storage_index::BPlusTreeMap;
    ///
    /// let mut tree = BPlusTreeMap::new(4).unwrap();
    /// tree.insert(17, "v17");
    /// assert_eq!(tree.get(&17), Some(&"v17"));
    /// assert_eq!(tree.get(&999), None);
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        let leaf_id = self.find_leaf(key);
        self.leaf_arena[leaf_id].get(key)
    }

    /// Alias for [`get`](Self::get), named after the index verb.
    pub fn search(&self, key: &K) -> Option<&V> {
        self.get(key)
    }

    /// Check if key exists in the tree.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Get value for a key, returning an error if the key doesn't exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use storage_index::{BPlusTreeMap, IndexError};
    ///
    /// let mut tree = BPlusTreeMap::new(4).unwrap();
    /// tree.insert(1, "one");
    /// assert_eq!(tree.get_item(&1).unwrap(), &"one");
    /// assert_eq!(tree.get_item(&2), Err(IndexError::KeyNotFound));
    /// ```
    pub fn get_item(&self, key: &K) -> KeyResult<&V> {
        self.get(key).ok_or(IndexError::KeyNotFound)
    }

    /// Get a mutable reference to the value for a key.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let leaf_id = self.find_leaf(key);
        self.leaf_arena[leaf_id].get_mut(key)
    }

    /// Look up several keys at once, failing on the first missing one.
    pub fn get_many(&self, keys: &[K]) -> IndexResult<Vec<&V>> {
        keys.iter().map(|key| self.get_item(key)).collect()
    }

    // ============================================================================
    // DESCENT
    // ============================================================================

    /// Walk from the root to the leaf whose range contains `key`.
    pub(crate) fn find_leaf(&self, key: &K) -> NodeId {
        let mut current = self.root;
        loop {
            match current {
                NodeRef::Leaf(id) => return id,
                NodeRef::Branch(id) => {
                    let branch = &self.branch_arena[id];
                    current = branch.children[branch.find_child_index(key)];
                }
            }
        }
    }
}

impl<K, V> BPlusTreeMap<K, V> {
    // ============================================================================
    // ARENA ACCESS METHODS
    // ============================================================================

    /// Get a reference to a leaf node in the arena.
    pub fn get_leaf(&self, id: NodeId) -> Option<&LeafNode<K, V>> {
        self.leaf_arena.get(id)
    }

    /// Get a reference to a branch node in the arena.
    pub fn get_branch(&self, id: NodeId) -> Option<&BranchNode<K>> {
        self.branch_arena.get(id)
    }

    /// Get the next pointer of a leaf node in the arena.
    pub fn get_leaf_next(&self, id: NodeId) -> Option<NodeId> {
        self.get_leaf(id).and_then(|leaf| leaf.next_leaf())
    }

    /// Parent branch of a node, or `NULL_NODE` for the root.
    pub(crate) fn parent_of(&self, node: NodeRef) -> NodeId {
        match node {
            NodeRef::Leaf(id) => self.leaf_arena[id].parent,
            NodeRef::Branch(id) => self.branch_arena[id].parent,
        }
    }

    /// Re-point a node's parent back-reference.
    pub(crate) fn set_parent(&mut self, node: NodeRef, parent: NodeId) {
        match node {
            NodeRef::Leaf(id) => self.leaf_arena[id].parent = parent,
            NodeRef::Branch(id) => self.branch_arena[id].parent = parent,
        }
    }

    /// Get the ID of the first (leftmost) leaf in the tree.
    pub(crate) fn first_leaf_id(&self) -> NodeId {
        let mut current = self.root;
        loop {
            match current {
                NodeRef::Leaf(id) => return id,
                NodeRef::Branch(id) => current = self.branch_arena[id].children[0],
            }
        }
    }

    /// Get the ID of the last (rightmost) leaf in the tree.
    pub(crate) fn last_leaf_id(&self) -> NodeId {
        let mut current = self.root;
        loop {
            match current {
                NodeRef::Leaf(id) => return id,
                NodeRef::Branch(id) => {
                    let branch = &self.branch_arena[id];
                    current = branch.children[branch.children.len() - 1];
                }
            }
        }
    }
}

impl<K: Ord, V> LeafNode<K, V> {
    /// Get value for a key from this leaf node.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.keys
            .binary_search(key)
            .ok()
            .map(|index| &self.values[index])
    }

    /// Get a mutable reference to the value for a key from this leaf node.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.keys.binary_search(key) {
            Ok(index) => Some(&mut self.values[index]),
            Err(_) => None,
        }
    }
}
