//! Construction and initialization logic for BPlusTreeMap and nodes.
//!
//! This module contains order validation, arena initialization, and the
//! default implementations for the tree and its nodes.

use crate::compact_arena::CompactArena;
use crate::error::{IndexError, InitResult};
use crate::types::{BPlusTreeMap, BranchNode, LeafNode, NodeRef, DEFAULT_ORDER, MIN_ORDER, NULL_NODE};

impl<K, V> BPlusTreeMap<K, V> {
    /// Create a B+ tree of the given order.
    ///
    /// # Arguments
    ///
    /// * `order` - Maximum number of children per internal node (minimum 3).
    ///   Nodes hold at most `order - 1` keys.
    ///
    /// # Returns
    ///
    /// Returns `Ok(BPlusTreeMap)` if the order is valid,
    /// `Err(IndexError::InvalidConfiguration)` otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use storage_index::BPlusTreeMap;
    ///
    /// let tree = BPlusTreeMap::<i32, String>::new(4).unwrap();
    /// assert!(tree.is_empty());
    /// assert!(BPlusTreeMap::<i32, String>::new(2).is_err());
    /// ```
    pub fn new(order: usize) -> InitResult<Self> {
        validate_order(order)?;

        let mut leaf_arena = CompactArena::new();
        let root_id = leaf_arena.allocate(LeafNode::new(order));

        Ok(Self {
            order,
            root: NodeRef::Leaf(root_id),
            leaf_arena,
            branch_arena: CompactArena::new(),
        })
    }

    /// Create a B+ tree with the default order.
    ///
    /// This is equivalent to calling `new(DEFAULT_ORDER)`.
    pub fn with_default_order() -> InitResult<Self> {
        Self::new(DEFAULT_ORDER)
    }

    /// Returns the order this tree was built with.
    pub fn order(&self) -> usize {
        self.order
    }
}

impl<K, V> LeafNode<K, V> {
    /// Creates a new, unlinked leaf for a tree of the given order.
    pub fn new(order: usize) -> Self {
        // One slot of headroom: a leaf holds `order` keys just before it splits.
        Self {
            order,
            keys: Vec::with_capacity(order),
            values: Vec::with_capacity(order),
            next: NULL_NODE,
            parent: NULL_NODE,
        }
    }
}

impl<K> BranchNode<K> {
    /// Creates a new, empty branch node for a tree of the given order.
    pub fn new(order: usize) -> Self {
        Self {
            order,
            keys: Vec::with_capacity(order),
            children: Vec::with_capacity(order + 1),
            parent: NULL_NODE,
        }
    }
}

impl<K, V> Default for BPlusTreeMap<K, V> {
    /// Create a B+ tree with the default order.
    fn default() -> Self {
        let mut leaf_arena = CompactArena::new();
        let root_id = leaf_arena.allocate(LeafNode::new(DEFAULT_ORDER));
        Self {
            order: DEFAULT_ORDER,
            root: NodeRef::Leaf(root_id),
            leaf_arena,
            branch_arena: CompactArena::new(),
        }
    }
}

impl<K, V> Default for LeafNode<K, V> {
    fn default() -> Self {
        Self::new(DEFAULT_ORDER)
    }
}

impl<K> Default for BranchNode<K> {
    fn default() -> Self {
        Self::new(DEFAULT_ORDER)
    }
}

/// Validate that an order is usable for a B+ tree.
pub fn validate_order(order: usize) -> InitResult<()> {
    if order < MIN_ORDER {
        Err(IndexError::invalid_order(order, MIN_ORDER))
    } else {
        Ok(())
    }
}
