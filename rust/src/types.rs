//! Core types and data structures for BPlusTreeMap.
//!
//! This module contains the fundamental data structures, type definitions,
//! and constants used throughout the B+ tree implementation.

use crate::compact_arena::CompactArena;

pub use crate::compact_arena::{NodeId, NULL_NODE};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Minimum order (maximum fan-out) for any B+ tree.
pub const MIN_ORDER: usize = 3;

/// Order used by `BPlusTreeMap::default()`.
pub const DEFAULT_ORDER: usize = 16;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// Ordered index backed by a B+ tree.
///
/// Internal nodes only guide descent; every key/value pair lives in a leaf,
/// and leaves are chained left to right so the whole key space can be walked
/// in order without touching the internal levels.
///
/// The tree has a fixed order `m`: a node holds at most `m - 1` keys and an
/// internal node at most `m` children. Non-root leaves keep at least
/// `ceil((m - 1) / 2)` keys and non-root internal nodes at least
/// `ceil(m / 2) - 1` keys.
///
/// Nodes live in two arenas and refer to each other by [`NodeId`], including
/// the parent back-reference every node carries.
///
/// # Examples
///
/// ```
/// use storage_index::BPlusTreeMap;
///
/// let mut tree = BPlusTreeMap::new(4).unwrap();
/// tree.insert(1, "one");
/// tree.insert(2, "two");
/// tree.insert(3, "three");
///
/// assert_eq!(tree.get(&2), Some(&"two"));
/// assert_eq!(tree.len(), 3);
/// assert!(tree.remove(&2));
/// assert!(!tree.remove(&2));
/// ```
#[derive(Debug)]
pub struct BPlusTreeMap<K, V> {
    /// Maximum number of children per internal node.
    pub(crate) order: usize,
    /// The root node of the tree.
    pub(crate) root: NodeRef,
    /// Arena storage for leaf nodes.
    pub(crate) leaf_arena: CompactArena<LeafNode<K, V>>,
    /// Arena storage for branch (internal) nodes.
    pub(crate) branch_arena: CompactArena<BranchNode<K>>,
}

/// Leaf node containing key-value pairs.
#[derive(Debug, Clone)]
pub struct LeafNode<K, V> {
    /// Order of the owning tree.
    pub(crate) order: usize,
    /// Sorted list of keys.
    pub(crate) keys: Vec<K>,
    /// Values at the same index as their keys.
    pub(crate) values: Vec<V>,
    /// Next leaf in key order, or `NULL_NODE` for the last leaf.
    pub(crate) next: NodeId,
    /// Parent branch, or `NULL_NODE` for the root.
    pub(crate) parent: NodeId,
}

/// Internal (branch) node containing separator keys and child references.
#[derive(Debug, Clone)]
pub struct BranchNode<K> {
    /// Order of the owning tree.
    pub(crate) order: usize,
    /// Sorted list of separator keys.
    pub(crate) keys: Vec<K>,
    /// `keys.len() + 1` child nodes (leaves or other branches).
    pub(crate) children: Vec<NodeRef>,
    /// Parent branch, or `NULL_NODE` for the root.
    pub(crate) parent: NodeId,
}

// ============================================================================
// ENUMS
// ============================================================================

/// Tagged reference to a node in one of the two arenas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    Leaf(NodeId),
    Branch(NodeId),
}

impl NodeRef {
    /// Return the raw node ID.
    pub fn id(&self) -> NodeId {
        match *self {
            NodeRef::Leaf(id) => id,
            NodeRef::Branch(id) => id,
        }
    }

    /// Returns true if this reference points to a leaf node.
    pub fn is_leaf(&self) -> bool {
        matches!(self, NodeRef::Leaf(_))
    }
}
