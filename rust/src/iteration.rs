//! Iterator implementations for BPlusTreeMap.
//!
//! Every iterator here walks the leaf chain: descend once to the starting
//! leaf, then follow `next` links, caching the current leaf reference so each
//! step costs one arena lookup per leaf rather than per item.

use crate::types::{BPlusTreeMap, LeafNode, NodeId, NULL_NODE};
use std::ops::{Bound, RangeBounds};

// ============================================================================
// ITERATOR STRUCTS
// ============================================================================

/// Iterator over key-value pairs in the B+ tree using the leaf linked list.
pub struct ItemIterator<'a, K, V> {
    tree: &'a BPlusTreeMap<K, V>,
    current_leaf: Option<&'a LeafNode<K, V>>,
    index: usize,
    end: Bound<K>,
}

/// Iterator over keys in the B+ tree.
pub struct KeyIterator<'a, K, V> {
    items: ItemIterator<'a, K, V>,
}

/// Iterator over values in the B+ tree.
pub struct ValueIterator<'a, K, V> {
    items: ItemIterator<'a, K, V>,
}

/// Iterator over the pairs whose keys fall in a range.
pub type RangeIterator<'a, K, V> = ItemIterator<'a, K, V>;

// ============================================================================
// BPLUSTREE ITERATOR METHODS
// ============================================================================

impl<K: Ord, V> BPlusTreeMap<K, V> {
    /// Returns an iterator over all key-value pairs in sorted order.
    pub fn items(&self) -> ItemIterator<'_, K, V> {
        ItemIterator::new(self, self.first_leaf_id(), 0, Bound::Unbounded)
    }

    /// Returns an iterator over all keys in sorted order.
    pub fn keys(&self) -> KeyIterator<'_, K, V> {
        KeyIterator {
            items: self.items(),
        }
    }

    /// Returns an iterator over all values in key order.
    pub fn values(&self) -> ValueIterator<'_, K, V> {
        ValueIterator {
            items: self.items(),
        }
    }

    /// Returns the pair with the smallest key.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.items().next()
    }

    /// Returns the pair with the largest key.
    pub fn last(&self) -> Option<(&K, &V)> {
        let leaf = &self.leaf_arena[self.last_leaf_id()];
        let key = leaf.keys.last()?;
        let value = leaf.values.last()?;
        Some((key, value))
    }
}

impl<K: Ord + Clone, V> BPlusTreeMap<K, V> {
    /// Returns an iterator over the pairs whose keys fall in `range`.
    ///
    /// # Examples
    ///
    /// ```
    /// use storage_index::BPlusTreeMap;
    ///
    /// let mut tree = BPlusTreeMap::new(4).unwrap();
    /// for k in 0..10 {
    ///     tree.insert(k, k * 10);
    /// }
    /// let keys: Vec<_> = tree.range(3..6).map(|(k, _)| *k).collect();
    /// assert_eq!(keys, vec![3, 4, 5]);
    /// let tail: Vec<_> = tree.range(8..).map(|(_, v)| *v).collect();
    /// assert_eq!(tail, vec![80, 90]);
    /// ```
    pub fn range<R: RangeBounds<K>>(&self, range: R) -> RangeIterator<'_, K, V> {
        let (leaf_id, index) = match range.start_bound() {
            Bound::Unbounded => (self.first_leaf_id(), 0),
            Bound::Included(start) => {
                let leaf_id = self.find_leaf(start);
                let index = match self.leaf_arena[leaf_id].keys.binary_search(start) {
                    Ok(index) | Err(index) => index,
                };
                (leaf_id, index)
            }
            Bound::Excluded(start) => {
                let leaf_id = self.find_leaf(start);
                let index = match self.leaf_arena[leaf_id].keys.binary_search(start) {
                    Ok(index) => index + 1,
                    Err(index) => index,
                };
                (leaf_id, index)
            }
        };

        ItemIterator::new(self, leaf_id, index, range.end_bound().cloned())
    }
}

impl<'a, K: Ord, V> IntoIterator for &'a BPlusTreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = ItemIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.items()
    }
}

// ============================================================================
// ITEMITERATOR IMPLEMENTATION
// ============================================================================

impl<'a, K: Ord, V> ItemIterator<'a, K, V> {
    fn new(tree: &'a BPlusTreeMap<K, V>, leaf_id: NodeId, index: usize, end: Bound<K>) -> Self {
        Self {
            tree,
            current_leaf: tree.get_leaf(leaf_id),
            index,
            end,
        }
    }

    fn past_end(&self, key: &K) -> bool {
        match &self.end {
            Bound::Included(end) => key > end,
            Bound::Excluded(end) => key >= end,
            Bound::Unbounded => false,
        }
    }
}

impl<'a, K: Ord, V> Iterator for ItemIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let leaf = self.current_leaf?;

            if self.index < leaf.keys.len() {
                let key = &leaf.keys[self.index];
                if self.past_end(key) {
                    self.current_leaf = None;
                    return None;
                }
                let value = &leaf.values[self.index];
                self.index += 1;
                return Some((key, value));
            }

            self.current_leaf = if leaf.next == NULL_NODE {
                None
            } else {
                self.tree.get_leaf(leaf.next)
            };
            self.index = 0;
        }
    }
}

// ============================================================================
// KEY AND VALUE ITERATORS
// ============================================================================

impl<'a, K: Ord, V> Iterator for KeyIterator<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next().map(|(k, _)| k)
    }
}

impl<'a, K: Ord, V> Iterator for ValueIterator<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next().map(|(_, v)| v)
    }
}
