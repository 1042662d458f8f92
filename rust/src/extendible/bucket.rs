//! Buckets of the extendible hash index.

/// Unordered run of key-value pairs sharing a directory group.
///
/// Capacity is a property of the owning index, not of the bucket; callers
/// check it before pushing.
#[derive(Debug, Clone)]
pub struct Bucket<K, V> {
    /// Number of low key bits that currently route to this bucket.
    pub(crate) local_depth: u32,
    pub(crate) items: Vec<(K, V)>,
}

impl<K, V> Bucket<K, V> {
    /// Create an empty bucket with room for `capacity` pairs.
    pub fn new(local_depth: u32, capacity: usize) -> Self {
        Self {
            local_depth,
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn local_depth(&self) -> u32 {
        self.local_depth
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over the keys held by this bucket, in storage order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.items.iter().map(|(key, _)| key)
    }

    /// Append a pair whose key is known to be absent.
    pub(crate) fn push(&mut self, key: K, value: V) {
        self.items.push((key, value));
    }

    /// Take every pair out, leaving the bucket empty.
    pub(crate) fn drain(&mut self) -> Vec<(K, V)> {
        std::mem::take(&mut self.items)
    }

    /// Move every pair of `other` into this bucket.
    pub(crate) fn absorb(&mut self, other: &mut Bucket<K, V>) {
        self.items.append(&mut other.items);
    }
}

impl<K: Eq, V> Bucket<K, V> {
    fn position(&self, key: &K) -> Option<usize> {
        self.items.iter().position(|(k, _)| k == key)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.position(key).map(|index| &self.items[index].1)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.position(key) {
            Some(index) => Some(&mut self.items[index].1),
            None => None,
        }
    }

    /// Remove a key, returning its value. Pair order is not preserved.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let index = self.position(key)?;
        Some(self.items.swap_remove(index).1)
    }
}

impl<K, V> Default for Bucket<K, V> {
    fn default() -> Self {
        Self::new(1, 0)
    }
}
