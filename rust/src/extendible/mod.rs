//! Extendible hash index.
//!
//! A directory of `2^global_depth` slots maps the low-order bits of an
//! integer key to a bucket. Buckets are shared by every slot in their group
//! and split or merge on their own; the directory only doubles when a bucket
//! at full depth splits, and halves once no bucket needs the top bit.
//!
//! The directory starts as two slots over a single bucket of local depth 1,
//! so bit 0 never separates buckets. A bucket of local depth `d` is shared by
//! every slot that agrees on bits `1..d`, which is `2^(global_depth - d + 1)`
//! slots, and keys `2k` and `2k + 1` always share a bucket.
//!
//! # Examples
//!
//! ```
//! use storage_index::ExtendibleHash;
//!
//! let mut index = ExtendibleHash::new(2).unwrap();
//! for key in 0..4u32 {
//!     index.insert(key, key * 10).unwrap();
//! }
//! assert_eq!(index.get(&3), Some(&30));
//! assert!(index.global_depth() >= 2);
//!
//! assert!(index.remove(&3));
//! assert!(index.remove(&2));
//! assert_eq!(index.get(&0), Some(&0));
//! assert_eq!(index.global_depth(), 1);
//! ```

mod bucket;
mod delete;
mod insert;
mod key;
mod validation;

pub use bucket::Bucket;
pub use key::DirectoryKey;

use crate::compact_arena::{CompactArena, NodeId};
use crate::error::{IndexError, InitResult, KeyResult};
use log::debug;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Bucket capacity used by `HashConfig::default()`.
pub const DEFAULT_BUCKET_CAPACITY: usize = 4;

/// Directory depth limit used unless configured otherwise.
pub const DEFAULT_MAX_GLOBAL_DEPTH: u32 = 24;

/// Largest directory depth that can be configured.
pub const MAX_GLOBAL_DEPTH_LIMIT: u32 = 32;

/// Construction parameters for [`ExtendibleHash`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashConfig {
    /// Maximum number of pairs per bucket.
    pub bucket_capacity: usize,
    /// Splits that would grow the directory past this depth fail instead.
    pub max_global_depth: u32,
    /// Merge buddy buckets and halve the directory on remove.
    pub coalesce: bool,
}

impl HashConfig {
    pub fn new(bucket_capacity: usize) -> Self {
        Self {
            bucket_capacity,
            ..Self::default()
        }
    }

    pub fn with_max_global_depth(mut self, max_global_depth: u32) -> Self {
        self.max_global_depth = max_global_depth;
        self
    }

    /// Remove pairs without merging buckets or shrinking the directory.
    pub fn without_coalescing(mut self) -> Self {
        self.coalesce = false;
        self
    }

    pub fn validate(&self) -> InitResult<()> {
        if self.bucket_capacity == 0 {
            return Err(IndexError::invalid_capacity(self.bucket_capacity));
        }
        if self.max_global_depth == 0 || self.max_global_depth > MAX_GLOBAL_DEPTH_LIMIT {
            return Err(IndexError::InvalidConfiguration(format!(
                "Maximum global depth {} is invalid (must be in 1..={})",
                self.max_global_depth, MAX_GLOBAL_DEPTH_LIMIT
            )));
        }
        Ok(())
    }
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            bucket_capacity: DEFAULT_BUCKET_CAPACITY,
            max_global_depth: DEFAULT_MAX_GLOBAL_DEPTH,
            coalesce: true,
        }
    }
}

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// Hash index over integer keys with a doubling and halving directory.
#[derive(Debug)]
pub struct ExtendibleHash<K, V> {
    pub(crate) config: HashConfig,
    pub(crate) global_depth: u32,
    /// Bucket handle per slot; many slots may share one bucket.
    pub(crate) directory: Vec<NodeId>,
    pub(crate) buckets: CompactArena<Bucket<K, V>>,
    pub(crate) len: usize,
}

/// One directory slot as reported by [`ExtendibleHash::directory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry<K> {
    pub slot: usize,
    pub bucket: NodeId,
    pub local_depth: u32,
    pub keys: Vec<K>,
}

// ============================================================================
// CONSTRUCTION
// ============================================================================

impl<K, V> ExtendibleHash<K, V> {
    /// Create an index whose buckets hold at most `bucket_capacity` pairs.
    ///
    /// Fails with `InvalidConfiguration` for a capacity of zero.
    pub fn new(bucket_capacity: usize) -> InitResult<Self> {
        Self::with_config(HashConfig::new(bucket_capacity))
    }

    pub fn with_config(config: HashConfig) -> InitResult<Self> {
        config.validate()?;
        let mut index = Self {
            config,
            global_depth: 1,
            directory: Vec::new(),
            buckets: CompactArena::new(),
            len: 0,
        };
        index.reset();
        Ok(index)
    }

    /// One bucket of local depth 1 behind both slots of a depth-1 directory.
    fn reset(&mut self) {
        self.buckets.clear();
        let bucket = self
            .buckets
            .allocate(Bucket::new(1, self.config.bucket_capacity));
        self.directory = vec![bucket, bucket];
        self.global_depth = 1;
        self.len = 0;
    }

    /// Remove every pair and return to the initial directory.
    pub fn clear(&mut self) {
        self.reset();
        debug!("hash index cleared");
    }

    // ============================================================================
    // ACCESSORS
    // ============================================================================

    pub fn config(&self) -> &HashConfig {
        &self.config
    }

    pub fn bucket_capacity(&self) -> usize {
        self.config.bucket_capacity
    }

    /// Number of low key bits used to pick a directory slot.
    pub fn global_depth(&self) -> u32 {
        self.global_depth
    }

    /// Number of directory slots, always `2^global_depth`.
    pub fn directory_len(&self) -> usize {
        self.directory.len()
    }

    /// Number of distinct live buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate over all pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.buckets
            .ids()
            .flat_map(move |id| self.buckets[id].items.iter().map(|(k, v)| (k, v)))
    }
}

impl<K: DirectoryKey, V> ExtendibleHash<K, V> {
    // ============================================================================
    // LOOKUP
    // ============================================================================

    /// Directory slot for a key under the current global depth.
    pub fn slot_of(&self, key: &K) -> usize {
        key.low_bits(self.global_depth)
    }

    pub(crate) fn bucket_id_for(&self, key: &K) -> NodeId {
        self.directory[self.slot_of(key)]
    }

    /// Get a reference to the value associated with a key.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.buckets[self.bucket_id_for(key)].get(key)
    }

    /// Alias for [`get`](Self::get), named after the index verb.
    pub fn search(&self, key: &K) -> Option<&V> {
        self.get(key)
    }

    /// Get value for a key, returning an error if the key doesn't exist.
    pub fn try_get(&self, key: &K) -> KeyResult<&V> {
        self.get(key).ok_or(IndexError::KeyNotFound)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = self.bucket_id_for(key);
        self.buckets[id].get_mut(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }
}

impl<K: Clone, V> ExtendibleHash<K, V> {
    /// Snapshot of every directory slot and the bucket behind it.
    pub fn directory(&self) -> Vec<DirectoryEntry<K>> {
        self.directory
            .iter()
            .enumerate()
            .map(|(slot, &id)| {
                let bucket = &self.buckets[id];
                DirectoryEntry {
                    slot,
                    bucket: id,
                    local_depth: bucket.local_depth,
                    keys: bucket.keys().cloned().collect(),
                }
            })
            .collect()
    }
}

impl<K, V> Default for ExtendibleHash<K, V> {
    fn default() -> Self {
        let mut index = Self {
            config: HashConfig::default(),
            global_depth: 1,
            directory: Vec::new(),
            buckets: CompactArena::new(),
            len: 0,
        };
        index.reset();
        index
    }
}
