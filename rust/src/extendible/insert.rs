//! INSERT operations for ExtendibleHash: upsert, bucket splits, and
//! directory doubling.

use super::{Bucket, DirectoryKey, ExtendibleHash};
use crate::compact_arena::NodeId;
use crate::error::{IndexError, IndexResult};
use log::{debug, trace};

impl<K: DirectoryKey, V> ExtendibleHash<K, V> {
    /// Insert a key-value pair, overwriting and returning any previous value.
    ///
    /// A full target bucket is split, doubling the directory first when the
    /// bucket already uses every directory bit, until the pair fits. If no
    /// split within `max_global_depth` can make room, the call fails with
    /// `DirectoryLimit` before touching the directory; the pair is not stored
    /// and the index is left exactly as it was.
    ///
    /// # Examples
    ///
    /// ```
    /// use storage_index::ExtendibleHash;
    ///
    /// let mut index = ExtendibleHash::new(2).unwrap();
    /// assert_eq!(index.insert(1, "one").unwrap(), None);
    /// assert_eq!(index.insert(1, "uno").unwrap(), Some("one"));
    /// assert_eq!(index.get(&1), Some(&"uno"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> IndexResult<Option<V>> {
        loop {
            let bucket_id = self.bucket_id_for(&key);
            let capacity = self.config.bucket_capacity;
            let bucket = &mut self.buckets[bucket_id];

            if let Some(existing) = bucket.get_mut(&key) {
                return Ok(Some(std::mem::replace(existing, value)));
            }
            if bucket.len() < capacity {
                bucket.push(key, value);
                self.len += 1;
                return Ok(None);
            }
            if !self.can_make_room(bucket_id, &key) {
                return Err(IndexError::DirectoryLimit {
                    depth: self.config.max_global_depth + 1,
                    max: self.config.max_global_depth,
                });
            }

            self.split_bucket(bucket_id)?;
        }
    }

    // ============================================================================
    // HELPERS FOR INSERT OPERATIONS
    // ============================================================================

    /// Whether splitting `bucket_id` down to the deepest allowed directory
    /// leaves a bucket for `key` with a free place.
    ///
    /// A bucket at the depth limit holds keys agreeing on bits
    /// `1..max_global_depth`, so the pair fits only if fewer than
    /// `bucket_capacity` of the current keys agree with `key` there.
    fn can_make_room(&self, bucket_id: NodeId, key: &K) -> bool {
        let max = self.config.max_global_depth;
        let home = key.low_bits(max) & !1;
        let crowd = self.buckets[bucket_id]
            .keys()
            .filter(|k| k.low_bits(max) & !1 == home)
            .count();
        crowd < self.config.bucket_capacity
    }

    /// Split a full bucket one level deeper and spread its pairs over the
    /// two halves.
    fn split_bucket(&mut self, bucket_id: NodeId) -> IndexResult<()> {
        let depth = self.buckets[bucket_id].local_depth;
        if depth == self.global_depth {
            if self.global_depth >= self.config.max_global_depth {
                return Err(IndexError::DirectoryLimit {
                    depth: self.global_depth + 1,
                    max: self.config.max_global_depth,
                });
            }
            self.double_directory();
        }

        let new_depth = depth + 1;
        self.buckets[bucket_id].local_depth = new_depth;
        let sibling = self
            .buckets
            .allocate(Bucket::new(new_depth, self.config.bucket_capacity));

        let high_bit = 1usize << (new_depth - 1);
        for (slot, target) in self.directory.iter_mut().enumerate() {
            if *target == bucket_id && slot & high_bit != 0 {
                *target = sibling;
            }
        }

        // Both halves start empty, so neither can overflow here.
        for (key, value) in self.buckets[bucket_id].drain() {
            let target = self.bucket_id_for(&key);
            self.buckets[target].push(key, value);
        }
        debug_assert!(self.buckets[bucket_id].len() <= self.config.bucket_capacity);
        debug_assert!(self.buckets[sibling].len() <= self.config.bucket_capacity);

        trace!(
            "split bucket {} at depth {}: {} pairs stay, {} move to bucket {}",
            bucket_id,
            new_depth,
            self.buckets[bucket_id].len(),
            self.buckets[sibling].len(),
            sibling
        );
        Ok(())
    }

    /// Append a copy of the directory to itself, adding one address bit.
    fn double_directory(&mut self) {
        self.directory.extend_from_within(..);
        self.global_depth += 1;
        debug!(
            "directory doubled to {} slots (global depth {})",
            self.directory.len(),
            self.global_depth
        );
    }
}
