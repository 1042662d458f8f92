//! DELETE operations for ExtendibleHash: removal, buddy coalescing, and
//! directory halving.

use super::{DirectoryKey, ExtendibleHash};
use crate::compact_arena::NodeId;
use crate::error::{IndexError, ModifyResult};
use log::{debug, trace};

impl<K: DirectoryKey, V> ExtendibleHash<K, V> {
    /// Remove a key from the index. Returns true if the key existed.
    pub fn remove(&mut self, key: &K) -> bool {
        self.take(key).is_some()
    }

    /// Remove a key and return its value.
    ///
    /// With coalescing enabled the emptied-out bucket is merged with its
    /// buddy for as long as the pair fits in one bucket, then the directory
    /// is halved while no bucket uses its top bit.
    pub fn take(&mut self, key: &K) -> Option<V> {
        let bucket_id = self.bucket_id_for(key);
        let value = self.buckets[bucket_id].remove(key)?;
        self.len -= 1;

        if self.config.coalesce {
            self.coalesce(bucket_id);
            self.shrink_directory();
        }
        Some(value)
    }

    /// Remove a key, reporting a miss as `KeyNotFound`.
    pub fn try_remove(&mut self, key: &K) -> ModifyResult<V> {
        self.take(key).ok_or(IndexError::KeyNotFound)
    }

    // ============================================================================
    // HELPERS FOR DELETE OPERATIONS
    // ============================================================================

    /// Merge `bucket_id` with its buddy, repeating one depth lower each time.
    fn coalesce(&mut self, mut bucket_id: NodeId) {
        let capacity = self.config.bucket_capacity;
        loop {
            let depth = self.buckets[bucket_id].local_depth;
            if depth <= 1 {
                return;
            }
            let representative = match self.directory.iter().position(|&id| id == bucket_id) {
                Some(slot) => slot,
                None => return,
            };
            let high_bit = 1usize << (depth - 1);
            let buddy_id = self.directory[representative ^ high_bit];

            if buddy_id == bucket_id
                || self.buckets[buddy_id].local_depth != depth
                || self.buckets[bucket_id].len() + self.buckets[buddy_id].len() > capacity
            {
                return;
            }

            // The half whose slots have the high bit clear survives.
            let (survivor, donor) = if representative & high_bit == 0 {
                (bucket_id, buddy_id)
            } else {
                (buddy_id, bucket_id)
            };
            let mut gone = self
                .buckets
                .deallocate(donor)
                .expect("merged bucket should be allocated");
            let merged = &mut self.buckets[survivor];
            merged.absorb(&mut gone);
            merged.local_depth = depth - 1;

            for target in self.directory.iter_mut() {
                if *target == donor {
                    *target = survivor;
                }
            }

            trace!(
                "merged bucket {} into {} at depth {}",
                donor,
                survivor,
                depth - 1
            );
            bucket_id = survivor;
        }
    }

    /// Drop the upper half of the directory while no bucket needs the top bit.
    fn shrink_directory(&mut self) {
        while self.global_depth > 1 {
            let top_bit_used = self
                .directory
                .iter()
                .any(|&id| self.buckets[id].local_depth == self.global_depth);
            if top_bit_used {
                return;
            }

            let half = self.directory.len() / 2;
            self.directory.truncate(half);
            self.global_depth -= 1;
            debug!(
                "directory halved to {} slots (global depth {})",
                self.directory.len(),
                self.global_depth
            );
        }
    }
}
