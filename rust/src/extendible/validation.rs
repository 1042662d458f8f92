//! Invariant checking for ExtendibleHash.

use super::{DirectoryKey, ExtendibleHash};
use crate::compact_arena::NodeId;
use crate::error::{IndexError, TreeResult};
use std::collections::HashMap;
use std::fmt::Debug;

impl<K: DirectoryKey + Debug, V> ExtendibleHash<K, V> {
    /// Check if the index maintains its directory invariants.
    pub fn check_invariants(&self) -> bool {
        self.check_invariants_detailed().is_ok()
    }

    /// Check invariants with detailed error reporting.
    pub fn check_invariants_detailed(&self) -> Result<(), String> {
        self.check_directory()
            .and_then(|slots_per_bucket| self.check_buckets(&slots_per_bucket))
            .map_err(|e| e.to_string())
    }

    /// Directory shape and sharing. Returns how many slots reference each
    /// bucket.
    fn check_directory(&self) -> TreeResult<HashMap<NodeId, usize>> {
        let global = self.global_depth;
        if global == 0 || global > self.config.max_global_depth {
            return Err(IndexError::corrupted(
                "Directory",
                &format!(
                    "global depth {} outside 1..={}",
                    global, self.config.max_global_depth
                ),
            ));
        }
        if self.directory.len() != 1usize << global {
            return Err(IndexError::corrupted(
                "Directory",
                &format!("{} slots at global depth {}", self.directory.len(), global),
            ));
        }

        let mut slots_per_bucket = HashMap::new();
        for (slot, &id) in self.directory.iter().enumerate() {
            let bucket = self.buckets.get(id).ok_or_else(|| {
                IndexError::corrupted("Directory", &format!("slot {} references dead bucket {}", slot, id))
            })?;
            let depth = bucket.local_depth;
            if depth == 0 || depth > global {
                return Err(IndexError::data_integrity(
                    &format!("Bucket {}", id),
                    &format!("local depth {} outside 1..={}", depth, global),
                ));
            }

            // Every slot agreeing on bits 1..depth shares the bucket; bit 0
            // never separates buckets.
            let group_head = slot & ((1usize << depth) - 1) & !1;
            if self.directory[group_head] != id {
                return Err(IndexError::corrupted(
                    "Directory",
                    &format!(
                        "slot {} references bucket {} but its group head {} references {}",
                        slot, id, group_head, self.directory[group_head]
                    ),
                ));
            }
            *slots_per_bucket.entry(id).or_insert(0) += 1;
        }

        for (&id, &count) in &slots_per_bucket {
            let depth = self.buckets[id].local_depth;
            let expected = 1usize << (global - depth + 1);
            if count != expected {
                return Err(IndexError::corrupted(
                    "Directory",
                    &format!(
                        "bucket {} at depth {} is referenced by {} slots, expected {}",
                        id, depth, count, expected
                    ),
                ));
            }
        }

        if global > 1
            && !slots_per_bucket
                .keys()
                .any(|&id| self.buckets[id].local_depth == global)
        {
            return Err(IndexError::corrupted(
                "Directory",
                &format!("no bucket uses global depth {}; directory should have halved", global),
            ));
        }

        Ok(slots_per_bucket)
    }

    /// Bucket contents: capacity, unique keys, routing, and bookkeeping.
    fn check_buckets(&self, slots_per_bucket: &HashMap<NodeId, usize>) -> TreeResult<()> {
        if slots_per_bucket.len() != self.buckets.len() {
            return Err(IndexError::corrupted(
                "Bucket arena",
                &format!(
                    "{} buckets in directory vs {} in arena",
                    slots_per_bucket.len(),
                    self.buckets.len()
                ),
            ));
        }

        let mut total = 0;
        for &id in slots_per_bucket.keys() {
            let bucket = &self.buckets[id];
            let context = format!("Bucket {}", id);
            if bucket.len() > self.config.bucket_capacity {
                return Err(IndexError::data_integrity(
                    &context,
                    &format!(
                        "{} pairs exceed capacity {}",
                        bucket.len(),
                        self.config.bucket_capacity
                    ),
                ));
            }
            for (i, key) in bucket.keys().enumerate() {
                if bucket.keys().skip(i + 1).any(|other| other == key) {
                    return Err(IndexError::data_integrity(
                        &context,
                        &format!("duplicate key {:?}", key),
                    ));
                }
                if self.bucket_id_for(key) != id {
                    return Err(IndexError::data_integrity(
                        &context,
                        &format!("key {:?} routes to bucket {}", key, self.bucket_id_for(key)),
                    ));
                }
            }
            total += bucket.len();
        }

        if total != self.len {
            return Err(IndexError::data_integrity(
                "Length",
                &format!("{} pairs stored but len is {}", total, self.len),
            ));
        }
        Ok(())
    }
}
