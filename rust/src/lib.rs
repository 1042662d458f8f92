//! In-memory index structures for storage engines.
//!
//! This crate provides two independent indexes over integer-like keys:
//!
//! - [`BPlusTreeMap`], an ordered B+ tree with linked leaves for in-order and
//!   range traversal.
//! - [`ExtendibleHash`], a hash index whose directory doubles and halves as
//!   its buckets split and merge.
//!
//! Both support upsert, point lookup, and removal with structural
//! rebalancing. Neither is thread-safe; callers serialize access.
//!
//! # Examples
//!
//! ```
//! use storage_index::{BPlusTreeMap, ExtendibleHash};
//!
//! let mut tree = BPlusTreeMap::new(4).unwrap();
//! tree.insert(10, "v10");
//! tree.insert(5, "v5");
//! assert_eq!(tree.keys().copied().collect::<Vec<_>>(), vec![5, 10]);
//!
//! let mut hash = ExtendibleHash::new(2).unwrap();
//! hash.insert(10u64, "v10").unwrap();
//! assert_eq!(hash.get(&10), Some(&"v10"));
//! ```

mod compact_arena;
mod construction;
mod delete_operations;
mod error;
mod extendible;
mod get_operations;
mod insert_operations;
mod iteration;
mod node;
mod tree_structure;
mod types;
mod validation;

pub use compact_arena::{CompactArena, CompactArenaStats};
pub use construction::validate_order;
pub use error::{
    IndexError, IndexResult, IndexResultExt, InitResult, KeyResult, ModifyResult,
};
pub use extendible::{
    Bucket, DirectoryEntry, DirectoryKey, ExtendibleHash, HashConfig, DEFAULT_BUCKET_CAPACITY,
    DEFAULT_MAX_GLOBAL_DEPTH, MAX_GLOBAL_DEPTH_LIMIT,
};
pub use iteration::{ItemIterator, KeyIterator, RangeIterator, ValueIterator};
pub use types::{
    BPlusTreeMap, BranchNode, LeafNode, NodeId, NodeRef, DEFAULT_ORDER, MIN_ORDER, NULL_NODE,
};
