use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use storage_index::BPlusTreeMap;

const SEED: u64 = 42;
const OPERATIONS: usize = 4000;
const KEY_SPACE: i32 = 600;

/// Drive a tree and a `BTreeMap` with the same random operations and demand
/// identical answers and a valid tree after every step.
fn run_against_btreemap(order: usize, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut tree = BPlusTreeMap::new(order).unwrap();
    let mut reference = BTreeMap::new();

    for step in 0..OPERATIONS {
        let key = rng.gen_range(0..KEY_SPACE);
        if rng.gen_bool(0.6) {
            let value = rng.gen::<u32>();
            assert_eq!(
                tree.insert(key, value),
                reference.insert(key, value),
                "insert {} at step {}",
                key,
                step
            );
        } else {
            assert_eq!(
                tree.take(&key),
                reference.remove(&key),
                "remove {} at step {}",
                key,
                step
            );
        }

        if let Err(e) = tree.check_invariants_detailed() {
            panic!("order {} step {}: {}", order, step, e);
        }
    }

    assert_eq!(tree.len(), reference.len());
    assert!(tree.items().eq(reference.iter()));
    for key in 0..KEY_SPACE {
        assert_eq!(tree.get(&key), reference.get(&key));
    }
}

/// Insert everything, then remove everything in a shuffled order.
fn fill_then_drain(order: usize, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut keys: Vec<i32> = (0..KEY_SPACE).collect();
    let mut tree = BPlusTreeMap::new(order).unwrap();
    for &key in &keys {
        tree.insert(key, key);
    }

    for i in (1..keys.len()).rev() {
        keys.swap(i, rng.gen_range(0..=i));
    }
    for (removed, key) in keys.iter().enumerate() {
        assert!(tree.remove(key));
        assert_eq!(tree.len(), keys.len() - removed - 1);
    }
    tree.check_invariants_detailed().unwrap();
    assert!(tree.is_leaf_root());
    assert!(tree.is_empty());
}

macro_rules! order_tests {
    ($($order:literal),* $(,)?) => {
        $(
            paste::paste! {
                #[test]
                fn [<test_random_operations_order_ $order>]() {
                    run_against_btreemap($order, SEED + $order);
                }

                #[test]
                fn [<test_fill_then_drain_order_ $order>]() {
                    fill_then_drain($order, SEED ^ $order);
                }
            }
        )*
    };
}

order_tests!(3, 4, 5, 6, 7, 8, 16, 32);

#[test]
fn test_range_matches_btreemap() {
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut tree = BPlusTreeMap::new(5).unwrap();
    let mut reference = BTreeMap::new();
    for _ in 0..500 {
        let key = rng.gen_range(0..1000);
        tree.insert(key, key * 2);
        reference.insert(key, key * 2);
    }

    for _ in 0..200 {
        let a = rng.gen_range(0..1000);
        let b = rng.gen_range(a..1001);
        assert!(tree.range(a..b).eq(reference.range(a..b)), "range {}..{}", a, b);
        assert!(tree.range(a..=b).eq(reference.range(a..=b)), "range {}..={}", a, b);
        assert!(tree.range(a..).eq(reference.range(a..)), "range {}..", a);
    }
}
