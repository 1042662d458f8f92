use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use storage_index::{ExtendibleHash, HashConfig};

const SEED: u64 = 7;
const OPERATIONS: usize = 3000;

fn run_against_hashmap(config: HashConfig, key_space: i64, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut index = ExtendibleHash::with_config(config).unwrap();
    let mut reference = HashMap::new();

    for step in 0..OPERATIONS {
        let key = rng.gen_range(-key_space..key_space);
        if rng.gen_bool(0.55) {
            let value = rng.gen::<u16>();
            assert_eq!(
                index.insert(key, value).unwrap(),
                reference.insert(key, value),
                "insert {} at step {}",
                key,
                step
            );
        } else {
            assert_eq!(
                index.take(&key),
                reference.remove(&key),
                "remove {} at step {}",
                key,
                step
            );
        }

        if let Err(e) = index.check_invariants_detailed() {
            panic!("{:?} step {}: {}", config, step, e);
        }
    }

    assert_eq!(index.len(), reference.len());
    for (key, value) in &reference {
        assert_eq!(index.get(key), Some(value));
    }
    let mut seen: Vec<(i64, u16)> = index.iter().map(|(k, v)| (*k, *v)).collect();
    let mut expected: Vec<(i64, u16)> = reference.into_iter().collect();
    seen.sort();
    expected.sort();
    assert_eq!(seen, expected);
}

macro_rules! capacity_tests {
    ($($capacity:literal),* $(,)?) => {
        $(
            paste::paste! {
                #[test]
                fn [<test_random_operations_capacity_ $capacity>]() {
                    run_against_hashmap(HashConfig::new($capacity), 300, SEED + $capacity);
                }

                #[test]
                fn [<test_random_operations_without_coalescing_capacity_ $capacity>]() {
                    let config = HashConfig::new($capacity).without_coalescing();
                    run_against_hashmap(config, 300, SEED * $capacity);
                }
            }
        )*
    };
}

capacity_tests!(2, 3, 4, 8);

#[test]
fn test_drain_returns_to_single_bucket() {
    let mut index = ExtendibleHash::new(2).unwrap();
    let keys: Vec<u32> = (0..256).collect();
    for &key in &keys {
        index.insert(key, key).unwrap();
    }
    assert!(index.global_depth() > 4);

    // Top-down removal empties the upper half of the key space first, so each
    // emptied bucket folds into its lower buddy.
    for &key in keys.iter().rev() {
        assert!(index.remove(&key));
        index.check_invariants_detailed().unwrap();
    }
    assert!(index.is_empty());
    assert_eq!(index.global_depth(), 1);
    assert_eq!(index.bucket_count(), 1);
}
