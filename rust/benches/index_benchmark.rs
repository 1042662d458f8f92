use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeMap, HashMap};
use storage_index::{BPlusTreeMap, ExtendibleHash};

const SEED: u64 = 42;
const TREE_ORDER: usize = 64;
const BUCKET_CAPACITY: usize = 16;

fn generate_keys(size: usize) -> Vec<i64> {
    let mut rng = StdRng::seed_from_u64(SEED);
    (0..size).map(|_| rng.gen_range(0..size as i64 * 4)).collect()
}

fn bench_insertion(c: &mut Criterion) {
    let mut group = c.benchmark_group("insertion");
    group.sample_size(30);

    for size in [1_000, 10_000] {
        let keys = generate_keys(size);

        group.bench_with_input(BenchmarkId::new("bplus_tree", size), &keys, |b, keys| {
            b.iter(|| {
                let mut tree = BPlusTreeMap::new(TREE_ORDER).unwrap();
                for &key in keys {
                    black_box(tree.insert(key, key));
                }
                black_box(tree)
            })
        });

        group.bench_with_input(BenchmarkId::new("btreemap", size), &keys, |b, keys| {
            b.iter(|| {
                let mut map = BTreeMap::new();
                for &key in keys {
                    black_box(map.insert(key, key));
                }
                black_box(map)
            })
        });

        group.bench_with_input(BenchmarkId::new("extendible_hash", size), &keys, |b, keys| {
            b.iter(|| {
                let mut index = ExtendibleHash::new(BUCKET_CAPACITY).unwrap();
                for &key in keys {
                    black_box(index.insert(key, key).unwrap());
                }
                black_box(index)
            })
        });

        group.bench_with_input(BenchmarkId::new("hashmap", size), &keys, |b, keys| {
            b.iter(|| {
                let mut map = HashMap::new();
                for &key in keys {
                    black_box(map.insert(key, key));
                }
                black_box(map)
            })
        });
    }
    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");
    let keys = generate_keys(10_000);

    let mut tree = BPlusTreeMap::new(TREE_ORDER).unwrap();
    let mut index = ExtendibleHash::new(BUCKET_CAPACITY).unwrap();
    for &key in &keys {
        tree.insert(key, key);
        index.insert(key, key).unwrap();
    }

    group.bench_function("bplus_tree", |b| {
        b.iter(|| {
            for key in keys.iter().step_by(10) {
                black_box(tree.get(key));
            }
        })
    });

    group.bench_function("extendible_hash", |b| {
        b.iter(|| {
            for key in keys.iter().step_by(10) {
                black_box(index.get(key));
            }
        })
    });
    group.finish();
}

fn bench_removal(c: &mut Criterion) {
    let mut group = c.benchmark_group("removal");
    group.sample_size(30);
    let keys = generate_keys(10_000);

    group.bench_function("bplus_tree", |b| {
        b.iter_batched(
            || {
                let mut tree = BPlusTreeMap::new(TREE_ORDER).unwrap();
                for &key in &keys {
                    tree.insert(key, key);
                }
                tree
            },
            |mut tree| {
                for key in &keys {
                    black_box(tree.remove(key));
                }
                tree
            },
            criterion::BatchSize::LargeInput,
        )
    });

    group.bench_function("extendible_hash", |b| {
        b.iter_batched(
            || {
                let mut index = ExtendibleHash::new(BUCKET_CAPACITY).unwrap();
                for &key in &keys {
                    index.insert(key, key).unwrap();
                }
                index
            },
            |mut index| {
                for key in &keys {
                    black_box(index.remove(key));
                }
                index
            },
            criterion::BatchSize::LargeInput,
        )
    });
    group.finish();
}

fn bench_range_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_scan");
    let mut tree = BPlusTreeMap::new(TREE_ORDER).unwrap();
    let mut reference = BTreeMap::new();
    for i in 0..10_000i64 {
        tree.insert(i, i * 10);
        reference.insert(i, i * 10);
    }

    group.bench_function("bplus_tree", |b| {
        b.iter(|| black_box(tree.range(black_box(2_000)..black_box(8_000)).count()))
    });
    group.bench_function("btreemap", |b| {
        b.iter(|| black_box(reference.range(black_box(2_000)..black_box(8_000)).count()))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_insertion,
    bench_lookup,
    bench_removal,
    bench_range_scan
);
criterion_main!(benches);
