use storage_index::{BPlusTreeMap, IndexError};

const SCENARIO_KEYS: [i32; 13] = [10, 20, 5, 6, 12, 30, 7, 17, 3, 25, 15, 16, 18];

fn scenario_tree() -> BPlusTreeMap<i32, String> {
    let mut tree = BPlusTreeMap::new(4).unwrap();
    for k in SCENARIO_KEYS {
        tree.insert(k, format!("v{}", k));
        tree.check_invariants_detailed().unwrap();
    }
    tree
}

#[test]
fn test_order_four_insert_search_remove() {
    let mut tree = scenario_tree();
    assert_eq!(tree.len(), SCENARIO_KEYS.len());
    assert_eq!(tree.search(&17), Some(&"v17".to_string()));
    assert_eq!(tree.search(&999), None);

    assert!(tree.remove(&20));
    tree.check_invariants_detailed().unwrap();
    assert!(tree.remove(&12));
    tree.check_invariants_detailed().unwrap();

    let chain: Vec<i32> = tree.leaf_keys().concat();
    assert_eq!(chain, vec![3, 5, 6, 7, 10, 15, 16, 17, 18, 25, 30]);
    let keys: Vec<i32> = tree.keys().copied().collect();
    assert_eq!(keys, chain);
}

#[test]
fn test_full_drain_collapses_to_empty_leaf() {
    let mut tree = scenario_tree();
    assert!(tree.remove(&20));
    assert!(tree.remove(&12));

    let remaining: Vec<i32> = tree.keys().copied().collect();
    for k in remaining {
        assert!(tree.remove(&k), "key {} should be present", k);
        tree.check_invariants_detailed().unwrap();
        assert_eq!(tree.get(&k), None);
    }

    assert!(tree.is_leaf_root());
    assert!(tree.is_empty());
    assert_eq!(tree.height(), 1);
    assert_eq!(tree.levels(), vec![vec![Vec::<i32>::new()]]);
    assert_eq!(tree.branch_arena_stats().allocated_count, 0);
}

#[test]
fn test_reinsert_after_drain() {
    let mut tree = scenario_tree();
    for k in SCENARIO_KEYS {
        assert!(tree.remove(&k));
    }
    assert!(tree.is_empty());

    for k in SCENARIO_KEYS {
        tree.insert(k, format!("again{}", k));
    }
    tree.check_invariants_detailed().unwrap();
    assert_eq!(tree.get(&16), Some(&"again16".to_string()));
}

#[test]
fn test_removing_absent_key_changes_nothing() {
    let mut tree = scenario_tree();
    let before = tree.levels();
    assert!(!tree.remove(&11));
    assert!(!tree.remove(&-5));
    assert_eq!(tree.levels(), before);
    for k in SCENARIO_KEYS {
        assert_eq!(tree.get(&k), Some(&format!("v{}", k)));
    }
}

#[test]
fn test_duplicate_insert_is_upsert() {
    let mut tree = scenario_tree();
    assert_eq!(tree.insert(17, "new".to_string()), Some("v17".to_string()));
    assert_eq!(tree.len(), SCENARIO_KEYS.len());
    assert_eq!(tree.get(&17), Some(&"new".to_string()));
    assert_eq!(tree.keys().filter(|&&k| k == 17).count(), 1);
}

#[test]
fn test_invalid_order_rejected() {
    for order in [0, 1, 2] {
        let err = BPlusTreeMap::<i32, i32>::new(order).unwrap_err();
        assert!(matches!(err, IndexError::InvalidConfiguration(_)));
        assert!(err.is_configuration_error());
    }
}

#[test]
fn test_range_after_mutation() {
    let mut tree = scenario_tree();
    tree.remove(&16);
    let window: Vec<i32> = tree.range(10..=18).map(|(k, _)| *k).collect();
    assert_eq!(window, vec![10, 12, 15, 17, 18]);
    assert_eq!(tree.first().map(|(k, _)| *k), Some(3));
    assert_eq!(tree.last().map(|(k, _)| *k), Some(30));
}
