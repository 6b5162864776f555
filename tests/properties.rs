//! Property-based tests for AvlMap.
//!
//! Random operation sequences are replayed against `AvlMap` and `std::collections::BTreeMap`;
//! the tree invariants are re-checked after every mutation.

use std::collections::BTreeMap;

use avl_map::{AvlMap, MapError};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

#[derive(Debug, Clone)]
enum Operation {
    Insert(i16, u32),
    Replace(i16, u32),
    Remove(i16),
}

fn arbitrary_key() -> impl Strategy<Value = i16> {
    -64i16..64
}

fn arbitrary_operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        3 => (arbitrary_key(), any::<u32>()).prop_map(|(k, v)| Operation::Insert(k, v)),
        1 => (arbitrary_key(), any::<u32>()).prop_map(|(k, v)| Operation::Replace(k, v)),
        2 => arbitrary_key().prop_map(Operation::Remove),
    ]
}

fn arbitrary_entries() -> impl Strategy<Value = Vec<(i16, u32)>> {
    prop::collection::vec((arbitrary_key(), any::<u32>()), 0..100)
}

fn build(entries: &[(i16, u32)]) -> AvlMap<i16, u32> {
    entries.iter().copied().collect()
}

// =============================================================================
// Model: every operation agrees with BTreeMap and keeps the tree valid
// =============================================================================

proptest! {
    #[test]
    fn prop_matches_btree_map(operations in prop::collection::vec(arbitrary_operation(), 0..200)) {
        let mut map = AvlMap::new();
        let mut model = BTreeMap::new();

        for operation in operations {
            match operation {
                Operation::Insert(key, value) => {
                    let absent = !model.contains_key(&key);
                    if absent {
                        model.insert(key, value);
                    }
                    prop_assert_eq!(map.insert(key, value), absent);
                }
                Operation::Replace(key, value) => {
                    prop_assert_eq!(map.replace(key, value), model.insert(key, value));
                }
                Operation::Remove(key) => {
                    prop_assert_eq!(map.remove_entry(&key), model.remove_entry(&key));
                }
            }
            prop_assert_eq!(map.validate(), Ok(()));
            prop_assert_eq!(map.len(), model.len());
        }

        prop_assert!(map.iter().eq(model.iter()));
        prop_assert_eq!(map.min().ok(), model.keys().next());
        prop_assert_eq!(map.max().ok(), model.keys().next_back());
    }
}

// =============================================================================
// Height stays logarithmic
// =============================================================================

proptest! {
    #[test]
    fn prop_height_is_logarithmic(entries in arbitrary_entries()) {
        let map = build(&entries);
        // AVL bound: h <= 1.4405 * log2(n + 2) - 0.3277
        let bound = 1.4405 * ((map.len() + 2) as f64).log2() - 0.3277;
        prop_assert!((map.height() as f64) <= bound.max(1.0));
    }
}

// =============================================================================
// Insert-Get law: insert(k, v) on a map without k makes value(k) == v
// =============================================================================

proptest! {
    #[test]
    fn prop_insert_then_value(entries in arbitrary_entries(), key in arbitrary_key(), value in any::<u32>()) {
        let mut map = build(&entries);
        map.remove(&key);
        prop_assert!(map.insert(key, value));
        prop_assert_eq!(map.value(&key), Ok(&value));
        prop_assert!(map.contains_key(&key));
    }
}

// =============================================================================
// Insert-Remove law: removing a freshly inserted key restores the key set
// =============================================================================

proptest! {
    #[test]
    fn prop_insert_then_remove(entries in arbitrary_entries(), key in arbitrary_key(), value in any::<u32>()) {
        let mut map = build(&entries);
        map.remove(&key);
        let before: Vec<i16> = map.keys().copied().collect();

        map.insert(key, value);
        prop_assert!(map.remove(&key));
        prop_assert_eq!(map.validate(), Ok(()));
        prop_assert_eq!(map.keys().copied().collect::<Vec<_>>(), before);
        prop_assert_eq!(map.value(&key), Err(MapError::KeyNotFound));
    }
}

// =============================================================================
// Duplicate insert is a no-op
// =============================================================================

proptest! {
    #[test]
    fn prop_duplicate_insert_is_noop(entries in arbitrary_entries(), value in any::<u32>()) {
        prop_assume!(!entries.is_empty());
        let mut map = build(&entries);
        let key = entries[0].0;
        let snapshot = map.clone();
        let height = map.height();

        prop_assert!(!map.insert(key, value));
        prop_assert_eq!(map.height(), height);
        prop_assert_eq!(&map, &snapshot);
    }
}

// =============================================================================
// Copy independence: mutating a clone leaves the original untouched
// =============================================================================

proptest! {
    #[test]
    fn prop_clone_is_independent(
        entries in arbitrary_entries(),
        operations in prop::collection::vec(arbitrary_operation(), 0..50)
    ) {
        let original = build(&entries);
        let expected: Vec<(i16, u32)> = original.iter().map(|(&k, &v)| (k, v)).collect();

        let mut copy = original.clone();
        prop_assert_eq!(copy.validate(), Ok(()));
        for operation in operations {
            match operation {
                Operation::Insert(key, value) => {
                    copy.insert(key, value);
                }
                Operation::Replace(key, value) => {
                    copy.replace(key, value);
                }
                Operation::Remove(key) => {
                    copy.remove(&key);
                }
            }
        }

        prop_assert_eq!(copy.validate(), Ok(()));
        prop_assert_eq!(original.validate(), Ok(()));
        prop_assert!(original.iter().map(|(&k, &v)| (k, v)).eq(expected));
    }
}
