//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the byte budget and recency order of the LRU cache.

use proptest::prelude::*;
use std::collections::HashSet;

use crate::cache::{ByteView, LruCache};

// == Strategies ==
/// Generates cache keys from a small alphabet so operations collide often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-h]{1,3}".prop_map(|s| s)
}

fn value_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..32)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Put { key: String, value: Vec<u8> },
    Get { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| CacheOp::Put { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
    ]
}

fn resident_bytes(lru: &LruCache<ByteView>) -> usize {
    lru.iter().map(|(k, v)| k.len() + v.len()).sum()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Usage never exceeds the budget and always equals the sum of entry sizes.
    #[test]
    fn prop_budget_respected(
        capacity in 1usize..128,
        ops in prop::collection::vec(cache_op_strategy(), 1..200)
    ) {
        let mut lru = LruCache::new(capacity, None);

        for op in ops {
            match op {
                CacheOp::Put { key, value } => lru.put(&key, ByteView::from(value)),
                CacheOp::Get { key } => {
                    lru.get(&key);
                }
            }
            prop_assert!(lru.used_bytes() <= capacity);
            prop_assert_eq!(lru.used_bytes(), resident_bytes(&lru));
            prop_assert_eq!(lru.iter().count(), lru.len());
        }
    }

    // A budget of 0 keeps every distinct key ever inserted.
    #[test]
    fn prop_zero_capacity_never_evicts(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 1..200)
    ) {
        let mut lru = LruCache::new(0, None);
        let mut distinct = HashSet::new();

        for (key, value) in entries {
            lru.put(&key, ByteView::from(value));
            distinct.insert(key);
        }

        prop_assert_eq!(lru.len(), distinct.len());
        prop_assert_eq!(lru.used_bytes(), resident_bytes(&lru));
    }

    // With room for exactly N equal-sized entries, inserting N + 1 distinct
    // keys evicts the first one inserted and nothing else.
    #[test]
    fn prop_strict_lru_order(n in 1usize..20) {
        let keys: Vec<String> = (0..=n).map(|i| format!("k{i:03}")).collect();
        let entry_size = keys[0].len() + 4;
        let mut lru = LruCache::new(entry_size * n, None);

        for key in &keys {
            lru.put(key, ByteView::from("vvvv"));
        }

        prop_assert_eq!(lru.len(), n);
        prop_assert!(!lru.contains(&keys[0]));
        for key in &keys[1..] {
            prop_assert!(lru.contains(key));
        }
    }

    // A key read with `get` outlives every other resident key.
    #[test]
    fn prop_get_promotes(n in 2usize..20, pick in any::<prop::sample::Index>()) {
        let keys: Vec<String> = (0..n).map(|i| format!("k{i:03}")).collect();
        let entry_size = keys[0].len() + 4;
        let mut lru = LruCache::new(entry_size * n, None);

        for key in &keys {
            lru.put(key, ByteView::from("vvvv"));
        }
        let promoted = pick.get(&keys).clone();
        lru.get(&promoted);

        let mut evicted = Vec::new();
        while let Some((key, _)) = lru.remove_oldest() {
            evicted.push(key);
        }

        prop_assert_eq!(evicted.len(), n);
        prop_assert_eq!(evicted.last(), Some(&promoted));
    }
}
