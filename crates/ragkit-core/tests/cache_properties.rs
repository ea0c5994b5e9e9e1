//! Property tests for the cache invariants.

use proptest::prelude::*;
use ragkit_core::cache::key;
use ragkit_core::TtlLruCache;
use std::sync::Arc;
use std::time::Duration;

const LONG_TTL: Duration = Duration::from_secs(1800);

#[derive(Debug)]
struct Never;

fn lookup(cache: &TtlLruCache<String, Arc<u64>>, key: u64) -> Arc<u64> {
    cache
        .get_or_load(format!("key-{key}"), || Ok::<_, Never>(Arc::new(key)))
        .expect("loader is infallible")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: size never exceeds capacity after any operation.
    #[test]
    fn prop_size_stays_bounded(
        max_size in 1usize..=8,
        keys in proptest::collection::vec(0u64..32, 1..=100)
    ) {
        let cache = TtlLruCache::new("prop", LONG_TTL, max_size);
        for key in keys {
            let _ = lookup(&cache, key);
            prop_assert!(cache.len() <= max_size);
        }
    }

    /// Property: every lookup is exactly one hit or one miss, never both.
    #[test]
    fn prop_lookups_split_into_hits_and_misses(
        keys in proptest::collection::vec(0u64..16, 1..=100)
    ) {
        let cache = TtlLruCache::new("prop", LONG_TTL, 64);
        let lookups = keys.len() as u64;
        for key in keys {
            let _ = lookup(&cache, key);
        }
        let stats = cache.stats();
        prop_assert_eq!(stats.hits + stats.misses, lookups);
    }

    /// Property: counters never decrease.
    #[test]
    fn prop_counters_are_monotonic(
        keys in proptest::collection::vec(0u64..16, 1..=60)
    ) {
        let cache = TtlLruCache::new("prop", LONG_TTL, 4);
        let mut previous = cache.stats();
        for key in keys {
            let _ = lookup(&cache, key);
            let current = cache.stats();
            prop_assert!(current.hits >= previous.hits);
            prop_assert!(current.misses >= previous.misses);
            prop_assert!(current.evictions >= previous.evictions);
            prop_assert!(current.expired >= previous.expired);
            previous = current;
        }
    }

    /// Property: a cached value is returned as-is on the next lookup.
    #[test]
    fn prop_hit_returns_cached_value(key in 0u64..1000) {
        let cache = TtlLruCache::new("prop", LONG_TTL, 8);
        let first = lookup(&cache, key);
        let second = lookup(&cache, key);
        prop_assert!(Arc::ptr_eq(&first, &second));
    }

    /// Property: overfilling with distinct keys evicts the oldest first.
    #[test]
    fn prop_overflow_evicts_oldest(max_size in 1usize..=8, extra in 1usize..=8) {
        let cache = TtlLruCache::new("prop", LONG_TTL, max_size);
        let total = max_size + extra;
        for key in 0..total as u64 {
            let _ = lookup(&cache, key);
        }
        let stats = cache.stats();
        prop_assert_eq!(stats.size, max_size);
        prop_assert_eq!(stats.evictions, extra as u64);
        // The first inserted keys are the evicted ones.
        prop_assert_eq!(cache.get(&"key-0".to_string()), None);
    }

    /// Property: equal field tuples derive equal keys, prefix-differing
    /// tuples derive different ones.
    #[test]
    fn prop_key_derivation_deterministic(
        tenant in "[a-z0-9]{1,12}",
        provider in "[a-z0-9]{1,12}",
        model in "[a-z0-9]{1,12}"
    ) {
        let first = key::derive(&[&tenant, &provider, &model]);
        let second = key::derive(&[&tenant, &provider, &model]);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), 32);

        let other = key::derive(&[&format!("{tenant}x"), &provider, &model]);
        prop_assert_ne!(&first, &other);
    }
}
