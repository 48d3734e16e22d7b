//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check read-after-write and expiration behavior.

use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{ManualClock, TtlCache};

// == Strategies ==
/// Generates cache keys
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z_:0-9]{1,32}"
}

/// Generates cache values
fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,64}"
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String, ttl_ms: u64 },
    Get { key: String },
    Advance { ms: u64 },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy(), 1u64..10_000)
            .prop_map(|(key, value, ttl_ms)| CacheOp::Set { key, value, ttl_ms }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        (0u64..5_000).prop_map(|ms| CacheOp::Advance { ms }),
    ]
}

fn manual_cache() -> (TtlCache<String>, ManualClock) {
    let clock = ManualClock::new(0);
    (TtlCache::with_clock(Arc::new(clock.clone())), clock)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // A get right after set returns the stored value.
    #[test]
    fn prop_read_after_set(
        key in key_strategy(),
        value in value_strategy(),
        ttl_ms in 1u64..1_000_000
    ) {
        let (mut cache, _) = manual_cache();

        cache.set(key.clone(), value.clone(), Duration::from_millis(ttl_ms));

        prop_assert_eq!(cache.get(&key), Some(value));
    }

    // Once the TTL has elapsed the entry is gone, and stays gone.
    #[test]
    fn prop_eviction_is_permanent(
        key in key_strategy(),
        value in value_strategy(),
        ttl_ms in 1u64..100_000,
        extra_ms in 0u64..100_000
    ) {
        let (mut cache, clock) = manual_cache();

        cache.set(key.clone(), value, Duration::from_millis(ttl_ms));
        clock.advance(Duration::from_millis(ttl_ms + extra_ms));

        prop_assert_eq!(cache.get(&key), None);
        prop_assert_eq!(cache.get(&key), None);
        prop_assert!(cache.is_empty());
    }

    // Replaying any operation sequence against a simple model agrees with the
    // cache on every read.
    #[test]
    fn prop_matches_model(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let (mut cache, clock) = manual_cache();
        let mut model: std::collections::HashMap<String, (String, u64)> =
            std::collections::HashMap::new();
        let mut now: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value, ttl_ms } => {
                    cache.set(key.clone(), value.clone(), Duration::from_millis(ttl_ms));
                    model.insert(key, (value, now + ttl_ms));
                }
                CacheOp::Get { key } => {
                    let expected = match model.get(&key) {
                        Some((value, expires)) if now < *expires => Some(value.clone()),
                        _ => {
                            model.remove(&key);
                            None
                        }
                    };
                    prop_assert_eq!(cache.get(&key), expected);
                }
                CacheOp::Advance { ms } => {
                    clock.advance(Duration::from_millis(ms));
                    now += ms;
                }
            }
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.total_entries, cache.len());
    }
}
