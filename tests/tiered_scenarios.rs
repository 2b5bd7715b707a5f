// ==============================================
// TIERED CACHE SCENARIOS (integration)
// ==============================================
//
// End-to-end behaviour of a capacity-3 LRU tier 0 over a capacity-2 LFU
// tier 1, driven only through the public coordinator API.

use tierkit::prelude::*;

fn l1_lru_l2_lfu() -> TieredCache<&'static str, &'static str> {
    let cache = TieredCache::new();
    cache.add_tier(3, EvictionPolicy::Lru).unwrap();
    cache.add_tier(2, EvictionPolicy::Lfu).unwrap();
    cache
}

mod end_to_end {
    use super::*;

    #[test]
    fn retrieves_data_from_tier_zero() {
        let cache = l1_lru_l2_lfu();
        cache.put("A", "1");
        assert_eq!(cache.get(&"A"), Some("1"));
    }

    #[test]
    fn evicts_oldest_untouched_key_from_tier_zero() {
        let cache = l1_lru_l2_lfu();
        cache.put("A", "1");
        cache.put("B", "2");
        cache.put("C", "3");
        cache.put("D", "4");

        assert_eq!(cache.get(&"A"), None);
        assert_eq!(cache.get(&"B"), Some("2"));
    }

    #[test]
    fn touched_key_survives_and_next_oldest_is_evicted() {
        let cache = l1_lru_l2_lfu();
        cache.put("A", "1");
        cache.put("B", "2");
        cache.put("C", "3");
        assert_eq!(cache.get(&"A"), Some("1"));

        // A was touched, so B is now least recently used
        cache.put("D", "4");

        assert_eq!(cache.get(&"A"), Some("1"));
        assert_eq!(cache.get(&"B"), None);

        let snap = cache.snapshot();
        assert_eq!(snap[0].entries, vec![("C", "3"), ("D", "4"), ("A", "1")]);
        assert!(snap[1].entries.is_empty());
        assert_eq!(cache.hit_rate().to_string(), "66.67%");
    }

    #[test]
    fn demo_sequence_output() {
        let cache = l1_lru_l2_lfu();
        cache.put("A", "1");
        cache.put("B", "2");
        cache.put("C", "3");
        assert_eq!(cache.get(&"A"), Some("1"));
        assert_eq!(cache.get(&"B"), Some("2"));
        cache.put("D", "4");

        let lines: Vec<String> = cache.snapshot().iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            vec![
                r#"Level 1: [("A", "1"), ("B", "2"), ("D", "4")]"#.to_string(),
                "Level 2: []".to_string(),
            ]
        );
        assert_eq!(cache.hit_rate().to_string(), "100.00%");
    }

    #[test]
    fn one_hit_one_miss_is_fifty_percent() {
        let cache = l1_lru_l2_lfu();
        cache.put("A", "1");
        cache.get(&"A");
        cache.get(&"B");
        assert_eq!(cache.hit_rate().to_string(), "50.00%");
    }

    #[test]
    fn fresh_cache_reports_no_data() {
        let cache = l1_lru_l2_lfu();
        assert_eq!(cache.hit_rate(), HitRate::NoData);
    }
}

mod promotion {
    use super::*;

    #[test]
    fn lower_tier_hit_is_exclusive_to_tier_zero_afterwards() {
        let l1 = BoundedCache::new(3, EvictionPolicy::Lru);
        let l2 = BoundedCache::new(2, EvictionPolicy::Lfu);
        let l3 = BoundedCache::new(2, EvictionPolicy::Lfu);
        l2.put("B", "2");
        l3.put("B", "2-old");
        let cache = TieredCache::from_tiers(vec![l1, l2, l3]);

        assert_eq!(cache.get(&"B"), Some("2"));

        assert_eq!(cache.locate(&"B"), Some(0));
        let holders: Vec<usize> = cache
            .snapshot()
            .iter()
            .filter(|tier| tier.keys().any(|k| *k == "B"))
            .map(|tier| tier.index)
            .collect();
        assert_eq!(holders, vec![0]);
    }

    #[test]
    fn promoted_key_follows_tier_zero_policy() {
        let l1 = BoundedCache::new(2, EvictionPolicy::Lru);
        let l2 = BoundedCache::new(2, EvictionPolicy::Lfu);
        l2.put("P", "promoted");
        let cache = TieredCache::from_tiers(vec![l1, l2]);

        cache.get(&"P");
        cache.put("X", "x");
        cache.put("Y", "y");

        // P was least recently used in the LRU tier 0 and has been dropped
        assert_eq!(cache.locate(&"P"), None);
        assert_eq!(cache.get(&"P"), None);
    }
}

mod accounting {
    use super::*;

    #[test]
    fn every_lookup_increments_exactly_one_counter() {
        let cache = l1_lru_l2_lfu();
        let keys = ["A", "B", "C", "D", "E"];
        for key in &keys[..3] {
            cache.put(*key, "v");
        }

        let mut lookups = 0u64;
        for round in 0..4 {
            for key in &keys {
                cache.get(key);
                lookups += 1;
                let stats = cache.stats();
                assert_eq!(stats.hits + stats.misses, lookups, "round {}", round);
            }
        }
        assert_eq!(cache.stats().hits, 12);
        assert_eq!(cache.stats().misses, 8);
    }

    #[test]
    fn overwrite_keeps_key_count_and_returns_latest() {
        let cache = l1_lru_l2_lfu();
        cache.put("K", "v1");
        cache.put("K", "v2");
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&"K"), Some("v2"));
    }

    #[test]
    fn tier_removal_does_not_touch_counters() {
        let cache = l1_lru_l2_lfu();
        cache.put("A", "1");
        cache.get(&"A");
        cache.remove_tier(0);
        cache.remove_tier(7);
        cache.get(&"A");

        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));
        assert_eq!(cache.tier_count(), 1);
    }
}
