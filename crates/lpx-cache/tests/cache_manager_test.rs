//! Integration tests for the cache manager against the system clock.

use lpx_cache::{CacheConfig, CacheManager, CacheStats};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
struct Skill {
    id: String,
    name: String,
    tags: Vec<String>,
}

fn skill(id: &str, name: &str) -> Skill {
    Skill {
        id: id.to_string(),
        name: name.to_string(),
        tags: vec!["core".to_string()],
    }
}

#[test]
fn test_ttl_expiry_with_wall_clock() {
    let mut cache = CacheManager::new(CacheConfig::default()).unwrap();

    cache.set("k", "v".to_string(), Some(Duration::from_millis(10)));
    std::thread::sleep(Duration::from_millis(20));

    assert_eq!(cache.get("k"), None);
    assert_eq!(cache.stats().misses, 1);
}

#[test]
fn test_default_ttl_hit() {
    let mut cache = CacheManager::new(CacheConfig::default()).unwrap();

    cache.set("k", 7_u32, None);

    assert_eq!(cache.get("k"), Some(7));
    assert_eq!(cache.stats().hits, 1);
}

#[test]
fn test_capacity_eviction_keeps_size_bounded() {
    let mut cache = CacheManager::new(CacheConfig::new().with_max_cache_size(2)).unwrap();

    cache.set("a", 1, None);
    cache.set("b", 2, None);
    cache.set("c", 3, None);

    assert_eq!(cache.size(), 2);
    assert_eq!(cache.get("a"), None);
    assert_eq!(cache.get("b"), Some(2));
    assert_eq!(cache.get("c"), Some(3));
}

#[test]
fn test_hit_rate_matches_counts() {
    let mut cache = CacheManager::new(CacheConfig::default()).unwrap();
    assert!(cache.stats().hit_rate.abs() < f64::EPSILON);

    cache.set("present", 1, None);
    let hits = 5;
    let misses = 3;
    for _ in 0..hits {
        assert!(cache.get("present").is_some());
    }
    for i in 0..misses {
        assert!(cache.get(&format!("absent-{i}")).is_none());
    }

    let stats = cache.stats();
    let expected = f64::from(hits) / f64::from(hits + misses);
    assert!((stats.hit_rate - expected).abs() < f64::EPSILON);
    assert_eq!(stats.size, 1);
}

#[test]
fn test_clear_after_activity() {
    let mut cache = CacheManager::new(CacheConfig::default()).unwrap();

    cache.set("a", 1, None);
    cache.set("b", 2, None);
    let _ = cache.get("a");
    let _ = cache.get("zzz");
    cache.delete("never-existed");

    cache.clear();

    assert_eq!(cache.stats(), CacheStats::default());
    assert_eq!(cache.size(), 0);
}

#[test]
fn test_round_trip_structured_values() {
    let mut cache = CacheManager::new(CacheConfig::default()).unwrap();
    let skills = vec![skill("1", "Rust"), skill("2", "Solidity")];

    cache.set("all-skills", skills.clone(), None);

    assert_eq!(cache.get("all-skills"), Some(skills));
}
