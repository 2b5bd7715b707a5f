//! Two-level cache walkthrough.
//!
//! Run with: cargo run --bin tiered_demo
//! Set `RUST_LOG=tierkit=debug` (or `trace`) to see tier and eviction events.

use tierkit::bounded::EvictionPolicy;
use tierkit::error::ConfigError;
use tierkit::manager::TieredCache;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), ConfigError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cache = TieredCache::new();
    cache.add_tier(3, EvictionPolicy::Lru)?; // L1
    cache.add_tier(2, EvictionPolicy::Lfu)?; // L2

    cache.put("A", "1");
    cache.put("B", "2");
    cache.put("C", "3");

    println!("{}", display(cache.get(&"A")));
    println!("{}", display(cache.get(&"B")));

    // L1 is full; C is now the least recently used entry
    cache.put("D", "4");

    for tier in cache.snapshot() {
        println!("{}", tier);
    }
    println!("Cache Hit Rate: {}", cache.hit_rate());

    Ok(())
}

fn display(value: Option<&str>) -> &str {
    value.unwrap_or("(miss)")
}
