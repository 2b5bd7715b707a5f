use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use tierkit::bounded::{BoundedCache, EvictionPolicy};
use tierkit::builder::TieredCacheBuilder;
use tierkit::manager::TieredCache;

const OPS: u64 = 1024;

/// Simple XorShift64 RNG for deterministic workloads.
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

fn bench_tier_insert_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("tier_insert_get");
    group.throughput(Throughput::Elements(OPS * 2));
    for policy in [EvictionPolicy::Lru, EvictionPolicy::Lfu] {
        group.bench_with_input(BenchmarkId::from_parameter(policy), &policy, |b, &policy| {
            b.iter_batched(
                || {
                    let tier = BoundedCache::new(OPS as usize, policy);
                    for i in 0..OPS {
                        tier.put(i, i);
                    }
                    tier
                },
                |tier| {
                    for i in 0..OPS {
                        tier.put(std::hint::black_box(i + 10_000), i);
                        let _ = std::hint::black_box(tier.get(&std::hint::black_box(i)));
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_coordinator_mixed(c: &mut Criterion) {
    let mut group = c.benchmark_group("tiered_mixed");
    group.throughput(Throughput::Elements(OPS));
    group.bench_function("get_put_80_20", |b| {
        let cache: TieredCache<u64, u64> = TieredCacheBuilder::new()
            .tier(256, EvictionPolicy::Lru)
            .tier(512, EvictionPolicy::Lfu)
            .build();
        let mut rng = XorShift64::new(0x5eed);
        b.iter(|| {
            for _ in 0..OPS {
                let key = rng.next_u64() % 1024;
                if key % 5 == 0 {
                    cache.put(key, key);
                } else {
                    let _ = std::hint::black_box(cache.get(&key));
                }
            }
        })
    });
    group.finish();
}

fn bench_promotion(c: &mut Criterion) {
    let mut group = c.benchmark_group("tiered_promotion");
    group.throughput(Throughput::Elements(OPS));
    group.bench_function("promote_from_tier_1", |b| {
        b.iter_batched(
            || {
                let l1 = BoundedCache::new(64, EvictionPolicy::Lru);
                let l2 = BoundedCache::new(OPS as usize, EvictionPolicy::Lfu);
                for i in 0..OPS {
                    l2.put(i, i);
                }
                TieredCache::from_tiers(vec![l1, l2])
            },
            |cache| {
                for i in 0..OPS {
                    let _ = std::hint::black_box(cache.get(&i));
                }
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_tier_insert_get,
    bench_coordinator_mixed,
    bench_promotion
);
criterion_main!(benches);
