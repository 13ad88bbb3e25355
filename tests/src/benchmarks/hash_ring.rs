//! # Hash Ring Benchmarks
//!
//! - Lookup stays logarithmic in ring size
//! - Rebuilding after a membership change is proportional to virtual nodes

use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use shard_manager::ConsistentHashRing;
use std::time::Duration;

fn shard_names(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("shard-{}", i)).collect()
}

fn random_keys(count: usize) -> Vec<String> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| format!("user-{}", rng.gen::<u64>()))
        .collect()
}

fn ring(shards: &[String], weight: u32) -> ConsistentHashRing {
    ConsistentHashRing::build(shards.iter().map(|s| (s.as_str(), weight)))
}

/// Key lookups against rings of increasing size.
pub fn bench_ring_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash-ring-lookup");
    group.measurement_time(Duration::from_secs(5));

    let keys = random_keys(1_000);
    for (shards, weight) in [(4usize, 16u32), (16, 64), (64, 128)] {
        let names = shard_names(shards);
        let ring = ring(&names, weight);

        group.throughput(Throughput::Elements(keys.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("lookup_1k_keys", format!("{}x{}", shards, weight)),
            &ring,
            |b, ring| {
                b.iter(|| {
                    for key in &keys {
                        black_box(ring.get_shard(key));
                    }
                })
            },
        );
    }
    group.finish();
}

/// Adding and removing one shard from a populated ring.
pub fn bench_ring_membership_change(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash-ring-membership");

    for shards in [8usize, 32, 128] {
        let names = shard_names(shards);
        let base = ring(&names, 64);

        group.bench_with_input(BenchmarkId::new("add_remove", shards), &base, |b, base| {
            b.iter(|| {
                let mut ring = base.clone();
                ring.add_shard("new-shard", 64);
                black_box(ring.remove_shard("new-shard"))
            })
        });
    }
    group.finish();
}
