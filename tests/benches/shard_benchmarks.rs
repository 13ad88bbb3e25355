//! # Shard Manager Benchmarks
//!
//! | Area | Claim | Target |
//! |------|-------|--------|
//! | Hash ring | O(log V) lookup over V virtual nodes | < 1μs per key |
//! | Hash ring | Membership change touches one shard | < 1ms at 128 shards |
//! | Fan-out | Merge linear in rows | < 1ms for 6.4k rows |
//! | Fan-out | Concurrent scatter over in-memory shards | < 5ms at 32 shards |

use criterion::{criterion_group, criterion_main};
use shard_tests::benchmarks::{fan_out, hash_ring};

criterion_group!(
    benches,
    hash_ring::bench_ring_lookup,
    hash_ring::bench_ring_membership_change,
    fan_out::bench_merge_outcomes,
    fan_out::bench_query_all_shards,
);
criterion_main!(benches);
