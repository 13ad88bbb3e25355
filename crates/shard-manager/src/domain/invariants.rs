//! # Domain Invariants
//!
//! Rules that must always hold for the registry, ring and replication settings.

use super::entities::ShardDescriptor;
use super::errors::{ShardError, ShardId};
use std::collections::HashSet;

/// Default virtual node count for a shard.
pub const DEFAULT_WEIGHT: u32 = 1;

/// Upper bound on virtual nodes per shard.
pub const MAX_WEIGHT: u32 = 10_000;

/// Minimum replication factor.
pub const MIN_REPLICATION_FACTOR: usize = 1;

/// Default per-shard budget for fan-out queries.
pub const DEFAULT_FANOUT_TIMEOUT_MS: u64 = 5_000;

/// Default per-shard budget for health and metrics probes.
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 2_000;

/// Invariant: key assignment is deterministic.
///
/// Same key + same shard set = same shard.
pub fn invariant_deterministic_assignment<F>(assign_fn: F, key: &str) -> bool
where
    F: Fn(&str) -> Option<ShardId>,
{
    let first = assign_fn(key);
    let second = assign_fn(key);
    first == second
}

/// Invariant: shard ids are unique.
pub fn invariant_unique_ids(shards: &[ShardDescriptor]) -> Result<(), ShardError> {
    let mut seen = HashSet::new();
    for shard in shards {
        if !seen.insert(shard.id.as_str()) {
            return Err(ShardError::DuplicateShard(shard.id.clone()));
        }
    }
    Ok(())
}

/// Invariant: the ring holds exactly the active shard set.
pub fn invariant_ring_matches_active(
    ring_shards: &[ShardId],
    shards: &[ShardDescriptor],
) -> Result<(), ShardError> {
    let on_ring: HashSet<&str> = ring_shards.iter().map(String::as_str).collect();
    let active: HashSet<&str> = shards
        .iter()
        .filter(|s| s.is_active())
        .map(|s| s.id.as_str())
        .collect();

    if on_ring != active {
        return Err(ShardError::Config(format!(
            "ring shards {:?} do not match active shards {:?}",
            on_ring, active
        )));
    }
    Ok(())
}

/// Invariant: replication factor is at least 1.
pub fn invariant_replication_factor(factor: usize) -> Result<(), ShardError> {
    if factor < MIN_REPLICATION_FACTOR {
        return Err(ShardError::InvalidReplicationFactor(factor));
    }
    Ok(())
}

/// Invariant: weight is within [1, MAX_WEIGHT].
pub fn invariant_weight(shard_id: &str, weight: u32) -> Result<(), ShardError> {
    if weight == 0 || weight > MAX_WEIGHT {
        return Err(ShardError::InvalidWeight {
            shard_id: shard_id.to_string(),
            weight,
        });
    }
    Ok(())
}
