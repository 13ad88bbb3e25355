//! # Shard Registry
//!
//! Owns shard descriptors, their connected adapters and the hash ring.
//!
//! Descriptors, adapters and ring sit behind one `RwLock`, so a lookup never
//! observes a half-applied add or remove. The lock is never held across an
//! `.await`: callers clone the adapter `Arc`s out and release the lock first.

use crate::algorithms::ConsistentHashRing;
use crate::domain::{
    invariant_ring_matches_active, invariant_unique_ids, ShardDescriptor, ShardError, ShardId,
    ShardState,
};
use crate::metrics;
use crate::ports::outbound::DatabaseAdapter;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};

struct ShardEntry {
    descriptor: ShardDescriptor,
    adapter: Arc<dyn DatabaseAdapter>,
}

#[derive(Default)]
struct RegistryState {
    /// Registration order.
    shards: Vec<ShardEntry>,
    ring: ConsistentHashRing,
}

impl RegistryState {
    fn position(&self, id: &str) -> Option<usize> {
        self.shards.iter().position(|s| s.descriptor.id == id)
    }

    fn entry_mut(&mut self, id: &str) -> Result<&mut ShardEntry, ShardError> {
        self.shards
            .iter_mut()
            .find(|s| s.descriptor.id == id)
            .ok_or_else(|| ShardError::ShardNotFound(id.to_string()))
    }

    fn active_count(&self) -> usize {
        self.shards.iter().filter(|s| s.descriptor.is_active()).count()
    }
}

/// Registry of shards and their adapters.
#[derive(Default)]
pub struct ShardRegistry {
    state: RwLock<RegistryState>,
}

impl ShardRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Is `id` registered?
    pub fn contains(&self, id: &str) -> bool {
        self.state.read().position(id).is_some()
    }

    /// Register a connected shard. Active shards join the ring.
    pub fn register(
        &self,
        descriptor: ShardDescriptor,
        adapter: Arc<dyn DatabaseAdapter>,
    ) -> Result<(), ShardError> {
        let mut state = self.state.write();
        if state.position(&descriptor.id).is_some() {
            return Err(ShardError::DuplicateShard(descriptor.id));
        }

        if descriptor.is_active() {
            state.ring.add_shard(&descriptor.id, descriptor.weight);
        }
        info!(
            "[shard-manager] Registered shard {} (weight {}, {} virtual nodes on ring)",
            descriptor.id,
            descriptor.weight,
            state.ring.len()
        );
        state.shards.push(ShardEntry {
            descriptor,
            adapter,
        });
        metrics::set_active_shards(state.active_count());
        Ok(())
    }

    /// Unregister a shard, returning its adapter for disconnection.
    pub fn unregister(&self, id: &str) -> Result<Arc<dyn DatabaseAdapter>, ShardError> {
        let mut state = self.state.write();
        let idx = state
            .position(id)
            .ok_or_else(|| ShardError::ShardNotFound(id.to_string()))?;

        let entry = state.shards.remove(idx);
        let removed = state.ring.remove_shard(id);
        info!(
            "[shard-manager] Unregistered shard {} ({} virtual nodes removed)",
            id, removed
        );
        metrics::set_active_shards(state.active_count());
        Ok(entry.adapter)
    }

    /// Move a shard to `target`, adding or removing its ring nodes.
    pub fn set_state(&self, id: &str, target: ShardState) -> Result<(), ShardError> {
        let mut state = self.state.write();
        let entry = state.entry_mut(id)?;
        entry.descriptor.transition_to(target)?;
        let weight = entry.descriptor.weight;

        match target {
            ShardState::Active => state.ring.add_shard(id, weight),
            ShardState::Inactive => {
                state.ring.remove_shard(id);
            }
        }
        info!("[shard-manager] Shard {} is now {}", id, target);
        metrics::set_active_shards(state.active_count());
        Ok(())
    }

    /// Registered ids in registration order.
    pub fn shard_ids(&self) -> Vec<ShardId> {
        self.state
            .read()
            .shards
            .iter()
            .map(|s| s.descriptor.id.clone())
            .collect()
    }

    /// Active ids in registration order.
    pub fn active_shard_ids(&self) -> Vec<ShardId> {
        self.state
            .read()
            .shards
            .iter()
            .filter(|s| s.descriptor.is_active())
            .map(|s| s.descriptor.id.clone())
            .collect()
    }

    /// Descriptor for `id`.
    pub fn descriptor(&self, id: &str) -> Result<ShardDescriptor, ShardError> {
        let state = self.state.read();
        state
            .position(id)
            .map(|idx| state.shards[idx].descriptor.clone())
            .ok_or_else(|| ShardError::ShardNotFound(id.to_string()))
    }

    /// All descriptors in registration order.
    pub fn descriptors(&self) -> Vec<ShardDescriptor> {
        self.state
            .read()
            .shards
            .iter()
            .map(|s| s.descriptor.clone())
            .collect()
    }

    /// Shard owning `key`.
    pub fn shard_for_key(&self, key: &str) -> Result<ShardId, ShardError> {
        self.state
            .read()
            .ring
            .get_shard(key)
            .map(str::to_string)
            .ok_or(ShardError::NoShardsAvailable)
    }

    /// Shard owning `key` together with its adapter, from one snapshot.
    pub fn route(&self, key: &str) -> Result<(ShardId, Arc<dyn DatabaseAdapter>), ShardError> {
        let state = self.state.read();
        let shard_id = state
            .ring
            .get_shard(key)
            .ok_or(ShardError::NoShardsAvailable)?;
        let idx = state
            .position(shard_id)
            .ok_or_else(|| ShardError::ShardNotFound(shard_id.to_string()))?;

        debug!("[shard-manager] Key {} -> shard {}", key, shard_id);
        Ok((shard_id.to_string(), Arc::clone(&state.shards[idx].adapter)))
    }

    /// Active shards with their adapters, in registration order.
    pub fn active_adapters(&self) -> Vec<(ShardId, Arc<dyn DatabaseAdapter>)> {
        self.state
            .read()
            .shards
            .iter()
            .filter(|s| s.descriptor.is_active())
            .map(|s| (s.descriptor.id.clone(), Arc::clone(&s.adapter)))
            .collect()
    }

    /// Stamp a shard's last health check. Unknown ids are ignored.
    pub fn record_health_check(&self, id: &str, at_millis: u64) {
        if let Ok(entry) = self.state.write().entry_mut(id) {
            entry.descriptor.last_health_check = Some(at_millis);
        }
    }

    /// `(total, active)` shard counts.
    pub fn counts(&self) -> (usize, usize) {
        let state = self.state.read();
        (state.shards.len(), state.active_count())
    }

    /// Remove every shard, returning the adapters for disconnection.
    pub fn drain(&self) -> Vec<(ShardId, Arc<dyn DatabaseAdapter>)> {
        let mut state = self.state.write();
        state.ring = ConsistentHashRing::new();
        metrics::set_active_shards(0);
        state
            .shards
            .drain(..)
            .map(|s| (s.descriptor.id, s.adapter))
            .collect()
    }

    /// Check the unique-id and ring-matches-active invariants.
    pub fn verify_invariants(&self) -> Result<(), ShardError> {
        let state = self.state.read();
        let descriptors: Vec<ShardDescriptor> =
            state.shards.iter().map(|s| s.descriptor.clone()).collect();
        invariant_unique_ids(&descriptors)?;
        invariant_ring_matches_active(&state.ring.shard_ids(), &descriptors)
    }
}
