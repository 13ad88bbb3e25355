//! # Consistent Hash Ring
//!
//! Maps keys onto active shards with bounded reshuffling.
//!
//! Each shard owns `weight` virtual nodes placed at `hash("{shard_id}#{index}")`.
//! A key is owned by the first virtual node whose hash is >= the key's hash,
//! wrapping to the first node past the end of the ring.
//!
//! When one of N shards joins or leaves, only the keys owned by that shard's
//! virtual nodes move, roughly 1/N of the keyspace.

use crate::domain::ShardId;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};

/// One virtual node on the ring.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashRingEntry {
    /// Ring position.
    pub hash: u64,
    /// Owning shard.
    pub shard_id: ShardId,
}

/// Sorted sequence of virtual nodes.
#[derive(Clone, Debug, Default)]
pub struct ConsistentHashRing {
    entries: Vec<HashRingEntry>,
}

impl ConsistentHashRing {
    /// Create an empty ring.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ring from `(shard_id, weight)` pairs.
    pub fn build<'a, I>(shards: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, u32)>,
    {
        let mut entries = Vec::new();
        for (shard_id, weight) in shards {
            entries.extend(virtual_nodes(shard_id, weight));
        }
        sort_entries(&mut entries);
        Self { entries }
    }

    /// Insert a shard's virtual nodes. Existing nodes for the id are replaced.
    pub fn add_shard(&mut self, shard_id: &str, weight: u32) {
        self.entries.retain(|e| e.shard_id != shard_id);
        self.entries.extend(virtual_nodes(shard_id, weight));
        sort_entries(&mut self.entries);
    }

    /// Drop a shard's virtual nodes. Returns how many were removed.
    pub fn remove_shard(&mut self, shard_id: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.shard_id != shard_id);
        before - self.entries.len()
    }

    /// Shard owning `key`, or `None` on an empty ring.
    pub fn get_shard(&self, key: &str) -> Option<&str> {
        let hash = ring_hash(key);
        let idx = self.entries.partition_point(|e| e.hash < hash);
        self.entries
            .get(idx)
            .or_else(|| self.entries.first())
            .map(|e| e.shard_id.as_str())
    }

    /// Distinct shards on the ring, sorted.
    pub fn shard_ids(&self) -> Vec<ShardId> {
        let mut ids: Vec<ShardId> = self.entries.iter().map(|e| e.shard_id.clone()).collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Virtual nodes in ring order.
    pub fn entries(&self) -> &[HashRingEntry] {
        &self.entries
    }

    /// Number of virtual nodes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the ring empty?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ring position of arbitrary text: first 8 bytes of SHA3-256, big-endian.
pub fn ring_hash(data: &str) -> u64 {
    let digest = Sha3_256::digest(data.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(prefix)
}

/// Label hashed for a shard's `index`-th virtual node.
pub fn vnode_label(shard_id: &str, index: u32) -> String {
    format!("{}#{}", shard_id, index)
}

fn virtual_nodes(shard_id: &str, weight: u32) -> impl Iterator<Item = HashRingEntry> + '_ {
    (0..weight).map(move |i| HashRingEntry {
        hash: ring_hash(&vnode_label(shard_id, i)),
        shard_id: shard_id.to_string(),
    })
}

// Equal hashes are ordered by shard id so lookups stay deterministic.
fn sort_entries(entries: &mut [HashRingEntry]) {
    entries.sort_unstable_by(|a, b| {
        a.hash
            .cmp(&b.hash)
            .then_with(|| a.shard_id.cmp(&b.shard_id))
    });
}
