//! # Algorithms Module
//!
//! Core algorithms for the Shard Manager.

pub mod aggregation;
pub mod hash_ring;

pub use aggregation::{merge_outcomes, merge_results, ShardOutcome};
pub use hash_ring::{ring_hash, vnode_label, ConsistentHashRing, HashRingEntry};
