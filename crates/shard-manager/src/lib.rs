//! # Shard Manager
//!
//! Horizontal partitioning of table rows across independent databases.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Spread rows over a set of database shards and route work to them:
//! - Consistent hashing with weighted virtual nodes for key-to-shard assignment
//! - Per-table shard keys deciding which column routes a row
//! - Concurrent scatter-gather queries that tolerate failing or slow shards
//! - Health and metrics probes over every active shard
//!
//! ## Guarantees
//!
//! | Property | Description |
//! |----------|-------------|
//! | Deterministic routing | Same key and active set always map to the same shard |
//! | Bounded reshuffle | Adding or removing one shard moves only that shard's keys |
//! | Atomic registry | Lookups never see a half-added or half-removed shard |
//! | Partial tolerance | Fan-out fails only when no shard answers |
//!
//! ## Module Structure
//!
//! ```text
//! shard-manager/
//! ├── domain/          # Descriptors, rules, results, errors, invariants
//! ├── algorithms/      # Hash ring, fan-out aggregation
//! ├── ports/           # ShardManagerApi, DatabaseAdapter, AdapterFactory
//! ├── adapters/        # In-memory backend, adapter factories
//! ├── application/     # Registry, catalog, router, monitor, service
//! ├── config.rs        # ShardManagerConfig
//! └── metrics.rs       # Prometheus metrics (feature = "metrics")
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod metrics;
pub mod ports;

// Re-exports
pub use adapters::{
    AdapterConstructor, BackendAdapterFactory, InMemoryDatabaseAdapter, PreparedAdapterFactory,
};
pub use algorithms::{
    merge_outcomes, merge_results, ring_hash, vnode_label, ConsistentHashRing, HashRingEntry,
    ShardOutcome,
};
pub use application::{
    routing_key, DataRouter, HealthMonitor, ShardKeyCatalog, ShardManager, ShardRegistry,
};
pub use config::ShardManagerConfig;
pub use domain::{
    invariant_deterministic_assignment, invariant_replication_factor,
    invariant_ring_matches_active, invariant_unique_ids, invariant_weight, AggregatedQueryResult,
    BackendType, ConnectionConfig, FanOutReport, InsertResult, QueryResult, Row,
    ShardDescriptor, ShardError, ShardId, ShardKeyRule, ShardMetrics, ShardState,
    ShardStatistics, ShardingStrategy, SkippedShard, DEFAULT_FANOUT_TIMEOUT_MS,
    DEFAULT_PROBE_TIMEOUT_MS, DEFAULT_WEIGHT, MAX_WEIGHT, MIN_REPLICATION_FACTOR,
};
pub use ports::{AdapterError, AdapterFactory, DatabaseAdapter, ShardManagerApi};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
