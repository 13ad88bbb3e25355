//! # Shard Manager Metrics
//!
//! Prometheus metrics for routing and fan-out.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! shard-manager = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `shard_manager_routed_writes_total` - Counter of writes routed, by shard
//! - `shard_manager_fanout_queries_total` - Counter of fan-out queries issued
//! - `shard_manager_fanout_excluded_total` - Counter of shards excluded from a fan-out (by reason)
//! - `shard_manager_probe_failures_total` - Counter of failed health probes, by shard
//! - `shard_manager_active_shards` - Gauge of shards on the ring

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_int_counter, register_int_counter_vec, register_int_gauge, IntCounter,
    IntCounterVec, IntGauge,
};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Writes routed to a shard
    pub static ref ROUTED_WRITES: IntCounterVec = register_int_counter_vec!(
        "shard_manager_routed_writes_total",
        "Total number of writes routed to a shard",
        &["shard"]
    )
    .expect("Failed to create ROUTED_WRITES metric");

    /// Fan-out queries issued
    pub static ref FANOUT_QUERIES: IntCounter = register_int_counter!(
        "shard_manager_fanout_queries_total",
        "Total number of fan-out queries issued"
    )
    .expect("Failed to create FANOUT_QUERIES metric");

    /// Shards excluded from a fan-out, labeled by reason
    pub static ref FANOUT_EXCLUDED: IntCounterVec = register_int_counter_vec!(
        "shard_manager_fanout_excluded_total",
        "Total number of shards excluded from fan-out results",
        &["reason"]
    )
    .expect("Failed to create FANOUT_EXCLUDED metric");

    /// Failed health probes
    pub static ref PROBE_FAILURES: IntCounterVec = register_int_counter_vec!(
        "shard_manager_probe_failures_total",
        "Total number of failed health probes",
        &["shard"]
    )
    .expect("Failed to create PROBE_FAILURES metric");

    /// Shards currently on the ring
    pub static ref ACTIVE_SHARDS: IntGauge = register_int_gauge!(
        "shard_manager_active_shards",
        "Number of shards currently on the hash ring"
    )
    .expect("Failed to create ACTIVE_SHARDS metric");
}

// =============================================================================
// METRIC RECORDING FUNCTIONS
// =============================================================================

/// Record a write routed to `shard`
#[cfg(feature = "metrics")]
pub fn record_routed_write(shard: &str) {
    ROUTED_WRITES.with_label_values(&[shard]).inc();
}

/// Record a fan-out query
#[cfg(feature = "metrics")]
pub fn record_fanout_query() {
    FANOUT_QUERIES.inc();
}

/// Record a shard excluded from a fan-out
#[cfg(feature = "metrics")]
pub fn record_fanout_excluded(reason: &str) {
    FANOUT_EXCLUDED.with_label_values(&[reason]).inc();
}

/// Record a failed health probe
#[cfg(feature = "metrics")]
pub fn record_probe_failure(shard: &str) {
    PROBE_FAILURES.with_label_values(&[shard]).inc();
}

/// Update active shard gauge
#[cfg(feature = "metrics")]
pub fn set_active_shards(count: usize) {
    ACTIVE_SHARDS.set(count as i64);
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature disabled)
// =============================================================================

/// No-op without the `metrics` feature.
#[cfg(not(feature = "metrics"))]
pub fn record_routed_write(_shard: &str) {}

/// No-op without the `metrics` feature.
#[cfg(not(feature = "metrics"))]
pub fn record_fanout_query() {}

/// No-op without the `metrics` feature.
#[cfg(not(feature = "metrics"))]
pub fn record_fanout_excluded(_reason: &str) {}

/// No-op without the `metrics` feature.
#[cfg(not(feature = "metrics"))]
pub fn record_probe_failure(_shard: &str) {}

/// No-op without the `metrics` feature.
#[cfg(not(feature = "metrics"))]
pub fn set_active_shards(_count: usize) {}
