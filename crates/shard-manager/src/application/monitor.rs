//! # Health & Metrics Monitor
//!
//! Concurrent health and metrics probes over active shards, plus the
//! synchronous statistics aggregate.
//!
//! A failed probe never changes a shard's state.

use super::catalog::ShardKeyCatalog;
use super::registry::ShardRegistry;
use crate::domain::{ShardId, ShardMetrics, ShardStatistics};
use crate::metrics;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::warn;

/// Probes shard health and metrics.
pub struct HealthMonitor {
    registry: Arc<ShardRegistry>,
    catalog: Arc<ShardKeyCatalog>,
    probe_timeout: Duration,
}

impl HealthMonitor {
    /// Create a monitor over a registry and catalog.
    pub fn new(
        registry: Arc<ShardRegistry>,
        catalog: Arc<ShardKeyCatalog>,
        probe_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            catalog,
            probe_timeout,
        }
    }

    /// Probe every active shard. Errors and timeouts report `false`.
    pub async fn get_shard_health(&self) -> HashMap<ShardId, bool> {
        let targets = self.registry.active_adapters();
        let timeout = self.probe_timeout;

        let probes = targets.iter().map(|(shard_id, adapter)| async move {
            let healthy = match tokio::time::timeout(timeout, adapter.health_check()).await {
                Ok(Ok(healthy)) => healthy,
                Ok(Err(e)) => {
                    warn!("[shard-manager] Health check failed for shard {}: {}", shard_id, e);
                    false
                }
                Err(_) => {
                    warn!(
                        "[shard-manager] Health check timed out for shard {} after {:?}",
                        shard_id, timeout
                    );
                    false
                }
            };
            if !healthy {
                metrics::record_probe_failure(shard_id);
            }
            (shard_id.clone(), healthy)
        });

        let results = join_all(probes).await;
        let checked_at = now_millis();
        for (shard_id, _) in &results {
            self.registry.record_health_check(shard_id, checked_at);
        }
        results.into_iter().collect()
    }

    /// Collect metrics from every active shard. Failed probes are omitted.
    pub async fn get_shard_metrics(&self) -> HashMap<ShardId, ShardMetrics> {
        let targets = self.registry.active_adapters();
        let timeout = self.probe_timeout;

        let probes = targets.iter().map(|(shard_id, adapter)| async move {
            match tokio::time::timeout(timeout, adapter.get_metrics()).await {
                Ok(Ok(m)) => Some((shard_id.clone(), m)),
                Ok(Err(e)) => {
                    warn!("[shard-manager] Metrics probe failed for shard {}: {}", shard_id, e);
                    None
                }
                Err(_) => {
                    warn!("[shard-manager] Metrics probe timed out for shard {}", shard_id);
                    None
                }
            }
        });

        join_all(probes).await.into_iter().flatten().collect()
    }

    /// Registry and catalog counts.
    pub fn statistics(&self, replication_factor: usize) -> ShardStatistics {
        let (total_shards, active_shards) = self.registry.counts();
        ShardStatistics {
            total_shards,
            active_shards,
            inactive_shards: total_shards - active_shards,
            tables_with_shard_keys: self.catalog.len(),
            replication_factor,
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
