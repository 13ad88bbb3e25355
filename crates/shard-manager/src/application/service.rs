//! # Shard Manager Service
//!
//! Application service wiring the registry, catalog, router and monitor
//! behind the [`ShardManagerApi`] port.

use async_trait::async_trait;
use futures::future::join_all;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use super::catalog::ShardKeyCatalog;
use super::monitor::HealthMonitor;
use super::registry::ShardRegistry;
use super::router::DataRouter;
use crate::adapters::BackendAdapterFactory;
use crate::config::ShardManagerConfig;
use crate::domain::{
    invariant_replication_factor, invariant_weight, AggregatedQueryResult, ConnectionConfig,
    FanOutReport, InsertResult, QueryResult, Row, ShardDescriptor, ShardError, ShardId,
    ShardMetrics, ShardState, ShardStatistics, ShardingStrategy,
};
use crate::ports::{AdapterFactory, ShardManagerApi};

/// Shard Manager - owns every shard's adapter and routes work to them.
pub struct ShardManager {
    /// Configuration.
    config: ShardManagerConfig,
    /// Builds adapters for new shards.
    factory: Arc<dyn AdapterFactory>,
    /// Shards, adapters and ring.
    registry: Arc<ShardRegistry>,
    /// Table shard keys.
    catalog: Arc<ShardKeyCatalog>,
    router: DataRouter,
    monitor: HealthMonitor,
    /// Tracked only; rows are not replicated.
    replication_factor: AtomicUsize,
}

impl ShardManager {
    /// Create a manager with an injected adapter factory.
    pub fn new(
        config: ShardManagerConfig,
        factory: Arc<dyn AdapterFactory>,
    ) -> Result<Self, ShardError> {
        config.validate()?;

        let registry = Arc::new(ShardRegistry::new());
        let catalog = Arc::new(ShardKeyCatalog::new());
        let router = DataRouter::new(
            Arc::clone(&registry),
            Arc::clone(&catalog),
            config.fanout_timeout(),
        );
        let monitor = HealthMonitor::new(
            Arc::clone(&registry),
            Arc::clone(&catalog),
            config.probe_timeout(),
        );

        info!(
            "[shard-manager] Starting (default weight {}, replication factor {}, fan-out timeout {}ms)",
            config.default_weight, config.replication_factor, config.fanout_timeout_ms
        );

        Ok(Self {
            replication_factor: AtomicUsize::new(config.replication_factor),
            config,
            factory,
            registry,
            catalog,
            router,
            monitor,
        })
    }

    /// Manager with default config and the built-in backends.
    pub fn with_defaults() -> Result<Self, ShardError> {
        Self::new(
            ShardManagerConfig::default(),
            Arc::new(BackendAdapterFactory::with_defaults()),
        )
    }

    /// Configuration.
    pub fn config(&self) -> &ShardManagerConfig {
        &self.config
    }

    /// Add a shard with the configured default weight.
    pub async fn add_shard_default(
        &self,
        id: &str,
        connection: ConnectionConfig,
    ) -> Result<(), ShardError> {
        self.add_shard(id, connection, self.config.default_weight)
            .await
    }

    /// Check registry invariants (unique ids, ring matches active set).
    pub fn verify_invariants(&self) -> Result<(), ShardError> {
        self.registry.verify_invariants()
    }
}

#[async_trait]
impl ShardManagerApi for ShardManager {
    async fn add_shard(
        &self,
        id: &str,
        connection: ConnectionConfig,
        weight: u32,
    ) -> Result<(), ShardError> {
        invariant_weight(id, weight)?;
        if self.registry.contains(id) {
            return Err(ShardError::DuplicateShard(id.to_string()));
        }

        let connection_error = |reason: String| ShardError::Connection {
            shard_id: id.to_string(),
            reason,
        };
        let adapter = self
            .factory
            .create(id, &connection)
            .map_err(|e| connection_error(e.to_string()))?;
        adapter
            .connect()
            .await
            .map_err(|e| connection_error(e.to_string()))?;

        let descriptor = ShardDescriptor::new(id.to_string(), connection, weight);
        if let Err(e) = self.registry.register(descriptor, Arc::clone(&adapter)) {
            // Lost a race with a concurrent add of the same id.
            if let Err(de) = adapter.disconnect().await {
                warn!("[shard-manager] Failed to disconnect shard {}: {}", id, de);
            }
            return Err(e);
        }
        Ok(())
    }

    async fn remove_shard(&self, id: &str) -> Result<(), ShardError> {
        let adapter = self.registry.unregister(id)?;
        if let Err(e) = adapter.disconnect().await {
            warn!("[shard-manager] Failed to disconnect shard {}: {}", id, e);
        }
        Ok(())
    }

    fn deactivate_shard(&self, id: &str) -> Result<(), ShardError> {
        self.registry.set_state(id, ShardState::Inactive)
    }

    fn activate_shard(&self, id: &str) -> Result<(), ShardError> {
        self.registry.set_state(id, ShardState::Active)
    }

    fn get_shard_ids(&self) -> Vec<ShardId> {
        self.registry.shard_ids()
    }

    fn get_active_shard_ids(&self) -> Vec<ShardId> {
        self.registry.active_shard_ids()
    }

    fn get_shard(&self, id: &str) -> Result<ShardDescriptor, ShardError> {
        self.registry.descriptor(id)
    }

    fn describe_shards(&self) -> Vec<ShardDescriptor> {
        self.registry.descriptors()
    }

    fn get_shard_for_key(&self, key: &str) -> Result<ShardId, ShardError> {
        self.registry.shard_for_key(key)
    }

    fn set_shard_key(&self, table: &str, column: &str, strategy: ShardingStrategy) {
        self.catalog.set_shard_key(table, column, strategy);
    }

    async fn distribute_data(&self, table: &str, row: Row) -> Result<InsertResult, ShardError> {
        self.router.distribute_data(table, row).await
    }

    async fn delete_by_key(&self, table: &str, key_value: &Value) -> Result<u64, ShardError> {
        self.router.delete_by_key(table, key_value).await
    }

    async fn query_shard_by_key(
        &self,
        key: &str,
        query: &str,
        params: &[Value],
    ) -> Result<QueryResult, ShardError> {
        self.router.query_shard_by_key(key, query, params).await
    }

    async fn query_all_shards(
        &self,
        query: &str,
        params: &[Value],
    ) -> Result<AggregatedQueryResult, ShardError> {
        self.router.query_all_shards(query, params).await
    }

    async fn query_all_shards_detailed(
        &self,
        query: &str,
        params: &[Value],
    ) -> Result<FanOutReport, ShardError> {
        self.router.query_all_shards_detailed(query, params).await
    }

    async fn get_shard_health(&self) -> HashMap<ShardId, bool> {
        self.monitor.get_shard_health().await
    }

    async fn get_shard_metrics(&self) -> HashMap<ShardId, ShardMetrics> {
        self.monitor.get_shard_metrics().await
    }

    fn get_shard_statistics(&self) -> ShardStatistics {
        self.monitor
            .statistics(self.replication_factor.load(Ordering::SeqCst))
    }

    fn set_replication_factor(&self, factor: usize) -> Result<(), ShardError> {
        invariant_replication_factor(factor)?;
        self.replication_factor.store(factor, Ordering::SeqCst);
        info!("[shard-manager] Replication factor set to {}", factor);
        Ok(())
    }

    async fn shutdown(&self) {
        let adapters = self.registry.drain();
        let count = adapters.len();
        let disconnects = adapters.iter().map(|(shard_id, adapter)| async move {
            if let Err(e) = adapter.disconnect().await {
                warn!("[shard-manager] Failed to disconnect shard {}: {}", shard_id, e);
            }
        });
        join_all(disconnects).await;
        info!("[shard-manager] Shut down, {} shards disconnected", count);
    }
}
