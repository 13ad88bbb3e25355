//! # Inbound Ports
//!
//! API trait defining what the Shard Manager can do.

use crate::domain::{
    AggregatedQueryResult, ConnectionConfig, FanOutReport, InsertResult, QueryResult, Row,
    ShardDescriptor, ShardError, ShardId, ShardMetrics, ShardStatistics, ShardingStrategy,
};
use async_trait::async_trait;
use std::collections::HashMap;

/// Shard Manager API - inbound port.
#[async_trait]
pub trait ShardManagerApi: Send + Sync {
    /// Build, connect and register a shard.
    async fn add_shard(
        &self,
        id: &str,
        connection: ConnectionConfig,
        weight: u32,
    ) -> Result<(), ShardError>;

    /// Disconnect and unregister a shard.
    async fn remove_shard(&self, id: &str) -> Result<(), ShardError>;

    /// Take a shard off the ring without unregistering it.
    fn deactivate_shard(&self, id: &str) -> Result<(), ShardError>;

    /// Put a deactivated shard back on the ring.
    fn activate_shard(&self, id: &str) -> Result<(), ShardError>;

    /// Registered shard ids in registration order.
    fn get_shard_ids(&self) -> Vec<ShardId>;

    /// Active shard ids in registration order.
    fn get_active_shard_ids(&self) -> Vec<ShardId>;

    /// Descriptor for one shard.
    fn get_shard(&self, id: &str) -> Result<ShardDescriptor, ShardError>;

    /// All descriptors in registration order.
    fn describe_shards(&self) -> Vec<ShardDescriptor>;

    /// Shard owning `key` on the current ring.
    fn get_shard_for_key(&self, key: &str) -> Result<ShardId, ShardError>;

    /// Set (or overwrite) a table's shard key rule.
    fn set_shard_key(&self, table: &str, column: &str, strategy: ShardingStrategy);

    /// Route a row to its shard and insert it.
    async fn distribute_data(&self, table: &str, row: Row) -> Result<InsertResult, ShardError>;

    /// Delete the rows whose shard key equals `key_value`.
    async fn delete_by_key(
        &self,
        table: &str,
        key_value: &serde_json::Value,
    ) -> Result<u64, ShardError>;

    /// Run a query on the shard owning `key`.
    async fn query_shard_by_key(
        &self,
        key: &str,
        query: &str,
        params: &[serde_json::Value],
    ) -> Result<QueryResult, ShardError>;

    /// Scatter a query to every active shard and merge the answers.
    async fn query_all_shards(
        &self,
        query: &str,
        params: &[serde_json::Value],
    ) -> Result<AggregatedQueryResult, ShardError>;

    /// Like `query_all_shards`, also reporting which shards were skipped.
    async fn query_all_shards_detailed(
        &self,
        query: &str,
        params: &[serde_json::Value],
    ) -> Result<FanOutReport, ShardError>;

    /// Probe every active shard.
    async fn get_shard_health(&self) -> HashMap<ShardId, bool>;

    /// Collect metrics from every active shard that answers.
    async fn get_shard_metrics(&self) -> HashMap<ShardId, ShardMetrics>;

    /// Registry and catalog summary.
    fn get_shard_statistics(&self) -> ShardStatistics;

    /// Set the replication factor (must be >= 1).
    fn set_replication_factor(&self, factor: usize) -> Result<(), ShardError>;

    /// Disconnect every shard and clear the registry.
    async fn shutdown(&self);
}
