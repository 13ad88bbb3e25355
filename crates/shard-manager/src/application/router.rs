//! # Data Router
//!
//! Point routing of writes and keyed reads, and scatter-gather over every
//! active shard.
//!
//! Fan-out calls are issued concurrently with `join_all`, each bounded by the
//! fan-out timeout. Outcomes come back in registration order so merging is
//! deterministic.

use super::catalog::ShardKeyCatalog;
use super::registry::ShardRegistry;
use crate::algorithms::{merge_outcomes, ShardOutcome};
use crate::domain::{
    AggregatedQueryResult, FanOutReport, InsertResult, QueryResult, Row, ShardError,
    ShardKeyRule, ShardingStrategy,
};
use crate::metrics;
use futures::future::join_all;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Routes rows and queries to shards.
pub struct DataRouter {
    registry: Arc<ShardRegistry>,
    catalog: Arc<ShardKeyCatalog>,
    fanout_timeout: Duration,
}

impl DataRouter {
    /// Create a router over a registry and catalog.
    pub fn new(
        registry: Arc<ShardRegistry>,
        catalog: Arc<ShardKeyCatalog>,
        fanout_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            catalog,
            fanout_timeout,
        }
    }

    /// Insert `row` into the shard owning its key.
    pub async fn distribute_data(&self, table: &str, row: Row) -> Result<InsertResult, ShardError> {
        let rule = self.hash_rule(table)?;
        let key = row
            .get(&rule.column)
            .and_then(routing_key)
            .ok_or_else(|| ShardError::MissingShardKey {
                table: table.to_string(),
                column: rule.column.clone(),
            })?;

        let (shard_id, adapter) = self.registry.route(&key)?;
        debug!(
            "[shard-manager] Routing insert into {} ({}={}) to shard {}",
            table, rule.column, key, shard_id
        );
        let result = adapter.insert(table, &row).await?;
        metrics::record_routed_write(&shard_id);
        Ok(result)
    }

    /// Delete the rows of `table` whose shard key equals `key_value`.
    pub async fn delete_by_key(&self, table: &str, key_value: &Value) -> Result<u64, ShardError> {
        let rule = self.hash_rule(table)?;
        let key = routing_key(key_value).ok_or_else(|| ShardError::MissingShardKey {
            table: table.to_string(),
            column: rule.column.clone(),
        })?;

        let (shard_id, adapter) = self.registry.route(&key)?;
        debug!(
            "[shard-manager] Routing delete from {} ({}={}) to shard {}",
            table, rule.column, key, shard_id
        );
        Ok(adapter.delete(table, &rule.column, key_value).await?)
    }

    /// Run `query` on the shard owning `key`.
    pub async fn query_shard_by_key(
        &self,
        key: &str,
        query: &str,
        params: &[Value],
    ) -> Result<QueryResult, ShardError> {
        let (shard_id, adapter) = self.registry.route(key)?;
        debug!("[shard-manager] Query for key {} on shard {}", key, shard_id);
        Ok(adapter.query(query, params).await?)
    }

    /// Run `query` on every active shard and merge what succeeds.
    pub async fn query_all_shards(
        &self,
        query: &str,
        params: &[Value],
    ) -> Result<AggregatedQueryResult, ShardError> {
        self.query_all_shards_detailed(query, params)
            .await
            .map(|report| report.result)
    }

    /// Like [`query_all_shards`](Self::query_all_shards), also reporting
    /// which shards were skipped and why.
    pub async fn query_all_shards_detailed(
        &self,
        query: &str,
        params: &[Value],
    ) -> Result<FanOutReport, ShardError> {
        let targets = self.registry.active_adapters();
        if targets.is_empty() {
            return Err(ShardError::NoShardsAvailable);
        }
        metrics::record_fanout_query();

        let timeout = self.fanout_timeout;
        let timeout_ms = timeout.as_millis() as u64;
        let calls = targets.iter().map(|(shard_id, adapter)| async move {
            let outcome = match tokio::time::timeout(timeout, adapter.query(query, params)).await {
                Ok(Ok(result)) => Ok(result),
                Ok(Err(e)) => Err(ShardError::Adapter(e)),
                Err(_) => Err(ShardError::Timeout {
                    shard_id: shard_id.clone(),
                    timeout_ms,
                }),
            };
            if let Err(e) = &outcome {
                warn!(
                    "[shard-manager] Excluding shard {} from fan-out: {}",
                    shard_id, e
                );
                metrics::record_fanout_excluded(e.kind());
            }
            (shard_id.clone(), outcome)
        });

        let outcomes: Vec<ShardOutcome> = join_all(calls).await;
        merge_outcomes(outcomes)
    }

    fn hash_rule(&self, table: &str) -> Result<ShardKeyRule, ShardError> {
        let rule = self.catalog.resolve(table)?;
        match rule.strategy {
            ShardingStrategy::Hash => Ok(rule),
            other => Err(ShardError::UnsupportedStrategy(other.to_string())),
        }
    }
}

/// Text the ring hashes for a key value.
///
/// Strings are used as-is; other scalars use their JSON text. `null` has no key.
pub fn routing_key(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
