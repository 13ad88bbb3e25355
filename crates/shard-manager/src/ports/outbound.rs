//! # Outbound Ports
//!
//! Traits for the database back-ends behind each shard.
//!
//! The Shard Manager never speaks a wire protocol itself. Every shard is reached
//! through a [`DatabaseAdapter`] built by an injected [`AdapterFactory`].

use crate::domain::{ConnectionConfig, InsertResult, QueryResult, Row, ShardMetrics};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by a database adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    /// Operation attempted before `connect` or after `disconnect`.
    #[error("Adapter not connected")]
    NotConnected,

    /// Connection attempt failed.
    #[error("Connect failed: {0}")]
    ConnectFailed(String),

    /// Query was rejected or failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Operation or backend not supported.
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// Any other backend failure.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Database adapter - outbound port.
///
/// One instance per shard. Implementations must be safe to call concurrently.
#[async_trait]
pub trait DatabaseAdapter: Send + Sync {
    /// Open the connection.
    async fn connect(&self) -> Result<(), AdapterError>;

    /// Close the connection.
    async fn disconnect(&self) -> Result<(), AdapterError>;

    /// Is the connection open?
    fn is_connected(&self) -> bool;

    /// Liveness probe.
    async fn health_check(&self) -> Result<bool, AdapterError>;

    /// Performance counters.
    async fn get_metrics(&self) -> Result<ShardMetrics, AdapterError>;

    /// Run a query with positional params.
    async fn query(
        &self,
        sql: &str,
        params: &[serde_json::Value],
    ) -> Result<QueryResult, AdapterError>;

    /// Insert one row.
    async fn insert(&self, table: &str, row: &Row) -> Result<InsertResult, AdapterError>;

    /// Delete rows where `column == value`. Returns rows deleted.
    async fn delete(
        &self,
        table: &str,
        column: &str,
        value: &serde_json::Value,
    ) -> Result<u64, AdapterError>;
}

/// Adapter factory - outbound port.
///
/// Builds an unconnected adapter for a shard from its connection settings.
pub trait AdapterFactory: Send + Sync {
    /// Build an adapter for `shard_id`.
    fn create(
        &self,
        shard_id: &str,
        config: &ConnectionConfig,
    ) -> Result<Arc<dyn DatabaseAdapter>, AdapterError>;
}
