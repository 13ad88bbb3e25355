//! Shared fixtures for integration flows.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Once};

use shard_manager::{
    AdapterError, ConnectionConfig, DatabaseAdapter, InMemoryDatabaseAdapter, InsertResult,
    PreparedAdapterFactory, QueryResult, Row, ShardManager, ShardManagerApi, ShardManagerConfig,
    ShardMetrics,
};
use shard_telemetry::{init_logging, TelemetryConfig};

static LOGGING: Once = Once::new();

/// Install the test subscriber once per binary.
pub fn init_test_logging() {
    LOGGING.call_once(|| {
        let _ = init_logging(&TelemetryConfig::for_testing());
    });
}

/// Build a JSON object row.
pub fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        other => panic!("row fixture must be an object, got {}", other),
    }
}

/// In-memory adapter that also records every insert it receives.
pub struct RecordingAdapter {
    inner: InMemoryDatabaseAdapter,
    inserts: Mutex<Vec<(String, Row)>>,
}

impl RecordingAdapter {
    pub fn new(shard_id: &str) -> Self {
        Self {
            inner: InMemoryDatabaseAdapter::new(shard_id),
            inserts: Mutex::new(Vec::new()),
        }
    }

    pub fn inner(&self) -> &InMemoryDatabaseAdapter {
        &self.inner
    }

    pub fn inserts(&self) -> Vec<(String, Row)> {
        self.inserts.lock().clone()
    }
}

#[async_trait]
impl DatabaseAdapter for RecordingAdapter {
    async fn connect(&self) -> Result<(), AdapterError> {
        self.inner.connect().await
    }

    async fn disconnect(&self) -> Result<(), AdapterError> {
        self.inner.disconnect().await
    }

    fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }

    async fn health_check(&self) -> Result<bool, AdapterError> {
        self.inner.health_check().await
    }

    async fn get_metrics(&self) -> Result<ShardMetrics, AdapterError> {
        self.inner.get_metrics().await
    }

    async fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult, AdapterError> {
        self.inner.query(sql, params).await
    }

    async fn insert(&self, table: &str, row: &Row) -> Result<InsertResult, AdapterError> {
        self.inserts.lock().push((table.to_string(), row.clone()));
        self.inner.insert(table, row).await
    }

    async fn delete(&self, table: &str, column: &str, value: &Value) -> Result<u64, AdapterError> {
        self.inner.delete(table, column, value).await
    }
}

/// A manager with one recording adapter per id, all added with `weight`.
pub async fn recording_cluster(
    ids: &[&str],
    weight: u32,
) -> (ShardManager, HashMap<String, Arc<RecordingAdapter>>) {
    init_test_logging();

    let factory = PreparedAdapterFactory::new();
    let mut adapters = HashMap::new();
    for id in ids {
        let adapter = Arc::new(RecordingAdapter::new(id));
        factory.insert(id, adapter.clone());
        adapters.insert(id.to_string(), adapter);
    }

    let manager = ShardManager::new(ShardManagerConfig::for_testing(), Arc::new(factory))
        .expect("testing config is valid");
    for id in ids {
        manager
            .add_shard(id, ConnectionConfig::in_memory(id), weight)
            .await
            .expect("add shard");
    }
    (manager, adapters)
}

/// A manager over the built-in in-memory backend.
pub async fn memory_cluster(ids: &[&str], weight: u32) -> ShardManager {
    init_test_logging();

    let manager = ShardManager::with_defaults().expect("default config is valid");
    for id in ids {
        manager
            .add_shard(id, ConnectionConfig::in_memory(id), weight)
            .await
            .expect("add shard");
    }
    manager
}
