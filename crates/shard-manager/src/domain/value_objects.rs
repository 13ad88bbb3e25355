//! # Domain Value Objects
//!
//! Immutable value types shared between the registry, router and adapters.

use super::errors::{ShardError, ShardId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single row: column name -> JSON value.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Externally visible shard state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ShardState {
    /// Serving traffic; present on the ring.
    #[default]
    Active,
    /// Registered but administratively taken off the ring.
    Inactive,
}

impl ShardState {
    /// Check if transition to next state is valid.
    pub fn can_transition_to(&self, next: ShardState) -> bool {
        matches!(
            (self, next),
            (Self::Active, Self::Inactive) | (Self::Inactive, Self::Active)
        )
    }

    /// Is the shard on the ring?
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for ShardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Inactive => write!(f, "Inactive"),
        }
    }
}

/// Partitioning strategy for a table's shard key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ShardingStrategy {
    /// Consistent-hash routing.
    #[default]
    Hash,
    /// Key-range routing. Accepted by the catalog but not routable.
    Range,
}

impl fmt::Display for ShardingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hash => write!(f, "hash"),
            Self::Range => write!(f, "range"),
        }
    }
}

impl FromStr for ShardingStrategy {
    type Err = ShardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hash" => Ok(Self::Hash),
            "range" => Ok(Self::Range),
            other => Err(ShardError::Config(format!(
                "unknown sharding strategy: {}",
                other
            ))),
        }
    }
}

/// Database family behind a shard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendType {
    /// PostgreSQL.
    Postgres,
    /// MySQL / MariaDB.
    MySql,
    /// MongoDB.
    MongoDb,
    /// Process-local store.
    #[default]
    InMemory,
}

impl fmt::Display for BackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Postgres => write!(f, "postgres"),
            Self::MySql => write!(f, "mysql"),
            Self::MongoDb => write!(f, "mongodb"),
            Self::InMemory => write!(f, "inmemory"),
        }
    }
}

impl FromStr for BackendType {
    type Err = ShardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "mysql" | "mariadb" => Ok(Self::MySql),
            "mongodb" | "mongo" => Ok(Self::MongoDb),
            "inmemory" | "memory" => Ok(Self::InMemory),
            other => Err(ShardError::Config(format!("unknown backend type: {}", other))),
        }
    }
}

/// Connection settings handed to the adapter factory.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ConnectionConfig {
    /// Host name or address.
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// Database name.
    pub database: String,
    /// Login user.
    pub username: String,
    /// Login password.
    pub password: String,
    /// Database family.
    pub backend_type: BackendType,
}

impl ConnectionConfig {
    /// In-memory connection, used by tests and local setups.
    pub fn in_memory(database: &str) -> Self {
        Self {
            host: "localhost".to_string(),
            port: 0,
            database: database.to_string(),
            username: String::new(),
            password: String::new(),
            backend_type: BackendType::InMemory,
        }
    }
}

// Password is never printed.
impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"***")
            .field("backend_type", &self.backend_type)
            .finish()
    }
}

/// Result of a single-shard query.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryResult {
    /// Returned rows.
    pub data: Vec<Row>,
    /// Number of rows reported by the backend.
    pub row_count: u64,
    /// Backend execution time in milliseconds.
    pub execution_time_ms: u64,
}

impl QueryResult {
    /// Build a result whose row count matches `data`.
    pub fn from_rows(data: Vec<Row>, execution_time_ms: u64) -> Self {
        let row_count = data.len() as u64;
        Self {
            data,
            row_count,
            execution_time_ms,
        }
    }
}

/// Result of an adapter insert.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InsertResult {
    /// Shard that stored the row.
    pub shard_id: ShardId,
    /// Rows written.
    pub rows_affected: u64,
}

/// Performance counters reported by an adapter.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct ShardMetrics {
    /// Connections currently in use.
    pub active_connections: u32,
    /// Pool size.
    pub total_connections: u32,
    /// Queries served.
    pub query_count: u64,
    /// Mean query time in milliseconds.
    pub average_query_time_ms: f64,
    /// Failed operations.
    pub error_count: u64,
}

/// A shard left out of a fan-out aggregate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedShard {
    /// Excluded shard.
    pub shard_id: ShardId,
    /// Rendered error.
    pub reason: String,
}
