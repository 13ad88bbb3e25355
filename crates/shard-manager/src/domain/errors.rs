//! # Domain Errors
//!
//! Error types for the Shard Manager.

use crate::ports::outbound::AdapterError;
use thiserror::Error;

/// Shard identifier (unique, caller-chosen).
pub type ShardId = String;

/// Shard manager error types.
#[derive(Debug, Error)]
pub enum ShardError {
    /// Adapter could not connect while adding a shard.
    #[error("Connection to shard {shard_id} failed: {reason}")]
    Connection {
        /// Shard being added
        shard_id: ShardId,
        /// Underlying failure
        reason: String,
    },

    /// Shard id already registered.
    #[error("Shard already exists: {0}")]
    DuplicateShard(ShardId),

    /// Unknown shard id.
    #[error("Shard not found: {0}")]
    ShardNotFound(ShardId),

    /// The ring has no active shards.
    #[error("No shards available")]
    NoShardsAvailable,

    /// Table has no shard key rule.
    #[error("No shard key configured for table: {0}")]
    NoShardKeyConfigured(String),

    /// Row lacks the table's shard key column.
    #[error("Row for table {table} is missing shard key column {column}")]
    MissingShardKey {
        /// Target table
        table: String,
        /// Expected key column
        column: String,
    },

    /// Replication factor must be at least 1.
    #[error("Invalid replication factor: {0} (must be >= 1)")]
    InvalidReplicationFactor(usize),

    /// Weight (virtual node count) must be at least 1.
    #[error("Invalid weight for shard {shard_id}: {weight} (must be >= 1)")]
    InvalidWeight {
        /// Shard being added
        shard_id: ShardId,
        /// Rejected weight
        weight: u32,
    },

    /// Strategy has no routing implementation.
    #[error("Unsupported sharding strategy: {0}")]
    UnsupportedStrategy(String),

    /// Invalid shard state transition.
    #[error("Invalid state transition for shard {shard_id}: {from} -> {to}")]
    InvalidTransition {
        /// Shard being changed
        shard_id: ShardId,
        /// Current state
        from: String,
        /// Attempted state
        to: String,
    },

    /// Per-shard call exceeded its budget.
    #[error("Shard {shard_id} timed out after {timeout_ms}ms")]
    Timeout {
        /// Slow shard
        shard_id: ShardId,
        /// Budget in milliseconds
        timeout_ms: u64,
    },

    /// Error returned by a shard's database adapter.
    #[error("Adapter error: {0}")]
    Adapter(#[from] AdapterError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ShardError {
    /// Short label used for log fields and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connection { .. } => "connection",
            Self::DuplicateShard(_) => "duplicate_shard",
            Self::ShardNotFound(_) => "shard_not_found",
            Self::NoShardsAvailable => "no_shards",
            Self::NoShardKeyConfigured(_) => "no_shard_key",
            Self::MissingShardKey { .. } => "missing_shard_key",
            Self::InvalidReplicationFactor(_) => "invalid_replication_factor",
            Self::InvalidWeight { .. } => "invalid_weight",
            Self::UnsupportedStrategy(_) => "unsupported_strategy",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::Timeout { .. } => "timeout",
            Self::Adapter(_) => "adapter",
            Self::Config(_) => "config",
        }
    }
}
