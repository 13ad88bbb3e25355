//! # Domain Entities
//!
//! Core entities owned by the registry and catalog, plus the aggregates
//! returned from fan-out and statistics calls.

use super::errors::{ShardError, ShardId};
use super::value_objects::{ConnectionConfig, Row, ShardState, ShardingStrategy, SkippedShard};
use serde::{Deserialize, Serialize};

/// Registered shard.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShardDescriptor {
    /// Unique shard id.
    pub id: ShardId,
    /// Connection settings the adapter was built from.
    pub connection: ConnectionConfig,
    /// Virtual node count on the ring.
    pub weight: u32,
    /// Current state.
    pub state: ShardState,
    /// Last health probe (unix millis).
    pub last_health_check: Option<u64>,
}

impl ShardDescriptor {
    /// Create a new active descriptor.
    pub fn new(id: ShardId, connection: ConnectionConfig, weight: u32) -> Self {
        Self {
            id,
            connection,
            weight,
            state: ShardState::Active,
            last_health_check: None,
        }
    }

    /// Is the shard on the ring?
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Transition to a new state.
    pub fn transition_to(&mut self, new_state: ShardState) -> Result<(), ShardError> {
        if !self.state.can_transition_to(new_state) {
            return Err(ShardError::InvalidTransition {
                shard_id: self.id.clone(),
                from: self.state.to_string(),
                to: new_state.to_string(),
            });
        }
        self.state = new_state;
        Ok(())
    }
}

/// Partition key rule for one table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardKeyRule {
    /// Table name.
    pub table: String,
    /// Partition key column.
    pub column: String,
    /// Partitioning strategy.
    pub strategy: ShardingStrategy,
}

impl ShardKeyRule {
    /// Create a new rule.
    pub fn new(table: &str, column: &str, strategy: ShardingStrategy) -> Self {
        Self {
            table: table.to_string(),
            column: column.to_string(),
            strategy,
        }
    }
}

/// Merged result of a fan-out query.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregatedQueryResult {
    /// Rows concatenated in shard-registration order.
    pub data: Vec<Row>,
    /// Sum of per-shard row counts.
    pub row_count: u64,
    /// Slowest contributing shard, in milliseconds.
    pub execution_time_ms: u64,
}

/// Fan-out result plus the shards that did not contribute.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct FanOutReport {
    /// Merged data from the shards that answered.
    pub result: AggregatedQueryResult,
    /// Shards that answered.
    pub contributing: Vec<ShardId>,
    /// Shards excluded from the merge.
    pub skipped: Vec<SkippedShard>,
}

impl FanOutReport {
    /// Did every shard answer?
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Registry and catalog summary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardStatistics {
    /// Registered shards.
    pub total_shards: usize,
    /// Shards on the ring.
    pub active_shards: usize,
    /// Registered shards off the ring.
    pub inactive_shards: usize,
    /// Tables with a shard key rule.
    pub tables_with_shard_keys: usize,
    /// Configured replication factor.
    pub replication_factor: usize,
}
