//! # Shard Key Catalog
//!
//! Table name → partition key rule.

use crate::domain::{ShardError, ShardKeyRule, ShardingStrategy};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::info;

/// Per-table shard key rules.
#[derive(Default)]
pub struct ShardKeyCatalog {
    rules: RwLock<HashMap<String, ShardKeyRule>>,
}

impl ShardKeyCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rule for `table`, returning the rule it replaced.
    pub fn set_shard_key(
        &self,
        table: &str,
        column: &str,
        strategy: ShardingStrategy,
    ) -> Option<ShardKeyRule> {
        let rule = ShardKeyRule::new(table, column, strategy);
        info!(
            "[shard-manager] Shard key for {} set to {} ({})",
            table, column, strategy
        );
        self.rules.write().insert(table.to_string(), rule)
    }

    /// Rule for `table`.
    pub fn resolve(&self, table: &str) -> Result<ShardKeyRule, ShardError> {
        self.rules
            .read()
            .get(table)
            .cloned()
            .ok_or_else(|| ShardError::NoShardKeyConfigured(table.to_string()))
    }

    /// Number of tables with a rule.
    pub fn len(&self) -> usize {
        self.rules.read().len()
    }

    /// True if no table has a rule.
    pub fn is_empty(&self) -> bool {
        self.rules.read().is_empty()
    }
}
