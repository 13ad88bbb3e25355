//! # Shard Manager Configuration
//!
//! Tunables for routing and fan-out, loadable from the environment.

use crate::domain::{
    invariant_replication_factor, ShardError, DEFAULT_FANOUT_TIMEOUT_MS,
    DEFAULT_PROBE_TIMEOUT_MS, DEFAULT_WEIGHT, MAX_WEIGHT, MIN_REPLICATION_FACTOR,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Shard manager configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardManagerConfig {
    /// Weight used when a caller does not pick one.
    pub default_weight: u32,

    /// Initial replication factor.
    pub replication_factor: usize,

    /// Per-shard budget for fan-out queries, in milliseconds.
    pub fanout_timeout_ms: u64,

    /// Per-shard budget for health and metrics probes, in milliseconds.
    pub probe_timeout_ms: u64,
}

impl Default for ShardManagerConfig {
    fn default() -> Self {
        Self {
            default_weight: DEFAULT_WEIGHT,
            replication_factor: MIN_REPLICATION_FACTOR,
            fanout_timeout_ms: DEFAULT_FANOUT_TIMEOUT_MS,
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
        }
    }
}

impl ShardManagerConfig {
    /// Create a config for testing (short timeouts, more virtual nodes).
    pub fn for_testing() -> Self {
        Self {
            default_weight: 16,
            replication_factor: 1,
            fanout_timeout_ms: 200,
            probe_timeout_ms: 200,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SHARD_DEFAULT_WEIGHT`: Virtual nodes per shard (default: 1)
    /// - `SHARD_REPLICATION_FACTOR`: Replication factor (default: 1)
    /// - `SHARD_FANOUT_TIMEOUT_MS`: Fan-out budget per shard (default: 5000)
    /// - `SHARD_PROBE_TIMEOUT_MS`: Probe budget per shard (default: 2000)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_weight: env_or("SHARD_DEFAULT_WEIGHT", defaults.default_weight),
            replication_factor: env_or("SHARD_REPLICATION_FACTOR", defaults.replication_factor),
            fanout_timeout_ms: env_or("SHARD_FANOUT_TIMEOUT_MS", defaults.fanout_timeout_ms),
            probe_timeout_ms: env_or("SHARD_PROBE_TIMEOUT_MS", defaults.probe_timeout_ms),
        }
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<(), ShardError> {
        if self.default_weight == 0 || self.default_weight > MAX_WEIGHT {
            return Err(ShardError::Config(format!(
                "default_weight must be in 1..={}, got {}",
                MAX_WEIGHT, self.default_weight
            )));
        }
        invariant_replication_factor(self.replication_factor)?;
        if self.fanout_timeout_ms == 0 || self.probe_timeout_ms == 0 {
            return Err(ShardError::Config("timeouts must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Fan-out budget as a `Duration`.
    pub fn fanout_timeout(&self) -> Duration {
        Duration::from_millis(self.fanout_timeout_ms)
    }

    /// Probe budget as a `Duration`.
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
