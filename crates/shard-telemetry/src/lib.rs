//! # Shard Telemetry
//!
//! Logging and metrics export for the Shard Manager.
//!
//! ## Components
//!
//! - **Logging**: `tracing` subscriber with env filtering, JSON or pretty output
//! - **Metrics**: Prometheus text rendering of the default registry
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shard_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_logging(&config).expect("Failed to init logging");
//!
//!     // Shard manager logs now reach stdout
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SHARD_SERVICE_NAME` | `shard-manager` | Service name in log lines |
//! | `SHARD_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `SHARD_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `SHARD_JSON_LOGS` | `false` | JSON log format (defaults on in containers) |

#![warn(missing_docs)]

mod config;
mod logging;
mod metrics;

pub use config::TelemetryConfig;
pub use logging::{build_filter, init_logging};
pub use metrics::{content_type, encode_metrics};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// A global subscriber is already installed, or installing failed.
    #[error("Failed to initialize tracing subscriber: {0}")]
    SubscriberInit(String),

    /// Rendering metrics failed.
    #[error("Failed to encode Prometheus metrics: {0}")]
    MetricsEncode(String),

    /// Bad filter directive or other configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Span carrying a `component` field.
///
/// # Example
///
/// ```rust,ignore
/// use shard_telemetry::component_span;
///
/// let _span = component_span!("fan_out", component = "router", shards = 3).entered();
/// ```
#[macro_export]
macro_rules! component_span {
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}
