//! Prometheus text exposition.
//!
//! Shard manager metrics register with the prometheus default registry
//! (feature `metrics`); this module renders whatever is registered there.

use prometheus::{Encoder, TextEncoder};

use crate::TelemetryError;

/// Encode every metric in the default registry as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsEncode(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsEncode(e.to_string()))
}

/// Content type for a `/metrics` response body.
pub fn content_type() -> String {
    TextEncoder::new().format_type().to_string()
}
