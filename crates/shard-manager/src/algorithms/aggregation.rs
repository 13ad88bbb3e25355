//! # Fan-out Aggregation
//!
//! Merge per-shard query outcomes into a single result.
//!
//! - Rows are concatenated in the order outcomes are given (shard-registration order).
//! - Row count is the sum over contributing shards.
//! - Execution time is the maximum over contributing shards: the critical path of
//!   the scatter, not its cumulative cost.
//! - Failed shards are excluded and reported; if none succeeded, the last error wins.

use crate::domain::{
    AggregatedQueryResult, FanOutReport, QueryResult, ShardError, ShardId, SkippedShard,
};

/// Outcome of one shard's part of a fan-out.
pub type ShardOutcome = (ShardId, Result<QueryResult, ShardError>);

/// Merge fan-out outcomes.
pub fn merge_outcomes(outcomes: Vec<ShardOutcome>) -> Result<FanOutReport, ShardError> {
    if outcomes.is_empty() {
        return Err(ShardError::NoShardsAvailable);
    }

    let mut report = FanOutReport::default();
    let mut last_error = None;

    for (shard_id, outcome) in outcomes {
        match outcome {
            Ok(result) => {
                report.result.row_count += result.row_count;
                report.result.execution_time_ms = report
                    .result
                    .execution_time_ms
                    .max(result.execution_time_ms);
                report.result.data.extend(result.data);
                report.contributing.push(shard_id);
            }
            Err(e) => {
                report.skipped.push(SkippedShard {
                    shard_id,
                    reason: e.to_string(),
                });
                last_error = Some(e);
            }
        }
    }

    if report.contributing.is_empty() {
        return Err(last_error.unwrap_or(ShardError::NoShardsAvailable));
    }

    Ok(report)
}

/// Merge and drop the skipped-shard detail.
pub fn merge_results(outcomes: Vec<ShardOutcome>) -> Result<AggregatedQueryResult, ShardError> {
    merge_outcomes(outcomes).map(|report| report.result)
}
