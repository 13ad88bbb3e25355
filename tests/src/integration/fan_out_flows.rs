//! # Fan-out Flows
//!
//! Scatter-gather queries and probes across every active shard:
//!
//! 1. **Merge**: rows concatenate in registration order, counts sum, time is the max
//! 2. **Partial tolerance**: failing or slow shards are skipped, not fatal
//! 3. **Health and metrics**: probes report per shard and never change state

#[cfg(test)]
mod tests {
    use serde_json::json;
    use std::time::{Duration, Instant};

    use shard_manager::{
        DatabaseAdapter, ShardError, ShardManagerApi, ShardState, ShardingStrategy,
    };

    use crate::integration::fixtures::{recording_cluster, row};

    const SELECT_USERS: &str = "SELECT * FROM users";

    // =========================================================================
    // QUERY FAN-OUT
    // =========================================================================

    #[tokio::test]
    async fn test_fan_out_merges_all_shards() {
        let (manager, _) = recording_cluster(&["s1", "s2", "s3"], 16).await;
        manager.set_shard_key("users", "user_id", ShardingStrategy::Hash);

        for i in 0..30 {
            manager
                .distribute_data("users", row(json!({"user_id": format!("u{}", i)})))
                .await
                .unwrap();
        }

        let result = manager.query_all_shards(SELECT_USERS, &[]).await.unwrap();
        assert_eq!(result.row_count, 30);
        assert_eq!(result.data.len(), 30);
    }

    #[tokio::test]
    async fn test_fan_out_rows_follow_registration_order() {
        let (manager, adapters) = recording_cluster(&["s2", "s1"], 1).await;
        adapters["s2"]
            .inner()
            .insert("users", &row(json!({"from": "s2"})))
            .await
            .unwrap();
        adapters["s1"]
            .inner()
            .insert("users", &row(json!({"from": "s1"})))
            .await
            .unwrap();

        let report = manager
            .query_all_shards_detailed(SELECT_USERS, &[])
            .await
            .unwrap();
        assert_eq!(report.contributing, vec!["s2", "s1"]);
        let origins: Vec<_> = report.result.data.iter().map(|r| r["from"].clone()).collect();
        assert_eq!(origins, vec![json!("s2"), json!("s1")]);
    }

    #[tokio::test]
    async fn test_fan_out_execution_time_is_max() {
        let (manager, adapters) = recording_cluster(&["A", "B"], 1).await;
        adapters["A"].inner().set_execution_time(Some(10));
        adapters["B"].inner().set_execution_time(Some(15));

        let result = manager.query_all_shards(SELECT_USERS, &[]).await.unwrap();
        assert_eq!(result.execution_time_ms, 15);
    }

    #[tokio::test]
    async fn test_fan_out_skips_failing_shard() {
        let (manager, adapters) = recording_cluster(&["s1", "s2", "s3"], 1).await;
        adapters["s2"].inner().fail_queries(true);

        let report = manager
            .query_all_shards_detailed(SELECT_USERS, &[])
            .await
            .unwrap();
        assert_eq!(report.contributing, vec!["s1", "s3"]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].shard_id, "s2");
    }

    #[tokio::test]
    async fn test_fan_out_fails_when_every_shard_fails() {
        let (manager, adapters) = recording_cluster(&["s1", "s2"], 1).await;
        for adapter in adapters.values() {
            adapter.inner().fail_queries(true);
        }

        let err = manager
            .query_all_shards(SELECT_USERS, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, ShardError::Adapter(_)));
    }

    #[tokio::test]
    async fn test_fan_out_times_out_slow_shard() {
        // Testing config bounds each shard at 200ms.
        let (manager, adapters) = recording_cluster(&["fast", "slow"], 1).await;
        adapters["slow"]
            .inner()
            .set_latency(Some(Duration::from_secs(5)));

        let started = Instant::now();
        let report = manager
            .query_all_shards_detailed(SELECT_USERS, &[])
            .await
            .unwrap();

        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(report.contributing, vec!["fast"]);
        assert_eq!(report.skipped[0].shard_id, "slow");
    }

    #[tokio::test]
    async fn test_fan_out_runs_concurrently() {
        let (manager, adapters) = recording_cluster(&["s1", "s2", "s3", "s4"], 1).await;
        for adapter in adapters.values() {
            adapter
                .inner()
                .set_latency(Some(Duration::from_millis(100)));
        }

        let started = Instant::now();
        manager.query_all_shards(SELECT_USERS, &[]).await.unwrap();
        // Sequential calls would take at least 400ms.
        assert!(started.elapsed() < Duration::from_millis(190));
    }

    #[tokio::test]
    async fn test_fan_out_excludes_inactive_shard() {
        let (manager, adapters) = recording_cluster(&["s1", "s2"], 1).await;
        manager.deactivate_shard("s1").unwrap();

        let report = manager
            .query_all_shards_detailed(SELECT_USERS, &[])
            .await
            .unwrap();
        assert_eq!(report.contributing, vec!["s2"]);
        assert!(report.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_fan_out_without_active_shards() {
        let (manager, _) = recording_cluster(&["s1"], 1).await;
        manager.deactivate_shard("s1").unwrap();

        assert!(matches!(
            manager.query_all_shards(SELECT_USERS, &[]).await,
            Err(ShardError::NoShardsAvailable)
        ));
    }

    // =========================================================================
    // HEALTH AND METRICS
    // =========================================================================

    #[tokio::test]
    async fn test_health_aggregation() {
        let (manager, adapters) = recording_cluster(&["A", "B"], 1).await;
        adapters["B"].inner().fail_health(true);

        let health = manager.get_shard_health().await;
        assert_eq!(health.len(), 2);
        assert!(health["A"]);
        assert!(!health["B"]);

        // An unhealthy shard stays registered and active.
        let b = manager.get_shard("B").unwrap();
        assert_eq!(b.state, ShardState::Active);
        assert!(b.last_health_check.is_some());
        assert_eq!(manager.get_active_shard_ids(), vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_metrics_reflect_queries() {
        let (manager, adapters) = recording_cluster(&["A", "B"], 1).await;
        manager.query_all_shards(SELECT_USERS, &[]).await.unwrap();
        manager.query_all_shards(SELECT_USERS, &[]).await.unwrap();
        adapters["B"].inner().fail_health(true);

        let metrics = manager.get_shard_metrics().await;
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics["A"].query_count, 2);
        assert_eq!(metrics["A"].error_count, 0);
    }
}
