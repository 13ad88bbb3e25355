//! # Routing Flows
//!
//! Key-to-shard assignment through the public API:
//!
//! 1. **Determinism**: repeated lookups agree while the active set is unchanged
//! 2. **Distribution**: a handful of keys spreads over more than one shard
//! 3. **Bounded reshuffle**: adding a shard only moves keys onto that shard
//! 4. **Write routing**: `distribute_data` calls exactly the owning adapter

#[cfg(test)]
mod tests {
    use serde_json::json;
    use std::collections::{HashMap, HashSet};

    use shard_manager::{
        invariant_deterministic_assignment, ConnectionConfig, ShardError, ShardManagerApi,
        ShardingStrategy,
    };

    use crate::integration::fixtures::{memory_cluster, recording_cluster, row};

    fn user_key(i: usize) -> String {
        format!("user-{}", i)
    }

    // =========================================================================
    // ASSIGNMENT
    // =========================================================================

    #[tokio::test]
    async fn test_assignment_is_deterministic() {
        let manager = memory_cluster(&["s1", "s2", "s3"], 16).await;

        for i in 0..200 {
            let key = user_key(i);
            assert!(invariant_deterministic_assignment(
                |k| manager.get_shard_for_key(k).ok(),
                &key
            ));
        }
    }

    #[tokio::test]
    async fn test_same_membership_same_assignment() {
        // Two managers built independently agree on every key.
        let a = memory_cluster(&["s1", "s2", "s3"], 16).await;
        let b = memory_cluster(&["s3", "s1", "s2"], 16).await;

        for i in 0..200 {
            let key = user_key(i);
            assert_eq!(
                a.get_shard_for_key(&key).unwrap(),
                b.get_shard_for_key(&key).unwrap()
            );
        }
    }

    #[tokio::test]
    async fn test_keys_spread_over_shards() {
        for weight in [1, 16] {
            let manager = memory_cluster(&["s1", "s2", "s3"], weight).await;
            let used: HashSet<String> = (0..6)
                .map(|i| manager.get_shard_for_key(&user_key(i)).unwrap())
                .collect();
            assert!(used.len() > 1, "weight {} used only {:?}", weight, used);
        }
    }

    #[tokio::test]
    async fn test_adding_shard_moves_keys_only_to_new_shard() {
        let manager = memory_cluster(&["s1", "s2", "s3"], 16).await;
        let before: HashMap<String, String> = (0..600)
            .map(|i| {
                let key = user_key(i);
                let shard = manager.get_shard_for_key(&key).unwrap();
                (key, shard)
            })
            .collect();

        manager
            .add_shard("s4", ConnectionConfig::in_memory("s4"), 16)
            .await
            .unwrap();

        let mut moved = 0;
        for (key, old) in &before {
            let new = manager.get_shard_for_key(key).unwrap();
            if &new != old {
                assert_eq!(new, "s4", "key {} moved between existing shards", key);
                moved += 1;
            }
        }
        // Expect roughly a quarter; allow generous slack around 1/N.
        assert!(moved > 0);
        assert!(moved < 240, "{} of 600 keys moved", moved);
    }

    #[tokio::test]
    async fn test_removing_shard_restores_assignment() {
        let manager = memory_cluster(&["s1", "s2", "s3"], 16).await;
        let before: Vec<String> = (0..300)
            .map(|i| manager.get_shard_for_key(&user_key(i)).unwrap())
            .collect();

        manager
            .add_shard("s4", ConnectionConfig::in_memory("s4"), 16)
            .await
            .unwrap();
        manager.remove_shard("s4").await.unwrap();

        let after: Vec<String> = (0..300)
            .map(|i| manager.get_shard_for_key(&user_key(i)).unwrap())
            .collect();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_empty_manager_has_no_route() {
        let manager = memory_cluster(&[], 1).await;
        assert!(matches!(
            manager.get_shard_for_key("u1"),
            Err(ShardError::NoShardsAvailable)
        ));
    }

    // =========================================================================
    // WRITE ROUTING
    // =========================================================================

    #[tokio::test]
    async fn test_distribute_invokes_owning_adapter_only() {
        let (manager, adapters) = recording_cluster(&["s1", "s2"], 1).await;
        manager.set_shard_key("users", "user_id", ShardingStrategy::Hash);

        let expected = manager.get_shard_for_key("u42").unwrap();
        let record = row(json!({"user_id": "u42", "name": "Ann"}));
        let result = manager
            .distribute_data("users", record.clone())
            .await
            .unwrap();

        assert_eq!(result.shard_id, expected);
        assert_eq!(result.rows_affected, 1);
        for (id, adapter) in &adapters {
            let inserts = adapter.inserts();
            if *id == expected {
                assert_eq!(inserts, vec![("users".to_string(), record.clone())]);
            } else {
                assert!(inserts.is_empty(), "shard {} should not see the insert", id);
            }
        }
    }

    #[tokio::test]
    async fn test_numeric_keys_route_by_json_text() {
        let (manager, adapters) = recording_cluster(&["s1", "s2", "s3"], 16).await;
        manager.set_shard_key("orders", "order_id", ShardingStrategy::Hash);

        let result = manager
            .distribute_data("orders", row(json!({"order_id": 1001, "total": 9.5})))
            .await
            .unwrap();
        assert_eq!(result.shard_id, manager.get_shard_for_key("1001").unwrap());
        assert_eq!(adapters[&result.shard_id].inserts().len(), 1);
    }

    #[tokio::test]
    async fn test_distribute_error_contracts() {
        let manager = memory_cluster(&["s1"], 1).await;

        let err = manager
            .distribute_data("users", row(json!({"user_id": "u1"})))
            .await
            .unwrap_err();
        assert!(matches!(err, ShardError::NoShardKeyConfigured(t) if t == "users"));

        manager.set_shard_key("users", "user_id", ShardingStrategy::Hash);
        let err = manager
            .distribute_data("users", row(json!({"name": "Ann"})))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ShardError::MissingShardKey { ref column, .. } if column == "user_id"
        ));

        manager.set_shard_key("events", "ts", ShardingStrategy::Range);
        let err = manager
            .distribute_data("events", row(json!({"ts": 17})))
            .await
            .unwrap_err();
        assert!(matches!(err, ShardError::UnsupportedStrategy(_)));
    }

    #[tokio::test]
    async fn test_read_back_and_delete_by_key() {
        let manager = memory_cluster(&["s1", "s2", "s3"], 16).await;
        manager.set_shard_key("users", "user_id", ShardingStrategy::Hash);

        for i in 0..20 {
            manager
                .distribute_data("users", row(json!({"user_id": user_key(i), "n": i})))
                .await
                .unwrap();
        }

        let key = user_key(7);
        let found = manager
            .query_shard_by_key(&key, "SELECT * FROM users WHERE user_id = ?", &[json!(key)])
            .await
            .unwrap();
        assert_eq!(found.row_count, 1);
        assert_eq!(found.data[0]["n"], json!(7));

        assert_eq!(manager.delete_by_key("users", &json!(key)).await.unwrap(), 1);
        let gone = manager
            .query_shard_by_key(&key, "SELECT * FROM users WHERE user_id = ?", &[json!(key)])
            .await
            .unwrap();
        assert_eq!(gone.row_count, 0);
    }
}
