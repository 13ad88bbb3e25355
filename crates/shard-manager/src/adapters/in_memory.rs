//! In-Memory Database Adapter
//!
//! Implements the `DatabaseAdapter` port with process-local tables.
//!
//! Understands a small query subset:
//!
//! ```text
//! SELECT * FROM <table>
//! SELECT * FROM <table> WHERE <column> = ?
//! ```
//!
//! Tokens are whitespace separated; `$1` is accepted in place of `?`.
//! A table that was never written is an empty table.
//!
//! Failure injection hooks (`fail_connect`, `fail_queries`, `fail_health`,
//! `set_latency`, `set_execution_time`) let tests script shard behavior.

use crate::domain::{InsertResult, QueryResult, Row, ShardId, ShardMetrics};
use crate::ports::outbound::{AdapterError, DatabaseAdapter};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Default)]
struct Counters {
    query_count: u64,
    total_query_ms: f64,
    error_count: u64,
}

#[derive(Default)]
struct Faults {
    fail_connect: bool,
    fail_queries: bool,
    fail_health: bool,
    latency: Option<Duration>,
    execution_time_ms: Option<u64>,
}

/// In-memory shard backend.
pub struct InMemoryDatabaseAdapter {
    shard_id: ShardId,
    connected: AtomicBool,
    /// Rows per table.
    tables: RwLock<HashMap<String, Vec<Row>>>,
    counters: Mutex<Counters>,
    faults: Mutex<Faults>,
}

impl InMemoryDatabaseAdapter {
    /// Create a disconnected, empty backend.
    pub fn new(shard_id: &str) -> Self {
        Self {
            shard_id: shard_id.to_string(),
            connected: AtomicBool::new(false),
            tables: RwLock::new(HashMap::new()),
            counters: Mutex::new(Counters::default()),
            faults: Mutex::new(Faults::default()),
        }
    }

    /// Shard this backend serves.
    pub fn shard_id(&self) -> &str {
        &self.shard_id
    }

    /// Make `connect` fail.
    pub fn fail_connect(&self, fail: bool) {
        self.faults.lock().fail_connect = fail;
    }

    /// Make `query`, `insert` and `delete` fail.
    pub fn fail_queries(&self, fail: bool) {
        self.faults.lock().fail_queries = fail;
    }

    /// Make `health_check` and `get_metrics` fail.
    pub fn fail_health(&self, fail: bool) {
        self.faults.lock().fail_health = fail;
    }

    /// Delay every query and probe.
    pub fn set_latency(&self, latency: Option<Duration>) {
        self.faults.lock().latency = latency;
    }

    /// Report a fixed execution time instead of the measured one.
    pub fn set_execution_time(&self, ms: Option<u64>) {
        self.faults.lock().execution_time_ms = ms;
    }

    /// Rows currently stored in `table`.
    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.tables.read().get(table).cloned().unwrap_or_default()
    }

    /// Number of rows stored in `table`.
    pub fn row_count(&self, table: &str) -> usize {
        self.tables.read().get(table).map_or(0, Vec::len)
    }

    fn ensure_connected(&self) -> Result<(), AdapterError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(AdapterError::NotConnected);
        }
        Ok(())
    }

    fn check_query_fault(&self) -> Result<(), AdapterError> {
        if self.faults.lock().fail_queries {
            self.counters.lock().error_count += 1;
            return Err(AdapterError::Backend(format!(
                "injected query failure on {}",
                self.shard_id
            )));
        }
        Ok(())
    }

    async fn simulate_latency(&self) {
        let latency = self.faults.lock().latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn record_query(&self, elapsed_ms: f64) {
        let mut counters = self.counters.lock();
        counters.query_count += 1;
        counters.total_query_ms += elapsed_ms;
    }
}

/// Parsed `SELECT * FROM t [WHERE c = ?]`.
#[derive(Debug, PartialEq, Eq)]
struct SelectQuery {
    table: String,
    filter_column: Option<String>,
}

fn parse_select(sql: &str) -> Result<SelectQuery, AdapterError> {
    let trimmed = sql.trim().trim_end_matches(';');
    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    let keyword = |i: usize, kw: &str| tokens.get(i).is_some_and(|t| t.eq_ignore_ascii_case(kw));

    if !(keyword(0, "SELECT") && tokens.get(1) == Some(&"*") && keyword(2, "FROM")) {
        return Err(AdapterError::Query(format!("unsupported query: {}", sql)));
    }
    let table = tokens
        .get(3)
        .ok_or_else(|| AdapterError::Query("missing table name".to_string()))?;

    match tokens.len() {
        4 => Ok(SelectQuery {
            table: table.to_string(),
            filter_column: None,
        }),
        8 if keyword(4, "WHERE")
            && tokens[6] == "="
            && (tokens[7] == "?" || tokens[7] == "$1") =>
        {
            Ok(SelectQuery {
                table: table.to_string(),
                filter_column: Some(tokens[5].to_string()),
            })
        }
        _ => Err(AdapterError::Query(format!("unsupported query: {}", sql))),
    }
}

#[async_trait]
impl DatabaseAdapter for InMemoryDatabaseAdapter {
    async fn connect(&self) -> Result<(), AdapterError> {
        if self.faults.lock().fail_connect {
            return Err(AdapterError::ConnectFailed(format!(
                "injected connect failure on {}",
                self.shard_id
            )));
        }
        self.connected.store(true, Ordering::SeqCst);
        debug!("[shard-manager] In-memory shard {} connected", self.shard_id);
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), AdapterError> {
        self.connected.store(false, Ordering::SeqCst);
        debug!("[shard-manager] In-memory shard {} disconnected", self.shard_id);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn health_check(&self) -> Result<bool, AdapterError> {
        self.simulate_latency().await;
        if self.faults.lock().fail_health {
            return Err(AdapterError::Backend(format!(
                "injected health failure on {}",
                self.shard_id
            )));
        }
        Ok(self.is_connected())
    }

    async fn get_metrics(&self) -> Result<ShardMetrics, AdapterError> {
        self.simulate_latency().await;
        if self.faults.lock().fail_health {
            return Err(AdapterError::Backend(format!(
                "injected metrics failure on {}",
                self.shard_id
            )));
        }
        self.ensure_connected()?;

        let counters = self.counters.lock();
        let average_query_time_ms = if counters.query_count == 0 {
            0.0
        } else {
            counters.total_query_ms / counters.query_count as f64
        };

        Ok(ShardMetrics {
            active_connections: 1,
            total_connections: 1,
            query_count: counters.query_count,
            average_query_time_ms,
            error_count: counters.error_count,
        })
    }

    async fn query(
        &self,
        sql: &str,
        params: &[serde_json::Value],
    ) -> Result<QueryResult, AdapterError> {
        let start = Instant::now();
        self.simulate_latency().await;
        self.ensure_connected()?;
        self.check_query_fault()?;

        let parsed = parse_select(sql).inspect_err(|_| {
            self.counters.lock().error_count += 1;
        })?;

        let data: Vec<Row> = {
            let tables = self.tables.read();
            let rows = tables.get(&parsed.table).map(Vec::as_slice).unwrap_or(&[]);
            match &parsed.filter_column {
                None => rows.to_vec(),
                Some(column) => {
                    let value = params.first().ok_or_else(|| {
                        AdapterError::Query(format!("missing parameter for {}", column))
                    })?;
                    rows.iter()
                        .filter(|row| row.get(column) == Some(value))
                        .cloned()
                        .collect()
                }
            }
        };

        let measured_ms = start.elapsed().as_secs_f64() * 1000.0;
        self.record_query(measured_ms);

        let execution_time_ms = self
            .faults
            .lock()
            .execution_time_ms
            .unwrap_or(measured_ms as u64);

        debug!(
            "[shard-manager] Shard {} returned {} rows from {}",
            self.shard_id,
            data.len(),
            parsed.table
        );

        Ok(QueryResult::from_rows(data, execution_time_ms))
    }

    async fn insert(&self, table: &str, row: &Row) -> Result<InsertResult, AdapterError> {
        self.ensure_connected()?;
        self.check_query_fault()?;

        self.tables
            .write()
            .entry(table.to_string())
            .or_default()
            .push(row.clone());

        Ok(InsertResult {
            shard_id: self.shard_id.clone(),
            rows_affected: 1,
        })
    }

    async fn delete(
        &self,
        table: &str,
        column: &str,
        value: &serde_json::Value,
    ) -> Result<u64, AdapterError> {
        self.ensure_connected()?;
        self.check_query_fault()?;

        let mut tables = self.tables.write();
        let Some(rows) = tables.get_mut(table) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|row| row.get(column) != Some(value));
        Ok((before - rows.len()) as u64)
    }
}
