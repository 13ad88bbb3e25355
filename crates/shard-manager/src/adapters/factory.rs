//! Adapter Factories
//!
//! Implements the `AdapterFactory` port.
//!
//! - [`BackendAdapterFactory`] picks a constructor by [`BackendType`].
//! - [`PreparedAdapterFactory`] hands out adapters built ahead of time, keyed by
//!   shard id. Used to inject fakes in tests.

use super::in_memory::InMemoryDatabaseAdapter;
use crate::domain::{BackendType, ConnectionConfig, ShardId};
use crate::ports::outbound::{AdapterError, AdapterFactory, DatabaseAdapter};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Constructor for one backend family.
pub type AdapterConstructor =
    Arc<dyn Fn(&str, &ConnectionConfig) -> Arc<dyn DatabaseAdapter> + Send + Sync>;

/// Factory keyed on the connection's backend type.
#[derive(Default)]
pub struct BackendAdapterFactory {
    constructors: HashMap<BackendType, AdapterConstructor>,
}

impl BackendAdapterFactory {
    /// Factory with no backends registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory with the in-memory backend registered.
    pub fn with_defaults() -> Self {
        let mut factory = Self::new();
        factory.register(BackendType::InMemory, |shard_id, _config| {
            Arc::new(InMemoryDatabaseAdapter::new(shard_id)) as Arc<dyn DatabaseAdapter>
        });
        factory
    }

    /// Register (or replace) the constructor for a backend type.
    pub fn register<F>(&mut self, backend: BackendType, constructor: F)
    where
        F: Fn(&str, &ConnectionConfig) -> Arc<dyn DatabaseAdapter> + Send + Sync + 'static,
    {
        self.constructors.insert(backend, Arc::new(constructor));
    }

    /// Is a constructor registered for `backend`?
    pub fn supports(&self, backend: BackendType) -> bool {
        self.constructors.contains_key(&backend)
    }
}

impl AdapterFactory for BackendAdapterFactory {
    fn create(
        &self,
        shard_id: &str,
        config: &ConnectionConfig,
    ) -> Result<Arc<dyn DatabaseAdapter>, AdapterError> {
        let constructor = self.constructors.get(&config.backend_type).ok_or_else(|| {
            AdapterError::Unsupported(format!("no driver for backend {}", config.backend_type))
        })?;
        Ok(constructor(shard_id, config))
    }
}

/// Factory returning pre-built adapters by shard id.
#[derive(Default)]
pub struct PreparedAdapterFactory {
    adapters: RwLock<HashMap<ShardId, Arc<dyn DatabaseAdapter>>>,
}

impl PreparedAdapterFactory {
    /// Empty factory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Provide the adapter for `shard_id`.
    pub fn insert(&self, shard_id: &str, adapter: Arc<dyn DatabaseAdapter>) {
        self.adapters.write().insert(shard_id.to_string(), adapter);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_adapter(self, shard_id: &str, adapter: Arc<dyn DatabaseAdapter>) -> Self {
        self.insert(shard_id, adapter);
        self
    }
}

impl AdapterFactory for PreparedAdapterFactory {
    fn create(
        &self,
        shard_id: &str,
        _config: &ConnectionConfig,
    ) -> Result<Arc<dyn DatabaseAdapter>, AdapterError> {
        self.adapters
            .read()
            .get(shard_id)
            .cloned()
            .ok_or_else(|| AdapterError::Unsupported(format!("no adapter for shard {}", shard_id)))
    }
}
