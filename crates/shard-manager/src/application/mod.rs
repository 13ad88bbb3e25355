//! # Application Module
//!
//! Shard registry, key catalog, router and monitor, composed by the
//! [`ShardManager`] service.

pub mod catalog;
pub mod monitor;
pub mod registry;
pub mod router;
pub mod service;

pub use catalog::ShardKeyCatalog;
pub use monitor::HealthMonitor;
pub use registry::ShardRegistry;
pub use router::{routing_key, DataRouter};
pub use service::ShardManager;
