//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements the outbound adapter and factory ports.

mod factory;
mod in_memory;

pub use factory::{AdapterConstructor, BackendAdapterFactory, PreparedAdapterFactory};
pub use in_memory::InMemoryDatabaseAdapter;
