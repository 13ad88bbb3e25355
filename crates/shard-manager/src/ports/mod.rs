//! # Ports Module
//!
//! Inbound API and outbound adapter traits.

pub mod inbound;
pub mod outbound;

pub use inbound::ShardManagerApi;
pub use outbound::{AdapterError, AdapterFactory, DatabaseAdapter};
