//! # Integration Tests
//!
//! End-to-end flows through the `ShardManagerApi` port, with in-memory and
//! recording adapters standing in for real databases.

#[cfg(test)]
mod fixtures;

pub mod fan_out_flows;
pub mod routing_flows;
