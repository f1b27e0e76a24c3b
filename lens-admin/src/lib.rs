//! Kafka cluster lens: topology and metrics aggregation over a Kafka REST v3
//! admin API and Prometheus, plus partition reassignment orchestration.

pub mod cli;
pub mod core;
pub mod errors;
pub mod metrics;
pub mod reassign;
pub mod resolve;
pub mod schema;
pub mod server;
pub mod upstream;

pub use errors::{LensError, MetricsError, ReassignError, Result, TopologyError};
pub use schema::{Mutation, Query, Schema};
