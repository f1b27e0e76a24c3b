//! Metrics adapter over the Prometheus HTTP API
//!
//! `client` holds the raw query boundary, `queries` one function per
//! metric family on top of it.

pub mod client;
pub mod queries;

pub use client::{InstantVector, MetricsClient, MetricsConfig, MetricsSource, RangeVector};
pub use queries::RequestKind;
