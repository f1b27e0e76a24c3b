//! Field resolution
//!
//! Stitches topology entities together with metric families. Every
//! metric-backed field is resolved on its own: a family that fails at the
//! query level leaves its field `null` and never blocks sibling fields, while
//! an unreachable metrics source fails the whole request.

mod broker;
mod cluster;
mod topic;

use std::future::Future;

use serde::ser::{Serialize, Serializer};
use tracing::warn;

use crate::errors::{LensError, MetricsError};

pub use broker::{resolve_broker, resolve_brokers, BrokerFields, BrokerView};
pub use cluster::{resolve_cluster, ClusterFields, ClusterView};
pub use topic::{resolve_topic, resolve_topics, TopicFields, TopicView};

/// Outcome of one metric-backed field.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue<T> {
    /// Not part of the field selection; omitted from the payload.
    #[default]
    NotRequested,
    /// Requested, but the metrics source had nothing (or failed); `null`.
    Absent,
    Value(T),
}

impl<T> FieldValue<T> {
    pub fn is_not_requested(&self) -> bool {
        matches!(self, FieldValue::NotRequested)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            FieldValue::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            FieldValue::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl<T: Serialize> Serialize for FieldValue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Value(v) => serializer.serialize_some(v),
            _ => serializer.serialize_none(),
        }
    }
}

/// Run one field resolution when `selected`, isolating query-level failures.
pub(crate) async fn field<T, F>(
    selected: bool,
    name: &'static str,
    entity: &str,
    fut: F,
) -> Result<FieldValue<T>, LensError>
where
    F: Future<Output = Result<Option<T>, MetricsError>>,
{
    if !selected {
        return Ok(FieldValue::NotRequested);
    }
    match fut.await {
        Ok(Some(v)) => Ok(FieldValue::Value(v)),
        Ok(None) => Ok(FieldValue::Absent),
        Err(e @ MetricsError::Unreachable(_)) => Err(e.into()),
        Err(e) => {
            warn!(field = name, entity, error = %e, "metric field resolved to null");
            Ok(FieldValue::Absent)
        }
    }
}

/// Comma separated field names; `None` or an empty list selects everything.
/// Unknown names are rejected so typos do not silently return less data.
fn parse_names<'a>(
    raw: Option<&'a str>,
    known: &[&str],
) -> Result<Option<Vec<&'a str>>, String> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(None);
    };
    let names: Vec<&str> = raw.split(',').map(str::trim).filter(|n| !n.is_empty()).collect();
    if let Some(unknown) = names.iter().find(|n| !known.contains(n)) {
        return Err(format!(
            "unknown field '{}', expected one of: {}",
            unknown,
            known.join(", ")
        ));
    }
    Ok(Some(names))
}
