//! Metric samples.
//!
//! Every metric family shares the `(value, time)` shape but gets its own
//! marker type, so a CPU reading can never be handed out as a memory reading.
//! The marker also names the value field in the serialized payload.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::marker::PhantomData;

use crate::model::BrokerId;

pub trait MetricKind {
    /// Name of the value field when the sample is serialized.
    const FIELD: &'static str;
}

macro_rules! metric_kind {
    ($(#[$doc:meta])* $name:ident => $field:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub enum $name {}

        impl MetricKind for $name {
            const FIELD: &'static str = $field;
        }
    };
}

metric_kind!(
    /// Broker process CPU usage, percent.
    CpuUsage => "cpuUsage"
);
metric_kind!(
    /// Broker JVM heap in use, bytes.
    JvmMemory => "JVMMemoryUsage"
);
metric_kind!(
    /// Under-replicated partitions led by one broker.
    UnderReplicated => "underReplicatedPartitions"
);
metric_kind!(
    /// Bytes received per second.
    BytesIn => "bytesInPerSecond"
);
metric_kind!(
    /// Bytes sent per second.
    BytesOut => "bytesOutPerSecond"
);
metric_kind!(
    /// Request total time in milliseconds.
    RequestTime => "totalTimeMs"
);
metric_kind!(
    /// Reduced cluster-wide counter.
    Counter => "count"
);
metric_kind!(
    /// Replica or in-sync replica count of a topic.
    ReplicaCount => "replicas"
);
metric_kind!(
    /// On-disk log size, bytes.
    LogSize => "logSize"
);

#[derive(Debug, Clone, PartialEq)]
pub struct Sample<M> {
    pub value: f64,
    /// RFC 3339 timestamp of the reading.
    pub time: String,
    kind: PhantomData<M>,
}

impl<M> Sample<M> {
    pub fn new(value: f64, time: impl Into<String>) -> Self {
        Sample {
            value,
            time: time.into(),
            kind: PhantomData,
        }
    }
}

impl<M: MetricKind> Serialize for Sample<M> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Sample", 2)?;
        state.serialize_field(M::FIELD, &self.value)?;
        state.serialize_field("time", &self.time)?;
        state.end()
    }
}

/// Cluster-wide reduced value, e.g. active controller count.
pub type Count = Sample<Counter>;

/// One labeled series returned by a multi-entity metric query.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSeries<M> {
    pub broker_id: Option<BrokerId>,
    pub topic: Option<String>,
    pub values: Vec<Sample<M>>,
}

impl<M: MetricKind> Serialize for LabeledSeries<M> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("LabeledSeries", 3)?;
        state.serialize_field("brokerId", &self.broker_id)?;
        state.serialize_field("topic", &self.topic)?;
        state.serialize_field("values", &self.values)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_serializes_with_family_field_name() {
        let cpu: Sample<CpuUsage> = Sample::new(12.5, "2024-01-01T00:00:00+00:00");
        assert_eq!(
            serde_json::to_value(&cpu).unwrap(),
            serde_json::json!({ "cpuUsage": 12.5, "time": "2024-01-01T00:00:00+00:00" })
        );

        let count: Count = Sample::new(1.0, "2024-01-01T00:00:00+00:00");
        assert_eq!(
            serde_json::to_value(&count).unwrap(),
            serde_json::json!({ "count": 1.0, "time": "2024-01-01T00:00:00+00:00" })
        );
    }

    #[test]
    fn labeled_series_keeps_absent_labels_explicit() {
        let series = LabeledSeries::<BytesIn> {
            broker_id: Some(2),
            topic: None,
            values: vec![Sample::new(512.0, "t0")],
        };
        assert_eq!(
            serde_json::to_value(&series).unwrap(),
            serde_json::json!({
                "brokerId": 2,
                "topic": null,
                "values": [{ "bytesInPerSecond": 512.0, "time": "t0" }]
            })
        );
    }
}
