use lens_core::metric::Counter;
use lens_core::{ClusterInfo, Count, LabeledSeries, Sample, TimeWindow};
use serde::Serialize;
use tracing::warn;

use super::{
    field, parse_names, resolve_broker, resolve_brokers, BrokerFields, BrokerView, FieldValue,
};
use crate::core::TopologySource;
use crate::errors::{LensError, MetricsError, TopologyError};
use crate::metrics::queries::cluster;
use crate::metrics::MetricsSource;

const FIELD_NAMES: [&str; 4] = [
    "activeControllerCount",
    "offlinePartitionCount",
    "numberUnderReplicatedPartitions",
    "deleteTopic",
];

/// Cluster-level fields requested alongside the broker set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClusterFields {
    pub active_controller_count: bool,
    pub offline_partition_count: bool,
    pub under_replicated_partitions: bool,
    pub delete_topic: bool,
}

impl ClusterFields {
    pub fn all() -> Self {
        Self {
            active_controller_count: true,
            offline_partition_count: true,
            under_replicated_partitions: true,
            delete_topic: true,
        }
    }

    pub fn parse(raw: Option<&str>) -> Result<Self, String> {
        let Some(names) = parse_names(raw, &FIELD_NAMES)? else {
            return Ok(Self::all());
        };
        let mut f = Self::default();
        for name in names {
            match name {
                "activeControllerCount" => f.active_controller_count = true,
                "offlinePartitionCount" => f.offline_partition_count = true,
                "numberUnderReplicatedPartitions" => f.under_replicated_partitions = true,
                "deleteTopic" => f.delete_topic = true,
                _ => {}
            }
        }
        Ok(f)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterView {
    pub cluster_id: String,

    /// Brokers in admin API order, carrying the requested broker fields
    pub brokers: Vec<BrokerView>,

    pub active_controller: Option<BrokerView>,

    /// Sum of the per-broker controller indicators. 1 in a healthy cluster,
    /// but 0 or more than 1 are legitimate readings during elections.
    #[serde(rename = "activeControllerCount", skip_serializing_if = "FieldValue::is_not_requested")]
    pub active_controller_count: FieldValue<Count>,

    #[serde(rename = "offlinePartitionCount", skip_serializing_if = "FieldValue::is_not_requested")]
    pub offline_partition_count: FieldValue<Count>,

    #[serde(
        rename = "numberUnderReplicatedPartitions",
        skip_serializing_if = "FieldValue::is_not_requested"
    )]
    pub under_replicated_partitions: FieldValue<Count>,

    /// Whether the cluster accepts topic deletion
    #[serde(rename = "deleteTopic", skip_serializing_if = "FieldValue::is_not_requested")]
    pub delete_topic: FieldValue<bool>,
}

/// Fetch the cluster topology and the selected cluster fields concurrently.
///
/// Brokers and the active controller are resolved with `broker_fields`, the
/// window parameterizing their over-time fields. Losing the admin API fails
/// the request; metric fields and `deleteTopic` degrade one by one.
pub async fn resolve_cluster(
    topology: &dyn TopologySource,
    metrics: &dyn MetricsSource,
    fields: &ClusterFields,
    broker_fields: &BrokerFields,
    window: Option<TimeWindow>,
) -> Result<ClusterView, LensError> {
    let entity = "cluster";
    let (topo, delete_topic, active, offline, urp) = futures::join!(
        async {
            let info = topology.cluster_info().await?;
            resolve_members(metrics, info, broker_fields, window).await
        },
        async {
            if fields.delete_topic {
                delete_topic_field(topology.delete_topic_enabled().await)
            } else {
                Ok(FieldValue::NotRequested)
            }
        },
        field(fields.active_controller_count, "activeControllerCount", entity, async {
            Ok::<_, MetricsError>(sum_counts(cluster::active_controller_count(metrics).await?))
        }),
        field(fields.offline_partition_count, "offlinePartitionCount", entity, async {
            Ok::<_, MetricsError>(sum_counts(cluster::offline_partition_count(metrics).await?))
        }),
        field(
            fields.under_replicated_partitions,
            "numberUnderReplicatedPartitions",
            entity,
            async {
                let all = cluster::total_under_replicated_partitions(metrics, None).await?;
                Ok::<_, MetricsError>(first_count(all))
            }
        ),
    );

    let (cluster_id, brokers, active_controller) = topo?;
    Ok(ClusterView {
        cluster_id,
        brokers,
        active_controller,
        delete_topic: delete_topic?,
        active_controller_count: active?,
        offline_partition_count: offline?,
        under_replicated_partitions: urp?,
    })
}

async fn resolve_members(
    metrics: &dyn MetricsSource,
    info: ClusterInfo,
    fields: &BrokerFields,
    window: Option<TimeWindow>,
) -> Result<(String, Vec<BrokerView>, Option<BrokerView>), LensError> {
    let brokers = info
        .brokers
        .into_iter()
        .map(|b| b.with_window(window.clone()))
        .collect();
    let brokers = resolve_brokers(metrics, brokers, fields).await?;

    // the controller is one of the listed brokers, reuse its resolved view
    let active_controller = match info.active_controller {
        None => None,
        Some(c) => match brokers.iter().find(|b| b.broker.broker_id == c.broker_id) {
            Some(view) => Some(view.clone()),
            None => Some(resolve_broker(metrics, c.with_window(window), fields).await?),
        },
    };
    Ok((info.cluster_id, brokers, active_controller))
}

fn delete_topic_field(result: Result<bool, TopologyError>) -> Result<FieldValue<bool>, LensError> {
    match result {
        Ok(enabled) => Ok(FieldValue::Value(enabled)),
        Err(e) if e.is_connectivity() => Err(e.into()),
        Err(e) => {
            warn!(
                field = "deleteTopic",
                entity = "cluster",
                error = %e,
                "cluster field resolved to null"
            );
            Ok(FieldValue::Absent)
        }
    }
}

/// Sum every per-broker reading, stamped with the time of the first one.
/// Nothing reported is absent, not zero.
fn sum_counts(series: Vec<LabeledSeries<Counter>>) -> Option<Count> {
    let samples: Vec<Sample<Counter>> = series.into_iter().flat_map(|s| s.values).collect();
    let first = samples.first()?;
    let total = samples.iter().map(|s| s.value).sum();
    Some(Sample::new(total, first.time.clone()))
}

fn first_count(series: Vec<LabeledSeries<Counter>>) -> Option<Count> {
    series.into_iter().next()?.values.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn per_broker(id: i32, value: f64, time: &str) -> LabeledSeries<Counter> {
        LabeledSeries {
            broker_id: Some(id),
            topic: None,
            values: vec![Sample::new(value, time)],
        }
    }

    #[test]
    fn controller_count_sums_indicators() {
        let count = sum_counts(vec![
            per_broker(1, 0.0, "t1"),
            per_broker(2, 1.0, "t2"),
            per_broker(3, 0.0, "t3"),
        ])
        .unwrap();
        assert_eq!(count.value, 1.0);
        assert_eq!(count.time, "t1");

        // split brain is reported as is
        let count = sum_counts(vec![per_broker(1, 1.0, "t"), per_broker(2, 1.0, "t")]).unwrap();
        assert_eq!(count.value, 2.0);
    }

    #[test]
    fn delete_topic_degrades_unless_admin_api_is_lost() {
        let refused = TopologyError::Api {
            status: 403,
            message: "forbidden".into(),
        };
        assert_eq!(delete_topic_field(Err(refused)).unwrap(), FieldValue::Absent);
        assert_eq!(delete_topic_field(Ok(false)).unwrap(), FieldValue::Value(false));
        assert!(matches!(
            delete_topic_field(Err(TopologyError::Timeout("read".into()))),
            Err(LensError::Timeout(_))
        ));
    }

    #[test]
    fn empty_result_is_absent_not_zero() {
        assert!(sum_counts(Vec::new()).is_none());
        assert!(first_count(Vec::new()).is_none());
    }
}
