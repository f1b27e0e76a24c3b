use futures::future::try_join_all;
use lens_core::{BrokerId, LabeledSeries, Topic};
use serde::Serialize;

use super::{field, parse_names, FieldValue};
use crate::errors::{LensError, MetricsError};
use crate::metrics::queries::topic;
use crate::metrics::MetricsSource;

const FIELD_NAMES: [&str; 5] = [
    "numPartitions",
    "totalReplicas",
    "totalIsrs",
    "logSize",
    "brokersWithReplicas",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TopicFields {
    pub num_partitions: bool,
    pub total_replicas: bool,
    pub total_isrs: bool,
    pub log_size: bool,
    pub brokers_with_replicas: bool,
}

impl TopicFields {
    pub fn all() -> Self {
        Self {
            num_partitions: true,
            total_replicas: true,
            total_isrs: true,
            log_size: true,
            brokers_with_replicas: true,
        }
    }

    pub fn parse(raw: Option<&str>) -> Result<Self, String> {
        let Some(names) = parse_names(raw, &FIELD_NAMES)? else {
            return Ok(Self::all());
        };
        let mut f = Self::default();
        for name in names {
            match name {
                "numPartitions" => f.num_partitions = true,
                "totalReplicas" => f.total_replicas = true,
                "totalIsrs" => f.total_isrs = true,
                "logSize" => f.log_size = true,
                "brokersWithReplicas" => f.brokers_with_replicas = true,
                _ => {}
            }
        }
        Ok(f)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TopicView {
    #[serde(flatten)]
    pub topic: Topic,

    #[serde(rename = "numPartitions", skip_serializing_if = "FieldValue::is_not_requested")]
    pub num_partitions: FieldValue<usize>,

    #[serde(rename = "totalReplicas", skip_serializing_if = "FieldValue::is_not_requested")]
    pub total_replicas: FieldValue<f64>,

    #[serde(rename = "totalIsrs", skip_serializing_if = "FieldValue::is_not_requested")]
    pub total_isrs: FieldValue<f64>,

    /// Gigabytes, two decimals
    #[serde(rename = "logSize", skip_serializing_if = "FieldValue::is_not_requested")]
    pub log_size: FieldValue<f64>,

    /// In the order the metrics source returned them
    #[serde(rename = "brokersWithReplicas", skip_serializing_if = "FieldValue::is_not_requested")]
    pub brokers_with_replicas: FieldValue<Vec<BrokerId>>,
}

pub async fn resolve_topic(
    metrics: &dyn MetricsSource,
    t: Topic,
    fields: &TopicFields,
) -> Result<TopicView, LensError> {
    let entity = format!("topic {}", t.name);
    let name = t.name.as_str();

    let (total_replicas, total_isrs, log_size, brokers_with_replicas) = futures::join!(
        field(fields.total_replicas, "totalReplicas", &entity, async {
            Ok::<_, MetricsError>(first_value(topic::total_replicas(metrics, name).await?))
        }),
        field(fields.total_isrs, "totalIsrs", &entity, async {
            Ok::<_, MetricsError>(first_value(topic::total_isrs(metrics, name).await?))
        }),
        field(fields.log_size, "logSize", &entity, async {
            let bytes = first_value(topic::log_size(metrics, name).await?);
            Ok::<_, MetricsError>(bytes.map(bytes_to_gb))
        }),
        field(fields.brokers_with_replicas, "brokersWithReplicas", &entity, async {
            let ids = broker_ids(topic::replicas_per_broker(metrics, name).await?);
            Ok::<_, MetricsError>(Some(ids).filter(|ids| !ids.is_empty()))
        }),
    );

    let num_partitions = if fields.num_partitions {
        FieldValue::Value(t.num_partitions())
    } else {
        FieldValue::NotRequested
    };

    Ok(TopicView {
        num_partitions,
        total_replicas: total_replicas?,
        total_isrs: total_isrs?,
        log_size: log_size?,
        brokers_with_replicas: brokers_with_replicas?,
        topic: t,
    })
}

/// Resolve a list of topics concurrently, keeping input order.
pub async fn resolve_topics(
    metrics: &dyn MetricsSource,
    topics: Vec<Topic>,
    fields: &TopicFields,
) -> Result<Vec<TopicView>, LensError> {
    try_join_all(topics.into_iter().map(|t| resolve_topic(metrics, t, fields))).await
}

fn first_value<M>(series: Vec<LabeledSeries<M>>) -> Option<f64> {
    series.into_iter().next()?.values.into_iter().next().map(|s| s.value)
}

fn broker_ids<M>(series: Vec<LabeledSeries<M>>) -> Vec<BrokerId> {
    series.into_iter().filter_map(|s| s.broker_id).collect()
}

fn bytes_to_gb(bytes: f64) -> f64 {
    (bytes / 1e9 * 100.0).round() / 100.0
}
