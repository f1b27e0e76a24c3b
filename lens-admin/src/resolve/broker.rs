use futures::future::try_join_all;
use lens_core::metric::{BytesIn, BytesOut, CpuUsage, JvmMemory, RequestTime, UnderReplicated};
use lens_core::{Broker, BrokerId, LabeledSeries, Sample, TimeWindow};
use serde::Serialize;

use super::{field, parse_names, FieldValue};
use crate::errors::{LensError, MetricsError};
use crate::metrics::queries::{broker, series, RequestKind};
use crate::metrics::MetricsSource;

const FIELD_NAMES: [&str; 10] = [
    "cpuUsage",
    "cpuUsageOverTime",
    "JVMMemoryUsage",
    "JVMMemoryUsageOverTime",
    "numberUnderReplicatedPartitions",
    "bytesInPerSecondOverTime",
    "bytesOutPerSecondOverTime",
    "produceTotalTimeMs",
    "consumerTotalTimeMs",
    "followerTotalTimeMs",
];

/// Metric fields requested on a broker. `Default` selects none (topology only).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BrokerFields {
    pub cpu_usage: bool,
    pub cpu_usage_over_time: bool,
    pub jvm_memory_usage: bool,
    pub jvm_memory_usage_over_time: bool,
    pub under_replicated_partitions: bool,
    pub bytes_in_over_time: bool,
    pub bytes_out_over_time: bool,
    pub produce_total_time_ms: bool,
    pub consumer_total_time_ms: bool,
    pub follower_total_time_ms: bool,
}

impl BrokerFields {
    pub fn all() -> Self {
        Self {
            cpu_usage: true,
            cpu_usage_over_time: true,
            jvm_memory_usage: true,
            jvm_memory_usage_over_time: true,
            under_replicated_partitions: true,
            bytes_in_over_time: true,
            bytes_out_over_time: true,
            produce_total_time_ms: true,
            consumer_total_time_ms: true,
            follower_total_time_ms: true,
        }
    }

    /// Parse a comma separated list of field names; nothing selects all.
    pub fn parse(raw: Option<&str>) -> Result<Self, String> {
        let Some(names) = parse_names(raw, &FIELD_NAMES)? else {
            return Ok(Self::all());
        };
        let mut f = Self::default();
        for name in names {
            match name {
                "cpuUsage" => f.cpu_usage = true,
                "cpuUsageOverTime" => f.cpu_usage_over_time = true,
                "JVMMemoryUsage" => f.jvm_memory_usage = true,
                "JVMMemoryUsageOverTime" => f.jvm_memory_usage_over_time = true,
                "numberUnderReplicatedPartitions" => f.under_replicated_partitions = true,
                "bytesInPerSecondOverTime" => f.bytes_in_over_time = true,
                "bytesOutPerSecondOverTime" => f.bytes_out_over_time = true,
                "produceTotalTimeMs" => f.produce_total_time_ms = true,
                "consumerTotalTimeMs" => f.consumer_total_time_ms = true,
                "followerTotalTimeMs" => f.follower_total_time_ms = true,
                _ => {}
            }
        }
        Ok(f)
    }
}

/// A broker with its requested metric fields
#[derive(Debug, Clone, Serialize)]
pub struct BrokerView {
    #[serde(flatten)]
    pub broker: Broker,

    #[serde(rename = "cpuUsage", skip_serializing_if = "FieldValue::is_not_requested")]
    pub cpu_usage: FieldValue<Sample<CpuUsage>>,

    #[serde(rename = "cpuUsageOverTime", skip_serializing_if = "FieldValue::is_not_requested")]
    pub cpu_usage_over_time: FieldValue<Vec<Sample<CpuUsage>>>,

    #[serde(rename = "JVMMemoryUsage", skip_serializing_if = "FieldValue::is_not_requested")]
    pub jvm_memory_usage: FieldValue<Sample<JvmMemory>>,

    #[serde(rename = "JVMMemoryUsageOverTime", skip_serializing_if = "FieldValue::is_not_requested")]
    pub jvm_memory_usage_over_time: FieldValue<Vec<Sample<JvmMemory>>>,

    #[serde(
        rename = "numberUnderReplicatedPartitions",
        skip_serializing_if = "FieldValue::is_not_requested"
    )]
    pub under_replicated_partitions: FieldValue<Sample<UnderReplicated>>,

    #[serde(rename = "bytesInPerSecondOverTime", skip_serializing_if = "FieldValue::is_not_requested")]
    pub bytes_in_over_time: FieldValue<Vec<LabeledSeries<BytesIn>>>,

    #[serde(rename = "bytesOutPerSecondOverTime", skip_serializing_if = "FieldValue::is_not_requested")]
    pub bytes_out_over_time: FieldValue<Vec<LabeledSeries<BytesOut>>>,

    #[serde(rename = "produceTotalTimeMs", skip_serializing_if = "FieldValue::is_not_requested")]
    pub produce_total_time_ms: FieldValue<Sample<RequestTime>>,

    #[serde(rename = "consumerTotalTimeMs", skip_serializing_if = "FieldValue::is_not_requested")]
    pub consumer_total_time_ms: FieldValue<Sample<RequestTime>>,

    #[serde(rename = "followerTotalTimeMs", skip_serializing_if = "FieldValue::is_not_requested")]
    pub follower_total_time_ms: FieldValue<Sample<RequestTime>>,
}

/// Resolve the selected metric fields of one broker concurrently.
///
/// Broker scalar families are fetched for the whole cluster and narrowed here;
/// when a broker id shows up more than once the first series wins.
pub async fn resolve_broker(
    metrics: &dyn MetricsSource,
    broker: Broker,
    fields: &BrokerFields,
) -> Result<BrokerView, LensError> {
    let id = broker.broker_id;
    let entity = format!("broker {}", id);
    let window = broker.window.as_ref();
    let ids = [id];

    let (
        cpu_usage,
        cpu_usage_over_time,
        jvm_memory_usage,
        jvm_memory_usage_over_time,
        under_replicated_partitions,
        bytes_in_over_time,
        bytes_out_over_time,
        produce_total_time_ms,
        consumer_total_time_ms,
        follower_total_time_ms,
    ) = futures::join!(
        field(fields.cpu_usage, "cpuUsage", &entity, async {
            Ok::<_, MetricsError>(latest(broker::cpu_usage(metrics, None).await?, id))
        }),
        field(fields.cpu_usage_over_time, "cpuUsageOverTime", &entity, async {
            let w = need_window(window)?;
            Ok::<_, MetricsError>(over_time(broker::cpu_usage(metrics, Some(w)).await?, id))
        }),
        field(fields.jvm_memory_usage, "JVMMemoryUsage", &entity, async {
            Ok::<_, MetricsError>(latest(broker::jvm_memory_usage(metrics, None).await?, id))
        }),
        field(fields.jvm_memory_usage_over_time, "JVMMemoryUsageOverTime", &entity, async {
            let w = need_window(window)?;
            Ok::<_, MetricsError>(over_time(broker::jvm_memory_usage(metrics, Some(w)).await?, id))
        }),
        field(
            fields.under_replicated_partitions,
            "numberUnderReplicatedPartitions",
            &entity,
            async {
                let all = broker::under_replicated_partitions(metrics, None).await?;
                Ok::<_, MetricsError>(latest(all, id))
            }
        ),
        field(fields.bytes_in_over_time, "bytesInPerSecondOverTime", &entity, async {
            let w = need_window(window)?;
            Ok::<_, MetricsError>(non_empty(series::bytes_in_per_sec(metrics, w, Some(&ids[..])).await?))
        }),
        field(fields.bytes_out_over_time, "bytesOutPerSecondOverTime", &entity, async {
            let w = need_window(window)?;
            Ok::<_, MetricsError>(non_empty(series::bytes_out_per_sec(metrics, w, Some(&ids[..])).await?))
        }),
        field(fields.produce_total_time_ms, "produceTotalTimeMs", &entity, async {
            Ok::<_, MetricsError>(latest(series::median_total_time_ms(metrics, RequestKind::Produce).await?, id))
        }),
        field(fields.consumer_total_time_ms, "consumerTotalTimeMs", &entity, async {
            Ok::<_, MetricsError>(latest(series::median_total_time_ms(metrics, RequestKind::FetchConsumer).await?, id))
        }),
        field(fields.follower_total_time_ms, "followerTotalTimeMs", &entity, async {
            Ok::<_, MetricsError>(latest(series::median_total_time_ms(metrics, RequestKind::FetchFollower).await?, id))
        }),
    );

    Ok(BrokerView {
        broker,
        cpu_usage: cpu_usage?,
        cpu_usage_over_time: cpu_usage_over_time?,
        jvm_memory_usage: jvm_memory_usage?,
        jvm_memory_usage_over_time: jvm_memory_usage_over_time?,
        under_replicated_partitions: under_replicated_partitions?,
        bytes_in_over_time: bytes_in_over_time?,
        bytes_out_over_time: bytes_out_over_time?,
        produce_total_time_ms: produce_total_time_ms?,
        consumer_total_time_ms: consumer_total_time_ms?,
        follower_total_time_ms: follower_total_time_ms?,
    })
}

/// Resolve a list of brokers concurrently, keeping input order.
pub async fn resolve_brokers(
    metrics: &dyn MetricsSource,
    brokers: Vec<Broker>,
    fields: &BrokerFields,
) -> Result<Vec<BrokerView>, LensError> {
    try_join_all(brokers.into_iter().map(|b| resolve_broker(metrics, b, fields))).await
}

fn need_window(window: Option<&TimeWindow>) -> Result<&TimeWindow, MetricsError> {
    window.ok_or_else(|| MetricsError::Query("field requires start, end and step".to_string()))
}

fn for_broker<M>(series: Vec<LabeledSeries<M>>, id: BrokerId) -> Option<LabeledSeries<M>> {
    series.into_iter().find(|s| s.broker_id == Some(id))
}

fn latest<M>(series: Vec<LabeledSeries<M>>, id: BrokerId) -> Option<Sample<M>> {
    for_broker(series, id).and_then(|s| s.values.into_iter().last())
}

fn over_time<M>(series: Vec<LabeledSeries<M>>, id: BrokerId) -> Option<Vec<Sample<M>>> {
    for_broker(series, id)
        .map(|s| s.values)
        .filter(|v| !v.is_empty())
}

fn non_empty<T>(v: Vec<T>) -> Option<Vec<T>> {
    Some(v).filter(|v| !v.is_empty())
}
