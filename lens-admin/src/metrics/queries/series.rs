//! Throughput and request latency families

use std::fmt;
use std::str::FromStr;

use lens_core::metric::{BytesIn, BytesOut, RequestTime};
use lens_core::{BrokerId, LabeledSeries, TimeWindow};
use serde::{Deserialize, Serialize};

use crate::errors::MetricsError;
use crate::metrics::client::MetricsSource;

use super::helpers::{broker_matcher, fetch_series};

/// Request types tracked by the broker request metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestKind {
    Produce,
    FetchConsumer,
    FetchFollower,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Produce => "Produce",
            RequestKind::FetchConsumer => "FetchConsumer",
            RequestKind::FetchFollower => "FetchFollower",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Produce" => Ok(RequestKind::Produce),
            "FetchConsumer" => Ok(RequestKind::FetchConsumer),
            "FetchFollower" => Ok(RequestKind::FetchFollower),
            other => Err(format!(
                "unknown request type '{}', expected Produce, FetchConsumer or FetchFollower",
                other
            )),
        }
    }
}

/// Bytes received per second, one series per (broker, topic).
/// `broker_ids` narrows the query itself, not the result.
pub async fn bytes_in_per_sec(
    client: &dyn MetricsSource,
    window: &TimeWindow,
    broker_ids: Option<&[BrokerId]>,
) -> Result<Vec<LabeledSeries<BytesIn>>, MetricsError> {
    let q = topic_rate_query(
        "kafka_server_brokertopicmetrics_bytesin_total",
        client.broker_label(),
        broker_ids,
    );
    fetch_series(client, &q, Some(window)).await
}

/// Bytes sent per second, one series per (broker, topic)
pub async fn bytes_out_per_sec(
    client: &dyn MetricsSource,
    window: &TimeWindow,
    broker_ids: Option<&[BrokerId]>,
) -> Result<Vec<LabeledSeries<BytesOut>>, MetricsError> {
    let q = topic_rate_query(
        "kafka_server_brokertopicmetrics_bytesout_total",
        client.broker_label(),
        broker_ids,
    );
    fetch_series(client, &q, Some(window)).await
}

fn topic_rate_query(metric: &str, label: &str, broker_ids: Option<&[BrokerId]>) -> String {
    let mut matchers = vec!["topic!=\"\"".to_string()];
    matchers.extend(broker_matcher(label, broker_ids));
    format!(
        "sum by ({}, topic) (rate({}{{{}}}[1m]))",
        label,
        metric,
        matchers.join(",")
    )
}

/// Median total time of `request`, one sample per broker
pub async fn median_total_time_ms(
    client: &dyn MetricsSource,
    request: RequestKind,
) -> Result<Vec<LabeledSeries<RequestTime>>, MetricsError> {
    let q = format!(
        "sum by ({}) (kafka_network_requestmetrics_totaltimems{{request=\"{}\",quantile=\"0.50\"}})",
        client.broker_label(),
        request
    );
    fetch_series(client, &q, None).await
}

/// Median total time of `request` averaged over the selected brokers (all when `None`)
pub async fn avg_total_time_ms(
    client: &dyn MetricsSource,
    request: RequestKind,
    broker_ids: Option<&[BrokerId]>,
) -> Result<Vec<LabeledSeries<RequestTime>>, MetricsError> {
    let mut matchers = vec![
        format!("request=\"{}\"", request),
        "quantile=\"0.50\"".to_string(),
    ];
    matchers.extend(broker_matcher(client.broker_label(), broker_ids));
    let q = format!(
        "avg(kafka_network_requestmetrics_totaltimems{{{}}})",
        matchers.join(",")
    );
    fetch_series(client, &q, None).await
}
