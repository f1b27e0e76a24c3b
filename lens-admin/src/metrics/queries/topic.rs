//! Topic-scoped metric families. The topic name is part of the query, so
//! every function answers for exactly one topic.

use lens_core::metric::{LogSize, ReplicaCount};
use lens_core::LabeledSeries;

use crate::errors::MetricsError;
use crate::metrics::client::MetricsSource;

use super::helpers::{escape_label, fetch_series};

/// Replicas of all partitions of `topic`
pub async fn total_replicas(
    client: &dyn MetricsSource,
    topic: &str,
) -> Result<Vec<LabeledSeries<ReplicaCount>>, MetricsError> {
    let q = format!(
        "sum(kafka_cluster_partition_replicascount{{topic=\"{}\"}})",
        escape_label(topic)
    );
    fetch_series(client, &q, None).await
}

/// In-sync replicas of all partitions of `topic`
pub async fn total_isrs(
    client: &dyn MetricsSource,
    topic: &str,
) -> Result<Vec<LabeledSeries<ReplicaCount>>, MetricsError> {
    let q = format!(
        "sum(kafka_cluster_partition_insyncreplicascount{{topic=\"{}\"}})",
        escape_label(topic)
    );
    fetch_series(client, &q, None).await
}

/// On-disk size of `topic` in bytes, summed over partitions and replicas
pub async fn log_size(
    client: &dyn MetricsSource,
    topic: &str,
) -> Result<Vec<LabeledSeries<LogSize>>, MetricsError> {
    let q = format!(
        "sum(kafka_log_log_size{{topic=\"{}\"}})",
        escape_label(topic)
    );
    fetch_series(client, &q, None).await
}

/// One series per broker holding at least one replica of `topic`
pub async fn replicas_per_broker(
    client: &dyn MetricsSource,
    topic: &str,
) -> Result<Vec<LabeledSeries<ReplicaCount>>, MetricsError> {
    let q = format!(
        "count by ({}) (kafka_log_log_size{{topic=\"{}\"}})",
        client.broker_label(),
        escape_label(topic)
    );
    fetch_series(client, &q, None).await
}
