//! Cluster-wide counters, reported once per broker and reduced by the caller

use lens_core::metric::Counter;
use lens_core::{LabeledSeries, TimeWindow};

use crate::errors::MetricsError;
use crate::metrics::client::MetricsSource;

use super::helpers::fetch_series;

/// Per-broker active controller indicator (1 on the controller, 0 elsewhere)
pub async fn active_controller_count(
    client: &dyn MetricsSource,
) -> Result<Vec<LabeledSeries<Counter>>, MetricsError> {
    let q = format!(
        "sum by ({0}) (kafka_controller_kafkacontroller_activecontrollercount)",
        client.broker_label()
    );
    fetch_series(client, &q, None).await
}

/// Offline partitions as seen by each broker
pub async fn offline_partition_count(
    client: &dyn MetricsSource,
) -> Result<Vec<LabeledSeries<Counter>>, MetricsError> {
    let q = format!(
        "sum by ({0}) (kafka_controller_kafkacontroller_offlinepartitionscount)",
        client.broker_label()
    );
    fetch_series(client, &q, None).await
}

/// Under-replicated partitions summed over the cluster, optionally over a window
pub async fn total_under_replicated_partitions(
    client: &dyn MetricsSource,
    window: Option<&TimeWindow>,
) -> Result<Vec<LabeledSeries<Counter>>, MetricsError> {
    fetch_series(
        client,
        "sum(kafka_server_replicamanager_underreplicatedpartitions)",
        window,
    )
    .await
}
