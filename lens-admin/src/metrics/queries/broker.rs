//! Broker-scoped metric families
//!
//! These queries are not narrowed to a broker: the source answers for every
//! broker and the field resolution layer picks the one it needs.

use lens_core::metric::{CpuUsage, JvmMemory, UnderReplicated};
use lens_core::{LabeledSeries, TimeWindow};

use crate::errors::MetricsError;
use crate::metrics::client::MetricsSource;

use super::helpers::fetch_series;

/// Broker process CPU usage in percent
pub async fn cpu_usage(
    client: &dyn MetricsSource,
    window: Option<&TimeWindow>,
) -> Result<Vec<LabeledSeries<CpuUsage>>, MetricsError> {
    let q = format!(
        "sum by ({0}) (rate(process_cpu_seconds_total{{{0}!=\"\"}}[1m])) * 100",
        client.broker_label()
    );
    fetch_series(client, &q, window).await
}

/// JVM heap in use per broker, bytes
pub async fn jvm_memory_usage(
    client: &dyn MetricsSource,
    window: Option<&TimeWindow>,
) -> Result<Vec<LabeledSeries<JvmMemory>>, MetricsError> {
    let q = format!(
        "sum by ({0}) (jvm_memory_bytes_used{{area=\"heap\",{0}!=\"\"}})",
        client.broker_label()
    );
    fetch_series(client, &q, window).await
}

/// Under-replicated partitions led by each broker
pub async fn under_replicated_partitions(
    client: &dyn MetricsSource,
    window: Option<&TimeWindow>,
) -> Result<Vec<LabeledSeries<UnderReplicated>>, MetricsError> {
    let q = format!(
        "sum by ({0}) (kafka_server_replicamanager_underreplicatedpartitions)",
        client.broker_label()
    );
    fetch_series(client, &q, window).await
}
