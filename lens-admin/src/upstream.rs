//! Connection settings for the two upstream APIs, shared by `serve` and the
//! CLI commands.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use crate::core::{RestTopologyClient, TopologyConfig};
use crate::metrics::client::DEFAULT_BROKER_LABEL;
use crate::metrics::{MetricsClient, MetricsConfig};
use crate::schema::Schema;

#[derive(Debug, Args, Clone)]
pub struct UpstreamArgs {
    /// Kafka REST v3 admin API base URL
    #[arg(
        long,
        global = true,
        env = "LENS_ADMIN_URL",
        default_value = "http://127.0.0.1:8082"
    )]
    pub admin_url: String,

    /// Cluster to address; discovered from the admin API when omitted
    #[arg(long, global = true, env = "LENS_CLUSTER_ID")]
    pub cluster_id: Option<String>,

    /// Admin API request timeout in milliseconds
    #[arg(long, global = true, default_value_t = 5000)]
    pub request_timeout_ms: u64,

    /// Prometheus base URL
    #[arg(
        long,
        global = true,
        env = "LENS_PROMETHEUS_URL",
        default_value = "http://localhost:9090"
    )]
    pub prometheus_url: String,

    /// Metrics timeout in milliseconds
    #[arg(long, global = true, default_value_t = 5000)]
    pub metrics_timeout_ms: u64,

    /// Prometheus label carrying the broker id
    #[arg(long, global = true, env = "LENS_BROKER_LABEL", default_value = DEFAULT_BROKER_LABEL)]
    pub broker_label: String,
}

impl UpstreamArgs {
    pub fn topology_config(&self) -> TopologyConfig {
        TopologyConfig {
            endpoint: self.admin_url.clone(),
            request_timeout_ms: self.request_timeout_ms,
            cluster_id: self.cluster_id.clone(),
        }
    }

    pub fn metrics_config(&self) -> MetricsConfig {
        MetricsConfig {
            base_url: self.prometheus_url.clone(),
            timeout_ms: self.metrics_timeout_ms,
            broker_label: self.broker_label.clone(),
        }
    }

    /// Connect both adapters and build the query/mutation roots over them.
    pub async fn connect(&self) -> Result<Schema> {
        info!("Connecting to cluster admin API at {}", self.admin_url);
        let topology = RestTopologyClient::connect(self.topology_config())
            .await
            .with_context(|| format!("unable to reach cluster admin API at {}", self.admin_url))?;

        let metrics = MetricsClient::new(self.metrics_config())?;
        info!("Using Prometheus at {}", self.prometheus_url);

        Ok(Schema::new(Arc::new(topology), Arc::new(metrics)))
    }
}
