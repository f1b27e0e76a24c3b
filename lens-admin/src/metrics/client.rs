use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use lens_core::TimeWindow;
use serde::{de::DeserializeOwned, Deserialize};
use tracing::debug;

use crate::errors::MetricsError;

/// Label carrying the broker id on broker-scoped series, unless configured otherwise
pub const DEFAULT_BROKER_LABEL: &str = "broker_id";

#[derive(Clone, Debug)]
pub struct MetricsConfig {
    pub base_url: String, // Prometheus base url, e.g. http://localhost:9090
    pub timeout_ms: u64,  // per-query timeout
    pub broker_label: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var("LENS_PROMETHEUS_URL")
                .unwrap_or_else(|_| "http://localhost:9090".to_string()),
            timeout_ms: 5000,
            broker_label: DEFAULT_BROKER_LABEL.to_string(),
        }
    }
}

/// Prometheus API envelope
#[derive(Debug, Clone, Deserialize)]
pub struct PromResponse<T> {
    pub status: String,
    pub data: Option<PromData<T>>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PromData<T> {
    #[serde(rename = "resultType")]
    pub result_type: String,
    pub result: Vec<T>,
}

/// One series of an instant query: `(unix_seconds, "value")`
#[derive(Debug, Clone, Deserialize)]
pub struct InstantVector {
    #[serde(default)]
    pub metric: HashMap<String, String>,
    pub value: (f64, String),
}

/// One series of a range query
#[derive(Debug, Clone, Deserialize)]
pub struct RangeVector {
    #[serde(default)]
    pub metric: HashMap<String, String>,
    #[serde(default)]
    pub values: Vec<(f64, String)>,
}

/// Metrics query boundary.
///
/// The source only answers multi-entity queries; narrowing to one entity is
/// the caller's job.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    async fn query_instant(&self, query: &str) -> Result<Vec<InstantVector>, MetricsError>;

    async fn query_range(
        &self,
        query: &str,
        window: &TimeWindow,
    ) -> Result<Vec<RangeVector>, MetricsError>;

    /// Label holding the broker id on broker-scoped series.
    fn broker_label(&self) -> &str {
        DEFAULT_BROKER_LABEL
    }
}

/// Prometheus HTTP API client
#[derive(Clone)]
pub struct MetricsClient {
    cfg: MetricsConfig,
    http: reqwest::Client,
}

impl MetricsClient {
    pub fn new(cfg: MetricsConfig) -> Result<Self, MetricsError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(|e| MetricsError::Unreachable(e.to_string()))?;
        Ok(Self { cfg, http })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>, MetricsError> {
        let url = format!("{}{}", self.cfg.base_url.trim_end_matches('/'), path);
        debug!(%url, ?params, "metrics query");
        let resp = self.http.get(&url).query(params).send().await?;
        let status = resp.status();
        let body: PromResponse<T> = match resp.json().await {
            Ok(body) => body,
            Err(e) if status.is_success() => return Err(MetricsError::Decode(e.to_string())),
            Err(_) => return Err(MetricsError::Query(format!("HTTP {}", status))),
        };
        into_result(body)
    }
}

fn into_result<T>(body: PromResponse<T>) -> Result<Vec<T>, MetricsError> {
    if body.status != "success" {
        return Err(MetricsError::Query(
            body.error.unwrap_or_else(|| format!("status {}", body.status)),
        ));
    }
    body.data
        .map(|d| d.result)
        .ok_or_else(|| MetricsError::Decode("missing data section".to_string()))
}

#[async_trait]
impl MetricsSource for MetricsClient {
    async fn query_instant(&self, query: &str) -> Result<Vec<InstantVector>, MetricsError> {
        self.get("/api/v1/query", &[("query", query.to_string())])
            .await
    }

    async fn query_range(
        &self,
        query: &str,
        window: &TimeWindow,
    ) -> Result<Vec<RangeVector>, MetricsError> {
        self.get(
            "/api/v1/query_range",
            &[
                ("query", query.to_string()),
                ("start", window.start.to_string()),
                ("end", window.end.to_string()),
                ("step", window.step.clone()),
            ],
        )
        .await
    }

    fn broker_label(&self) -> &str {
        &self.cfg.broker_label
    }
}
