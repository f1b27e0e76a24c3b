/// Configuration for the cluster admin (Kafka REST v3) client
#[derive(Clone, Debug)]
pub struct TopologyConfig {
    pub endpoint: String,
    pub request_timeout_ms: u64,
    /// Cluster to address; discovered from the admin API when unset
    pub cluster_id: Option<String>,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            endpoint: std::env::var("LENS_ADMIN_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8082".to_string()),
            request_timeout_ms: 5000,
            cluster_id: std::env::var("LENS_CLUSTER_ID").ok(),
        }
    }
}
