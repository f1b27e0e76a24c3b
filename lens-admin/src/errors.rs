use thiserror::Error;

pub type Result<T> = std::result::Result<T, LensError>;

/// Failures of the cluster admin API.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("cluster admin API unavailable: {0}")]
    Unavailable(String),

    #[error("cluster admin API timed out: {0}")]
    Timeout(String),

    #[error("topic not found: {0}")]
    TopicNotFound(String),

    #[error("cluster admin API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("unable to decode admin API response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for TopologyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TopologyError::Timeout(err.to_string())
        } else if err.is_connect() {
            TopologyError::Unavailable(err.to_string())
        } else if err.is_decode() {
            TopologyError::Decode(err.to_string())
        } else {
            TopologyError::Api {
                status: err.status().map(|s| s.as_u16()).unwrap_or(0),
                message: err.to_string(),
            }
        }
    }
}

/// Failures of the metrics query API.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// The metrics source itself cannot be reached.
    #[error("metrics source unreachable: {0}")]
    Unreachable(String),

    /// The query failed or the source answered with an error status.
    #[error("metrics query failed: {0}")]
    Query(String),

    #[error("unable to decode metrics response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for MetricsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            MetricsError::Unreachable(err.to_string())
        } else if err.is_decode() {
            MetricsError::Decode(err.to_string())
        } else {
            MetricsError::Query(err.to_string())
        }
    }
}

/// Request level failures returned by the query and mutation surface.
#[derive(Debug, Error)]
pub enum LensError {
    #[error("adapter unavailable: {0}")]
    AdapterUnavailable(String),

    #[error("adapter timed out: {0}")]
    Timeout(String),

    #[error(transparent)]
    Topology(TopologyError),

    #[error(transparent)]
    Metrics(MetricsError),
}

impl From<TopologyError> for LensError {
    fn from(err: TopologyError) -> Self {
        match err {
            TopologyError::Unavailable(msg) => LensError::AdapterUnavailable(msg),
            TopologyError::Timeout(msg) => LensError::Timeout(msg),
            other => LensError::Topology(other),
        }
    }
}

impl From<MetricsError> for LensError {
    fn from(err: MetricsError) -> Self {
        match err {
            MetricsError::Unreachable(msg) => LensError::AdapterUnavailable(msg),
            other => LensError::Metrics(other),
        }
    }
}

impl TopologyError {
    /// Whether the admin API itself is out of reach, as opposed to a single
    /// call being refused.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, TopologyError::Unavailable(_) | TopologyError::Timeout(_))
    }
}

/// Per topic failure of a reassignment batch.
#[derive(Debug, Error)]
pub enum ReassignError {
    #[error("topic not found: {0}")]
    TopicNotFound(String),

    #[error("unable to read current assignment of topic {topic}: {source}")]
    Fetch {
        topic: String,
        #[source]
        source: TopologyError,
    },

    #[error("reassignment rejected for topic {topic}: {source}")]
    Submit {
        topic: String,
        #[source]
        source: TopologyError,
    },
}
