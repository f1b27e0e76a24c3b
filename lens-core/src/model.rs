use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

pub type BrokerId = i32;
pub type PartitionId = i32;

/// Sentinel sent downstream when the cluster default should be used for
/// the replication factor or the partition count of a new topic.
pub const CLUSTER_DEFAULT: i32 = -1;

/// Time range used to parameterize metric fields.
/// `start` and `end` are unix seconds, `step` is a duration such as `15s` or `1m`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: i64,
    pub end: i64,
    pub step: String,
}

impl TimeWindow {
    pub fn new(start: i64, end: i64, step: impl Into<String>) -> Self {
        TimeWindow {
            start,
            end,
            step: step.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Broker {
    #[serde(rename = "brokerId")]
    pub broker_id: BrokerId,
    #[serde(rename = "brokerHost")]
    pub host: String,
    #[serde(rename = "brokerPort")]
    pub port: u16,
    // only used to parameterize metric sub-fields, never part of the payload
    #[serde(skip)]
    pub window: Option<TimeWindow>,
}

impl Broker {
    pub fn new(broker_id: BrokerId, host: impl Into<String>, port: u16) -> Self {
        Broker {
            broker_id,
            host: host.into(),
            port,
            window: None,
        }
    }

    pub fn with_window(mut self, window: Option<TimeWindow>) -> Self {
        self.window = window;
        self
    }
}

impl Display for Broker {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "broker {} ({}:{})", self.broker_id, self.host, self.port)
    }
}

/// Topology snapshot of the cluster as reported by the admin API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterInfo {
    pub cluster_id: String,
    pub brokers: Vec<Broker>,
    pub active_controller: Option<Broker>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partition {
    pub partition: PartitionId,
    pub leader: Option<BrokerId>,
    // ordered, the first entry is the preferred leader
    pub replicas: Vec<BrokerId>,
    pub isr: Vec<BrokerId>,
    #[serde(default)]
    pub offline_replicas: Vec<BrokerId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub name: String,
    pub partitions: Vec<Partition>,
}

impl Topic {
    pub fn new(name: impl Into<String>, partitions: Vec<Partition>) -> Self {
        Topic {
            name: name.into(),
            partitions,
        }
    }

    pub fn num_partitions(&self) -> usize {
        self.partitions.len()
    }

    /// Current partition -> replica list mapping, in partition order as reported.
    pub fn replica_assignment(&self) -> Vec<(PartitionId, Vec<BrokerId>)> {
        self.partitions
            .iter()
            .map(|p| (p.partition, p.replicas.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub name: String,
    pub value: String,
}

/// Topic creation request. Build it with [`NewTopic::new`] so the
/// replication factor and partition count are normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTopic {
    pub name: String,
    pub replication_factor: i32,
    pub num_partitions: i32,
    pub config_entries: Vec<ConfigEntry>,
}

impl NewTopic {
    pub fn new(
        name: impl Into<String>,
        replication_factor: Option<i32>,
        num_partitions: Option<i32>,
        config_entries: Vec<ConfigEntry>,
    ) -> Self {
        NewTopic {
            name: name.into(),
            replication_factor: or_cluster_default(replication_factor),
            num_partitions: or_cluster_default(num_partitions),
            config_entries,
        }
    }
}

fn or_cluster_default(value: Option<i32>) -> i32 {
    match value {
        Some(v) if v > 0 => v,
        _ => CLUSTER_DEFAULT,
    }
}
