use std::time::Duration;

use async_trait::async_trait;
use futures::future::try_join_all;
use lens_core::{
    Broker, BrokerId, ClusterInfo, NewTopic, OngoingReassignment, Partition, PartitionAssignment,
    PartitionId, Topic,
};
use reqwest::{Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, info};

use super::config::TopologyConfig;
use super::topology::TopologySource;
use crate::errors::TopologyError;

const DELETE_TOPIC_DEFAULT: bool = true;

/// Cluster admin client over the Kafka REST v3 API
pub struct RestTopologyClient {
    http: reqwest::Client,
    base_url: String,
    cluster_id: String,
}

impl RestTopologyClient {
    /// Builds the shared HTTP client and resolves the cluster id once
    pub async fn connect(config: TopologyConfig) -> Result<Self, TopologyError> {
        // Accept either full URL (http/https) or host:port; default to http if no scheme
        let base_url =
            if config.endpoint.starts_with("http://") || config.endpoint.starts_with("https://") {
                config.endpoint.trim_end_matches('/').to_string()
            } else {
                format!("http://{}", config.endpoint.trim_end_matches('/'))
            };

        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| TopologyError::Unavailable(e.to_string()))?;

        let cluster_id = match config.cluster_id {
            Some(id) => id,
            None => {
                let url = format!("{}/v3/clusters", base_url);
                let list: Listing<RestCluster> = decode(http.get(&url).send().await?).await?;
                list.data
                    .into_iter()
                    .next()
                    .map(|c| c.cluster_id)
                    .ok_or_else(|| TopologyError::Unavailable("admin API reports no cluster".into()))?
            }
        };
        info!("Using Kafka cluster {} at {}", cluster_id, base_url);

        Ok(Self {
            http,
            base_url,
            cluster_id,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v3/clusters/{}{}", self.base_url, self.cluster_id, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, TopologyError> {
        let url = self.url(path);
        debug!(%url, "admin api request");
        decode(self.http.get(&url).send().await?).await
    }

    /// Ids of the brokers currently registered with the cluster
    async fn live_broker_ids(&self) -> Result<Vec<BrokerId>, TopologyError> {
        let brokers: Listing<RestBroker> = self.get_json("/brokers").await?;
        Ok(brokers.data.into_iter().map(|b| b.broker_id).collect())
    }

    async fn describe_partitions(
        &self,
        topic: &str,
        live: &[BrokerId],
    ) -> Result<Vec<Partition>, TopologyError> {
        let partitions: Listing<RestPartition> = self
            .get_json(&format!("/topics/{}/partitions", topic))
            .await?;

        let fetches = partitions.data.into_iter().map(|p| async move {
            let replicas: Listing<RestReplica> = self
                .get_json(&format!(
                    "/topics/{}/partitions/{}/replicas",
                    topic, p.partition_id
                ))
                .await?;
            Ok::<_, TopologyError>(p.into_partition(replicas.data, live))
        });

        let mut out = try_join_all(fetches).await?;
        out.sort_by_key(|p| p.partition);
        Ok(out)
    }
}

#[async_trait]
impl TopologySource for RestTopologyClient {
    async fn cluster_info(&self) -> Result<ClusterInfo, TopologyError> {
        let cluster: RestCluster = self.get_json("").await?;
        let brokers: Listing<RestBroker> = self.get_json("/brokers").await?;

        let brokers = brokers
            .data
            .into_iter()
            .map(Broker::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let active_controller = cluster
            .controller
            .as_ref()
            .and_then(|c| related_id(&c.related))
            .and_then(|id| brokers.iter().find(|b| b.broker_id == id).cloned());

        Ok(ClusterInfo {
            cluster_id: cluster.cluster_id,
            brokers,
            active_controller,
        })
    }

    async fn all_topics(&self) -> Result<Vec<Topic>, TopologyError> {
        let (topics, live) = futures::try_join!(
            self.get_json::<Listing<RestTopic>>("/topics"),
            self.live_broker_ids()
        )?;
        let live = &live;
        let fetches = topics.data.into_iter().map(|t| async move {
            let partitions = self.describe_partitions(&t.topic_name, live).await?;
            Ok::<_, TopologyError>(Topic::new(t.topic_name, partitions))
        });
        try_join_all(fetches).await
    }

    async fn single_topic(&self, name: &str) -> Result<Option<Topic>, TopologyError> {
        let live = self.live_broker_ids().await?;
        match self.describe_partitions(name, &live).await {
            Ok(partitions) => Ok(Some(Topic::new(name, partitions))),
            Err(TopologyError::Api { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn create_topic(&self, topic: &NewTopic) -> Result<Topic, TopologyError> {
        let body = CreateTopicBody {
            topic_name: &topic.name,
            partitions_count: topic.num_partitions,
            replication_factor: topic.replication_factor,
            configs: topic
                .config_entries
                .iter()
                .map(|c| ConfigBody {
                    name: &c.name,
                    value: &c.value,
                })
                .collect(),
        };
        let url = self.url("/topics");
        debug!(%url, topic = %topic.name, "admin api create topic");
        let created: RestTopic = decode(self.http.post(&url).json(&body).send().await?).await?;
        Ok(Topic::new(created.topic_name, Vec::new()))
    }

    async fn delete_topic(&self, name: &str) -> Result<String, TopologyError> {
        let url = self.url(&format!("/topics/{}", name));
        debug!(%url, "admin api delete topic");
        match check(self.http.delete(&url).send().await?).await {
            Ok(_) => Ok(name.to_string()),
            Err(TopologyError::Api { status: 404, .. }) => {
                Err(TopologyError::TopicNotFound(name.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    async fn submit_reassignment(
        &self,
        topic: &str,
        assignments: &[PartitionAssignment],
    ) -> Result<(), TopologyError> {
        let body = ReassignmentBody {
            partitions: assignments
                .iter()
                .map(|a| PartitionReplicasBody {
                    partition_id: a.partition,
                    replicas: &a.replicas,
                })
                .collect(),
        };
        let url = self.url(&format!("/topics/{}/partitions/-/reassignment", topic));
        debug!(%url, partitions = assignments.len(), "admin api submit reassignment");
        match check(self.http.patch(&url).json(&body).send().await?).await {
            Ok(_) => Ok(()),
            Err(TopologyError::Api { status: 404, .. }) => {
                Err(TopologyError::TopicNotFound(topic.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    async fn ongoing_reassignments(&self) -> Result<Vec<OngoingReassignment>, TopologyError> {
        let list: Listing<RestReassignment> = self
            .get_json("/topics/-/partitions/-/reassignment")
            .await?;
        Ok(list.data.into_iter().map(OngoingReassignment::from).collect())
    }

    async fn delete_topic_enabled(&self) -> Result<bool, TopologyError> {
        // Only dynamic cluster configs are listed here, a static setting is a 404
        let config = match self
            .get_json::<RestConfig>("/broker-configs/delete.topic.enable")
            .await
        {
            Ok(config) => Some(config),
            Err(TopologyError::Api { status: 404, .. }) => None,
            Err(e) => return Err(e),
        };
        Ok(delete_topic_value(config))
    }
}

async fn check(resp: Response) -> Result<Response, TopologyError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = match resp.json::<RestError>().await {
        Ok(err) => err.message.unwrap_or_default(),
        Err(_) => String::new(),
    };
    if status == StatusCode::SERVICE_UNAVAILABLE || status == StatusCode::BAD_GATEWAY {
        return Err(TopologyError::Unavailable(format!("HTTP {}: {}", status, message)));
    }
    Err(TopologyError::Api {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, TopologyError> {
    let resp = check(resp).await?;
    resp.json::<T>()
        .await
        .map_err(|e| TopologyError::Decode(e.to_string()))
}

// Kafka enables topic deletion unless told otherwise
fn delete_topic_value(config: Option<RestConfig>) -> bool {
    config
        .and_then(|c| c.value)
        .map_or(DELETE_TOPIC_DEFAULT, |v| v.eq_ignore_ascii_case("true"))
}

// Related links end with the id of the referenced resource, e.g. `.../brokers/1`
fn related_id(related: &str) -> Option<BrokerId> {
    related.trim_end_matches('/').rsplit('/').next()?.parse().ok()
}

// ===== Kafka REST v3 wire types =====

#[derive(Debug, Deserialize)]
struct Listing<T> {
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct Related {
    related: String,
}

#[derive(Debug, Deserialize)]
struct RestCluster {
    cluster_id: String,
    #[serde(default)]
    controller: Option<Related>,
}

#[derive(Debug, Deserialize)]
struct RestBroker {
    broker_id: BrokerId,
    #[serde(default)]
    host: Option<String>,
    #[serde(default)]
    port: Option<u16>,
}

impl TryFrom<RestBroker> for Broker {
    type Error = TopologyError;

    fn try_from(b: RestBroker) -> Result<Self, Self::Error> {
        match (b.host, b.port) {
            (Some(host), Some(port)) => Ok(Broker::new(b.broker_id, host, port)),
            _ => Err(TopologyError::Decode(format!(
                "broker {} is listed without host and port",
                b.broker_id
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RestTopic {
    topic_name: String,
}

#[derive(Debug, Deserialize)]
struct RestPartition {
    partition_id: PartitionId,
}

impl RestPartition {
    /// Replicas on brokers missing from `live` are reported offline
    fn into_partition(self, replicas: Vec<RestReplica>, live: &[BrokerId]) -> Partition {
        let leader = replicas.iter().find(|r| r.is_leader).map(|r| r.broker_id);
        let isr = replicas
            .iter()
            .filter(|r| r.is_in_sync)
            .map(|r| r.broker_id)
            .collect();
        let offline_replicas = replicas
            .iter()
            .map(|r| r.broker_id)
            .filter(|id| !live.contains(id))
            .collect();
        Partition {
            partition: self.partition_id,
            leader,
            replicas: replicas.iter().map(|r| r.broker_id).collect(),
            isr,
            offline_replicas,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RestReplica {
    broker_id: BrokerId,
    #[serde(default)]
    is_leader: bool,
    #[serde(default)]
    is_in_sync: bool,
}

#[derive(Debug, Deserialize)]
struct RestReassignment {
    topic_name: String,
    partition_id: PartitionId,
    #[serde(default)]
    replicas: Vec<BrokerId>,
    #[serde(default)]
    adding_replicas: Vec<BrokerId>,
    #[serde(default)]
    removing_replicas: Vec<BrokerId>,
}

impl From<RestReassignment> for OngoingReassignment {
    fn from(r: RestReassignment) -> Self {
        OngoingReassignment {
            topic: r.topic_name,
            partition: r.partition_id,
            replicas: r.replicas,
            adding_replicas: r.adding_replicas,
            removing_replicas: r.removing_replicas,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RestConfig {
    #[serde(default)]
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RestError {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Serialize)]
struct CreateTopicBody<'a> {
    topic_name: &'a str,
    partitions_count: i32,
    replication_factor: i32,
    configs: Vec<ConfigBody<'a>>,
}

#[derive(Serialize)]
struct ConfigBody<'a> {
    name: &'a str,
    value: &'a str,
}

#[derive(Serialize)]
struct ReassignmentBody<'a> {
    partitions: Vec<PartitionReplicasBody<'a>>,
}

#[derive(Serialize)]
struct PartitionReplicasBody<'a> {
    partition_id: PartitionId,
    replicas: &'a [BrokerId],
}
