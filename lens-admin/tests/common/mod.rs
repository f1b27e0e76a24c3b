#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lens_admin::core::TopologySource;
use lens_admin::metrics::{InstantVector, MetricsSource, RangeVector};
use lens_admin::{MetricsError, Schema, TopologyError};
use lens_core::{
    Broker, ClusterInfo, NewTopic, OngoingReassignment, Partition, PartitionAssignment, Topic,
    TimeWindow,
};

/// Unix time used for every fake sample (2023-11-14T22:13:20Z)
pub const T0: f64 = 1_700_000_000.0;
pub const T0_RFC3339: &str = "2023-11-14T22:13:20+00:00";

/// In-memory cluster admin API
#[derive(Default)]
pub struct FakeTopology {
    pub brokers: Mutex<Vec<Broker>>,
    pub controller: Mutex<Option<Broker>>,
    pub topics: Mutex<Vec<Topic>>,
    pub created: Mutex<Vec<NewTopic>>,
    pub submitted: Mutex<Vec<(String, Vec<PartitionAssignment>)>>,
    pub ongoing: Mutex<Vec<OngoingReassignment>>,
    /// Topics whose reassignment submit is refused with HTTP 400
    pub reject_submit: Mutex<Vec<String>>,
    /// Topics whose reassignment submit times out
    pub timeout_submit: Mutex<Vec<String>>,
    pub unavailable: Mutex<bool>,
    pub delete_topic_disabled: Mutex<bool>,
    /// HTTP status the `delete.topic.enable` lookup is answered with
    pub delete_topic_lookup_status: Mutex<Option<u16>>,
}

impl FakeTopology {
    pub fn with_brokers(ids: &[i32]) -> Self {
        let fake = FakeTopology::default();
        *fake.brokers.lock().unwrap() = ids
            .iter()
            .map(|id| Broker::new(*id, format!("kafka-{}", id), 9092))
            .collect();
        *fake.controller.lock().unwrap() = fake.brokers.lock().unwrap().first().cloned();
        fake
    }

    pub fn add_topic(&self, name: &str, assignment: &[(i32, &[i32])]) {
        let partitions = assignment
            .iter()
            .map(|(p, replicas)| Partition {
                partition: *p,
                leader: replicas.first().copied(),
                replicas: replicas.to_vec(),
                isr: replicas.to_vec(),
                offline_replicas: Vec::new(),
            })
            .collect();
        self.topics.lock().unwrap().push(Topic::new(name, partitions));
    }

    pub fn set_unavailable(&self, down: bool) {
        *self.unavailable.lock().unwrap() = down;
    }

    pub fn submitted(&self) -> Vec<(String, Vec<PartitionAssignment>)> {
        self.submitted.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), TopologyError> {
        if *self.unavailable.lock().unwrap() {
            return Err(TopologyError::Unavailable("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl TopologySource for FakeTopology {
    async fn cluster_info(&self) -> Result<ClusterInfo, TopologyError> {
        self.check()?;
        Ok(ClusterInfo {
            cluster_id: "fake-cluster".into(),
            brokers: self.brokers.lock().unwrap().clone(),
            active_controller: self.controller.lock().unwrap().clone(),
        })
    }

    async fn all_topics(&self) -> Result<Vec<Topic>, TopologyError> {
        self.check()?;
        Ok(self.topics.lock().unwrap().clone())
    }

    async fn single_topic(&self, name: &str) -> Result<Option<Topic>, TopologyError> {
        self.check()?;
        Ok(self
            .topics
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.name == name)
            .cloned())
    }

    async fn create_topic(&self, topic: &NewTopic) -> Result<Topic, TopologyError> {
        self.check()?;
        let mut topics = self.topics.lock().unwrap();
        if topics.iter().any(|t| t.name == topic.name) {
            return Err(TopologyError::Api {
                status: 409,
                message: format!("topic {} already exists", topic.name),
            });
        }
        self.created.lock().unwrap().push(topic.clone());
        let created = Topic::new(topic.name.clone(), Vec::new());
        topics.push(created.clone());
        Ok(created)
    }

    async fn delete_topic(&self, name: &str) -> Result<String, TopologyError> {
        self.check()?;
        let mut topics = self.topics.lock().unwrap();
        let before = topics.len();
        topics.retain(|t| t.name != name);
        if topics.len() == before {
            return Err(TopologyError::TopicNotFound(name.to_string()));
        }
        Ok(name.to_string())
    }

    async fn submit_reassignment(
        &self,
        topic: &str,
        assignments: &[PartitionAssignment],
    ) -> Result<(), TopologyError> {
        self.check()?;
        if self.timeout_submit.lock().unwrap().iter().any(|t| t == topic) {
            return Err(TopologyError::Timeout("operation timed out".into()));
        }
        if self.reject_submit.lock().unwrap().iter().any(|t| t == topic) {
            return Err(TopologyError::Api {
                status: 400,
                message: "replica assignment rejected".into(),
            });
        }
        self.submitted
            .lock()
            .unwrap()
            .push((topic.to_string(), assignments.to_vec()));
        Ok(())
    }

    async fn ongoing_reassignments(&self) -> Result<Vec<OngoingReassignment>, TopologyError> {
        self.check()?;
        Ok(self.ongoing.lock().unwrap().clone())
    }

    async fn delete_topic_enabled(&self) -> Result<bool, TopologyError> {
        self.check()?;
        if let Some(status) = *self.delete_topic_lookup_status.lock().unwrap() {
            return Err(TopologyError::Api {
                status,
                message: "Config delete.topic.enable cannot be found".into(),
            });
        }
        Ok(!*self.delete_topic_disabled.lock().unwrap())
    }
}

#[derive(Clone, Copy)]
enum FailWith {
    Query,
    Unreachable,
}

/// In-memory metrics source answering by query substring; the first
/// registered needle contained in a query wins, anything else is empty.
#[derive(Default)]
pub struct FakeMetrics {
    instant: Vec<(String, Vec<InstantVector>)>,
    range: Vec<(String, Vec<RangeVector>)>,
    failing: Vec<(String, FailWith)>,
    pub queries: Mutex<Vec<String>>,
}

impl FakeMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instant(mut self, needle: &str, result: Vec<InstantVector>) -> Self {
        self.instant.push((needle.to_string(), result));
        self
    }

    pub fn range(mut self, needle: &str, result: Vec<RangeVector>) -> Self {
        self.range.push((needle.to_string(), result));
        self
    }

    /// Queries containing `needle` fail as a bad query
    pub fn failing(mut self, needle: &str) -> Self {
        self.failing.push((needle.to_string(), FailWith::Query));
        self
    }

    /// Queries containing `needle` fail as if the source were down
    pub fn unreachable(mut self, needle: &str) -> Self {
        self.failing.push((needle.to_string(), FailWith::Unreachable));
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    fn record(&self, query: &str) -> Result<(), MetricsError> {
        self.queries.lock().unwrap().push(query.to_string());
        match self.failing.iter().find(|(needle, _)| query.contains(needle.as_str())) {
            Some((_, FailWith::Query)) => Err(MetricsError::Query("bad_data".into())),
            Some((_, FailWith::Unreachable)) => {
                Err(MetricsError::Unreachable("connection refused".into()))
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MetricsSource for FakeMetrics {
    async fn query_instant(&self, query: &str) -> Result<Vec<InstantVector>, MetricsError> {
        self.record(query)?;
        Ok(self
            .instant
            .iter()
            .find(|(needle, _)| query.contains(needle.as_str()))
            .map(|(_, r)| r.clone())
            .unwrap_or_default())
    }

    async fn query_range(
        &self,
        query: &str,
        _window: &TimeWindow,
    ) -> Result<Vec<RangeVector>, MetricsError> {
        self.record(query)?;
        Ok(self
            .range
            .iter()
            .find(|(needle, _)| query.contains(needle.as_str()))
            .map(|(_, r)| r.clone())
            .unwrap_or_default())
    }
}

/// One instant sample with the given labels
pub fn sample(labels: &[(&str, &str)], value: f64) -> InstantVector {
    InstantVector {
        metric: labels_map(labels),
        value: (T0, value.to_string()),
    }
}

/// One broker-labeled instant sample
pub fn broker_sample(broker_id: i32, value: f64) -> InstantVector {
    let id = broker_id.to_string();
    sample(&[("broker_id", id.as_str())], value)
}

/// A range series with one point per value, 60s apart starting at `T0`
pub fn series(labels: &[(&str, &str)], values: &[f64]) -> RangeVector {
    RangeVector {
        metric: labels_map(labels),
        values: values
            .iter()
            .enumerate()
            .map(|(i, v)| (T0 + 60.0 * i as f64, v.to_string()))
            .collect(),
    }
}

fn labels_map(labels: &[(&str, &str)]) -> HashMap<String, String> {
    labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn schema(topology: Arc<FakeTopology>, metrics: Arc<FakeMetrics>) -> Schema {
    Schema::new(topology, metrics)
}
