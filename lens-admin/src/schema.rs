//! Query and mutation roots
//!
//! Typed entry points over the two adapters. Transport layers (HTTP, CLI)
//! only translate arguments and serialize what these return.

use std::sync::Arc;

use lens_core::metric::{BytesIn, BytesOut, RequestTime};
use lens_core::{
    BrokerId, LabeledSeries, NewTopic, OngoingReassignment, Sample, TimeWindow, Topic,
    TopicAssignment,
};
use tracing::info;

use crate::core::TopologySource;
use crate::errors::{MetricsError, Result, TopologyError};
use crate::metrics::queries::{series, RequestKind};
use crate::metrics::MetricsSource;
use crate::reassign::{reassign_partitions, ReassignMode, TopicOutcome};
use crate::resolve::{
    field, resolve_broker, resolve_brokers, resolve_cluster, resolve_topic, resolve_topics,
    BrokerFields, BrokerView, ClusterFields, ClusterView, TopicFields, TopicView,
};

/// Both roots over one pair of adapters
#[derive(Clone)]
pub struct Schema {
    pub query: Query,
    pub mutation: Mutation,
}

impl Schema {
    pub fn new(topology: Arc<dyn TopologySource>, metrics: Arc<dyn MetricsSource>) -> Self {
        Schema {
            query: Query {
                topology: topology.clone(),
                metrics,
            },
            mutation: Mutation { topology },
        }
    }
}

#[derive(Clone)]
pub struct Query {
    topology: Arc<dyn TopologySource>,
    metrics: Arc<dyn MetricsSource>,
}

impl Query {
    /// Cluster fields plus every broker (and the active controller) with
    /// `broker_fields` resolved; `BrokerFields::default()` keeps them bare.
    pub async fn cluster(
        &self,
        fields: &ClusterFields,
        broker_fields: &BrokerFields,
        window: Option<TimeWindow>,
    ) -> Result<ClusterView> {
        resolve_cluster(
            self.topology.as_ref(),
            self.metrics.as_ref(),
            fields,
            broker_fields,
            window,
        )
        .await
    }

    /// Brokers sorted by id, optionally restricted to `broker_ids`. The
    /// window parameterizes the over-time fields of every broker.
    pub async fn brokers(
        &self,
        window: Option<TimeWindow>,
        broker_ids: Option<&[BrokerId]>,
        fields: &BrokerFields,
    ) -> Result<Vec<BrokerView>> {
        let mut brokers = self.topology.cluster_info().await?.brokers;
        if let Some(ids) = broker_ids {
            brokers.retain(|b| ids.contains(&b.broker_id));
        }
        brokers.sort_by_key(|b| b.broker_id);
        let brokers = brokers
            .into_iter()
            .map(|b| b.with_window(window.clone()))
            .collect();
        resolve_brokers(self.metrics.as_ref(), brokers, fields).await
    }

    /// `None` when no broker with this id is part of the cluster
    pub async fn broker(
        &self,
        broker_id: BrokerId,
        window: Option<TimeWindow>,
        fields: &BrokerFields,
    ) -> Result<Option<BrokerView>> {
        let info = self.topology.cluster_info().await?;
        let Some(broker) = info.brokers.into_iter().find(|b| b.broker_id == broker_id) else {
            return Ok(None);
        };
        let view = resolve_broker(self.metrics.as_ref(), broker.with_window(window), fields).await?;
        Ok(Some(view))
    }

    pub async fn topic(&self, name: &str, fields: &TopicFields) -> Result<Option<TopicView>> {
        match self.topology.single_topic(name).await? {
            Some(topic) => Ok(Some(resolve_topic(self.metrics.as_ref(), topic, fields).await?)),
            None => Ok(None),
        }
    }

    pub async fn topics(&self, fields: &TopicFields) -> Result<Vec<TopicView>> {
        let topics = self.topology.all_topics().await?;
        resolve_topics(self.metrics.as_ref(), topics, fields).await
    }

    /// Median total time of `request` averaged over the selected brokers
    pub async fn total_time_ms(
        &self,
        request: RequestKind,
        broker_ids: Option<&[BrokerId]>,
    ) -> Result<Option<Sample<RequestTime>>> {
        let metrics = self.metrics.as_ref();
        let value = field(true, "totalTimeMs", "cluster", async {
            let all = series::avg_total_time_ms(metrics, request, broker_ids).await?;
            Ok::<_, MetricsError>(all.into_iter().next().and_then(|s| s.values.into_iter().next()))
        })
        .await?;
        Ok(value.into_option())
    }

    /// Per (broker, topic) inbound throughput, `topics` filtering the result
    pub async fn bytes_in_per_second_over_time(
        &self,
        window: &TimeWindow,
        broker_ids: Option<&[BrokerId]>,
        topics: Option<&[String]>,
    ) -> Result<Option<Vec<LabeledSeries<BytesIn>>>> {
        let metrics = self.metrics.as_ref();
        let value = field(true, "bytesInPerSecondOverTime", "cluster", async {
            let all = series::bytes_in_per_sec(metrics, window, broker_ids).await?;
            Ok::<_, MetricsError>(Some(keep_topics(all, topics)))
        })
        .await?;
        Ok(value.into_option())
    }

    pub async fn bytes_out_per_second_over_time(
        &self,
        window: &TimeWindow,
        broker_ids: Option<&[BrokerId]>,
        topics: Option<&[String]>,
    ) -> Result<Option<Vec<LabeledSeries<BytesOut>>>> {
        let metrics = self.metrics.as_ref();
        let value = field(true, "bytesOutPerSecondOverTime", "cluster", async {
            let all = series::bytes_out_per_sec(metrics, window, broker_ids).await?;
            Ok::<_, MetricsError>(Some(keep_topics(all, topics)))
        })
        .await?;
        Ok(value.into_option())
    }

    pub async fn ongoing_reassignments(&self) -> Result<Vec<OngoingReassignment>> {
        Ok(self.topology.ongoing_reassignments().await?)
    }

    pub async fn admin_reachable(&self) -> bool {
        self.topology.cluster_info().await.is_ok()
    }
}

fn keep_topics<M>(
    series: Vec<LabeledSeries<M>>,
    topics: Option<&[String]>,
) -> Vec<LabeledSeries<M>> {
    match topics {
        Some(wanted) => series
            .into_iter()
            .filter(|s| s.topic.as_ref().is_some_and(|t| wanted.contains(t)))
            .collect(),
        None => series,
    }
}

#[derive(Clone)]
pub struct Mutation {
    topology: Arc<dyn TopologySource>,
}

impl Mutation {
    pub async fn add_topic(&self, topic: NewTopic) -> Result<Topic> {
        let created = self.topology.create_topic(&topic).await?;
        info!(
            topic = %created.name,
            partitions = topic.num_partitions,
            replication_factor = topic.replication_factor,
            "topic created"
        );
        Ok(created)
    }

    /// The deleted topic's name, `None` when there was no such topic
    pub async fn delete_topic(&self, name: &str) -> Result<Option<String>> {
        match self.topology.delete_topic(name).await {
            Ok(deleted) => {
                info!(topic = %deleted, "topic deleted");
                Ok(Some(deleted))
            }
            Err(TopologyError::TopicNotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn reassign_partitions(
        &self,
        requests: &[TopicAssignment],
        mode: ReassignMode,
    ) -> Result<Vec<TopicOutcome>> {
        reassign_partitions(self.topology.as_ref(), requests, mode).await
    }
}
