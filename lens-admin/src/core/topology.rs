use async_trait::async_trait;
use lens_core::{
    BrokerId, ClusterInfo, NewTopic, OngoingReassignment, PartitionAssignment, PartitionId, Topic,
};

use crate::errors::TopologyError;

/// Cluster admin boundary.
///
/// Implementations are stateless request/response adapters over one shared
/// connection and must be safe to call from concurrent requests. They never
/// retry; retry policy belongs to the caller.
#[async_trait]
pub trait TopologySource: Send + Sync {
    /// Brokers and active controller. Fails with `Unavailable` when the
    /// admin API cannot be reached.
    async fn cluster_info(&self) -> Result<ClusterInfo, TopologyError>;

    /// Every topic with its partition/replica assignment, no metrics attached.
    async fn all_topics(&self) -> Result<Vec<Topic>, TopologyError>;

    /// `None` when the topic does not exist at the time of the call.
    async fn single_topic(&self, name: &str) -> Result<Option<Topic>, TopologyError>;

    async fn create_topic(&self, topic: &NewTopic) -> Result<Topic, TopologyError>;

    /// Returns the deleted topic name, `TopicNotFound` when there is nothing to delete.
    async fn delete_topic(&self, name: &str) -> Result<String, TopologyError>;

    /// Current partition -> replica list mapping of a topic.
    async fn current_assignment(
        &self,
        topic: &str,
    ) -> Result<Option<Vec<(PartitionId, Vec<BrokerId>)>>, TopologyError> {
        Ok(self
            .single_topic(topic)
            .await?
            .map(|t| t.replica_assignment()))
    }

    /// Submits one reassignment command for the given partitions of a topic.
    /// Returns once the admin API accepted it, not when the move completes.
    async fn submit_reassignment(
        &self,
        topic: &str,
        assignments: &[PartitionAssignment],
    ) -> Result<(), TopologyError>;

    async fn ongoing_reassignments(&self) -> Result<Vec<OngoingReassignment>, TopologyError>;

    /// Whether the cluster accepts topic deletion (`delete.topic.enable`).
    async fn delete_topic_enabled(&self) -> Result<bool, TopologyError>;
}
