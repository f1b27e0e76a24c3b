//! Partition reassignment plans.
//!
//! The delta between the current and the desired replica list decides what is
//! submitted to the admin API. The effective list is the desired list followed
//! by the replicas being retired, so the move stays incremental and the first
//! desired replica becomes the preferred leader.

use serde::{Deserialize, Serialize};

use crate::model::{BrokerId, PartitionId};

/// Desired replica list for one partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionAssignment {
    pub partition: PartitionId,
    pub replicas: Vec<BrokerId>,
}

/// Desired assignment for the partitions of one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicAssignment {
    pub topic: String,
    pub partition_assignment: Vec<PartitionAssignment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionReassignment {
    pub partition: PartitionId,
    /// Effective replica list submitted to the admin API.
    pub replicas: Vec<BrokerId>,
    pub adding_replicas: Vec<BrokerId>,
    pub removing_replicas: Vec<BrokerId>,
}

impl PartitionReassignment {
    /// Computes the move from `current` to `desired`.
    ///
    /// `current` is only used for membership and for the order of the retired
    /// replicas. Nothing is sorted or deduplicated.
    pub fn compute(partition: PartitionId, current: &[BrokerId], desired: &[BrokerId]) -> Self {
        let adding_replicas: Vec<BrokerId> = desired
            .iter()
            .filter(|id| !current.contains(id))
            .copied()
            .collect();
        let removing_replicas: Vec<BrokerId> = current
            .iter()
            .filter(|id| !desired.contains(id))
            .copied()
            .collect();

        let mut replicas = Vec::with_capacity(desired.len() + removing_replicas.len());
        replicas.extend_from_slice(desired);
        replicas.extend_from_slice(&removing_replicas);

        PartitionReassignment {
            partition,
            replicas,
            adding_replicas,
            removing_replicas,
        }
    }

    /// The assignment to submit downstream for this partition.
    pub fn as_assignment(&self) -> PartitionAssignment {
        PartitionAssignment {
            partition: self.partition,
            replicas: self.replicas.clone(),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.adding_replicas.is_empty() && self.removing_replicas.is_empty()
    }
}

/// Per topic reassignment report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicReassignment {
    pub name: String,
    pub partitions: Vec<PartitionReassignment>,
}

impl TopicReassignment {
    /// Builds the plan for every partition of `desired`, in request order.
    /// A partition unknown to `current` is planned against an empty replica list.
    pub fn plan(desired: &TopicAssignment, current: &[(PartitionId, Vec<BrokerId>)]) -> Self {
        let partitions = desired
            .partition_assignment
            .iter()
            .map(|wanted| {
                let current_replicas = current
                    .iter()
                    .find(|(partition, _)| *partition == wanted.partition)
                    .map(|(_, replicas)| replicas.as_slice())
                    .unwrap_or(&[]);
                PartitionReassignment::compute(wanted.partition, current_replicas, &wanted.replicas)
            })
            .collect();

        TopicReassignment {
            name: desired.topic.clone(),
            partitions,
        }
    }

    pub fn assignments(&self) -> Vec<PartitionAssignment> {
        self.partitions.iter().map(|p| p.as_assignment()).collect()
    }
}

/// Reassignment in flight as reported by the admin API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OngoingReassignment {
    pub topic: String,
    pub partition: PartitionId,
    pub replicas: Vec<BrokerId>,
    pub adding_replicas: Vec<BrokerId>,
    pub removing_replicas: Vec<BrokerId>,
}
