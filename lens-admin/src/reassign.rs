//! Partition reassignment orchestration
//!
//! Each topic of a batch is planned against its current assignment and
//! submitted as one command. Topics run concurrently and fail independently;
//! only losing the admin API fails the whole batch. Nothing is rolled back.

use futures::future::join_all;
use lens_core::{TopicAssignment, TopicReassignment};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use tracing::{info, warn};

use crate::core::TopologySource;
use crate::errors::{LensError, ReassignError, TopologyError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReassignMode {
    #[default]
    Submit,
    /// Compute and report the plan without submitting anything
    DryRun,
}

/// Result for one topic of a batch
#[derive(Debug)]
pub struct TopicOutcome {
    pub topic: String,
    pub result: Result<TopicReassignment, ReassignError>,
}

impl TopicOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

impl Serialize for TopicOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.result {
            Ok(plan) => plan.serialize(serializer),
            Err(err) => {
                let mut state = serializer.serialize_struct("TopicOutcome", 2)?;
                state.serialize_field("name", &self.topic)?;
                state.serialize_field("error", &err.to_string())?;
                state.end()
            }
        }
    }
}

/// Plan and submit every topic of `requests`, reporting in request order.
pub async fn reassign_partitions(
    topology: &dyn TopologySource,
    requests: &[TopicAssignment],
    mode: ReassignMode,
) -> Result<Vec<TopicOutcome>, LensError> {
    let results = join_all(requests.iter().map(|r| reassign_topic(topology, r, mode))).await;

    let mut outcomes = Vec::with_capacity(results.len());
    let mut batch_error = None;
    for result in results {
        match result {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => {
                batch_error.get_or_insert(e);
            }
        }
    }

    match batch_error {
        None => Ok(outcomes),
        Some(e) => {
            let submitted = submitted_topics(&outcomes, mode);
            if !submitted.is_empty() {
                warn!(
                    ?submitted,
                    error = %e,
                    "reassignment batch aborted, already submitted topics are not rolled back"
                );
            }
            Err(e)
        }
    }
}

// Topics whose reassignment command reached the admin API
fn submitted_topics(outcomes: &[TopicOutcome], mode: ReassignMode) -> Vec<&str> {
    if mode == ReassignMode::DryRun {
        return Vec::new();
    }
    outcomes
        .iter()
        .filter(|o| o.result.as_ref().is_ok_and(|plan| !plan.partitions.is_empty()))
        .map(|o| o.topic.as_str())
        .collect()
}

async fn reassign_topic(
    topology: &dyn TopologySource,
    request: &TopicAssignment,
    mode: ReassignMode,
) -> Result<TopicOutcome, LensError> {
    let topic = request.topic.clone();
    let result = match plan_and_submit(topology, request, mode).await {
        Ok(plan) => Ok(plan),
        Err(Failure::Batch(e)) => return Err(e.into()),
        Err(Failure::Topic(e)) => {
            warn!(%topic, error = %e, "partition reassignment failed for topic");
            Err(e)
        }
    };
    Ok(TopicOutcome { topic, result })
}

// Batch failures abort the whole request, topic failures are reported.
enum Failure {
    Batch(TopologyError),
    Topic(ReassignError),
}

async fn plan_and_submit(
    topology: &dyn TopologySource,
    request: &TopicAssignment,
    mode: ReassignMode,
) -> Result<TopicReassignment, Failure> {
    let topic = &request.topic;
    let current = match topology.current_assignment(topic).await {
        Ok(Some(current)) => current,
        Ok(None) => return Err(Failure::Topic(ReassignError::TopicNotFound(topic.clone()))),
        Err(e) if e.is_connectivity() => return Err(Failure::Batch(e)),
        Err(source) => {
            return Err(Failure::Topic(ReassignError::Fetch {
                topic: topic.clone(),
                source,
            }))
        }
    };

    let plan = TopicReassignment::plan(request, &current);
    if mode == ReassignMode::DryRun || plan.partitions.is_empty() {
        return Ok(plan);
    }

    match topology.submit_reassignment(topic, &plan.assignments()).await {
        Ok(()) => {
            info!(
                %topic,
                partitions = plan.partitions.len(),
                unchanged = plan.partitions.iter().filter(|p| p.is_noop()).count(),
                "partition reassignment submitted"
            );
            Ok(plan)
        }
        Err(e) if e.is_connectivity() => Err(Failure::Batch(e)),
        Err(TopologyError::TopicNotFound(_)) => {
            Err(Failure::Topic(ReassignError::TopicNotFound(topic.clone())))
        }
        Err(source) => Err(Failure::Topic(ReassignError::Submit {
            topic: topic.clone(),
            source,
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lens_core::PartitionAssignment;

    fn outcome(topic: &str, partitions: &[(i32, &[i32])]) -> TopicOutcome {
        let request = TopicAssignment {
            topic: topic.to_string(),
            partition_assignment: partitions
                .iter()
                .map(|(partition, replicas)| PartitionAssignment {
                    partition: *partition,
                    replicas: replicas.to_vec(),
                })
                .collect(),
        };
        TopicOutcome {
            topic: topic.to_string(),
            result: Ok(TopicReassignment::plan(&request, &[])),
        }
    }

    #[test]
    fn submitted_topics_skip_failures_empty_plans_and_dry_runs() {
        let outcomes = vec![
            outcome("orders", &[(0, &[1, 2])]),
            outcome("idle", &[]),
            TopicOutcome {
                topic: "audit".into(),
                result: Err(ReassignError::TopicNotFound("audit".into())),
            },
        ];
        assert_eq!(submitted_topics(&outcomes, ReassignMode::Submit), vec!["orders"]);
        assert!(submitted_topics(&outcomes, ReassignMode::DryRun).is_empty());
    }
}
