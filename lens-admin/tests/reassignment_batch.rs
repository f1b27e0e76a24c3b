//! Test: partition reassignment batches
//!
//! Purpose
//! - Validate the replica delta submitted per topic, partial success across
//!   topics, dry runs and batch failure when the admin API is gone.

mod common;

use std::sync::Arc;

use common::*;
use lens_admin::reassign::ReassignMode;
use lens_admin::{LensError, ReassignError};
use lens_core::{PartitionAssignment, TopicAssignment};

fn request(topic: &str, partitions: &[(i32, &[i32])]) -> TopicAssignment {
    TopicAssignment {
        topic: topic.to_string(),
        partition_assignment: partitions
            .iter()
            .map(|(p, replicas)| PartitionAssignment {
                partition: *p,
                replicas: replicas.to_vec(),
            })
            .collect(),
    }
}

fn setup() -> (Arc<FakeTopology>, lens_admin::Schema) {
    let topology = Arc::new(FakeTopology::with_brokers(&[0, 1, 2, 3, 4]));
    topology.add_topic("orders", &[(0, &[1, 0]), (1, &[2, 3])]);
    topology.add_topic("audit", &[(0, &[0, 1, 2])]);
    let schema = schema(topology.clone(), Arc::new(FakeMetrics::new()));
    (topology, schema)
}

#[tokio::test]
async fn full_replacement_submits_desired_then_retired() {
    let (topology, schema) = setup();

    let outcomes = schema
        .mutation
        .reassign_partitions(&[request("orders", &[(0, &[3, 4])])], ReassignMode::Submit)
        .await
        .expect("batch");

    let plan = outcomes[0].result.as_ref().expect("orders planned");
    assert_eq!(plan.name, "orders");
    assert_eq!(plan.partitions[0].adding_replicas, vec![3, 4]);
    assert_eq!(plan.partitions[0].removing_replicas, vec![1, 0]);
    assert_eq!(plan.partitions[0].replicas, vec![3, 4, 1, 0]);

    let submitted = topology.submitted();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].0, "orders");
    assert_eq!(
        submitted[0].1,
        vec![PartitionAssignment {
            partition: 0,
            replicas: vec![3, 4, 1, 0]
        }]
    );
}

#[tokio::test]
async fn unchanged_assignment_is_reported_with_empty_delta() {
    let (topology, schema) = setup();

    // same set, different order: nothing added or removed, desired order kept
    let outcomes = schema
        .mutation
        .reassign_partitions(&[request("audit", &[(0, &[2, 0, 1])])], ReassignMode::Submit)
        .await
        .expect("batch");

    let p = &outcomes[0].result.as_ref().expect("audit planned").partitions[0];
    assert!(p.adding_replicas.is_empty());
    assert!(p.removing_replicas.is_empty());
    assert_eq!(p.replicas, vec![2, 0, 1]);
    assert_eq!(topology.submitted().len(), 1);
}

#[tokio::test]
async fn missing_topic_fails_alone_and_order_is_kept() {
    let (topology, schema) = setup();

    let outcomes = schema
        .mutation
        .reassign_partitions(
            &[
                request("orders", &[(1, &[2, 4])]),
                request("ghost", &[(0, &[1])]),
                request("audit", &[(0, &[0, 1, 3])]),
            ],
            ReassignMode::Submit,
        )
        .await
        .expect("batch");

    let topics: Vec<&str> = outcomes.iter().map(|o| o.topic.as_str()).collect();
    assert_eq!(topics, vec!["orders", "ghost", "audit"]);
    assert!(outcomes[0].is_ok());
    assert!(matches!(
        outcomes[1].result,
        Err(ReassignError::TopicNotFound(ref t)) if t == "ghost"
    ));
    assert!(outcomes[2].is_ok());

    let mut submitted: Vec<String> = topology.submitted().into_iter().map(|(t, _)| t).collect();
    submitted.sort();
    assert_eq!(submitted, vec!["audit".to_string(), "orders".to_string()]);

    let json = serde_json::to_value(&outcomes).expect("serialize");
    assert_eq!(json[1]["name"], "ghost");
    assert_eq!(json[1]["error"], "topic not found: ghost");
    assert_eq!(json[0]["partitions"][0]["addingReplicas"], serde_json::json!([4]));
    assert_eq!(json[0]["partitions"][0]["removingReplicas"], serde_json::json!([3]));
}

#[tokio::test]
async fn rejected_submit_is_reported_against_its_topic() {
    let (topology, schema) = setup();
    topology.reject_submit.lock().unwrap().push("audit".to_string());

    let outcomes = schema
        .mutation
        .reassign_partitions(
            &[request("audit", &[(0, &[4])]), request("orders", &[(0, &[0, 1])])],
            ReassignMode::Submit,
        )
        .await
        .expect("batch");

    assert!(matches!(outcomes[0].result, Err(ReassignError::Submit { .. })));
    assert!(outcomes[1].is_ok());
    assert_eq!(topology.submitted().len(), 1);
}

#[tokio::test]
async fn unknown_partition_is_planned_from_scratch() {
    let (_topology, schema) = setup();

    let outcomes = schema
        .mutation
        .reassign_partitions(&[request("orders", &[(7, &[1, 2])])], ReassignMode::DryRun)
        .await
        .expect("batch");

    let p = &outcomes[0].result.as_ref().expect("planned").partitions[0];
    assert_eq!(p.adding_replicas, vec![1, 2]);
    assert!(p.removing_replicas.is_empty());
    assert_eq!(p.replicas, vec![1, 2]);
}

#[tokio::test]
async fn dry_run_submits_nothing() {
    let (topology, schema) = setup();

    let outcomes = schema
        .mutation
        .reassign_partitions(&[request("orders", &[(0, &[3, 4])])], ReassignMode::DryRun)
        .await
        .expect("batch");

    assert_eq!(
        outcomes[0].result.as_ref().expect("planned").partitions[0].replicas,
        vec![3, 4, 1, 0]
    );
    assert!(topology.submitted().is_empty());
}

#[tokio::test]
async fn unavailable_admin_api_fails_the_batch() {
    let (topology, schema) = setup();
    topology.set_unavailable(true);

    let result = schema
        .mutation
        .reassign_partitions(&[request("orders", &[(0, &[3, 4])])], ReassignMode::Submit)
        .await;

    assert!(matches!(result, Err(LensError::AdapterUnavailable(_))));
}

#[tokio::test]
async fn timeout_fails_the_batch_without_undoing_submitted_topics() {
    let (topology, schema) = setup();
    topology.timeout_submit.lock().unwrap().push("audit".into());

    let result = schema
        .mutation
        .reassign_partitions(
            &[
                request("orders", &[(0, &[3, 4])]),
                request("audit", &[(0, &[2, 3, 4])]),
            ],
            ReassignMode::Submit,
        )
        .await;

    assert!(matches!(result, Err(LensError::Timeout(_))));
    let submitted: Vec<String> = topology.submitted().into_iter().map(|(t, _)| t).collect();
    assert_eq!(submitted, vec!["orders".to_string()]);
}
