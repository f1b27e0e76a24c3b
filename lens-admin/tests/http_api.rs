//! Test: HTTP surface
//!
//! Purpose
//! - Exercise the router end to end over a real socket with fake adapters:
//!   query parameters, status codes and JSON bodies.

mod common;

use std::sync::Arc;

use common::*;
use lens_admin::server::{build_router, AppState};
use serde_json::{json, Value};
use tokio::net::TcpListener;

async fn serve(topology: Arc<FakeTopology>, metrics: Arc<FakeMetrics>) -> String {
    let router = build_router(AppState::new(schema(topology, metrics)), None).expect("router");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router.into_make_service())
            .await
            .expect("serve");
    });
    format!("http://{}/api/v1", addr)
}

fn topology() -> Arc<FakeTopology> {
    let topology = Arc::new(FakeTopology::with_brokers(&[2, 1]));
    topology.add_topic("orders", &[(0, &[1, 2])]);
    topology
}

#[tokio::test]
async fn health_reports_admin_reachability() {
    let base = serve(topology(), Arc::new(FakeMetrics::new())).await;
    let body: Value = reqwest::get(format!("{}/health", base))
        .await
        .expect("request")
        .json()
        .await
        .expect("json");
    assert_eq!(body, json!({ "status": "ok", "admin_reachable": true }));
}

#[tokio::test]
async fn brokers_honour_field_selection() {
    let metrics = FakeMetrics::new().instant(
        "process_cpu_seconds_total",
        vec![broker_sample(1, 5.0), broker_sample(2, 6.0)],
    );
    let base = serve(topology(), Arc::new(metrics)).await;

    let resp = reqwest::get(format!("{}/brokers?fields=cpuUsage", base))
        .await
        .expect("request");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("json");
    assert_eq!(body[0]["brokerId"], 1);
    assert_eq!(body[0]["brokerHost"], "kafka-1");
    assert_eq!(body[0]["cpuUsage"]["cpuUsage"], 5.0);
    assert_eq!(body[1]["brokerId"], 2);
    assert!(body[0].get("JVMMemoryUsage").is_none());
}

#[tokio::test]
async fn bad_parameters_are_rejected() {
    let base = serve(topology(), Arc::new(FakeMetrics::new())).await;

    let resp = reqwest::get(format!("{}/brokers?fields=cpu", base))
        .await
        .expect("request");
    assert_eq!(resp.status(), 400);

    let resp = reqwest::get(format!("{}/brokers?start=10", base))
        .await
        .expect("request");
    assert_eq!(resp.status(), 400);

    let resp = reqwest::get(format!("{}/metrics/total-time-ms", base))
        .await
        .expect("request");
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn topic_lifecycle_over_http() {
    let base = serve(topology(), Arc::new(FakeMetrics::new())).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/topics", base))
        .json(&json!({ "name": "payments", "numPartitions": 3 }))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 201);

    let resp = client
        .get(format!("{}/topics/payments?fields=numPartitions", base))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("json");
    assert_eq!(body["name"], "payments");

    let resp = client
        .delete(format!("{}/topics/payments", base))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 200);

    let resp = client
        .get(format!("{}/topics/payments", base))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.expect("json");
    assert_eq!(body["error"], "topic not found: payments");
}

#[tokio::test]
async fn reassignment_dry_run_over_http() {
    let topology = topology();
    let base = serve(topology.clone(), Arc::new(FakeMetrics::new())).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/reassignments", base))
        .json(&json!({
            "dryRun": true,
            "topics": [
                { "topic": "orders", "partitionAssignment": [ { "partition": 0, "replicas": [3, 4] } ] }
            ]
        }))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("json");
    assert_eq!(
        body,
        json!([{
            "name": "orders",
            "partitions": [{
                "partition": 0,
                "replicas": [3, 4, 1, 2],
                "addingReplicas": [3, 4],
                "removingReplicas": [1, 2]
            }]
        }])
    );
    assert!(topology.submitted().is_empty());
}

#[tokio::test]
async fn cluster_nests_broker_fields_on_request() {
    let metrics = FakeMetrics::new().instant(
        "process_cpu_seconds_total",
        vec![broker_sample(1, 5.0), broker_sample(2, 6.0)],
    );
    let topology = topology();
    *topology.delete_topic_lookup_status.lock().unwrap() = Some(404);
    let base = serve(topology, Arc::new(metrics)).await;

    let resp = reqwest::get(format!(
        "{}/cluster?fields=deleteTopic&broker_fields=cpuUsage",
        base
    ))
    .await
    .expect("request");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("json");
    assert!(body["deleteTopic"].is_null());
    assert_eq!(body["brokers"][0]["brokerId"], 2);
    assert_eq!(body["brokers"][0]["cpuUsage"]["cpuUsage"], 6.0);
    assert_eq!(body["activeController"]["cpuUsage"]["cpuUsage"], 6.0);

    let resp = reqwest::get(format!("{}/cluster?broker_fields=cpu", base))
        .await
        .expect("request");
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn unavailable_admin_api_maps_to_bad_gateway() {
    let topology = topology();
    topology.set_unavailable(true);
    let base = serve(topology, Arc::new(FakeMetrics::new())).await;

    let resp = reqwest::get(format!("{}/cluster", base))
        .await
        .expect("request");
    assert_eq!(resp.status(), 502);
    let body: Value = resp.json().await.expect("json");
    assert!(body["error"]
        .as_str()
        .is_some_and(|e| e.contains("unavailable")));
}
