use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::State,
    http::HeaderValue,
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::api::{brokers, cluster, metrics, reassignments, topics};
use crate::schema::Schema;

pub struct AppState {
    pub schema: Schema,
}

impl AppState {
    pub fn new(schema: Schema) -> Arc<Self> {
        Arc::new(AppState { schema })
    }
}

#[derive(serde::Serialize)]
struct HealthDto {
    status: &'static str,
    admin_reachable: bool,
}

// API endpoints
// - GET    /api/v1/health
//   Liveness plus whether the cluster admin API answers.
//
// - GET    /api/v1/cluster?fields=
//   Brokers, active controller and the reduced cluster metrics.
//
// - GET    /api/v1/brokers?start=&end=&step=&broker_ids=&fields=
// - GET    /api/v1/brokers/{broker_id}?start=&end=&step=&fields=
//   Brokers sorted by id with their metric fields. The window (unix seconds
//   and a Prometheus step such as 30s) only feeds the *OverTime fields.
//
// - GET    /api/v1/topics?fields=
// - GET    /api/v1/topics/{topic}?fields=
// - POST   /api/v1/topics
// - DELETE /api/v1/topics/{topic}
//
// - GET    /api/v1/metrics/total-time-ms?request=&broker_ids=
// - GET    /api/v1/metrics/bytes-in?start=&end=&step=&broker_ids=&topics=
// - GET    /api/v1/metrics/bytes-out?start=&end=&step=&broker_ids=&topics=
//   Throughput defaults to the last hour in 60s steps.
//
// - GET    /api/v1/reassignments
//   Reassignments in flight.
// - POST   /api/v1/reassignments
//   Plan and submit a partition reassignment batch; `dryRun` only plans.
//
pub fn build_router(app_state: Arc<AppState>, cors_allow_origin: Option<&str>) -> Result<Router> {
    let cors = match cors_allow_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.parse::<HeaderValue>()?)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::permissive(),
    };

    Ok(Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/cluster", get(cluster::get_cluster))
        .route("/api/v1/brokers", get(brokers::list_brokers))
        .route("/api/v1/brokers/{broker_id}", get(brokers::get_broker))
        .route(
            "/api/v1/topics",
            get(topics::list_topics).post(topics::create_topic),
        )
        .route(
            "/api/v1/topics/{topic}",
            get(topics::get_topic).delete(topics::delete_topic),
        )
        .route("/api/v1/metrics/total-time-ms", get(metrics::total_time_ms))
        .route("/api/v1/metrics/bytes-in", get(metrics::bytes_in))
        .route("/api/v1/metrics/bytes-out", get(metrics::bytes_out))
        .route(
            "/api/v1/reassignments",
            get(reassignments::list_ongoing).post(reassignments::reassign),
        )
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    let reachable = state.schema.query.admin_reachable().await;
    Json(HealthDto {
        status: "ok",
        admin_reachable: reachable,
    })
}
