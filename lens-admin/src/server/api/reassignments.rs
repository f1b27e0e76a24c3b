use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use lens_core::TopicAssignment;
use serde::Deserialize;

use crate::reassign::ReassignMode;
use crate::server::app::AppState;
use crate::server::http::{bad_request, error_response};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReassignRequest {
    pub topics: Vec<TopicAssignment>,
    #[serde(default)]
    pub dry_run: bool,
}

pub async fn list_ongoing(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.schema.query.ongoing_reassignments().await {
        Ok(list) => Json(list).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn reassign(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReassignRequest>,
) -> impl IntoResponse {
    if req.topics.is_empty() {
        return bad_request("no topics to reassign");
    }
    let mode = if req.dry_run {
        ReassignMode::DryRun
    } else {
        ReassignMode::Submit
    };
    match state
        .schema
        .mutation
        .reassign_partitions(&req.topics, mode)
        .await
    {
        Ok(outcomes) => Json(outcomes).into_response(),
        Err(e) => error_response(e),
    }
}
