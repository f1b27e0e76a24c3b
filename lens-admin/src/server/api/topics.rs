use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use lens_core::{ConfigEntry, NewTopic};
use serde::Deserialize;

use super::Params;
use crate::resolve::TopicFields;
use crate::server::app::AppState;
use crate::server::http::{bad_request, error_response, not_found};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTopicRequest {
    pub name: String,
    pub replication_factor: Option<i32>, // cluster default when absent or <= 0
    pub num_partitions: Option<i32>,
    #[serde(default)]
    pub config_entries: Vec<ConfigEntry>,
}

pub async fn list_topics(
    Query(p): Query<Params>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let fields = match TopicFields::parse(p.fields.as_deref()) {
        Ok(f) => f,
        Err(msg) => return bad_request(msg),
    };
    match state.schema.query.topics(&fields).await {
        Ok(topics) => Json(topics).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_topic(
    Path(topic): Path<String>,
    Query(p): Query<Params>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let fields = match TopicFields::parse(p.fields.as_deref()) {
        Ok(f) => f,
        Err(msg) => return bad_request(msg),
    };
    match state.schema.query.topic(&topic, &fields).await {
        Ok(Some(view)) => Json(view).into_response(),
        Ok(None) => not_found(format!("topic not found: {}", topic)),
        Err(e) => error_response(e),
    }
}

pub async fn create_topic(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTopicRequest>,
) -> impl IntoResponse {
    let name = req.name.trim();
    if name.is_empty() {
        return bad_request("topic name must not be empty");
    }
    let topic = NewTopic::new(
        name,
        req.replication_factor,
        req.num_partitions,
        req.config_entries,
    );
    match state.schema.mutation.add_topic(topic).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn delete_topic(
    Path(topic): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    match state.schema.mutation.delete_topic(&topic).await {
        Ok(Some(name)) => Json(serde_json::json!({ "name": name })).into_response(),
        Ok(None) => not_found(format!("topic not found: {}", topic)),
        Err(e) => error_response(e),
    }
}
