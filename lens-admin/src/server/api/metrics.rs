use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};

use super::Params;
use crate::metrics::RequestKind;
use crate::server::app::AppState;
use crate::server::http::{bad_request, error_response};

pub async fn total_time_ms(
    Query(p): Query<Params>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let parsed = p
        .request
        .as_deref()
        .ok_or_else(|| "request is required (Produce, FetchConsumer or FetchFollower)".to_string())
        .and_then(|r| r.parse::<RequestKind>())
        .and_then(|r| Ok((r, p.broker_ids()?)));
    let (request, broker_ids) = match parsed {
        Ok(v) => v,
        Err(msg) => return bad_request(msg),
    };

    match state
        .schema
        .query
        .total_time_ms(request, broker_ids.as_deref())
        .await
    {
        Ok(sample) => Json(sample).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn bytes_in(
    Query(p): Query<Params>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let (window, broker_ids) = match p.window_or_recent().and_then(|w| Ok((w, p.broker_ids()?))) {
        Ok(v) => v,
        Err(msg) => return bad_request(msg),
    };
    let topics = p.topics();

    match state
        .schema
        .query
        .bytes_in_per_second_over_time(&window, broker_ids.as_deref(), topics.as_deref())
        .await
    {
        Ok(series) => Json(series).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn bytes_out(
    Query(p): Query<Params>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let (window, broker_ids) = match p.window_or_recent().and_then(|w| Ok((w, p.broker_ids()?))) {
        Ok(v) => v,
        Err(msg) => return bad_request(msg),
    };
    let topics = p.topics();

    match state
        .schema
        .query
        .bytes_out_per_second_over_time(&window, broker_ids.as_deref(), topics.as_deref())
        .await
    {
        Ok(series) => Json(series).into_response(),
        Err(e) => error_response(e),
    }
}
