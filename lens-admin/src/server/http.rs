use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::errors::{LensError, TopologyError};

pub fn map_error(err: LensError) -> (StatusCode, Json<Value>) {
    let status = match &err {
        LensError::AdapterUnavailable(_) => StatusCode::BAD_GATEWAY,
        LensError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        LensError::Topology(TopologyError::TopicNotFound(_)) => StatusCode::NOT_FOUND,
        LensError::Topology(TopologyError::Api { status, .. }) => match *status {
            400 => StatusCode::BAD_REQUEST,
            404 => StatusCode::NOT_FOUND,
            409 => StatusCode::CONFLICT,
            _ => StatusCode::BAD_GATEWAY,
        },
        _ => StatusCode::BAD_GATEWAY,
    };
    (status, Json(serde_json::json!({ "error": err.to_string() })))
}

pub fn error_response(err: LensError) -> Response {
    map_error(err).into_response()
}

pub fn bad_request(msg: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": msg.into() })),
    )
        .into_response()
}

pub fn not_found(msg: impl Into<String>) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": msg.into() })),
    )
        .into_response()
}
