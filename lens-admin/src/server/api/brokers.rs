use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use lens_core::BrokerId;

use super::Params;
use crate::resolve::BrokerFields;
use crate::server::app::AppState;
use crate::server::http::{bad_request, error_response, not_found};

pub async fn list_brokers(
    Query(p): Query<Params>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let parsed = BrokerFields::parse(p.fields.as_deref())
        .and_then(|f| Ok((f, p.window()?, p.broker_ids()?)));
    let (fields, window, broker_ids) = match parsed {
        Ok(v) => v,
        Err(msg) => return bad_request(msg),
    };

    match state
        .schema
        .query
        .brokers(window, broker_ids.as_deref(), &fields)
        .await
    {
        Ok(brokers) => Json(brokers).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_broker(
    Path(broker_id): Path<BrokerId>,
    Query(p): Query<Params>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let parsed = BrokerFields::parse(p.fields.as_deref()).and_then(|f| Ok((f, p.window()?)));
    let (fields, window) = match parsed {
        Ok(v) => v,
        Err(msg) => return bad_request(msg),
    };

    match state.schema.query.broker(broker_id, window, &fields).await {
        Ok(Some(broker)) => Json(broker).into_response(),
        Ok(None) => not_found(format!("broker not found: {}", broker_id)),
        Err(e) => error_response(e),
    }
}
