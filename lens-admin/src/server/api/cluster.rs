use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};

use super::Params;
use crate::resolve::ClusterFields;
use crate::server::app::AppState;
use crate::server::http::{bad_request, error_response};

pub async fn get_cluster(
    Query(p): Query<Params>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let parsed = ClusterFields::parse(p.fields.as_deref())
        .and_then(|f| Ok((f, p.broker_fields()?, p.window()?)));
    let (fields, broker_fields, window) = match parsed {
        Ok(v) => v,
        Err(msg) => return bad_request(msg),
    };
    match state
        .schema
        .query
        .cluster(&fields, &broker_fields, window)
        .await
    {
        Ok(view) => Json(view).into_response(),
        Err(e) => error_response(e),
    }
}
