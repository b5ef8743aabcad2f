use crate::state::ServerState;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::SystemTime;

pub const SERVICE_NAME: &str = "Visual Product Matcher";

/// Global server start time for uptime calculation
static SERVER_START_TIME: once_cell::sync::Lazy<SystemTime> =
    once_cell::sync::Lazy::new(SystemTime::now);

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub model: String,
    pub products_loaded: usize,
    pub uptime_seconds: u64,
}

/// Health check endpoint (liveness)
///
/// Reports the embedding model and the number of products loaded. An empty
/// catalog is still healthy.
pub async fn health_check(State(state): State<Arc<ServerState>>) -> Json<HealthResponse> {
    let uptime = SERVER_START_TIME
        .elapsed()
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Json(HealthResponse {
        status: "ok".to_string(),
        service: SERVICE_NAME.to_string(),
        model: state.matcher.model_id().to_string(),
        products_loaded: state.catalog().len(),
        uptime_seconds: uptime,
    })
}

/// Touch the start time so uptime counts from process start rather than the
/// first health check.
pub(crate) fn mark_started() {
    once_cell::sync::Lazy::force(&SERVER_START_TIME);
}
