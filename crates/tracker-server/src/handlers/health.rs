//! Health check handler

use crate::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use tracker_core::StorageStatus;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    storage: StorageStatus,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        storage: state.storage.status(),
    })
}
