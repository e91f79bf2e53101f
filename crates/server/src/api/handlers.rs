use axum::Json;
use serde::Serialize;

use crate::metrics;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn prometheus_metrics() -> String {
    metrics::render()
}
