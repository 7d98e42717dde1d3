//! Liveness endpoint.

use axum::Json;
use serde::{Deserialize, Serialize};

/// Body of `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub version: String,
}

/// GET /health - report that the service is up.
pub async fn health_handler() -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
