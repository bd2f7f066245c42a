//! Liveness endpoint.
//!
//! `GET /health` answers `200 {"status":"ok"}` as long as the process can
//! serve requests. It never looks at backends, credentials or the route
//! table, so monitors can tell "gateway is up" apart from "a backend is up".

use axum::Json;
use serde::{Deserialize, Serialize};

pub const HEALTH_PATH: &str = "/health";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
