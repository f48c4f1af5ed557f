//! Liveness endpoint.
//!
//! `GET /health` answers `{"status":"UP","name":"<service>"}` without
//! touching any dependency, so it reflects process liveness only.

use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub name: String,
}

pub async fn health(name: &'static str) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "UP".to_string(),
        name: name.to_string(),
    })
}
