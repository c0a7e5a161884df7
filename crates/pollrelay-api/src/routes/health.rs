use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    pub timestamp: String,
    pub endpoints: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub services: HashMap<String, String>,
}

/// Service banner listing the public endpoints
pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Streaming proxy is running".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        endpoints: vec![
            "POST /api/stream/start".to_string(),
            "GET /api/stream/:streamId".to_string(),
        ],
    })
}

/// Health check endpoint
///
/// Reports the number of sessions currently held in memory.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let mut services = HashMap::new();
    services.insert(
        "sessions".to_string(),
        state.relay.store().len().to_string(),
    );
    services.insert(
        "upstream".to_string(),
        state.relay.config().upstream_url.clone(),
    );

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        services,
    })
}
