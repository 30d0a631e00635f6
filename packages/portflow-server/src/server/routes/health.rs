use axum::{extract::Extension, Json};
use portflow::Capabilities;
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    /// `remote` when a hosted store is configured, else `offline`
    storage: String,
    capabilities: Capabilities,
}

/// Health check endpoint
///
/// Reports what the analyzer can do with the current configuration. The
/// heuristic stage needs nothing, so the service is always healthy.
pub async fn health_handler(Extension(state): Extension<AppState>) -> Json<HealthResponse> {
    let storage = if state.gateway.has_remote() {
        "remote"
    } else {
        "offline"
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        storage: storage.to_string(),
        capabilities: state.analyzer.capabilities(),
    })
}
