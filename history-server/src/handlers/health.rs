use axum::{extract::State, Json};
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::server::HistoryServer;

/// Health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub uptime: u64,
    pub checks: HashMap<String, String>,
}

/// Version information response
#[derive(Debug, Serialize, ToSchema)]
pub struct VersionResponse {
    pub name: String,
    pub version: String,
    /// Entity kinds served under `/api/v1/history`
    pub history_kinds: Vec<String>,
}

/// Health check handler
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Server is healthy", body = HealthResponse)
    )
)]
pub async fn health_check(State(server): State<HistoryServer>) -> Json<HealthResponse> {
    let mut checks = HashMap::new();

    checks.insert("history_store".to_string(), server.backend.to_string());
    checks.insert(
        "registry".to_string(),
        format!("{} kinds registered", server.registry.kinds().len()),
    );
    checks.insert(
        "authentication".to_string(),
        if server.config.auth.jwt_secret.is_some() {
            "bearer".to_string()
        } else {
            "anonymous only".to_string()
        },
    );

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: server.uptime_secs(),
        checks,
    })
}

/// Version information handler
#[utoipa::path(
    get,
    path = "/version",
    tag = "health",
    responses(
        (status = 200, description = "Version information", body = VersionResponse)
    )
)]
pub async fn version_info(State(server): State<HistoryServer>) -> Json<VersionResponse> {
    Json(VersionResponse {
        name: server.config.server.name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        history_kinds: server
            .endpoints()
            .iter()
            .map(|endpoint| endpoint.kind().slug().to_string())
            .collect(),
    })
}
