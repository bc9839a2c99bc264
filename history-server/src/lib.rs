//! Tracker History API server
//!
//! This library provides the HTTP surface of the project tracker's change
//! history: one read-only resource per entity kind under `/api/v1/history`,
//! authorized through project view permissions.

pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use config::HistoryConfig;
pub use error::*;
pub use server::{HistoryServer, StorageBackend};
pub use services::{HistoryEndpoint, HistoryEndpointConfig};

use axum::{middleware::from_fn, Router};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Create the main application router with all routes and middleware
pub fn create_app(server: HistoryServer) -> Router {
    let timeout = Duration::from_secs(server.config.server.request_timeout_secs);

    routes::create_routes(&server)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::create_cors_layer(&server.config.server.cors_origins))
                .layer(TimeoutLayer::new(timeout))
                .layer(from_fn(middleware::request_timing_middleware)),
        )
        .with_state(server)
}
