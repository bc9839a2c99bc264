pub mod paths;

use axum::{routing::get, Extension, Router};
use std::sync::Arc;

use crate::{
    handlers::{self, health, history},
    openapi,
    server::HistoryServer,
    services::HistoryEndpoint,
};

/// Create health check routes
pub fn health_routes() -> Router<HistoryServer> {
    Router::new()
        .route(paths::health::HEALTH, get(health::health_check))
        .route(paths::health::VERSION, get(health::version_info))
}

/// Create the list and retrieve routes of every history endpoint
///
/// The list route answers with and without a trailing slash.
pub fn history_routes(endpoints: &[Arc<HistoryEndpoint>]) -> Router<HistoryServer> {
    endpoints.iter().fold(Router::new(), |router, endpoint| {
        let resource = endpoint.path();
        let list = get(history::list_history).layer(Extension(endpoint.clone()));
        let retrieve = get(history::retrieve_history).layer(Extension(endpoint.clone()));

        router
            .route(&resource, list.clone())
            .route(&format!("{resource}/"), list)
            .route(&paths::history::by_id(endpoint.kind()), retrieve)
    })
}

/// Create all application routes
pub fn create_routes(server: &HistoryServer) -> Router<HistoryServer> {
    Router::new()
        // Health check routes (no authentication required)
        .merge(health_routes())
        // API documentation routes
        .merge(openapi::create_docs_routes())
        .nest(paths::API_V1, history_routes(server.endpoints()))
        .fallback(handlers::not_found)
}
