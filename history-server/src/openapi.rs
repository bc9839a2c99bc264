use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::routes::paths;
use crate::server::HistoryServer;

/// Main OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::handlers::health::health_check,
        crate::handlers::health::version_info,

        // History endpoints
        crate::handlers::history::list_history,
        crate::handlers::history::retrieve_history,
    ),
    components(
        schemas(
            crate::handlers::health::HealthResponse,
            crate::handlers::health::VersionResponse,
            crate::handlers::history::HistoryEntryResponse,
            crate::handlers::history::HistoryUserResponse,
            crate::types::PaginationInfo,
            crate::error::ApiErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Server health and version endpoints"),
        (name = "history", description = "Read-only change history of user stories, tasks, issues and wiki pages"),
    ),
    info(
        title = "Tracker History API",
        version = "1.0.0",
        description = "Per-entity change history of project tracker objects, guarded by project view permissions.",
        license(name = "AGPL-3.0-only"),
    ),
)]
pub struct ApiDoc;

/// Registers the bearer JWT scheme referenced by the history paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Create documentation routes
pub fn create_docs_routes() -> Router<HistoryServer> {
    Router::new().merge(SwaggerUi::new(paths::docs::SWAGGER_UI).url(paths::docs::OPENAPI_JSON, ApiDoc::openapi()))
}
