//! Route path constants
//!
//! utoipa `#[utoipa::path]` attributes need string literals; keep them in sync
//! with these values.

/// API base path
pub const API_V1: &str = "/api/v1";

/// Health check endpoints
pub mod health {
    pub const HEALTH: &str = "/health";
    pub const VERSION: &str = "/version";
}

/// History endpoints, relative to [`API_V1`](super::API_V1)
pub mod history {
    use history_engine::EntityKind;

    pub const PREFIX: &str = "/history";

    /// `/history/{slug}`
    pub fn resource(kind: EntityKind) -> String {
        format!("{PREFIX}/{}", kind.slug())
    }

    /// `/history/{slug}/:id`
    pub fn by_id(kind: EntityKind) -> String {
        format!("{}/:id", resource(kind))
    }
}

/// OpenAPI documentation endpoints
pub mod docs {
    pub const SWAGGER_UI: &str = "/docs";
    pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";
}
