pub mod health;
pub mod history;

use axum::http::Uri;

use crate::error::ApiError;

/// Fallback for unmatched routes, including unknown entity kinds
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("No route for {}", uri.path()))
}
