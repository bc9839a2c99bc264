use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use history_engine::HistoryError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};
use utoipa::ToSchema;
use uuid::Uuid;

/// Standard API error response structure
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Error type/code
    pub error_type: String,
    /// Human-readable error message
    pub message: String,
    /// Timestamp when error occurred
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Suggested actions for resolving the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

/// Main API error enum
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Authentication error: {message}")]
    Authentication { message: String },

    #[error("Authorization error: {message}")]
    Authorization { message: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl ApiError {
    /// Create an authentication error
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create an authorization error
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::Authorization {
            message: message.into(),
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Authentication { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Authorization { .. } => StatusCode::FORBIDDEN,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type string
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::Authentication { .. } => "authentication_error",
            ApiError::Authorization { .. } => "authorization_error",
            ApiError::BadRequest { .. } => "bad_request",
            ApiError::NotFound { .. } => "not_found",
            ApiError::Internal { .. } => "internal_error",
        }
    }

    /// Get suggested actions for resolving the error
    pub fn suggestions(&self) -> Option<Vec<String>> {
        match self {
            ApiError::Authentication { .. } => Some(vec![
                "Verify your authentication credentials".to_string(),
                "Check if your token has expired".to_string(),
            ]),
            ApiError::Authorization { .. } => Some(vec![
                "Verify you have the view permission for this project".to_string(),
                "Ask a project administrator for access".to_string(),
            ]),
            ApiError::BadRequest { .. } => Some(vec![
                "Pass each query parameter at most once".to_string(),
                "Use integer values for page and page_size".to_string(),
            ]),
            ApiError::NotFound { .. } => Some(vec![
                "Verify the object ID is correct".to_string(),
                "Check that the entity kind is one of userstory, task, issue or wiki".to_string(),
            ]),
            ApiError::Internal { .. } => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4().to_string();
        let status_code = self.status_code();

        // Server faults are errors; client faults are expected traffic.
        if status_code.is_server_error() {
            error!(
                error_id = %error_id,
                error_type = %self.error_type(),
                status_code = %status_code.as_u16(),
                error = %self,
                "API error occurred"
            );
        } else {
            warn!(
                error_id = %error_id,
                error_type = %self.error_type(),
                status_code = %status_code.as_u16(),
                error = %self,
                "API request rejected"
            );
        }

        let message = match &self {
            // Don't expose internal details
            ApiError::Internal { .. } => "An unexpected error occurred".to_string(),
            _ => self.to_string(),
        };

        let error_response = ApiErrorResponse {
            error_id,
            error_type: self.error_type().to_string(),
            message,
            timestamp: chrono::Utc::now(),
            suggestions: self.suggestions(),
        };

        (status_code, Json(error_response)).into_response()
    }
}

/// Convert history lookup errors to API errors
impl From<HistoryError> for ApiError {
    fn from(error: HistoryError) -> Self {
        if error.is_not_found() {
            ApiError::not_found(error.to_string())
        } else {
            ApiError::internal(error.to_string())
        }
    }
}

/// Convert malformed query strings to API errors
impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use history_engine::EntityKind;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::authentication("x").status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::authorization("x").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::bad_request("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::internal("x").status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_history_errors_map_to_not_found_or_internal() {
        let err: ApiError = HistoryError::object_not_found(EntityKind::Task, 999).into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err: ApiError = HistoryError::UnregisteredKind(EntityKind::WikiPage).into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err: ApiError = HistoryError::PermissionCheck("tuple store offline".into()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::authorization("denied").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
