use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use history_engine::{HistoryEntry, HistoryError, HistoryUser};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{ApiError, ApiErrorResponse, ApiResult};
use crate::middleware::{AuthContext, DISABLE_PAGINATION_HEADER};
use crate::server::HistoryServer;
use crate::services::HistoryEndpoint;
use crate::types::PaginationParams;

/// Author of a history entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HistoryUserResponse {
    /// User id, absent for system changes
    pub pk: Option<i64>,
    pub name: String,
}

impl From<HistoryUser> for HistoryUserResponse {
    fn from(user: HistoryUser) -> Self {
        Self {
            pk: user.pk,
            name: user.name,
        }
    }
}

/// One change record of an entity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HistoryEntryResponse {
    pub id: Uuid,
    /// `{app_label}.{model}:{object_id}`
    #[schema(example = "tasks.task:42")]
    pub key: String,
    /// Id of the entity the entry belongs to
    pub object_id: i64,
    /// 1 = change, 2 = create, 3 = delete
    #[serde(rename = "type")]
    #[schema(example = 1)]
    pub entry_type: i16,
    pub user: HistoryUserResponse,
    pub created_at: DateTime<Utc>,
    #[schema(value_type = Object)]
    pub diff: Value,
    #[schema(value_type = Option<Object>)]
    pub snapshot: Option<Value>,
    #[schema(value_type = Object)]
    pub values: Value,
    pub comment: String,
    pub comment_html: String,
    pub is_snapshot: bool,
    pub is_hidden: bool,
}

impl TryFrom<HistoryEntry> for HistoryEntryResponse {
    type Error = HistoryError;

    fn try_from(entry: HistoryEntry) -> Result<Self, Self::Error> {
        let object_id = entry.object_id()?;
        Ok(Self {
            id: entry.id,
            key: entry.key,
            object_id,
            entry_type: entry.entry_type.code(),
            user: entry.user.into(),
            created_at: entry.created_at,
            diff: entry.diff,
            snapshot: entry.snapshot,
            values: entry.values,
            comment: entry.comment,
            comment_html: entry.comment_html,
            is_snapshot: entry.is_snapshot,
            is_hidden: entry.is_hidden,
        })
    }
}

fn pagination_disabled(headers: &HeaderMap) -> bool {
    headers
        .get(DISABLE_PAGINATION_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim().eq_ignore_ascii_case("true"))
}

/// List endpoint of a history resource
///
/// Listing history across objects is not supported; the route exists so the
/// resource root answers with an empty object.
#[utoipa::path(
    get,
    path = "/api/v1/history/{kind}/",
    tag = "history",
    params(
        ("kind" = String, Path, description = "Entity kind: userstory, task, issue or wiki")
    ),
    responses(
        (status = 200, description = "Always an empty JSON object"),
        (status = 404, description = "Unknown entity kind", body = ApiErrorResponse)
    )
)]
pub async fn list_history(Extension(endpoint): Extension<Arc<HistoryEndpoint>>) -> Json<Value> {
    tracing::debug!(kind = %endpoint.kind(), "History list requested");
    Json(json!({}))
}

/// Retrieve the change history of one entity
///
/// Entries are returned in stored order. Without pagination parameters the
/// full history is returned as an array.
#[utoipa::path(
    get,
    path = "/api/v1/history/{kind}/{id}",
    tag = "history",
    params(
        ("kind" = String, Path, description = "Entity kind: userstory, task, issue or wiki"),
        ("id" = i64, Path, description = "Entity id"),
        PaginationParams,
        ("x-disable-pagination" = Option<bool>, Header, description = "Return the bare array even when pagination parameters are given")
    ),
    responses(
        (status = 200, description = "History entries; with `page` or `page_size` they are wrapped in `{count, results, pagination}`", body = Vec<HistoryEntryResponse>),
        (status = 400, description = "Malformed query string", body = ApiErrorResponse),
        (status = 401, description = "Invalid bearer token", body = ApiErrorResponse),
        (status = 403, description = "Missing view permission on the project", body = ApiErrorResponse),
        (status = 404, description = "Unknown entity or invalid page", body = ApiErrorResponse)
    ),
    security(
        (),
        ("bearer_auth" = [])
    )
)]
pub async fn retrieve_history(
    State(server): State<HistoryServer>,
    Extension(endpoint): Extension<Arc<HistoryEndpoint>>,
    auth: AuthContext,
    Path(id): Path<String>,
    params: Result<Query<PaginationParams>, QueryRejection>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    tracing::debug!(kind = %endpoint.kind(), id = %id, principal = %auth.principal(), "History retrieve requested");

    let Query(params) = params?;

    let id: i64 = id
        .parse()
        .map_err(|_| ApiError::not_found(format!("No {} with id {id}", endpoint.kind().model())))?;

    let entries = endpoint
        .retrieve(auth.principal(), id)
        .await?
        .into_iter()
        .map(HistoryEntryResponse::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    if pagination_disabled(&headers) {
        return Ok(Json(entries).into_response());
    }

    match params.paginate(&entries, &server.config.pagination)? {
        Some(page) => Ok(Json(page).into_response()),
        None => Ok(Json(entries).into_response()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use history_engine::EntityKind;

    #[test]
    fn test_response_carries_object_id_and_type_code() {
        let entry = HistoryEntry::change(EntityKind::Issue, 7).with_comment("moved to done");
        let response = HistoryEntryResponse::try_from(entry).unwrap();
        assert_eq!(response.object_id, 7);
        assert_eq!(response.entry_type, 1);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["type"], 1);
        assert_eq!(json["key"], "issues.issue:7");
        assert_eq!(json["comment"], "moved to done");
    }

    #[test]
    fn test_pagination_disabled_header() {
        let mut headers = HeaderMap::new();
        assert!(!pagination_disabled(&headers));

        headers.insert(DISABLE_PAGINATION_HEADER, HeaderValue::from_static("True"));
        assert!(pagination_disabled(&headers));

        headers.insert(DISABLE_PAGINATION_HEADER, HeaderValue::from_static("0"));
        assert!(!pagination_disabled(&headers));
    }
}
