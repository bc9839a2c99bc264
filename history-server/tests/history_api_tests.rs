//! HTTP tests for the history routes
//!
//! Fixture (all in memory):
//! - Task 42 and Issue 7 in project 1, user story 3 in project 2
//! - Three history entries for Task 42, one for Issue 7
//! - User 5 holds `view_tasks` on project 1 (but not `view_issues`)
//! - Authenticated users hold `view_us` on project 2

use std::sync::Arc;

use auth_zanzibar::{InMemoryTupleRepository, Object, Relation, Subject, Tuple};
use axum::{
    body::Body,
    http::{header::AUTHORIZATION, Request, StatusCode},
    Router,
};
use history_engine::{
    EntityKind, HistoryEntry, HistoryStore, HistoryType, HistoryUser, InMemoryEntityRepository, InMemoryHistoryStore,
    ModelRegistry, TargetObject,
};
use history_server::{
    create_app,
    middleware::{JwtClaims, TokenSubject},
    HistoryConfig, HistoryEndpointConfig, HistoryServer, StorageBackend,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use mockall::mock;
use serde_json::{json, Value};
use tower::ServiceExt;

const SECRET: &str = "test-secret";

mock! {
    pub Store {}

    #[async_trait::async_trait]
    impl HistoryStore for Store {
        async fn query_by_object(&self, object: &TargetObject) -> history_engine::Result<Vec<HistoryEntry>>;
    }
}

fn token(user_id: i64, is_superuser: bool) -> String {
    let claims = JwtClaims {
        sub: TokenSubject::Text(user_id.to_string()),
        is_superuser,
        exp: chrono::Utc::now().timestamp() + 3600,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
}

fn config() -> HistoryConfig {
    let mut config = HistoryConfig::default();
    config.auth.jwt_secret = Some(SECRET.to_string());
    config
}

fn registry(kinds: &[EntityKind]) -> ModelRegistry {
    let objects = [
        TargetObject::new(EntityKind::Task, 42, 1),
        TargetObject::new(EntityKind::Issue, 7, 1),
        TargetObject::new(EntityKind::UserStory, 3, 2),
    ];

    kinds.iter().fold(ModelRegistry::new(), |registry, &kind| {
        let repository = InMemoryEntityRepository::new(kind);
        for object in objects.iter().filter(|o| o.kind == kind) {
            repository.insert(object.clone());
        }
        registry.with(Arc::new(repository))
    })
}

fn store() -> InMemoryHistoryStore {
    let store = InMemoryHistoryStore::new();
    store.insert(HistoryEntry::new(EntityKind::Task, 42, HistoryType::Create).with_user(HistoryUser::new(5, "Ada")));
    store.insert(
        HistoryEntry::change(EntityKind::Task, 42)
            .with_user(HistoryUser::new(5, "Ada"))
            .with_diff(json!({"status": ["New", "In progress"]})),
    );
    store.insert(HistoryEntry::change(EntityKind::Task, 42).with_comment("Blocked on review"));
    store.insert(HistoryEntry::change(EntityKind::Task, 43));
    store.insert(HistoryEntry::change(EntityKind::Issue, 7));
    store
}

fn tuples() -> Arc<InMemoryTupleRepository> {
    let repo = Arc::new(InMemoryTupleRepository::new());
    repo.insert(Tuple::new(Subject::user(5), Relation::new("view_tasks"), Object::project(1))).unwrap();
    repo.insert(Tuple::new(Subject::authenticated(), Relation::new("view_us"), Object::project(2))).unwrap();
    repo
}

async fn app_with(registry: ModelRegistry, store: Arc<dyn HistoryStore>) -> Router {
    let endpoints = HistoryEndpointConfig::all_kinds(tuples());
    create_app(HistoryServer::from_parts(config(), registry, store, endpoints, StorageBackend::Memory))
}

async fn app() -> Router {
    app_with(registry(&EntityKind::ALL), Arc::new(store())).await
}

async fn get(app: Router, uri: &str, token: Option<&str>, headers: &[(&str, &str)]) -> (StatusCode, Value) {
    let mut request = Request::builder().uri(uri);
    if let Some(token) = token {
        request = request.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    for (name, value) in headers {
        request = request.header(*name, *value);
    }

    let response = app.oneshot(request.body(Body::empty()).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn test_retrieve_task_history() {
    let (status, body) = get(app().await, "/api/v1/history/task/42", Some(&token(5, false)), &[]).await;

    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().expect("bare array without pagination params");
    assert_eq!(entries.len(), 3);
    for entry in entries {
        assert_eq!(entry["object_id"], 42);
        assert_eq!(entry["key"], "tasks.task:42");
    }
    // Stored order is preserved
    assert_eq!(entries[0]["type"], 2);
    assert_eq!(entries[1]["diff"]["status"][1], "In progress");
    assert_eq!(entries[2]["comment"], "Blocked on review");
}

#[tokio::test]
async fn test_retrieve_missing_object_is_not_found() {
    let (status, body) = get(app().await, "/api/v1/history/task/999", Some(&token(5, false)), &[]).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_type"], "not_found");
}

#[tokio::test]
async fn test_retrieve_without_permission_is_forbidden() {
    let (status, body) = get(app().await, "/api/v1/history/issue/7", Some(&token(5, false)), &[]).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error_type"], "authorization_error");
}

#[tokio::test]
async fn test_forbidden_request_never_queries_history() {
    let mut store = MockStore::new();
    store.expect_query_by_object().times(0);

    let app = app_with(registry(&EntityKind::ALL), Arc::new(store)).await;
    let (status, _) = get(app, "/api/v1/history/issue/7", Some(&token(5, false)), &[]).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_missing_object_never_queries_history() {
    let mut store = MockStore::new();
    store.expect_query_by_object().times(0);

    let app = app_with(registry(&EntityKind::ALL), Arc::new(store)).await;
    let (status, _) = get(app, "/api/v1/history/task/999", Some(&token(1, true)), &[]).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_entries_of_other_objects_are_dropped() {
    let mut store = MockStore::new();
    store.expect_query_by_object().times(1).returning(|_| {
        Ok(vec![
            HistoryEntry::change(EntityKind::Task, 42),
            HistoryEntry::change(EntityKind::Task, 4242),
        ])
    });

    let app = app_with(registry(&EntityKind::ALL), Arc::new(store)).await;
    let (status, body) = get(app, "/api/v1/history/task/42", Some(&token(5, false)), &[]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_superuser_reads_any_history() {
    let (status, body) = get(app().await, "/api/v1/history/issue/7", Some(&token(1, true)), &[]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_public_permission_for_authenticated_users() {
    let (status, body) = get(app().await, "/api/v1/history/userstory/3", Some(&token(77, false)), &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _) = get(app().await, "/api/v1/history/userstory/3", None, &[]).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_numeric_subject_token_is_accepted() {
    let claims = json!({"sub": 1, "is_superuser": true, "exp": chrono::Utc::now().timestamp() + 3600});
    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap();

    let (status, body) = get(app().await, "/api/v1/history/task/42", Some(&token), &[]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_invalid_token_is_unauthorized() {
    let (status, body) = get(app().await, "/api/v1/history/task/42", Some("not-a-jwt"), &[]).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_type"], "authentication_error");
}

#[tokio::test]
async fn test_unknown_kind_is_not_found() {
    let (status, body) = get(app().await, "/api/v1/history/epic/1", Some(&token(5, false)), &[]).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_type"], "not_found");
}

#[tokio::test]
async fn test_non_numeric_id_is_not_found() {
    let (status, _) = get(app().await, "/api/v1/history/task/abc", Some(&token(5, false)), &[]).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unregistered_kind_is_not_found() {
    let app = app_with(registry(&[EntityKind::Task, EntityKind::Issue]), Arc::new(store())).await;
    let (status, _) = get(app, "/api/v1/history/wiki/1", Some(&token(1, true)), &[]).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_returns_empty_object() {
    for uri in ["/api/v1/history/task", "/api/v1/history/task/", "/api/v1/history/wiki/"] {
        let (status, body) = get(app().await, uri, None, &[]).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body, json!({}), "{uri}");
    }
}

#[tokio::test]
async fn test_paginated_history() {
    let token = token(5, false);

    let (status, body) = get(app().await, "/api/v1/history/task/42?page_size=2", Some(&token), &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    assert_eq!(body["results"].as_array().unwrap().len(), 2);
    assert_eq!(body["pagination"]["total_pages"], 2);
    assert_eq!(body["pagination"]["has_next"], true);

    let (status, body) = get(app().await, "/api/v1/history/task/42?page=2&page_size=2", Some(&token), &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"].as_array().unwrap().len(), 1);
    assert_eq!(body["results"][0]["comment"], "Blocked on review");
    assert_eq!(body["pagination"]["has_previous"], true);

    let (status, _) = get(app().await, "/api/v1/history/task/42?page=3&page_size=2", Some(&token), &[]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_pagination_params_return_full_list() {
    let (status, body) = get(app().await, "/api/v1/history/task/42?page_size=zero", Some(&token(5, false)), &[]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_repeated_query_param_is_json_bad_request() {
    let (status, body) = get(app().await, "/api/v1/history/task/42?page=1&page=2", Some(&token(5, false)), &[]).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "bad_request");
    assert!(body["message"].as_str().unwrap().contains("page"));
}

#[tokio::test]
async fn test_disable_pagination_header() {
    let (status, body) = get(
        app().await,
        "/api/v1/history/task/42?page_size=1",
        Some(&token(5, false)),
        &[("x-disable-pagination", "true")],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_health_and_version() {
    let (status, body) = get(app().await, "/health", None, &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["history_store"], "memory");

    let (status, body) = get(app().await, "/version", None, &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["history_kinds"], json!(["userstory", "task", "issue", "wiki"]));
}
