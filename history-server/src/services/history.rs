//! History endpoint service
//!
//! One [`HistoryEndpoint`] is built per entity kind from a
//! [`HistoryEndpointConfig`]; all kinds share the same retrieval pipeline:
//! resolve the object, authorize the caller, then read its history.

use std::sync::Arc;

use auth_zanzibar::{ProjectPermissionPolicy, TupleRepository};
use history_engine::{
    Action, EntityKind, HistoryEntry, HistoryError, HistoryStore, ModelRegistry, PermissionPolicy, Principal,
    TargetObject,
};

use crate::error::{ApiError, ApiResult};
use crate::routes::paths;

/// Per-kind endpoint configuration
#[derive(Clone)]
pub struct HistoryEndpointConfig {
    pub kind: EntityKind,
    pub policy: Arc<dyn PermissionPolicy>,
}

impl HistoryEndpointConfig {
    pub fn new(kind: EntityKind, policy: Arc<dyn PermissionPolicy>) -> Self {
        Self { kind, policy }
    }

    /// Configuration guarded by the kind's project view permission.
    pub fn project_permissions(kind: EntityKind, tuples: Arc<dyn TupleRepository>) -> Self {
        Self::new(kind, Arc::new(ProjectPermissionPolicy::for_kind(kind, tuples)))
    }

    /// One project-permission configuration per entity kind.
    pub fn all_kinds(tuples: Arc<dyn TupleRepository>) -> Vec<Self> {
        EntityKind::ALL
            .into_iter()
            .map(|kind| Self::project_permissions(kind, tuples.clone()))
            .collect()
    }
}

/// Read-only history resource for one entity kind
pub struct HistoryEndpoint {
    kind: EntityKind,
    policy: Arc<dyn PermissionPolicy>,
    registry: Arc<ModelRegistry>,
    store: Arc<dyn HistoryStore>,
}

impl std::fmt::Debug for HistoryEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryEndpoint").field("kind", &self.kind).finish_non_exhaustive()
    }
}

impl HistoryEndpoint {
    pub fn new(config: HistoryEndpointConfig, registry: Arc<ModelRegistry>, store: Arc<dyn HistoryStore>) -> Self {
        Self {
            kind: config.kind,
            policy: config.policy,
            registry,
            store,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Route path relative to the API prefix, e.g. `/history/task`
    pub fn path(&self) -> String {
        paths::history::resource(self.kind)
    }

    /// Full history of object `id`, in stored order.
    ///
    /// # Errors
    ///
    /// - [`ApiError::NotFound`] if the kind is not registered or the object
    ///   does not exist
    /// - [`ApiError::Authorization`] if the policy denies retrieval; the
    ///   history store is not queried in that case
    /// - [`ApiError::Internal`] for storage or policy failures
    pub async fn retrieve(&self, principal: &Principal, id: i64) -> ApiResult<Vec<HistoryEntry>> {
        let target = self.resolve_target(id).await?;

        let allowed = self.policy.check(principal, Action::Retrieve, &target).await?;
        if !allowed {
            tracing::warn!(
                principal = %principal,
                kind = %self.kind,
                object_id = id,
                project_id = target.project_id,
                "History access denied"
            );
            return Err(ApiError::authorization(format!(
                "You do not have permission to view the history of this {}",
                self.kind.model()
            )));
        }

        let key = target.key();
        let entries: Vec<HistoryEntry> = self
            .store
            .query_by_object(&target)
            .await?
            .into_iter()
            .filter(|entry| {
                let owned = entry.key == key;
                if !owned {
                    tracing::warn!(expected = %key, found = %entry.key, "Dropping history entry of another object");
                }
                owned
            })
            .collect();

        tracing::debug!(key = %key, count = entries.len(), "History retrieved");
        Ok(entries)
    }

    async fn resolve_target(&self, id: i64) -> ApiResult<TargetObject> {
        let repository = self.registry.resolve(self.kind)?;
        repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| HistoryError::object_not_found(self.kind, id).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use history_engine::{InMemoryEntityRepository, InMemoryHistoryStore};

    struct Allow(bool);

    #[async_trait::async_trait]
    impl PermissionPolicy for Allow {
        async fn check(&self, _: &Principal, _: Action, _: &TargetObject) -> history_engine::Result<bool> {
            Ok(self.0)
        }
    }

    fn endpoint(allow: bool) -> HistoryEndpoint {
        let tasks = InMemoryEntityRepository::new(EntityKind::Task);
        tasks.insert(TargetObject::new(EntityKind::Task, 42, 1));

        let store = InMemoryHistoryStore::new();
        store.insert(HistoryEntry::change(EntityKind::Task, 42));
        store.insert(HistoryEntry::change(EntityKind::Issue, 42));
        store.insert(HistoryEntry::change(EntityKind::Task, 43));

        HistoryEndpoint::new(
            HistoryEndpointConfig::new(EntityKind::Task, Arc::new(Allow(allow))),
            Arc::new(ModelRegistry::new().with(Arc::new(tasks))),
            Arc::new(store),
        )
    }

    #[test]
    fn test_path() {
        assert_eq!(endpoint(true).path(), "/history/task");
    }

    #[tokio::test]
    async fn test_retrieve_returns_only_the_object_history() {
        let entries = endpoint(true).retrieve(&Principal::user(1), 42).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key, "tasks.task:42");
    }

    #[tokio::test]
    async fn test_retrieve_missing_object() {
        let err = endpoint(true).retrieve(&Principal::user(1), 999).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_retrieve_denied() {
        let err = endpoint(false).retrieve(&Principal::user(1), 42).await.unwrap_err();
        assert!(matches!(err, ApiError::Authorization { .. }));
    }
}
