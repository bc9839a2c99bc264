//! In-memory adapters for tests and local development

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::{
    entry::HistoryEntry,
    error::Result,
    kind::EntityKind,
    object::{EntityRepository, TargetObject},
    store::HistoryStore,
};

/// Entity accessor holding the objects of one kind in memory.
pub struct InMemoryEntityRepository {
    kind: EntityKind,
    objects: Arc<DashMap<i64, TargetObject>>,
}

impl InMemoryEntityRepository {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            objects: Arc::new(DashMap::new()),
        }
    }

    /// Store `object`. Objects of another kind are ignored.
    pub fn insert(&self, object: TargetObject) {
        if object.kind != self.kind {
            tracing::warn!(expected = %self.kind, got = %object.kind, "Ignoring object of another kind");
            return;
        }
        self.objects.insert(object.id, object);
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl EntityRepository for InMemoryEntityRepository {
    fn kind(&self) -> EntityKind {
        self.kind
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<TargetObject>> {
        Ok(self.objects.get(&id).map(|entry| entry.value().clone()))
    }
}

/// History store keeping entries in insertion order.
#[derive(Default)]
pub struct InMemoryHistoryStore {
    entries: RwLock<Vec<HistoryEntry>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entry, as the recording subsystem would.
    pub fn insert(&self, entry: HistoryEntry) {
        self.entries.write().push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn query_by_object(&self, object: &TargetObject) -> Result<Vec<HistoryEntry>> {
        let key = object.key();
        Ok(self
            .entries
            .read()
            .iter()
            .filter(|entry| entry.key == key)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_entity_lookup() {
        let repo = InMemoryEntityRepository::new(EntityKind::Task);
        repo.insert(TargetObject::new(EntityKind::Task, 42, 1));
        repo.insert(TargetObject::new(EntityKind::Issue, 43, 1));

        assert_eq!(repo.len(), 1);
        assert_eq!(repo.get_by_id(42).await.unwrap(), Some(TargetObject::new(EntityKind::Task, 42, 1)));
        assert_eq!(repo.get_by_id(43).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_history_filtered_by_object_in_insertion_order() {
        let store = InMemoryHistoryStore::new();
        let first = HistoryEntry::change(EntityKind::Task, 42).with_comment("first");
        let other_task = HistoryEntry::change(EntityKind::Task, 41);
        let same_id_other_kind = HistoryEntry::change(EntityKind::Issue, 42);
        let second = HistoryEntry::change(EntityKind::Task, 42).with_comment("second");

        store.insert(first.clone());
        store.insert(other_task);
        store.insert(same_id_other_kind);
        store.insert(second.clone());

        let task = TargetObject::new(EntityKind::Task, 42, 1);
        let entries = store.query_by_object(&task).await.unwrap();
        assert_eq!(entries, vec![first, second]);
    }

    #[tokio::test]
    async fn test_history_empty_for_object_without_entries() {
        let store = InMemoryHistoryStore::new();
        store.insert(HistoryEntry::change(EntityKind::Task, 1));

        let page = TargetObject::new(EntityKind::WikiPage, 1, 1);
        assert!(store.query_by_object(&page).await.unwrap().is_empty());
    }
}
