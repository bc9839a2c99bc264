use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{error::Result, kind::EntityKind};

/// A stored entity whose history is being requested.
///
/// Owned by the entity store; this crate only reads the fields it needs to
/// authorize the request and locate the history entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetObject {
    pub kind: EntityKind,
    pub id: i64,
    pub project_id: i64,
}

impl TargetObject {
    pub fn new(kind: EntityKind, id: i64, project_id: i64) -> Self {
        Self { kind, id, project_id }
    }

    /// History store key of this object.
    pub fn key(&self) -> String {
        self.kind.object_key(self.id)
    }
}

/// Read accessor for the entities of one kind.
#[async_trait]
pub trait EntityRepository: Send + Sync {
    /// Kind of entity this accessor serves.
    fn kind(&self) -> EntityKind;

    /// Fetch an entity by primary key; `Ok(None)` when it does not exist.
    async fn get_by_id(&self, id: i64) -> Result<Option<TargetObject>>;
}
