use async_trait::async_trait;

use crate::{entry::HistoryEntry, error::Result, object::TargetObject};

/// Read access to the history recorded for entities.
///
/// Implementations return entries in their own stored order; callers must not
/// reorder them.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// All history entries recorded for `object`.
    async fn query_by_object(&self, object: &TargetObject) -> Result<Vec<HistoryEntry>>;
}
