use thiserror::Error;

use crate::kind::EntityKind;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Unknown content type: {0}")]
    UnknownContentType(String),

    #[error("No model registered for entity kind: {0}")]
    UnregisteredKind(EntityKind),

    #[error("{kind} {id} not found")]
    ObjectNotFound { kind: EntityKind, id: i64 },

    #[error("Malformed history entry: {0}")]
    MalformedEntry(String),

    #[error("Permission check failed: {0}")]
    PermissionCheck(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl HistoryError {
    pub fn object_not_found(kind: EntityKind, id: i64) -> Self {
        Self::ObjectNotFound { kind, id }
    }

    /// True for every failure a client should see as a missing resource.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UnknownContentType(_) | Self::UnregisteredKind(_) | Self::ObjectNotFound { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, HistoryError>;
