// History entry types and structures
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::HistoryError, kind::EntityKind};

/// Kind of change a history entry records. Stored and serialized as its
/// integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i16", try_from = "i16")]
pub enum HistoryType {
    Change,
    Create,
    Delete,
}

impl HistoryType {
    pub fn code(self) -> i16 {
        match self {
            HistoryType::Change => 1,
            HistoryType::Create => 2,
            HistoryType::Delete => 3,
        }
    }
}

impl From<HistoryType> for i16 {
    fn from(value: HistoryType) -> Self {
        value.code()
    }
}

impl TryFrom<i16> for HistoryType {
    type Error = HistoryError;

    fn try_from(code: i16) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(HistoryType::Change),
            2 => Ok(HistoryType::Create),
            3 => Ok(HistoryType::Delete),
            other => Err(HistoryError::MalformedEntry(format!("unknown history type {other}"))),
        }
    }
}

/// Actor reference captured when the entry was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryUser {
    pub pk: Option<i64>,
    pub name: String,
}

impl HistoryUser {
    pub fn new(pk: i64, name: impl Into<String>) -> Self {
        Self {
            pk: Some(pk),
            name: name.into(),
        }
    }

    /// Placeholder for changes made by the system or a deleted user.
    pub fn system() -> Self {
        Self {
            pk: None,
            name: "system".to_string(),
        }
    }
}

/// One immutable change record of a single entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    /// `{content_type}:{object_id}` of the entity this entry belongs to.
    pub key: String,
    #[serde(rename = "type")]
    pub entry_type: HistoryType,
    pub user: HistoryUser,
    pub created_at: DateTime<Utc>,
    pub diff: serde_json::Value,
    pub snapshot: Option<serde_json::Value>,
    pub values: serde_json::Value,
    pub comment: String,
    pub comment_html: String,
    pub is_snapshot: bool,
    pub is_hidden: bool,
}

impl HistoryEntry {
    pub fn new(kind: EntityKind, object_id: i64, entry_type: HistoryType) -> Self {
        Self {
            id: Uuid::new_v4(),
            key: kind.object_key(object_id),
            entry_type,
            user: HistoryUser::system(),
            created_at: Utc::now(),
            diff: serde_json::Value::Object(serde_json::Map::new()),
            snapshot: None,
            values: serde_json::Value::Object(serde_json::Map::new()),
            comment: String::new(),
            comment_html: String::new(),
            is_snapshot: false,
            is_hidden: false,
        }
    }

    pub fn change(kind: EntityKind, object_id: i64) -> Self {
        Self::new(kind, object_id, HistoryType::Change)
    }

    pub fn with_user(mut self, user: HistoryUser) -> Self {
        self.user = user;
        self
    }

    pub fn with_diff(mut self, diff: serde_json::Value) -> Self {
        self.diff = diff;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Id of the entity this entry belongs to, parsed from the key.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::MalformedEntry`] if the key does not end in
    /// `:{integer}`.
    pub fn object_id(&self) -> Result<i64, HistoryError> {
        self.key
            .rsplit_once(':')
            .and_then(|(_, id)| id.parse().ok())
            .ok_or_else(|| HistoryError::MalformedEntry(format!("invalid key {}", self.key)))
    }
}
