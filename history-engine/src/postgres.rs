//! PostgreSQL-backed entity and history adapters
//!
//! Entities are read from their per-kind tables (`tasks_task`, ...) and history
//! from `history_historyentry`, indexed by the `{content_type}:{id}` key.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, PgPool, Row};
use tracing::debug;
use uuid::Uuid;

use crate::{
    entry::{HistoryEntry, HistoryType, HistoryUser},
    error::{HistoryError, Result},
    kind::EntityKind,
    object::{EntityRepository, TargetObject},
    store::HistoryStore,
};

/// Entity accessor reading one kind's table.
pub struct PostgresEntityRepository {
    pool: PgPool,
    kind: EntityKind,
}

impl PostgresEntityRepository {
    pub fn new(pool: PgPool, kind: EntityKind) -> Self {
        Self { pool, kind }
    }
}

#[async_trait]
impl EntityRepository for PostgresEntityRepository {
    fn kind(&self) -> EntityKind {
        self.kind
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<TargetObject>> {
        debug!(kind = %self.kind, id, "Fetching entity");

        // Table names come from the static kind mapping, never from input.
        let query = format!(
            "SELECT id, project_id FROM {} WHERE id = $1",
            self.kind.table_name()
        );

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| -> Result<TargetObject> {
            Ok(TargetObject::new(
                self.kind,
                row.try_get("id")?,
                row.try_get("project_id")?,
            ))
        })
        .transpose()
    }
}

/// History store over the `history_historyentry` table.
pub struct PostgresHistoryStore {
    pool: PgPool,
}

impl PostgresHistoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Raw `history_historyentry` row.
///
/// `id` is stored as text and the JSON columns are nullable.
#[derive(Debug, Clone, Default)]
struct HistoryRow {
    id: String,
    key: String,
    entry_type: i16,
    user: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
    diff: Option<serde_json::Value>,
    snapshot: Option<serde_json::Value>,
    values: Option<serde_json::Value>,
    comment: Option<String>,
    comment_html: Option<String>,
    is_snapshot: Option<bool>,
    is_hidden: Option<bool>,
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl HistoryRow {
    fn from_row(row: &PgRow) -> Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            key: row.try_get("key")?,
            entry_type: row.try_get("type")?,
            user: row.try_get("user")?,
            created_at: row.try_get("created_at")?,
            diff: row.try_get("diff")?,
            snapshot: row.try_get("snapshot")?,
            values: row.try_get("values")?,
            comment: row.try_get("comment")?,
            comment_html: row.try_get("comment_html")?,
            is_snapshot: row.try_get("is_snapshot")?,
            is_hidden: row.try_get("is_hidden")?,
        })
    }

    fn into_entry(self) -> Result<HistoryEntry> {
        let id = Uuid::parse_str(self.id.trim())
            .map_err(|e| HistoryError::MalformedEntry(format!("invalid entry id {}: {e}", self.id)))?;

        let user = match self.user {
            None | Some(serde_json::Value::Null) => HistoryUser::system(),
            Some(user) => serde_json::from_value(user)
                .map_err(|e| HistoryError::MalformedEntry(format!("invalid user reference: {e}")))?,
        };

        Ok(HistoryEntry {
            id,
            key: self.key,
            entry_type: HistoryType::try_from(self.entry_type)?,
            user,
            created_at: self.created_at,
            diff: self.diff.unwrap_or_else(empty_object),
            snapshot: self.snapshot.filter(|snapshot| !snapshot.is_null()),
            values: self.values.unwrap_or_else(empty_object),
            comment: self.comment.unwrap_or_default(),
            comment_html: self.comment_html.unwrap_or_default(),
            is_snapshot: self.is_snapshot.unwrap_or(false),
            is_hidden: self.is_hidden.unwrap_or(false),
        })
    }
}

#[async_trait]
impl HistoryStore for PostgresHistoryStore {
    async fn query_by_object(&self, object: &TargetObject) -> Result<Vec<HistoryEntry>> {
        let key = object.key();
        debug!(key = %key, "Querying history entries");

        let rows = sqlx::query(
            r#"
            SELECT id, key, type, "user", created_at, diff, snapshot, "values",
                   comment, comment_html, is_snapshot, is_hidden
            FROM history_historyentry
            WHERE key = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(&key)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| HistoryRow::from_row(row)?.into_entry())
            .collect()
    }
}
