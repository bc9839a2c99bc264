//! PostgreSQL-backed Zanzibar tuple repository
//!
//! Tuples live in `zanzibar_tuples`; rows past their `expires_at` are ignored
//! by every read.

use crate::{error::ZanzibarError, models::*, repository::TupleRepository};
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::debug;

/// PostgreSQL-backed tuple repository
pub struct PostgresTupleRepository {
    pool: PgPool,
}

impl PostgresTupleRepository {
    /// Create a new PostgreSQL repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TupleRepository for PostgresTupleRepository {
    async fn read_tuples(
        &self,
        subject: Option<Subject>,
        relation: Option<Relation>,
        object: Option<Object>,
    ) -> Result<Vec<Tuple>, ZanzibarError> {
        debug!("Reading tuples: subject={:?}, relation={:?}, object={:?}", subject, relation, object);

        // Build dynamic query based on filters
        let mut query = String::from(
            "SELECT subject_type, subject_id, relation_name, object_type, object_id, created_at \
             FROM zanzibar_tuples \
             WHERE (expires_at IS NULL OR expires_at > NOW())",
        );

        let mut binds: Vec<String> = Vec::new();
        let mut filter = |column: &str, value: &str| {
            binds.push(value.to_string());
            query.push_str(&format!(" AND {} = ${}", column, binds.len()));
        };

        if let Some(ref s) = subject {
            filter("subject_type", &s.subject_type);
            filter("subject_id", &s.subject_id);
        }
        if let Some(ref r) = relation {
            filter("relation_name", &r.name);
        }
        if let Some(ref o) = object {
            filter("object_type", &o.object_type);
            filter("object_id", &o.object_id);
        }

        let mut sqlx_query = sqlx::query(&query);
        for bind in binds {
            sqlx_query = sqlx_query.bind(bind);
        }

        let rows = sqlx_query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ZanzibarError::StorageError(format!("Failed to read tuples: {}", e)))?;

        rows.iter()
            .map(|row| {
                let read = |column: &str| -> Result<String, ZanzibarError> {
                    row.try_get(column)
                        .map_err(|e| ZanzibarError::StorageError(format!("Failed to decode {}: {}", column, e)))
                };
                Ok(Tuple {
                    subject: Subject {
                        subject_type: read("subject_type")?,
                        subject_id: read("subject_id")?,
                    },
                    relation: Relation::new(&read("relation_name")?),
                    object: Object {
                        object_type: read("object_type")?,
                        object_id: read("object_id")?,
                    },
                    created_at: row
                        .try_get("created_at")
                        .map_err(|e| ZanzibarError::StorageError(format!("Failed to decode created_at: {}", e)))?,
                })
            })
            .collect()
    }
}
