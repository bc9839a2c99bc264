use sqlx::PgPool;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::{
    error::{HistoryError, Result},
    kind::EntityKind,
    object::EntityRepository,
    postgres::PostgresEntityRepository,
};

/// Maps each entity kind to the accessor its objects are fetched through.
#[derive(Clone, Default)]
pub struct ModelRegistry {
    accessors: HashMap<EntityKind, Arc<dyn EntityRepository>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry backed by PostgreSQL for every kind.
    pub fn postgres(pool: PgPool) -> Self {
        EntityKind::ALL.into_iter().fold(Self::new(), |registry, kind| {
            registry.with(Arc::new(PostgresEntityRepository::new(pool.clone(), kind)))
        })
    }

    /// Register `accessor` for the kind it reports, replacing any previous one.
    pub fn with(mut self, accessor: Arc<dyn EntityRepository>) -> Self {
        self.register(accessor);
        self
    }

    pub fn register(&mut self, accessor: Arc<dyn EntityRepository>) {
        self.accessors.insert(accessor.kind(), accessor);
    }

    /// # Errors
    ///
    /// Returns [`HistoryError::UnregisteredKind`] when no accessor serves `kind`.
    pub fn resolve(&self, kind: EntityKind) -> Result<Arc<dyn EntityRepository>> {
        self.accessors
            .get(&kind)
            .cloned()
            .ok_or(HistoryError::UnregisteredKind(kind))
    }

    /// Resolve an `app_label.model` content type string.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::UnknownContentType`] for unknown strings and
    /// [`HistoryError::UnregisteredKind`] for known kinds without an accessor.
    pub fn resolve_content_type(&self, content_type: &str) -> Result<Arc<dyn EntityRepository>> {
        self.resolve(EntityKind::from_content_type(content_type)?)
    }

    pub fn is_registered(&self, kind: EntityKind) -> bool {
        self.accessors.contains_key(&kind)
    }

    /// Registered kinds in declaration order.
    pub fn kinds(&self) -> Vec<EntityKind> {
        EntityKind::ALL
            .into_iter()
            .filter(|kind| self.is_registered(*kind))
            .collect()
    }
}

impl fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}
