use crate::{error::ZanzibarError, models::*};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

pub mod postgres;

pub use postgres::PostgresTupleRepository;

/// Read access to stored relationship tuples
#[async_trait]
pub trait TupleRepository: Send + Sync {
    /// Read tuples matching the given filter
    /// None values act as wildcards
    async fn read_tuples(
        &self,
        subject: Option<Subject>,
        relation: Option<Relation>,
        object: Option<Object>,
    ) -> Result<Vec<Tuple>, ZanzibarError>;
}

/// In-memory tuple repository for testing and development
pub struct InMemoryTupleRepository {
    tuples: Arc<DashMap<String, Tuple>>,
}

impl InMemoryTupleRepository {
    pub fn new() -> Self {
        Self {
            tuples: Arc::new(DashMap::new()),
        }
    }

    /// Seed a tuple. Inserting the same tuple twice keeps one copy.
    pub fn insert(&self, tuple: Tuple) -> Result<(), ZanzibarError> {
        tuple.validate()?;
        self.tuples.insert(tuple.key(), tuple);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }
}

impl Default for InMemoryTupleRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TupleRepository for InMemoryTupleRepository {
    async fn read_tuples(
        &self,
        subject: Option<Subject>,
        relation: Option<Relation>,
        object: Option<Object>,
    ) -> Result<Vec<Tuple>, ZanzibarError> {
        let tuples = self
            .tuples
            .iter()
            .filter(|entry| {
                let tuple = entry.value();
                subject.as_ref().map_or(true, |s| tuple.subject == *s)
                    && relation.as_ref().map_or(true, |r| tuple.relation == *r)
                    && object.as_ref().map_or(true, |o| tuple.object == *o)
            })
            .map(|entry| entry.value().clone())
            .collect();

        Ok(tuples)
    }
}
