//! Entity change-history engine for the tracker history API
//!
//! This crate owns the read side of the project tracker's change log:
//! - Static registry of the entity kinds that expose history
//!   (user stories, tasks, issues and wiki pages)
//! - Lookup of the concrete entity a history request targets
//! - Read access to the immutable history entries recorded for an entity
//! - The permission-policy seam every history read goes through
//! - PostgreSQL adapters for production and in-memory adapters for tests
//!
//! History entries are written by the tracker's recording subsystem; nothing in
//! this crate creates, mutates or deletes them.
//!
//! # Example
//!
//! ```rust
//! use history_engine::{
//!     EntityKind, HistoryEntry, HistoryStore, InMemoryEntityRepository,
//!     InMemoryHistoryStore, ModelRegistry, TargetObject,
//! };
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), history_engine::HistoryError> {
//! let tasks = Arc::new(InMemoryEntityRepository::new(EntityKind::Task));
//! tasks.insert(TargetObject::new(EntityKind::Task, 42, 1));
//!
//! let registry = ModelRegistry::new().with(tasks);
//! let store = InMemoryHistoryStore::new();
//! store.insert(HistoryEntry::change(EntityKind::Task, 42));
//!
//! let task = registry
//!     .resolve(EntityKind::Task)?
//!     .get_by_id(42)
//!     .await?
//!     .ok_or(history_engine::HistoryError::object_not_found(EntityKind::Task, 42))?;
//!
//! let entries = store.query_by_object(&task).await?;
//! assert_eq!(entries.len(), 1);
//! assert_eq!(entries[0].key, "tasks.task:42");
//! # Ok(())
//! # }
//! ```

pub mod entry;
pub mod error;
pub mod kind;
pub mod memory;
pub mod object;
pub mod policy;
pub mod postgres;
pub mod registry;
pub mod store;

pub use entry::*;
pub use error::*;
pub use kind::*;
pub use memory::*;
pub use object::*;
pub use policy::*;
pub use registry::*;
pub use store::*;
