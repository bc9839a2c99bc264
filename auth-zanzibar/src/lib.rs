//! Zanzibar-style project permissions for the tracker history API
//!
//! Project permissions are stored as relationship tuples
//! (`subject has relation to object`) and evaluated by the per-kind history
//! read policies:
//! - Direct grants: `user:5 view_tasks project:1`
//! - Role implication: the `admin` relation on a project implies every permission
//! - Public permissions granted to the `authenticated` subject
//! - Anonymous permissions granted to the `anonymous` subject
//! - Superusers bypass the tuple store entirely
//!
//! # Example
//!
//! ```rust
//! use auth_zanzibar::{InMemoryTupleRepository, ProjectPermissionPolicy, Relation, Subject, Object, Tuple};
//! use history_engine::{Action, EntityKind, PermissionPolicy, Principal, TargetObject};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = Arc::new(InMemoryTupleRepository::new());
//! repo.insert(Tuple::new(
//!     Subject::user(5),
//!     Relation::new("view_tasks"),
//!     Object::project(1),
//! ))?;
//!
//! let policy = ProjectPermissionPolicy::for_kind(EntityKind::Task, repo);
//! let task = TargetObject::new(EntityKind::Task, 42, 1);
//!
//! assert!(policy.check(&Principal::user(5), Action::Retrieve, &task).await?);
//! assert!(!policy.check(&Principal::user(6), Action::Retrieve, &task).await?);
//! # Ok(())
//! # }
//! ```

pub mod check;
pub mod error;
pub mod models;
pub mod policy;
pub mod repository;

pub use check::*;
pub use error::*;
pub use models::*;
pub use policy::*;
pub use repository::*;
