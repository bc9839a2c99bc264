use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, ZanzibarError};

/// Represents a subject in the authorization system
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subject {
    pub subject_type: String,
    pub subject_id: String,
}

impl Subject {
    pub fn user(user_id: i64) -> Self {
        Self {
            subject_type: "user".to_string(),
            subject_id: user_id.to_string(),
        }
    }

    /// Every authenticated user; carries a project's public permissions.
    pub fn authenticated() -> Self {
        Self {
            subject_type: "role".to_string(),
            subject_id: "authenticated".to_string(),
        }
    }

    /// Unauthenticated callers; carries a project's anonymous permissions.
    pub fn anonymous() -> Self {
        Self {
            subject_type: "role".to_string(),
            subject_id: "anonymous".to_string(),
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.subject_type, self.subject_id)
    }
}

/// Represents an object (resource) in the authorization system
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Object {
    pub object_type: String,
    pub object_id: String,
}

impl Object {
    pub fn new(object_type: &str, object_id: &str) -> Self {
        Self {
            object_type: object_type.to_string(),
            object_id: object_id.to_string(),
        }
    }

    pub fn project(project_id: i64) -> Self {
        Self::new("project", &project_id.to_string())
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.object_type, self.object_id)
    }
}

/// Represents a relation (permission type) in the authorization system
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
    pub name: String,
}

impl Relation {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    /// Project administration; implies every other relation on the project.
    pub fn admin() -> Self {
        Self::new("admin")
    }

    pub fn is_admin(&self) -> bool {
        self.name == "admin"
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Represents a relationship tuple: subject has relation to object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tuple {
    pub subject: Subject,
    pub relation: Relation,
    pub object: Object,
    pub created_at: DateTime<Utc>,
}

impl Tuple {
    pub fn new(subject: Subject, relation: Relation, object: Object) -> Self {
        Self {
            subject,
            relation,
            object,
            created_at: Utc::now(),
        }
    }

    /// Identity of the tuple, ignoring its creation time.
    pub fn key(&self) -> String {
        format!("{} {} {}", self.subject, self.relation, self.object)
    }

    /// # Errors
    ///
    /// Returns [`ZanzibarError::InvalidTuple`] if any component is empty.
    pub fn validate(&self) -> Result<()> {
        let parts = [
            &self.subject.subject_type,
            &self.subject.subject_id,
            &self.relation.name,
            &self.object.object_type,
            &self.object.object_id,
        ];
        if parts.iter().any(|part| part.is_empty()) {
            return Err(ZanzibarError::InvalidTuple(self.key()));
        }
        Ok(())
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}
