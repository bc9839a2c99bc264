use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{error::Result, object::TargetObject};

/// The caller a history request is evaluated for.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Principal {
    /// `None` for anonymous callers.
    pub user_id: Option<i64>,
    pub is_superuser: bool,
}

impl Principal {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn user(user_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
            is_superuser: false,
        }
    }

    pub fn superuser(user_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
            is_superuser: true,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.user_id {
            Some(id) => write!(f, "user:{id}"),
            None => f.write_str("anonymous"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    List,
    Retrieve,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::List => "list",
            Action::Retrieve => "retrieve",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authorization decision for one entity kind.
#[async_trait]
pub trait PermissionPolicy: Send + Sync {
    /// Whether `principal` may perform `action` on `object`.
    async fn check(&self, principal: &Principal, action: Action, object: &TargetObject) -> Result<bool>;
}
