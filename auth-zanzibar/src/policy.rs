use async_trait::async_trait;
use history_engine::{Action, EntityKind, PermissionPolicy, Principal, TargetObject};
use std::sync::Arc;
use tracing::debug;

use crate::{
    check::PermissionChecker,
    models::{Object, Relation, Subject},
    repository::TupleRepository,
};

/// Project permission required to read the history of `kind`.
pub fn view_permission(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::UserStory => "view_us",
        EntityKind::Task => "view_tasks",
        EntityKind::Issue => "view_issues",
        EntityKind::WikiPage => "view_wiki_pages",
    }
}

/// Grants history reads to callers holding one permission on the object's
/// project.
pub struct ProjectPermissionPolicy {
    checker: PermissionChecker,
    permission: Relation,
}

impl ProjectPermissionPolicy {
    pub fn new(repository: Arc<dyn TupleRepository>, permission: &str) -> Self {
        Self {
            checker: PermissionChecker::new(repository),
            permission: Relation::new(permission),
        }
    }

    /// Policy requiring the view permission of `kind`.
    pub fn for_kind(kind: EntityKind, repository: Arc<dyn TupleRepository>) -> Self {
        Self::new(repository, view_permission(kind))
    }

    pub fn permission(&self) -> &str {
        &self.permission.name
    }

    /// Subjects whose grants apply to `principal`, most specific first.
    fn subjects_for(principal: &Principal) -> Vec<Subject> {
        match principal.user_id {
            Some(user_id) => vec![Subject::user(user_id), Subject::authenticated()],
            None => vec![Subject::anonymous()],
        }
    }
}

#[async_trait]
impl PermissionPolicy for ProjectPermissionPolicy {
    async fn check(
        &self,
        principal: &Principal,
        action: Action,
        object: &TargetObject,
    ) -> history_engine::Result<bool> {
        if action != Action::Retrieve {
            return Ok(false);
        }
        if principal.is_superuser {
            debug!(%principal, "Superuser bypasses project permissions");
            return Ok(true);
        }

        let project = Object::project(object.project_id);
        let subjects = Self::subjects_for(principal);
        Ok(self
            .checker
            .check_any(&subjects, &self.permission, &project)
            .await?)
    }
}
