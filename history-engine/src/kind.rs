use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::HistoryError;

/// Entity kinds that expose a change history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    UserStory,
    Task,
    Issue,
    WikiPage,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::UserStory,
        EntityKind::Task,
        EntityKind::Issue,
        EntityKind::WikiPage,
    ];

    /// Application label half of the content type.
    pub fn app_label(self) -> &'static str {
        match self {
            EntityKind::UserStory => "userstories",
            EntityKind::Task => "tasks",
            EntityKind::Issue => "issues",
            EntityKind::WikiPage => "wiki",
        }
    }

    /// Model half of the content type.
    pub fn model(self) -> &'static str {
        match self {
            EntityKind::UserStory => "userstory",
            EntityKind::Task => "task",
            EntityKind::Issue => "issue",
            EntityKind::WikiPage => "wikipage",
        }
    }

    /// `app_label.model`, e.g. `tasks.task`.
    pub fn content_type(self) -> &'static str {
        match self {
            EntityKind::UserStory => "userstories.userstory",
            EntityKind::Task => "tasks.task",
            EntityKind::Issue => "issues.issue",
            EntityKind::WikiPage => "wiki.wikipage",
        }
    }

    /// Path segment the kind is served under (`/history/{slug}`).
    pub fn slug(self) -> &'static str {
        match self {
            EntityKind::UserStory => "userstory",
            EntityKind::Task => "task",
            EntityKind::Issue => "issue",
            EntityKind::WikiPage => "wiki",
        }
    }

    /// Table the entity rows live in.
    pub fn table_name(self) -> &'static str {
        match self {
            EntityKind::UserStory => "userstories_userstory",
            EntityKind::Task => "tasks_task",
            EntityKind::Issue => "issues_issue",
            EntityKind::WikiPage => "wiki_wikipage",
        }
    }

    /// Key the history store indexes entries of one object by.
    pub fn object_key(self, id: i64) -> String {
        format!("{}:{}", self.content_type(), id)
    }

    /// Resolve an `app_label.model` string.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::UnknownContentType`] when the string is not of
    /// the `app_label.model` form or names a model without history.
    pub fn from_content_type(content_type: &str) -> Result<Self, HistoryError> {
        let (app_label, model) = content_type
            .split_once('.')
            .ok_or_else(|| HistoryError::UnknownContentType(content_type.to_string()))?;

        Self::ALL
            .into_iter()
            .find(|kind| kind.app_label() == app_label && kind.model() == model)
            .ok_or_else(|| HistoryError::UnknownContentType(content_type.to_string()))
    }

    /// Resolve a route slug such as `task` or `wiki`.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::UnknownContentType`] for slugs without a kind.
    pub fn from_slug(slug: &str) -> Result<Self, HistoryError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.slug() == slug)
            .ok_or_else(|| HistoryError::UnknownContentType(slug.to_string()))
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.content_type())
    }
}

impl FromStr for EntityKind {
    type Err = HistoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_content_type(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_resolution() {
        assert_eq!(EntityKind::from_content_type("userstories.userstory").unwrap(), EntityKind::UserStory);
        assert_eq!(EntityKind::from_content_type("tasks.task").unwrap(), EntityKind::Task);
        assert_eq!(EntityKind::from_content_type("issues.issue").unwrap(), EntityKind::Issue);
        assert_eq!(EntityKind::from_content_type("wiki.wikipage").unwrap(), EntityKind::WikiPage);
    }

    #[test]
    fn test_unknown_content_types_are_rejected() {
        for input in ["tasks", "tasks.issue", "epics.epic", "", ".task", "tasks.task.extra"] {
            let err = EntityKind::from_content_type(input).unwrap_err();
            assert!(err.is_not_found(), "{input} should be unknown");
        }
    }

    #[test]
    fn test_content_type_round_trips_through_display() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.to_string().parse::<EntityKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_slugs() {
        assert_eq!(EntityKind::from_slug("wiki").unwrap(), EntityKind::WikiPage);
        assert_eq!(EntityKind::from_slug("userstory").unwrap(), EntityKind::UserStory);
        assert!(EntityKind::from_slug("wikipage").is_err());
    }

    #[test]
    fn test_object_key() {
        assert_eq!(EntityKind::Task.object_key(42), "tasks.task:42");
        assert_eq!(EntityKind::WikiPage.object_key(7), "wiki.wikipage:7");
    }
}
