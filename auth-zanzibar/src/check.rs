use crate::{error::ZanzibarError, models::*, repository::TupleRepository};
use std::sync::Arc;
use tracing::debug;

/// Permission checker performs authorization checks with support for:
/// - Direct relations
/// - The `admin` relation implying every other relation on the same object
pub struct PermissionChecker {
    repository: Arc<dyn TupleRepository>,
}

impl PermissionChecker {
    pub fn new(repository: Arc<dyn TupleRepository>) -> Self {
        Self { repository }
    }

    /// Check if subject has the specified relation to object
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub async fn check(
        &self,
        subject: &Subject,
        relation: &Relation,
        object: &Object,
    ) -> Result<bool, ZanzibarError> {
        debug!("Checking: {} {} {}", subject, relation, object);

        let held = self
            .repository
            .read_tuples(Some(subject.clone()), None, Some(object.clone()))
            .await?;

        let allowed = held
            .iter()
            .any(|tuple| tuple.relation == *relation || tuple.relation.is_admin());

        debug!(allowed, "Check complete");
        Ok(allowed)
    }

    /// True if any of `subjects` holds `relation` on `object`.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub async fn check_any(
        &self,
        subjects: &[Subject],
        relation: &Relation,
        object: &Object,
    ) -> Result<bool, ZanzibarError> {
        for subject in subjects {
            if self.check(subject, relation, object).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
