//! Browsing, claiming, and releasing checklists.

use super::{ChecklistServiceError, ChecklistServiceResult};
use crate::checklist::{
    domain::{Checklist, ChecklistDetail, ChecklistId, ChecklistQuery, ClaimPolicy},
    ports::ChecklistRepository,
};
use crate::user::{domain::UserId, ports::UserRepository};
use std::sync::Arc;
use tracing::info;

/// Tunables for the assignment service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentConfig {
    claim_policy: ClaimPolicy,
    max_search_limit: usize,
}

impl AssignmentConfig {
    /// Default cap on browse results.
    pub const DEFAULT_MAX_SEARCH_LIMIT: usize = 100;

    /// Creates a configuration.
    #[must_use]
    pub const fn new(claim_policy: ClaimPolicy, max_search_limit: usize) -> Self {
        Self {
            claim_policy,
            max_search_limit,
        }
    }

    /// Returns how claims treat checklists owned by someone else.
    #[must_use]
    pub const fn claim_policy(&self) -> ClaimPolicy {
        self.claim_policy
    }

    /// Returns the largest number of browse results returned per call.
    #[must_use]
    pub const fn max_search_limit(&self) -> usize {
        self.max_search_limit
    }
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self::new(ClaimPolicy::default(), Self::DEFAULT_MAX_SEARCH_LIMIT)
    }
}

/// Ownership management for checklists.
#[derive(Clone)]
pub struct AssignmentService<R, U>
where
    R: ChecklistRepository,
    U: UserRepository,
{
    checklists: Arc<R>,
    users: Arc<U>,
    config: AssignmentConfig,
}

impl<R, U> AssignmentService<R, U>
where
    R: ChecklistRepository,
    U: UserRepository,
{
    /// Creates a new assignment service.
    #[must_use]
    pub const fn new(checklists: Arc<R>, users: Arc<U>, config: AssignmentConfig) -> Self {
        Self {
            checklists,
            users,
            config,
        }
    }

    /// Returns active checklists whose name, project label, or description
    /// contain `query`, newest first. Owned checklists are included so
    /// callers can tell claimable lists from taken ones.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistServiceError::Repository`] when the search fails.
    pub async fn list_available(
        &self,
        query: &str,
        limit: usize,
    ) -> ChecklistServiceResult<Vec<Checklist>> {
        let capped = limit.min(self.config.max_search_limit());
        if capped == 0 {
            return Ok(Vec::new());
        }
        let search = ChecklistQuery::new(query, capped);
        Ok(self.checklists.search(&search).await?)
    }

    /// Assigns a checklist to `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistServiceError::UserNotFound`] or
    /// [`ChecklistServiceError::ChecklistNotFound`] for unknown references,
    /// [`ChecklistServiceError::Domain`] when the checklist is archived or
    /// the exclusive policy forbids taking it over, and
    /// [`ChecklistServiceError::Repository`] when the owner changed between
    /// read and write.
    pub async fn claim(
        &self,
        checklist_id: ChecklistId,
        user_id: UserId,
    ) -> ChecklistServiceResult<Checklist> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(ChecklistServiceError::UserNotFound(user_id));
        }

        let mut checklist = self.load(checklist_id).await?;
        let observed = checklist.owner();
        if !checklist.claim(user_id, self.config.claim_policy())? {
            return Ok(checklist);
        }

        let updated = self
            .checklists
            .compare_and_set_owner(checklist_id, observed, Some(user_id))
            .await?;
        info!(
            checklist_id = %checklist_id,
            user_id = %user_id,
            previous_owner = ?observed,
            "claimed checklist"
        );
        Ok(updated)
    }

    /// Clears the owner of a checklist.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistServiceError::ChecklistNotFound`] for unknown
    /// checklists, [`ChecklistServiceError::Domain`] when it is archived,
    /// and [`ChecklistServiceError::Repository`] when the owner changed
    /// between read and write.
    pub async fn release(&self, checklist_id: ChecklistId) -> ChecklistServiceResult<Checklist> {
        let mut checklist = self.load(checklist_id).await?;
        let observed = checklist.owner();
        if !checklist.release()? {
            return Ok(checklist);
        }

        let updated = self
            .checklists
            .compare_and_set_owner(checklist_id, observed, None)
            .await?;
        info!(checklist_id = %checklist_id, previous_owner = ?observed, "released checklist");
        Ok(updated)
    }

    /// Returns the active checklists owned by `user_id` with their tasks,
    /// newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistServiceError::Repository`] when the lookup fails.
    pub async fn list_assigned(
        &self,
        user_id: UserId,
    ) -> ChecklistServiceResult<Vec<ChecklistDetail>> {
        Ok(self.checklists.list_owned_by(user_id).await?)
    }

    async fn load(&self, checklist_id: ChecklistId) -> ChecklistServiceResult<Checklist> {
        self.checklists
            .find_by_id(checklist_id)
            .await?
            .ok_or(ChecklistServiceError::ChecklistNotFound(checklist_id))
    }
}
