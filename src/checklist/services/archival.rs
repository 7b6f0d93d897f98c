//! Archival of fully completed checklists.

use super::{ChecklistServiceError, ChecklistServiceResult};
use crate::checklist::{
    domain::{Checklist, ChecklistId},
    ports::{ChecklistRepository, ChecklistRepositoryError},
};
use std::sync::Arc;
use tracing::{debug, info};

/// Result of an archival check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivalOutcome {
    checklist: Checklist,
    archived_now: bool,
}

impl ArchivalOutcome {
    /// Returns the checklist as stored after the check.
    #[must_use]
    pub const fn checklist(&self) -> &Checklist {
        &self.checklist
    }

    /// Returns `true` when this check moved the checklist into history.
    #[must_use]
    pub const fn archived_now(&self) -> bool {
        self.archived_now
    }
}

/// Moves checklists into history once every task is complete.
#[derive(Clone)]
pub struct ArchivalGate<R>
where
    R: ChecklistRepository,
{
    checklists: Arc<R>,
}

impl<R> ArchivalGate<R>
where
    R: ChecklistRepository,
{
    /// Creates a new archival gate.
    #[must_use]
    pub const fn new(checklists: Arc<R>) -> Self {
        Self { checklists }
    }

    /// Archives the checklist when it has at least one task and all of them
    /// are complete. Otherwise the checklist is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistServiceError::ChecklistNotFound`] for unknown
    /// checklists, or [`ChecklistServiceError::Repository`] when
    /// persistence fails.
    pub async fn archive_if_complete(
        &self,
        checklist_id: ChecklistId,
    ) -> ChecklistServiceResult<ArchivalOutcome> {
        let checklist = self
            .checklists
            .find_by_id(checklist_id)
            .await?
            .ok_or(ChecklistServiceError::ChecklistNotFound(checklist_id))?;
        if checklist.is_history() {
            return Ok(ArchivalOutcome {
                checklist,
                archived_now: false,
            });
        }

        let tasks = self.checklists.tasks_for(checklist_id).await?;
        let mut candidate = checklist.clone();
        if !candidate.archive_if_complete(&tasks)? {
            return Ok(ArchivalOutcome {
                checklist,
                archived_now: false,
            });
        }

        match self.checklists.mark_archived(checklist_id).await {
            Ok(archived) => {
                info!(checklist_id = %checklist_id, tasks = tasks.len(), "archived checklist");
                Ok(ArchivalOutcome {
                    checklist: archived,
                    archived_now: true,
                })
            }
            Err(ChecklistRepositoryError::IncompleteChecklist(_)) => {
                debug!(checklist_id = %checklist_id, "task reopened before archival");
                Ok(ArchivalOutcome {
                    checklist,
                    archived_now: false,
                })
            }
            Err(err) => Err(err.into()),
        }
    }
}
