//! Task completion and the last-task confirmation rule.

use super::{ArchivalGate, ChecklistServiceError, ChecklistServiceResult};
use crate::checklist::{
    domain::{ChecklistProgress, Task, TaskId},
    ports::{ChecklistRepository, ChecklistRepositoryError},
};
use std::sync::Arc;
use tracing::debug;

/// Result of toggling a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCompletion {
    task: Task,
    archived: bool,
}

impl TaskCompletion {
    /// Returns the task as stored after the update.
    #[must_use]
    pub const fn task(&self) -> &Task {
        &self.task
    }

    /// Returns `true` when the owning checklist is archived after the
    /// update.
    #[must_use]
    pub const fn archived(&self) -> bool {
        self.archived
    }
}

/// Toggles tasks and triggers archival on completion.
#[derive(Clone)]
pub struct TaskCompletionService<R>
where
    R: ChecklistRepository,
{
    checklists: Arc<R>,
    archival: ArchivalGate<R>,
}

impl<R> TaskCompletionService<R>
where
    R: ChecklistRepository,
{
    /// Creates a new completion service.
    #[must_use]
    pub fn new(checklists: Arc<R>) -> Self {
        let archival = ArchivalGate::new(Arc::clone(&checklists));
        Self {
            checklists,
            archival,
        }
    }

    /// Sets a task's completion flag. Completing a task runs the archival
    /// gate for its checklist; un-completing never does.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistServiceError::TaskNotFound`] for unknown tasks, or
    /// [`ChecklistServiceError::Repository`] when un-completing a task of an
    /// archived checklist or when persistence fails.
    pub async fn set_task_completed(
        &self,
        task_id: TaskId,
        completed: bool,
    ) -> ChecklistServiceResult<TaskCompletion> {
        let task = self
            .checklists
            .set_task_completed(task_id, completed)
            .await
            .map_err(|err| match err {
                ChecklistRepositoryError::TaskNotFound(id) => {
                    ChecklistServiceError::TaskNotFound(id)
                }
                other => ChecklistServiceError::Repository(other),
            })?;
        debug!(task_id = %task_id, completed, "updated task");

        if !completed {
            return Ok(TaskCompletion {
                task,
                archived: false,
            });
        }

        let outcome = self.archival.archive_if_complete(task.checklist_id()).await?;
        Ok(TaskCompletion {
            task,
            archived: outcome.checklist().is_history(),
        })
    }

    /// Returns `true` when setting the task to `completed` would finish its
    /// checklist. Clients ask the user to confirm such a change because
    /// archival cannot be undone.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistServiceError::TaskNotFound`] for unknown tasks, or
    /// [`ChecklistServiceError::Repository`] when persistence fails.
    pub async fn requires_confirmation(
        &self,
        task_id: TaskId,
        completed: bool,
    ) -> ChecklistServiceResult<bool> {
        let task = self
            .checklists
            .find_task(task_id)
            .await?
            .ok_or(ChecklistServiceError::TaskNotFound(task_id))?;
        if !completed {
            return Ok(false);
        }
        let tasks = self.checklists.tasks_for(task.checklist_id()).await?;
        Ok(ChecklistProgress::from_tasks(&tasks).completion_needs_confirmation(&task, completed))
    }
}
