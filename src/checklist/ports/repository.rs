//! Repository port for checklist and task persistence.

use crate::checklist::domain::{
    Checklist, ChecklistDetail, ChecklistId, ChecklistQuery, Task, TaskId, WorkOrderId,
};
use crate::user::domain::UserId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for checklist repository operations.
pub type ChecklistRepositoryResult<T> = Result<T, ChecklistRepositoryError>;

/// Checklist persistence contract.
#[async_trait]
pub trait ChecklistRepository: Send + Sync {
    /// Stores a new checklist together with its seeded tasks.
    ///
    /// The write is atomic: either the checklist and every task are stored,
    /// or nothing is.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistRepositoryError::DuplicateWorkOrder`] when a
    /// checklist already exists for the work order, or
    /// [`ChecklistRepositoryError::DuplicateChecklist`] when the identifier
    /// is taken.
    async fn store_with_tasks(
        &self,
        checklist: &Checklist,
        tasks: &[Task],
    ) -> ChecklistRepositoryResult<()>;

    /// Finds a checklist by identifier.
    async fn find_by_id(&self, id: ChecklistId) -> ChecklistRepositoryResult<Option<Checklist>>;

    /// Finds the checklist created for a work order.
    async fn find_by_work_order(
        &self,
        work_order_id: &WorkOrderId,
    ) -> ChecklistRepositoryResult<Option<Checklist>>;

    /// Returns checklists matching `query`, newest first, at most
    /// `query.limit()` of them.
    async fn search(&self, query: &ChecklistQuery) -> ChecklistRepositoryResult<Vec<Checklist>>;

    /// Returns the non-archived checklists owned by `owner` with their
    /// tasks, newest first.
    async fn list_owned_by(&self, owner: UserId)
    -> ChecklistRepositoryResult<Vec<ChecklistDetail>>;

    /// Sets the owner when the stored owner still equals `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistRepositoryError::ChecklistNotFound`] when the
    /// checklist is missing, [`ChecklistRepositoryError::OwnerConflict`]
    /// when the stored owner differs from `expected`,
    /// [`ChecklistRepositoryError::ChecklistArchived`] when it was archived
    /// in the meantime, or [`ChecklistRepositoryError::UnknownUser`] when
    /// `owner` does not exist.
    async fn compare_and_set_owner(
        &self,
        id: ChecklistId,
        expected: Option<UserId>,
        owner: Option<UserId>,
    ) -> ChecklistRepositoryResult<Checklist>;

    /// Finds a task by identifier.
    async fn find_task(&self, id: TaskId) -> ChecklistRepositoryResult<Option<Task>>;

    /// Returns the tasks of a checklist in template order.
    async fn tasks_for(&self, checklist_id: ChecklistId) -> ChecklistRepositoryResult<Vec<Task>>;

    /// Updates a task's completion flag.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistRepositoryError::TaskNotFound`] when the task is
    /// missing, or [`ChecklistRepositoryError::ChecklistArchived`] when
    /// un-completing a task of an archived checklist.
    async fn set_task_completed(
        &self,
        id: TaskId,
        completed: bool,
    ) -> ChecklistRepositoryResult<Task>;

    /// Marks a checklist as archived, re-checking completeness at write
    /// time.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistRepositoryError::ChecklistNotFound`] when the
    /// checklist is missing, or
    /// [`ChecklistRepositoryError::IncompleteChecklist`] when it has no tasks
    /// or an open task.
    async fn mark_archived(&self, id: ChecklistId) -> ChecklistRepositoryResult<Checklist>;
}

/// Errors returned by checklist repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ChecklistRepositoryError {
    /// A checklist with the same identifier already exists.
    #[error("duplicate checklist identifier: {0}")]
    DuplicateChecklist(ChecklistId),

    /// A checklist for the work order already exists.
    #[error("checklist already exists for work order {0}")]
    DuplicateWorkOrder(WorkOrderId),

    /// The checklist was not found.
    #[error("checklist not found: {0}")]
    ChecklistNotFound(ChecklistId),

    /// The task was not found.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The referenced user does not exist.
    #[error("user not found: {0}")]
    UnknownUser(UserId),

    /// The stored owner no longer matches the caller's expectation.
    #[error("owner of checklist {checklist_id} changed concurrently")]
    OwnerConflict {
        /// Checklist being updated.
        checklist_id: ChecklistId,
        /// Owner the caller observed.
        expected: Option<UserId>,
        /// Owner found in the store.
        actual: Option<UserId>,
    },

    /// The checklist is archived and the write would break that state.
    #[error("checklist {0} is archived")]
    ChecklistArchived(ChecklistId),

    /// The checklist cannot be archived because a task is still open.
    #[error("checklist {0} still has open tasks")]
    IncompleteChecklist(ChecklistId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ChecklistRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
