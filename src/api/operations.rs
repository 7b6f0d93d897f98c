//! Transport-agnostic entry points composing the checklist services.

use async_trait::async_trait;
use mockable::Clock;
use std::sync::Arc;

use super::error::ApiResult;
use crate::checklist::{
    domain::{Checklist, ChecklistDetail, ChecklistId, TaskId},
    ports::{ChecklistRepository, TemplateRepository},
    services::{
        ArchivalGate, ArchivalOutcome, AssignmentConfig, AssignmentService, ChecklistSyncService,
        SyncReport, SyncWorkOrderRequest, TaskCompletion, TaskCompletionService,
    },
};
use crate::user::{
    domain::{User, UserId},
    ports::UserRepository,
    services::{RecordLoginRequest, UserDirectoryService},
};

/// Every operation the service exposes to external callers.
#[async_trait]
pub trait ChecklistOperations: Send + Sync {
    /// Creates missing checklists for the given work orders.
    async fn sync_work_orders(
        &self,
        requests: Vec<SyncWorkOrderRequest>,
    ) -> ApiResult<SyncReport>;

    /// Searches active checklists.
    async fn list_available(&self, query: &str, limit: usize) -> ApiResult<Vec<Checklist>>;

    /// Assigns a checklist to a user.
    async fn claim(&self, checklist_id: ChecklistId, user_id: UserId) -> ApiResult<Checklist>;

    /// Clears the owner of a checklist.
    async fn release(&self, checklist_id: ChecklistId) -> ApiResult<Checklist>;

    /// Lists a user's active checklists with their tasks.
    async fn list_assigned(&self, user_id: UserId) -> ApiResult<Vec<ChecklistDetail>>;

    /// Sets a task's completion flag.
    async fn set_task_completed(
        &self,
        task_id: TaskId,
        completed: bool,
    ) -> ApiResult<TaskCompletion>;

    /// Reports whether a toggle needs user confirmation first.
    async fn requires_confirmation(&self, task_id: TaskId, completed: bool) -> ApiResult<bool>;

    /// Archives a checklist when all of its tasks are complete.
    async fn archive_if_complete(&self, checklist_id: ChecklistId) -> ApiResult<ArchivalOutcome>;

    /// Creates or refreshes a user on sign-in.
    async fn record_login(&self, request: RecordLoginRequest) -> ApiResult<User>;
}

/// Application facade wiring the services to one set of adapters.
pub struct ChecklistApplication<R, T, U, C>
where
    R: ChecklistRepository,
    T: TemplateRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    sync: ChecklistSyncService<R, T, C>,
    assignment: AssignmentService<R, U>,
    completion: TaskCompletionService<R>,
    archival: ArchivalGate<R>,
    users: UserDirectoryService<U, C>,
}

impl<R, T, U, C> ChecklistApplication<R, T, U, C>
where
    R: ChecklistRepository,
    T: TemplateRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    /// Builds every service over the shared adapters.
    #[must_use]
    pub fn new(
        checklists: Arc<R>,
        templates: Arc<T>,
        users: Arc<U>,
        clock: Arc<C>,
        config: AssignmentConfig,
    ) -> Self {
        Self {
            sync: ChecklistSyncService::new(Arc::clone(&checklists), templates, Arc::clone(&clock)),
            assignment: AssignmentService::new(
                Arc::clone(&checklists),
                Arc::clone(&users),
                config,
            ),
            completion: TaskCompletionService::new(Arc::clone(&checklists)),
            archival: ArchivalGate::new(checklists),
            users: UserDirectoryService::new(users, clock),
        }
    }
}

#[async_trait]
impl<R, T, U, C> ChecklistOperations for ChecklistApplication<R, T, U, C>
where
    R: ChecklistRepository + 'static,
    T: TemplateRepository + 'static,
    U: UserRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    async fn sync_work_orders(
        &self,
        requests: Vec<SyncWorkOrderRequest>,
    ) -> ApiResult<SyncReport> {
        Ok(self.sync.sync_work_orders(requests).await?)
    }

    async fn list_available(&self, query: &str, limit: usize) -> ApiResult<Vec<Checklist>> {
        Ok(self.assignment.list_available(query, limit).await?)
    }

    async fn claim(&self, checklist_id: ChecklistId, user_id: UserId) -> ApiResult<Checklist> {
        Ok(self.assignment.claim(checklist_id, user_id).await?)
    }

    async fn release(&self, checklist_id: ChecklistId) -> ApiResult<Checklist> {
        Ok(self.assignment.release(checklist_id).await?)
    }

    async fn list_assigned(&self, user_id: UserId) -> ApiResult<Vec<ChecklistDetail>> {
        Ok(self.assignment.list_assigned(user_id).await?)
    }

    async fn set_task_completed(
        &self,
        task_id: TaskId,
        completed: bool,
    ) -> ApiResult<TaskCompletion> {
        Ok(self.completion.set_task_completed(task_id, completed).await?)
    }

    async fn requires_confirmation(&self, task_id: TaskId, completed: bool) -> ApiResult<bool> {
        Ok(self
            .completion
            .requires_confirmation(task_id, completed)
            .await?)
    }

    async fn archive_if_complete(&self, checklist_id: ChecklistId) -> ApiResult<ArchivalOutcome> {
        Ok(self.archival.archive_if_complete(checklist_id).await?)
    }

    async fn record_login(&self, request: RecordLoginRequest) -> ApiResult<User> {
        Ok(self.users.record_login(request).await?)
    }
}
