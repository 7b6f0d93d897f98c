//! Work-order synchronization: one checklist per work order, seeded from
//! the template on first sight.

use super::{ChecklistServiceError, ChecklistServiceResult};
use crate::checklist::{
    domain::{Checklist, ChecklistDomainError, ChecklistId, TaskTemplate, WorkOrder, WorkOrderId},
    ports::{
        ChecklistRepository, ChecklistRepositoryError, TemplateRepository, TemplateRepositoryError,
    },
};
use mockable::Clock;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Request payload describing one external work order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncWorkOrderRequest {
    id: String,
    name: String,
    description: Option<String>,
    project_number: Option<String>,
    project_name: Option<String>,
}

impl SyncWorkOrderRequest {
    /// Creates a request with the required work-order fields.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            project_number: None,
            project_name: None,
        }
    }

    /// Sets the work-order description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the project number.
    #[must_use]
    pub fn with_project_number(mut self, number: impl Into<String>) -> Self {
        self.project_number = Some(number.into());
        self
    }

    /// Sets the project name.
    #[must_use]
    pub fn with_project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }

    /// Returns the raw work-order identifier as received.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    fn into_work_order(self) -> Result<WorkOrder, ChecklistDomainError> {
        let mut work_order = WorkOrder::new(self.id, self.name)?;
        if let Some(description) = self.description {
            work_order = work_order.with_description(description);
        }
        if let Some(number) = self.project_number {
            work_order = work_order.with_project_number(number);
        }
        if let Some(name) = self.project_name {
            work_order = work_order.with_project_name(name);
        }
        Ok(work_order)
    }
}

/// A work order that could not be synchronized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncFailure {
    work_order_id: String,
    message: String,
}

impl SyncFailure {
    /// Returns the work-order identifier as received.
    #[must_use]
    pub fn work_order_id(&self) -> &str {
        &self.work_order_id
    }

    /// Returns a description of the failure.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Per-batch synchronization summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    created: Vec<ChecklistId>,
    skipped: Vec<WorkOrderId>,
    failed: Vec<SyncFailure>,
}

impl SyncReport {
    /// Returns the checklists created by this batch.
    #[must_use]
    pub fn created(&self) -> &[ChecklistId] {
        &self.created
    }

    /// Returns the work orders that already had a checklist.
    #[must_use]
    pub fn skipped(&self) -> &[WorkOrderId] {
        &self.skipped
    }

    /// Returns the work orders that failed.
    #[must_use]
    pub fn failed(&self) -> &[SyncFailure] {
        &self.failed
    }

    fn record_failure(&mut self, work_order_id: impl Into<String>, err: &dyn std::error::Error) {
        self.failed.push(SyncFailure {
            work_order_id: work_order_id.into(),
            message: err.to_string(),
        });
    }
}

/// Creates missing checklists for incoming work orders.
#[derive(Clone)]
pub struct ChecklistSyncService<R, T, C>
where
    R: ChecklistRepository,
    T: TemplateRepository,
    C: Clock + Send + Sync,
{
    checklists: Arc<R>,
    templates: Arc<T>,
    clock: Arc<C>,
}

impl<R, T, C> ChecklistSyncService<R, T, C>
where
    R: ChecklistRepository,
    T: TemplateRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new synchronization service.
    #[must_use]
    pub const fn new(checklists: Arc<R>, templates: Arc<T>, clock: Arc<C>) -> Self {
        Self {
            checklists,
            templates,
            clock,
        }
    }

    /// Ensures exactly one checklist exists per work order.
    ///
    /// Existing checklists are never modified. Each new checklist is stored
    /// together with its full task set in one atomic write. A failure on
    /// one work order is recorded in the report and does not stop the
    /// batch. Repeated identifiers within a batch are skipped after the
    /// first.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistServiceError::Template`] when the template cannot
    /// be loaded or has no entries; nothing is written in that case.
    pub async fn sync_work_orders(
        &self,
        requests: Vec<SyncWorkOrderRequest>,
    ) -> ChecklistServiceResult<SyncReport> {
        let template = self.templates.load().await?;
        if template.is_empty() {
            return Err(TemplateRepositoryError::Empty.into());
        }
        let mut report = SyncReport::default();
        let mut seen: HashSet<WorkOrderId> = HashSet::new();

        for request in requests {
            let raw_id = request.id().to_owned();
            let work_order = match request.into_work_order() {
                Ok(work_order) => work_order,
                Err(err) => {
                    warn!(work_order_id = %raw_id, error = %err, "rejected work order");
                    report.record_failure(raw_id, &err);
                    continue;
                }
            };

            let work_order_id = work_order.id().clone();
            if !seen.insert(work_order_id.clone()) {
                debug!(work_order_id = %work_order_id, "duplicate work order in batch");
                report.skipped.push(work_order_id);
                continue;
            }

            match self.sync_one(&work_order, &template).await {
                Ok(Some(checklist_id)) => report.created.push(checklist_id),
                Ok(None) => report.skipped.push(work_order_id),
                Err(err) => {
                    warn!(work_order_id = %work_order_id, error = %err, "failed to sync work order");
                    report.record_failure(work_order_id.as_str(), &err);
                }
            }
        }

        info!(
            created = report.created.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "synchronized work orders"
        );
        Ok(report)
    }

    async fn sync_one(
        &self,
        work_order: &WorkOrder,
        template: &TaskTemplate,
    ) -> ChecklistServiceResult<Option<ChecklistId>> {
        if self
            .checklists
            .find_by_work_order(work_order.id())
            .await?
            .is_some()
        {
            return Ok(None);
        }

        let checklist = Checklist::new_from_work_order(work_order, self.clock.as_ref());
        let tasks = template.seed(checklist.id());
        match self.checklists.store_with_tasks(&checklist, &tasks).await {
            Ok(()) => {
                debug!(
                    checklist_id = %checklist.id(),
                    work_order_id = %work_order.id(),
                    tasks = tasks.len(),
                    "created checklist"
                );
                Ok(Some(checklist.id()))
            }
            Err(ChecklistRepositoryError::DuplicateWorkOrder(_)) => Ok(None),
            Err(err) => Err(ChecklistServiceError::Repository(err)),
        }
    }
}
