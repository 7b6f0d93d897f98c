//! Typed request and response bodies for the HTTP surface.
//!
//! Request fields are optional at the serde level so that a missing field
//! yields a precise `400` message instead of a generic rejection. Each
//! request validates itself into domain values before reaching a service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{ApiError, ApiResult};
use crate::checklist::{
    domain::{Checklist, ChecklistDetail, ChecklistId, Task, TaskId},
    services::{SyncReport, SyncWorkOrderRequest},
};
use crate::user::{domain::UserId, services::RecordLoginRequest};

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub error: String,
}

fn required<T>(value: Option<T>, field: &str) -> ApiResult<T> {
    value.ok_or_else(|| ApiError::missing(field))
}

fn parse_user_id(raw: i64) -> ApiResult<UserId> {
    UserId::new(raw).map_err(|err| ApiError::invalid("userId", err))
}

/// `PATCH /archive-todolist` body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArchiveChecklistBody {
    /// Checklist to evaluate.
    #[serde(rename = "todoListId")]
    pub todo_list_id: Option<Uuid>,
}

impl ArchiveChecklistBody {
    /// Validates the body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadRequest`] when the identifier is missing.
    pub fn validate(self) -> ApiResult<ChecklistId> {
        required(self.todo_list_id, "todoListId").map(ChecklistId::from_uuid)
    }
}

/// `POST /assigned-todolist` body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClaimChecklistBody {
    /// Checklist to claim.
    #[serde(rename = "todoListId")]
    pub todo_list_id: Option<Uuid>,
    /// Claiming user.
    #[serde(rename = "userId")]
    pub user_id: Option<i64>,
}

impl ClaimChecklistBody {
    /// Validates the body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadRequest`] when a field is missing or the user
    /// id is not positive.
    pub fn validate(self) -> ApiResult<(ChecklistId, UserId)> {
        let checklist_id = required(self.todo_list_id, "todoListId")?;
        let user_id = parse_user_id(required(self.user_id, "userId")?)?;
        Ok((ChecklistId::from_uuid(checklist_id), user_id))
    }
}

/// `PATCH /assigned-todolist` body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReleaseChecklistBody {
    /// Checklist to release.
    #[serde(rename = "todoListId")]
    pub todo_list_id: Option<Uuid>,
}

impl ReleaseChecklistBody {
    /// Validates the body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadRequest`] when the identifier is missing.
    pub fn validate(self) -> ApiResult<ChecklistId> {
        required(self.todo_list_id, "todoListId").map(ChecklistId::from_uuid)
    }
}

/// `GET /assigned-todolist` query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssignedQuery {
    /// Owner whose checklists are listed.
    pub user_id: Option<String>,
}

impl AssignedQuery {
    /// Validates the query.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadRequest`] when the user id is missing or not a
    /// positive integer.
    pub fn validate(self) -> ApiResult<UserId> {
        let raw = required(self.user_id, "user_id")?;
        let value = raw
            .trim()
            .parse::<i64>()
            .map_err(|err| ApiError::invalid("user_id", err))?;
        UserId::new(value).map_err(|err| ApiError::invalid("user_id", err))
    }
}

/// External work-order identifier as sent by the maintenance system,
/// which emits either strings or bare numbers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum WorkOrderKey {
    /// Textual identifier.
    Text(String),
    /// Numeric identifier, kept in its decimal form.
    Number(serde_json::Number),
}

impl WorkOrderKey {
    /// Returns the identifier as text.
    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

/// One work order in a sync request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkOrderBody {
    /// External work-order identifier.
    pub id: Option<WorkOrderKey>,
    /// Work-order name.
    pub name: Option<String>,
    /// Work-order description.
    pub description: Option<String>,
    /// Project number.
    pub project_number: Option<String>,
    /// Project name.
    pub project_name: Option<String>,
}

impl From<WorkOrderBody> for SyncWorkOrderRequest {
    fn from(body: WorkOrderBody) -> Self {
        let id = body.id.map(WorkOrderKey::into_string).unwrap_or_default();
        let mut request = Self::new(id, body.name.unwrap_or_default());
        if let Some(description) = body.description {
            request = request.with_description(description);
        }
        if let Some(number) = body.project_number {
            request = request.with_project_number(number);
        }
        if let Some(name) = body.project_name {
            request = request.with_project_name(name);
        }
        request
    }
}

/// `POST /todolist` body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncWorkOrdersBody {
    /// Work orders to synchronize.
    pub workorders: Option<Vec<WorkOrderBody>>,
}

impl SyncWorkOrdersBody {
    /// Validates the body. Individual work orders with a blank identifier
    /// or name are reported per item by the synchronizer.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadRequest`] when the work-order list is missing.
    pub fn validate(self) -> ApiResult<Vec<SyncWorkOrderRequest>> {
        let work_orders = required(self.workorders, "workorders")?;
        Ok(work_orders.into_iter().map(Into::into).collect())
    }
}

/// `GET /todolist` query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    /// Case-insensitive search text; blank matches everything.
    pub query: Option<String>,
    /// Maximum number of results.
    pub limit: Option<String>,
}

impl SearchQuery {
    /// Validates the query, returning the search text and limit. An absent
    /// limit means "as many as allowed".
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadRequest`] when the limit is not a
    /// non-negative integer.
    pub fn validate(self) -> ApiResult<(String, usize)> {
        let limit = match self.limit.as_deref().map(str::trim) {
            None | Some("") => usize::MAX,
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|err| ApiError::invalid("limit", err))?,
        };
        Ok((self.query.unwrap_or_default(), limit))
    }
}

/// `PATCH /todolist` body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToggleTaskBody {
    /// Task to update.
    pub id: Option<Uuid>,
    /// New completion flag.
    pub completed: Option<bool>,
}

impl ToggleTaskBody {
    /// Validates the body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadRequest`] when a field is missing.
    pub fn validate(self) -> ApiResult<(TaskId, bool)> {
        let id = required(self.id, "id")?;
        let completed = required(self.completed, "completed")?;
        Ok((TaskId::from_uuid(id), completed))
    }
}

/// `GET /todo-confirmation` query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfirmationQuery {
    /// Task about to be toggled.
    pub id: Option<String>,
    /// Intended completion flag.
    pub completed: Option<String>,
}

impl ConfirmationQuery {
    /// Validates the query.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadRequest`] when a field is missing or
    /// malformed.
    pub fn validate(self) -> ApiResult<(TaskId, bool)> {
        let raw_id = required(self.id, "id")?;
        let id = Uuid::parse_str(raw_id.trim()).map_err(|err| ApiError::invalid("id", err))?;
        let raw_completed = required(self.completed, "completed")?;
        let completed = raw_completed
            .trim()
            .parse::<bool>()
            .map_err(|err| ApiError::invalid("completed", err))?;
        Ok((TaskId::from_uuid(id), completed))
    }
}

/// `POST /user` body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpsertUserBody {
    /// Identity-provider key.
    #[serde(rename = "azureAdId")]
    pub azure_ad_id: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Organisational role.
    pub role: Option<String>,
}

impl UpsertUserBody {
    /// Validates presence of the required fields; content is validated by
    /// the user directory.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadRequest`] when a required field is missing.
    pub fn validate(self) -> ApiResult<RecordLoginRequest> {
        let external_id = required(self.azure_ad_id, "azureAdId")?;
        let name = required(self.name, "name")?;
        let email = required(self.email, "email")?;
        let request = RecordLoginRequest::new(external_id, name, email);
        Ok(match self.role {
            Some(role) => request.with_role(role),
            None => request,
        })
    }
}

/// Checklist as listed by search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistView {
    /// Checklist identifier.
    pub id: Uuid,
    /// Source work order.
    pub work_order_id: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Project label.
    pub belongs_to: String,
    /// Owner, `null` when unassigned.
    pub user_id: Option<i64>,
    /// Archival flag.
    pub is_history: bool,
    /// Creation timestamp.
    pub created: DateTime<Utc>,
}

impl From<&Checklist> for ChecklistView {
    fn from(checklist: &Checklist) -> Self {
        Self {
            id: checklist.id().into_inner(),
            work_order_id: checklist.work_order_id().as_str().to_owned(),
            name: checklist.name().to_owned(),
            description: checklist.description().to_owned(),
            belongs_to: checklist.belongs_to().to_owned(),
            user_id: checklist.owner().map(UserId::value),
            is_history: checklist.is_history(),
            created: checklist.created_at(),
        }
    }
}

/// Task as embedded in an assigned checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoView {
    /// Task identifier.
    pub id: Uuid,
    /// Task description.
    pub text: String,
    /// Completion flag.
    pub completed: bool,
    /// Template position.
    pub position: u32,
}

impl From<&Task> for TodoView {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id().into_inner(),
            text: task.text().to_owned(),
            completed: task.completed(),
            position: task.position(),
        }
    }
}

/// Checklist with its ordered tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedChecklistView {
    /// Checklist fields.
    #[serde(flatten)]
    pub checklist: ChecklistView,
    /// Tasks in template order.
    pub todos: Vec<TodoView>,
}

impl From<&ChecklistDetail> for AssignedChecklistView {
    fn from(detail: &ChecklistDetail) -> Self {
        Self {
            checklist: detail.checklist().into(),
            todos: detail.tasks().iter().map(TodoView::from).collect(),
        }
    }
}

/// Ownership summary returned by claim and release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipView {
    /// Checklist identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Owner, `null` when unassigned.
    pub user_id: Option<i64>,
}

impl From<&Checklist> for OwnershipView {
    fn from(checklist: &Checklist) -> Self {
        Self {
            id: checklist.id().into_inner(),
            name: checklist.name().to_owned(),
            user_id: checklist.owner().map(UserId::value),
        }
    }
}

/// Response to a claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimResponse {
    /// Confirmation message.
    pub message: String,
    /// Updated checklist.
    #[serde(rename = "assignedTodoList")]
    pub assigned_todo_list: OwnershipView,
}

/// Response to a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseResponse {
    /// Confirmation message.
    pub message: String,
    /// Updated checklist.
    #[serde(rename = "unassignedList")]
    pub unassigned_list: OwnershipView,
}

/// Archival state of a checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivedView {
    /// Checklist identifier.
    pub id: Uuid,
    /// Archival flag.
    pub is_history: bool,
}

/// Response to an archival check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveResponse {
    /// Confirmation message.
    pub message: String,
    /// Checklist after the check.
    #[serde(rename = "archivedList")]
    pub archived_list: ArchivedView,
}

/// A work order that failed to synchronize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncFailureView {
    /// Work-order identifier as received.
    pub id: String,
    /// Failure description.
    pub error: String,
}

/// Response to a sync request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResponse {
    /// Confirmation message.
    pub message: String,
    /// Created checklist identifiers.
    pub created: Vec<Uuid>,
    /// Work orders that already had a checklist.
    pub skipped: Vec<String>,
    /// Work orders that failed.
    pub failed: Vec<SyncFailureView>,
}

impl From<&SyncReport> for SyncResponse {
    fn from(report: &SyncReport) -> Self {
        Self {
            message: format!(
                "synchronized work orders: {} created, {} skipped, {} failed",
                report.created().len(),
                report.skipped().len(),
                report.failed().len()
            ),
            created: report.created().iter().map(|id| id.into_inner()).collect(),
            skipped: report
                .skipped()
                .iter()
                .map(|id| id.as_str().to_owned())
                .collect(),
            failed: report
                .failed()
                .iter()
                .map(|failure| SyncFailureView {
                    id: failure.work_order_id().to_owned(),
                    error: failure.message().to_owned(),
                })
                .collect(),
        }
    }
}

/// Task completion state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoStateView {
    /// Task identifier.
    pub id: Uuid,
    /// Completion flag.
    pub completed: bool,
}

/// Response to a task toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleTaskResponse {
    /// Confirmation message.
    pub message: String,
    /// Updated task.
    pub todo: TodoStateView,
    /// Whether the owning checklist is archived after the update.
    pub archived: bool,
}

/// Response to a confirmation query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationResponse {
    /// Whether the client must confirm before sending the change.
    pub requires_confirmation: bool,
}

/// Response to a user upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertUserResponse {
    /// Confirmation message.
    pub message: String,
    /// Internal numeric user id.
    #[serde(rename = "userId")]
    pub user_id: i64,
}
