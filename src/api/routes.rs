//! Axum router exposing the checklist operations over HTTP.

use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    routing::{get, patch, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::{
    contracts::{
        ArchiveChecklistBody, ArchiveResponse, ArchivedView, AssignedChecklistView, AssignedQuery,
        ChecklistView, ClaimChecklistBody, ClaimResponse, ConfirmationQuery, ConfirmationResponse,
        ReleaseChecklistBody, ReleaseResponse, SearchQuery, SyncResponse, SyncWorkOrdersBody,
        TodoStateView, ToggleTaskBody, ToggleTaskResponse, UpsertUserBody, UpsertUserResponse,
    },
    error::ApiResult,
    operations::ChecklistOperations,
};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    operations: Arc<dyn ChecklistOperations>,
}

impl AppState {
    /// Wraps the operations served by the router.
    #[must_use]
    pub fn new(operations: Arc<dyn ChecklistOperations>) -> Self {
        Self { operations }
    }
}

/// Builds the HTTP router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/archive-todolist", patch(archive_checklist))
        .route(
            "/assigned-todolist",
            get(list_assigned).post(claim).patch(release),
        )
        .route(
            "/todolist",
            get(search).post(sync_work_orders).patch(toggle_task),
        )
        .route("/todo-confirmation", get(requires_confirmation))
        .route("/user", post(upsert_user))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn archive_checklist(
    State(state): State<AppState>,
    payload: Result<Json<ArchiveChecklistBody>, JsonRejection>,
) -> ApiResult<Json<ArchiveResponse>> {
    let Json(body) = payload?;
    let checklist_id = body.validate()?;
    let outcome = state.operations.archive_if_complete(checklist_id).await?;
    let message = if outcome.archived_now() {
        "checklist archived"
    } else if outcome.checklist().is_history() {
        "checklist already archived"
    } else {
        "checklist has open tasks"
    };
    Ok(Json(ArchiveResponse {
        message: message.to_owned(),
        archived_list: ArchivedView {
            id: checklist_id.into_inner(),
            is_history: outcome.checklist().is_history(),
        },
    }))
}

async fn list_assigned(
    State(state): State<AppState>,
    query: Result<Query<AssignedQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<AssignedChecklistView>>> {
    let Query(params) = query?;
    let user_id = params.validate()?;
    let details = state.operations.list_assigned(user_id).await?;
    Ok(Json(details.iter().map(AssignedChecklistView::from).collect()))
}

async fn claim(
    State(state): State<AppState>,
    payload: Result<Json<ClaimChecklistBody>, JsonRejection>,
) -> ApiResult<Json<ClaimResponse>> {
    let Json(body) = payload?;
    let (checklist_id, user_id) = body.validate()?;
    let checklist = state.operations.claim(checklist_id, user_id).await?;
    Ok(Json(ClaimResponse {
        message: "checklist assigned".to_owned(),
        assigned_todo_list: (&checklist).into(),
    }))
}

async fn release(
    State(state): State<AppState>,
    payload: Result<Json<ReleaseChecklistBody>, JsonRejection>,
) -> ApiResult<Json<ReleaseResponse>> {
    let Json(body) = payload?;
    let checklist_id = body.validate()?;
    let checklist = state.operations.release(checklist_id).await?;
    Ok(Json(ReleaseResponse {
        message: "checklist unassigned".to_owned(),
        unassigned_list: (&checklist).into(),
    }))
}

async fn sync_work_orders(
    State(state): State<AppState>,
    payload: Result<Json<SyncWorkOrdersBody>, JsonRejection>,
) -> ApiResult<Json<SyncResponse>> {
    let Json(body) = payload?;
    let requests = body.validate()?;
    let report = state.operations.sync_work_orders(requests).await?;
    Ok(Json(SyncResponse::from(&report)))
}

async fn search(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<ChecklistView>>> {
    let Query(params) = query?;
    let (text, limit) = params.validate()?;
    let checklists = state.operations.list_available(&text, limit).await?;
    Ok(Json(checklists.iter().map(ChecklistView::from).collect()))
}

async fn toggle_task(
    State(state): State<AppState>,
    payload: Result<Json<ToggleTaskBody>, JsonRejection>,
) -> ApiResult<Json<ToggleTaskResponse>> {
    let Json(body) = payload?;
    let (task_id, completed) = body.validate()?;
    let outcome = state
        .operations
        .set_task_completed(task_id, completed)
        .await?;
    Ok(Json(ToggleTaskResponse {
        message: "task updated".to_owned(),
        todo: TodoStateView {
            id: outcome.task().id().into_inner(),
            completed: outcome.task().completed(),
        },
        archived: outcome.archived(),
    }))
}

async fn requires_confirmation(
    State(state): State<AppState>,
    query: Result<Query<ConfirmationQuery>, QueryRejection>,
) -> ApiResult<Json<ConfirmationResponse>> {
    let Query(params) = query?;
    let (task_id, completed) = params.validate()?;
    let requires_confirmation = state
        .operations
        .requires_confirmation(task_id, completed)
        .await?;
    Ok(Json(ConfirmationResponse {
        requires_confirmation,
    }))
}

async fn upsert_user(
    State(state): State<AppState>,
    payload: Result<Json<UpsertUserBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<UpsertUserResponse>)> {
    let Json(body) = payload?;
    let request = body.validate()?;
    let user = state.operations.record_login(request).await?;
    info!(user_id = %user.id(), "user signed in");
    Ok((
        StatusCode::CREATED,
        Json(UpsertUserResponse {
            message: "user recorded".to_owned(),
            user_id: user.id().value(),
        }),
    ))
}
