//! Boundary error taxonomy and its HTTP mapping.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use super::contracts::ErrorBody;
use crate::checklist::{
    domain::ChecklistDomainError, ports::ChecklistRepositoryError, services::ChecklistServiceError,
};
use crate::user::services::UserServiceError;

/// Result type for boundary operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced to callers of the checklist operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The caller supplied missing or malformed fields.
    #[error("{0}")]
    BadRequest(String),
    /// A referenced checklist, task, or user does not exist.
    #[error("{0}")]
    NotFound(String),
    /// The request conflicts with the checklist's current state.
    #[error("{0}")]
    Conflict(String),
    /// Persistence failed; the detail is logged, never returned.
    #[error("store failure: {0}")]
    StoreFailure(String),
}

impl ApiError {
    /// Returns the HTTP status for this error class.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::StoreFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub(crate) fn missing(field: &str) -> Self {
        Self::BadRequest(format!("missing required field: {field}"))
    }

    pub(crate) fn invalid(field: &str, reason: impl std::fmt::Display) -> Self {
        Self::BadRequest(format!("invalid {field}: {reason}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::StoreFailure(detail) => {
                error!(error = %detail, "request failed in the store");
                "internal server error".to_owned()
            }
            Self::BadRequest(message) | Self::NotFound(message) | Self::Conflict(message) => {
                message
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<ChecklistDomainError> for ApiError {
    fn from(err: ChecklistDomainError) -> Self {
        let message = err.to_string();
        match err {
            ChecklistDomainError::EmptyWorkOrderId
            | ChecklistDomainError::EmptyWorkOrderName
            | ChecklistDomainError::EmptyTaskText => Self::BadRequest(message),
            ChecklistDomainError::ChecklistArchived(_)
            | ChecklistDomainError::ClaimedByOtherUser { .. } => Self::Conflict(message),
            ChecklistDomainError::TaskNotInChecklist { .. } => Self::StoreFailure(message),
        }
    }
}

impl From<ChecklistRepositoryError> for ApiError {
    fn from(err: ChecklistRepositoryError) -> Self {
        let message = err.to_string();
        match err {
            ChecklistRepositoryError::ChecklistNotFound(_)
            | ChecklistRepositoryError::TaskNotFound(_)
            | ChecklistRepositoryError::UnknownUser(_) => Self::NotFound(message),
            ChecklistRepositoryError::DuplicateChecklist(_)
            | ChecklistRepositoryError::DuplicateWorkOrder(_)
            | ChecklistRepositoryError::OwnerConflict { .. }
            | ChecklistRepositoryError::ChecklistArchived(_)
            | ChecklistRepositoryError::IncompleteChecklist(_) => Self::Conflict(message),
            ChecklistRepositoryError::Persistence(_) => Self::StoreFailure(message),
        }
    }
}

impl From<ChecklistServiceError> for ApiError {
    fn from(err: ChecklistServiceError) -> Self {
        let message = err.to_string();
        match err {
            ChecklistServiceError::Domain(source) => source.into(),
            ChecklistServiceError::Repository(source) => source.into(),
            ChecklistServiceError::Template(_) | ChecklistServiceError::User(_) => {
                Self::StoreFailure(message)
            }
            ChecklistServiceError::ChecklistNotFound(_)
            | ChecklistServiceError::TaskNotFound(_)
            | ChecklistServiceError::UserNotFound(_) => Self::NotFound(message),
        }
    }
}

impl From<UserServiceError> for ApiError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::Domain(source) => Self::BadRequest(source.to_string()),
            UserServiceError::Repository(source) => Self::StoreFailure(source.to_string()),
        }
    }
}
