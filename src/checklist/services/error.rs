//! Error type shared by checklist services.

use crate::checklist::{
    domain::{ChecklistDomainError, ChecklistId, TaskId},
    ports::{ChecklistRepositoryError, TemplateRepositoryError},
};
use crate::user::{domain::UserId, ports::UserRepositoryError};
use thiserror::Error;

/// Service-level errors for checklist operations.
#[derive(Debug, Error)]
pub enum ChecklistServiceError {
    /// Domain validation or a lifecycle rule rejected the request.
    #[error(transparent)]
    Domain(#[from] ChecklistDomainError),
    /// Checklist repository operation failed.
    #[error(transparent)]
    Repository(#[from] ChecklistRepositoryError),
    /// The task template could not be loaded.
    #[error(transparent)]
    Template(#[from] TemplateRepositoryError),
    /// User directory lookup failed.
    #[error(transparent)]
    User(#[from] UserRepositoryError),
    /// The checklist does not exist.
    #[error("checklist not found: {0}")]
    ChecklistNotFound(ChecklistId),
    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    /// The user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),
}

/// Result type for checklist service operations.
pub type ChecklistServiceResult<T> = Result<T, ChecklistServiceError>;
