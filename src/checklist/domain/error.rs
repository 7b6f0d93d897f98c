//! Error types for checklist domain validation and state transitions.

use super::{ChecklistId, TaskId};
use crate::user::domain::UserId;
use thiserror::Error;

/// Errors returned while constructing checklist values or applying
/// lifecycle transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChecklistDomainError {
    /// The work-order identifier is empty after trimming.
    #[error("work order id must not be empty")]
    EmptyWorkOrderId,

    /// The work-order name is empty after trimming.
    #[error("work order name must not be empty")]
    EmptyWorkOrderName,

    /// A template task text is empty after trimming.
    #[error("task text must not be empty")]
    EmptyTaskText,

    /// The checklist has been archived and accepts no further transitions.
    #[error("checklist {0} is archived")]
    ChecklistArchived(ChecklistId),

    /// The checklist is owned by another user and the claim policy forbids
    /// reassignment.
    #[error("checklist {checklist_id} is already claimed by user {owner}")]
    ClaimedByOtherUser {
        /// Checklist that was being claimed.
        checklist_id: ChecklistId,
        /// Current owner.
        owner: UserId,
    },

    /// A task supplied for evaluation belongs to a different checklist.
    #[error("task {task_id} does not belong to checklist {checklist_id}")]
    TaskNotInChecklist {
        /// Offending task.
        task_id: TaskId,
        /// Checklist under evaluation.
        checklist_id: ChecklistId,
    },
}

/// Error returned while parsing a claim policy from configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown claim policy: {0}")]
pub struct ParseClaimPolicyError(pub String);
