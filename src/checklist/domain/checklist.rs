//! Checklist aggregate root and its ownership state machine.

use super::{
    ChecklistDomainError, ChecklistId, ChecklistProgress, ParseClaimPolicyError, Task, WorkOrder,
    WorkOrderId,
};
use crate::user::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state derived from ownership and archival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistState {
    /// Nobody owns the checklist.
    Unassigned,
    /// A user has claimed the checklist.
    Assigned,
    /// Every task was completed; terminal.
    Archived,
}

impl ChecklistState {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unassigned => "unassigned",
            Self::Assigned => "assigned",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for ChecklistState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a claim treats a checklist that another user already owns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimPolicy {
    /// The newest claim wins and silently takes over the checklist.
    #[default]
    Reassign,
    /// A checklist owned by someone else cannot be claimed until released.
    Exclusive,
}

impl ClaimPolicy {
    /// Returns the canonical configuration value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reassign => "reassign",
            Self::Exclusive => "exclusive",
        }
    }
}

impl TryFrom<&str> for ClaimPolicy {
    type Error = ParseClaimPolicyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "reassign" => Ok(Self::Reassign),
            "exclusive" => Ok(Self::Exclusive),
            _ => Err(ParseClaimPolicyError(value.to_owned())),
        }
    }
}

/// Checklist aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checklist {
    id: ChecklistId,
    work_order_id: WorkOrderId,
    name: String,
    description: String,
    belongs_to: String,
    owner: Option<UserId>,
    is_history: bool,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedChecklistData {
    /// Persisted checklist identifier.
    pub id: ChecklistId,
    /// Source work order.
    pub work_order_id: WorkOrderId,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Project label.
    pub belongs_to: String,
    /// Current owner, if any.
    pub owner: Option<UserId>,
    /// Archival flag.
    pub is_history: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Checklist {
    /// Creates an unassigned, active checklist for a work order.
    #[must_use]
    pub fn new_from_work_order(work_order: &WorkOrder, clock: &impl Clock) -> Self {
        Self {
            id: ChecklistId::new(),
            work_order_id: work_order.id().clone(),
            name: work_order.name().to_owned(),
            description: work_order.description().to_owned(),
            belongs_to: work_order.belongs_to(),
            owner: None,
            is_history: false,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a checklist from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedChecklistData) -> Self {
        Self {
            id: data.id,
            work_order_id: data.work_order_id,
            name: data.name,
            description: data.description,
            belongs_to: data.belongs_to,
            owner: data.owner,
            is_history: data.is_history,
            created_at: data.created_at,
        }
    }

    /// Returns the checklist identifier.
    #[must_use]
    pub const fn id(&self) -> ChecklistId {
        self.id
    }

    /// Returns the source work-order identifier.
    #[must_use]
    pub const fn work_order_id(&self) -> &WorkOrderId {
        &self.work_order_id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the project label.
    #[must_use]
    pub fn belongs_to(&self) -> &str {
        &self.belongs_to
    }

    /// Returns the current owner, if any.
    #[must_use]
    pub const fn owner(&self) -> Option<UserId> {
        self.owner
    }

    /// Returns `true` once the checklist has been archived.
    #[must_use]
    pub const fn is_history(&self) -> bool {
        self.is_history
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> ChecklistState {
        if self.is_history {
            ChecklistState::Archived
        } else if self.owner.is_some() {
            ChecklistState::Assigned
        } else {
            ChecklistState::Unassigned
        }
    }

    /// Assigns the checklist to `user`, returning `true` when the owner
    /// changed.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistDomainError::ChecklistArchived`] for archived
    /// checklists, or [`ChecklistDomainError::ClaimedByOtherUser`] when
    /// another user owns it and `policy` is [`ClaimPolicy::Exclusive`].
    pub fn claim(&mut self, user: UserId, policy: ClaimPolicy) -> Result<bool, ChecklistDomainError> {
        self.ensure_active()?;
        match self.owner {
            Some(current) if current == user => Ok(false),
            Some(current) if policy == ClaimPolicy::Exclusive => {
                Err(ChecklistDomainError::ClaimedByOtherUser {
                    checklist_id: self.id,
                    owner: current,
                })
            }
            _ => {
                self.owner = Some(user);
                Ok(true)
            }
        }
    }

    /// Clears the owner, returning `true` when the checklist was assigned.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistDomainError::ChecklistArchived`] for archived
    /// checklists.
    pub fn release(&mut self) -> Result<bool, ChecklistDomainError> {
        self.ensure_active()?;
        Ok(self.owner.take().is_some())
    }

    /// Archives the checklist when `tasks` is its non-empty, fully completed
    /// task set. Returns `true` when this call archived it.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistDomainError::TaskNotInChecklist`] when a task
    /// belongs to another checklist.
    pub fn archive_if_complete(&mut self, tasks: &[Task]) -> Result<bool, ChecklistDomainError> {
        if self.is_history {
            return Ok(false);
        }
        if let Some(foreign) = tasks.iter().find(|task| task.checklist_id() != self.id) {
            return Err(ChecklistDomainError::TaskNotInChecklist {
                task_id: foreign.id(),
                checklist_id: self.id,
            });
        }
        if !ChecklistProgress::from_tasks(tasks).is_complete() {
            return Ok(false);
        }
        self.is_history = true;
        Ok(true)
    }

    /// Fails when the checklist is archived.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistDomainError::ChecklistArchived`] for archived
    /// checklists.
    pub const fn ensure_active(&self) -> Result<(), ChecklistDomainError> {
        if self.is_history {
            return Err(ChecklistDomainError::ChecklistArchived(self.id));
        }
        Ok(())
    }
}
