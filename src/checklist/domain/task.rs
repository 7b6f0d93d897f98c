//! Tasks belonging to a checklist.

use super::{ChecklistId, TaskId};
use serde::{Deserialize, Serialize};

/// A single completable entry on a checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    checklist_id: ChecklistId,
    position: u32,
    text: String,
    completed: bool,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Owning checklist.
    pub checklist_id: ChecklistId,
    /// Template position at seeding time.
    pub position: u32,
    /// Task description.
    pub text: String,
    /// Completion flag.
    pub completed: bool,
}

impl Task {
    /// Creates an incomplete task copied from a template entry.
    #[must_use]
    pub fn seeded(checklist_id: ChecklistId, position: u32, text: impl Into<String>) -> Self {
        Self {
            id: TaskId::new(),
            checklist_id,
            position,
            text: text.into(),
            completed: false,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            checklist_id: data.checklist_id,
            position: data.position,
            text: data.text,
            completed: data.completed,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning checklist identifier.
    #[must_use]
    pub const fn checklist_id(&self) -> ChecklistId {
        self.checklist_id
    }

    /// Returns the template position.
    #[must_use]
    pub const fn position(&self) -> u32 {
        self.position
    }

    /// Returns the task description.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns `true` once the task has been completed.
    #[must_use]
    pub const fn completed(&self) -> bool {
        self.completed
    }

    /// Sets the completion flag, returning `true` when the value changed.
    pub const fn set_completed(&mut self, completed: bool) -> bool {
        let changed = self.completed != completed;
        self.completed = completed;
        changed
    }
}
