//! Read models combining a checklist with its tasks.

use super::{Checklist, Task};
use serde::{Deserialize, Serialize};

/// Completion counts for a checklist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistProgress {
    total: usize,
    completed: usize,
}

impl ChecklistProgress {
    /// Counts completed tasks.
    #[must_use]
    pub fn from_tasks(tasks: &[Task]) -> Self {
        Self {
            total: tasks.len(),
            completed: tasks.iter().filter(|task| task.completed()).count(),
        }
    }

    /// Returns the number of tasks.
    #[must_use]
    pub const fn total(self) -> usize {
        self.total
    }

    /// Returns the number of completed tasks.
    #[must_use]
    pub const fn completed(self) -> usize {
        self.completed
    }

    /// Returns the number of tasks still open.
    #[must_use]
    pub const fn remaining(self) -> usize {
        self.total.saturating_sub(self.completed)
    }

    /// Returns `true` when there is at least one task and all are done.
    /// A checklist without tasks never counts as complete.
    #[must_use]
    pub const fn is_complete(self) -> bool {
        self.total > 0 && self.completed == self.total
    }

    /// Returns `true` when setting `task` to `completed` would finish the
    /// checklist, which archives it irreversibly. Clients confirm with the
    /// user before sending such a change.
    #[must_use]
    pub const fn completion_needs_confirmation(self, task: &Task, completed: bool) -> bool {
        completed && !task.completed() && self.remaining() == 1
    }
}

/// A checklist with its tasks in template order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistDetail {
    checklist: Checklist,
    tasks: Vec<Task>,
}

impl ChecklistDetail {
    /// Combines a checklist with its tasks, ordering tasks by position.
    #[must_use]
    pub fn new(checklist: Checklist, mut tasks: Vec<Task>) -> Self {
        tasks.sort_by_key(Task::position);
        Self { checklist, tasks }
    }

    /// Returns the checklist.
    #[must_use]
    pub const fn checklist(&self) -> &Checklist {
        &self.checklist
    }

    /// Returns the tasks in template order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }
}
