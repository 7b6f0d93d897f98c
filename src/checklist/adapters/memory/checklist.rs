//! In-memory checklist repository for tests and local runs.
//!
//! Every operation takes the state lock once, so compound writes such as
//! the owner compare-and-set are atomic with respect to each other. User
//! references are not validated here; callers check them against the user
//! directory.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::poisoned;
use crate::checklist::{
    domain::{
        Checklist, ChecklistDetail, ChecklistId, ChecklistQuery, ClaimPolicy, Task, TaskId,
        WorkOrderId,
    },
    ports::{ChecklistRepository, ChecklistRepositoryError, ChecklistRepositoryResult},
};
use crate::user::domain::UserId;

/// Thread-safe in-memory checklist repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryChecklistRepository {
    state: Arc<RwLock<InMemoryChecklistState>>,
}

#[derive(Debug, Default)]
struct InMemoryChecklistState {
    checklists: HashMap<ChecklistId, Checklist>,
    work_order_index: HashMap<WorkOrderId, ChecklistId>,
    tasks: HashMap<TaskId, Task>,
}

impl InMemoryChecklistState {
    fn checklist(&self, id: ChecklistId) -> ChecklistRepositoryResult<&Checklist> {
        self.checklists
            .get(&id)
            .ok_or(ChecklistRepositoryError::ChecklistNotFound(id))
    }

    fn tasks_for(&self, checklist_id: ChecklistId) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .tasks
            .values()
            .filter(|task| task.checklist_id() == checklist_id)
            .cloned()
            .collect();
        tasks.sort_by_key(Task::position);
        tasks
    }
}

impl InMemoryChecklistRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(
        &self,
    ) -> ChecklistRepositoryResult<std::sync::RwLockReadGuard<'_, InMemoryChecklistState>> {
        self.state
            .read()
            .map_err(|err| ChecklistRepositoryError::persistence(poisoned(err)))
    }

    fn write(
        &self,
    ) -> ChecklistRepositoryResult<std::sync::RwLockWriteGuard<'_, InMemoryChecklistState>> {
        self.state
            .write()
            .map_err(|err| ChecklistRepositoryError::persistence(poisoned(err)))
    }
}

fn newest_first(checklists: &mut [Checklist]) {
    checklists.sort_by(|left, right| right.created_at().cmp(&left.created_at()));
}

#[async_trait]
impl ChecklistRepository for InMemoryChecklistRepository {
    async fn store_with_tasks(
        &self,
        checklist: &Checklist,
        tasks: &[Task],
    ) -> ChecklistRepositoryResult<()> {
        let mut state = self.write()?;

        if state.checklists.contains_key(&checklist.id()) {
            return Err(ChecklistRepositoryError::DuplicateChecklist(checklist.id()));
        }
        if state
            .work_order_index
            .contains_key(checklist.work_order_id())
        {
            return Err(ChecklistRepositoryError::DuplicateWorkOrder(
                checklist.work_order_id().clone(),
            ));
        }
        if let Some(foreign) = tasks
            .iter()
            .find(|task| task.checklist_id() != checklist.id())
        {
            return Err(ChecklistRepositoryError::persistence(poisoned(format!(
                "task {} does not belong to checklist {}",
                foreign.id(),
                checklist.id()
            ))));
        }

        state
            .work_order_index
            .insert(checklist.work_order_id().clone(), checklist.id());
        state.checklists.insert(checklist.id(), checklist.clone());
        for task in tasks {
            state.tasks.insert(task.id(), task.clone());
        }
        Ok(())
    }

    async fn find_by_id(&self, id: ChecklistId) -> ChecklistRepositoryResult<Option<Checklist>> {
        let state = self.read()?;
        Ok(state.checklists.get(&id).cloned())
    }

    async fn find_by_work_order(
        &self,
        work_order_id: &WorkOrderId,
    ) -> ChecklistRepositoryResult<Option<Checklist>> {
        let state = self.read()?;
        let checklist = state
            .work_order_index
            .get(work_order_id)
            .and_then(|id| state.checklists.get(id))
            .cloned();
        Ok(checklist)
    }

    async fn search(&self, query: &ChecklistQuery) -> ChecklistRepositoryResult<Vec<Checklist>> {
        let state = self.read()?;
        let mut matches: Vec<Checklist> = state
            .checklists
            .values()
            .filter(|checklist| query.matches(checklist))
            .cloned()
            .collect();
        newest_first(&mut matches);
        matches.truncate(query.limit());
        Ok(matches)
    }

    async fn list_owned_by(
        &self,
        owner: UserId,
    ) -> ChecklistRepositoryResult<Vec<ChecklistDetail>> {
        let state = self.read()?;
        let mut owned: Vec<Checklist> = state
            .checklists
            .values()
            .filter(|checklist| checklist.owner() == Some(owner) && !checklist.is_history())
            .cloned()
            .collect();
        newest_first(&mut owned);
        Ok(owned
            .into_iter()
            .map(|checklist| {
                let tasks = state.tasks_for(checklist.id());
                ChecklistDetail::new(checklist, tasks)
            })
            .collect())
    }

    async fn compare_and_set_owner(
        &self,
        id: ChecklistId,
        expected: Option<UserId>,
        owner: Option<UserId>,
    ) -> ChecklistRepositoryResult<Checklist> {
        let mut state = self.write()?;
        let stored = state.checklist(id)?;
        if stored.is_history() {
            return Err(ChecklistRepositoryError::ChecklistArchived(id));
        }
        if stored.owner() != expected {
            return Err(ChecklistRepositoryError::OwnerConflict {
                checklist_id: id,
                expected,
                actual: stored.owner(),
            });
        }

        let checklist = state
            .checklists
            .get_mut(&id)
            .ok_or(ChecklistRepositoryError::ChecklistNotFound(id))?;
        match owner {
            Some(user) => checklist
                .claim(user, ClaimPolicy::Reassign)
                .map_err(ChecklistRepositoryError::persistence)?,
            None => checklist
                .release()
                .map_err(ChecklistRepositoryError::persistence)?,
        };
        Ok(checklist.clone())
    }

    async fn find_task(&self, id: TaskId) -> ChecklistRepositoryResult<Option<Task>> {
        let state = self.read()?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn tasks_for(&self, checklist_id: ChecklistId) -> ChecklistRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        Ok(state.tasks_for(checklist_id))
    }

    async fn set_task_completed(
        &self,
        id: TaskId,
        completed: bool,
    ) -> ChecklistRepositoryResult<Task> {
        let mut state = self.write()?;
        let checklist_id = state
            .tasks
            .get(&id)
            .ok_or(ChecklistRepositoryError::TaskNotFound(id))?
            .checklist_id();
        if !completed && state.checklist(checklist_id)?.is_history() {
            return Err(ChecklistRepositoryError::ChecklistArchived(checklist_id));
        }

        let task = state
            .tasks
            .get_mut(&id)
            .ok_or(ChecklistRepositoryError::TaskNotFound(id))?;
        task.set_completed(completed);
        Ok(task.clone())
    }

    async fn mark_archived(&self, id: ChecklistId) -> ChecklistRepositoryResult<Checklist> {
        let mut state = self.write()?;
        let tasks = state.tasks_for(id);
        let checklist = state
            .checklists
            .get_mut(&id)
            .ok_or(ChecklistRepositoryError::ChecklistNotFound(id))?;
        if checklist.is_history() {
            return Ok(checklist.clone());
        }

        let archived = checklist
            .archive_if_complete(&tasks)
            .map_err(ChecklistRepositoryError::persistence)?;
        if !archived {
            return Err(ChecklistRepositoryError::IncompleteChecklist(id));
        }
        Ok(checklist.clone())
    }
}
