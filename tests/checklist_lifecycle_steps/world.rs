//! Shared world state for checklist lifecycle BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use punchlist::{
    api::ChecklistApplication,
    checklist::{
        adapters::memory::{InMemoryChecklistRepository, InMemoryTemplateRepository},
        domain::{Checklist, Task, WorkOrderId},
        ports::ChecklistRepository,
        services::{AssignmentConfig, SyncReport},
    },
    user::adapters::memory::InMemoryUserRepository,
};
use rstest::fixture;

/// Application type used by the BDD world.
pub type TestApplication = ChecklistApplication<
    InMemoryChecklistRepository,
    InMemoryTemplateRepository,
    InMemoryUserRepository,
    DefaultClock,
>;

/// Scenario world for checklist lifecycle behaviour tests.
pub struct ChecklistWorld {
    /// Checklist store shared with the application.
    pub checklists: Arc<InMemoryChecklistRepository>,
    /// Template store shared with the application.
    pub templates: Arc<InMemoryTemplateRepository>,
    /// User directory shared with the application.
    pub users: Arc<InMemoryUserRepository>,
    /// The application under test.
    pub application: TestApplication,
    /// Report of the most recent sync.
    pub last_report: Option<SyncReport>,
    /// Results of the most recent search.
    pub last_search: Option<Vec<Checklist>>,
}

impl ChecklistWorld {
    /// Creates a world over empty in-memory stores.
    #[must_use]
    pub fn new() -> Self {
        let checklists = Arc::new(InMemoryChecklistRepository::new());
        let templates = Arc::new(InMemoryTemplateRepository::default());
        let users = Arc::new(InMemoryUserRepository::new());
        let application = ChecklistApplication::new(
            Arc::clone(&checklists),
            Arc::clone(&templates),
            Arc::clone(&users),
            Arc::new(DefaultClock),
            AssignmentConfig::default(),
        );
        Self {
            checklists,
            templates,
            users,
            application,
            last_report: None,
            last_search: None,
        }
    }

    /// Loads the checklist mirroring `work_order`.
    pub fn checklist_for(&self, work_order: &str) -> Result<Checklist, eyre::Report> {
        let id = WorkOrderId::new(work_order)?;
        run_async(self.checklists.find_by_work_order(&id))?
            .ok_or_else(|| eyre::eyre!("no checklist for work order {work_order}"))
    }

    /// Loads the task with `text` on the checklist mirroring `work_order`.
    pub fn task_named(&self, work_order: &str, text: &str) -> Result<Task, eyre::Report> {
        let checklist = self.checklist_for(work_order)?;
        run_async(self.checklists.tasks_for(checklist.id()))?
            .into_iter()
            .find(|task| task.text() == text)
            .ok_or_else(|| eyre::eyre!("no task {text:?} on {work_order}"))
    }
}

impl Default for ChecklistWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ChecklistWorld {
    ChecklistWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
