//! Shared test helpers for in-memory integration tests.

use std::sync::Arc;

use chrono::Utc;
use mockable::DefaultClock;
use punchlist::{
    api::ChecklistApplication,
    checklist::{
        adapters::memory::{InMemoryChecklistRepository, InMemoryTemplateRepository},
        domain::{ClaimPolicy, TaskTemplate},
        services::AssignmentConfig,
    },
    user::{
        adapters::memory::InMemoryUserRepository,
        domain::{UserId, UserProfile},
        ports::UserRepository,
    },
};
use rstest::fixture;

/// Application type wired to in-memory adapters.
pub type MemoryApplication = ChecklistApplication<
    InMemoryChecklistRepository,
    InMemoryTemplateRepository,
    InMemoryUserRepository,
    DefaultClock,
>;

/// Application plus direct handles on its stores.
pub struct Stack {
    /// Shared application.
    pub application: Arc<MemoryApplication>,
    /// Checklist store behind the application.
    pub checklists: Arc<InMemoryChecklistRepository>,
    /// User directory behind the application.
    pub users: Arc<InMemoryUserRepository>,
}

impl Stack {
    /// Builds a stack using `policy` for claims.
    #[must_use]
    pub fn with_policy(policy: ClaimPolicy) -> Self {
        let template =
            TaskTemplate::new(["Inspect", "Clean", "Report"]).expect("valid template");
        let checklists = Arc::new(InMemoryChecklistRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());
        let application = ChecklistApplication::new(
            Arc::clone(&checklists),
            Arc::new(InMemoryTemplateRepository::new(template)),
            Arc::clone(&users),
            Arc::new(DefaultClock),
            AssignmentConfig::new(policy, AssignmentConfig::DEFAULT_MAX_SEARCH_LIMIT),
        );
        Self {
            application: Arc::new(application),
            checklists,
            users,
        }
    }

    /// Records a sign-in and returns the issued id.
    pub async fn sign_in(&self, external_id: &str) -> UserId {
        let profile =
            UserProfile::new(external_id, "Worker", format!("{external_id}@example.com"))
                .expect("valid profile");
        self.users
            .upsert_login(&profile, Utc::now())
            .await
            .expect("upsert should succeed")
            .id()
    }
}

/// Provides a stack using the default reassigning claim policy.
#[fixture]
pub fn stack() -> Stack {
    Stack::with_policy(ClaimPolicy::Reassign)
}
