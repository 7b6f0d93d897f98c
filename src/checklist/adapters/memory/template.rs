//! In-memory task template.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use super::poisoned;
use crate::checklist::{
    domain::TaskTemplate,
    ports::{TemplateRepository, TemplateRepositoryError, TemplateRepositoryResult},
};

/// Template holder that can be swapped at runtime.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTemplateRepository {
    template: Arc<RwLock<TaskTemplate>>,
}

impl InMemoryTemplateRepository {
    /// Creates a repository serving `template`.
    #[must_use]
    pub fn new(template: TaskTemplate) -> Self {
        Self {
            template: Arc::new(RwLock::new(template)),
        }
    }

    /// Replaces the template. Existing checklists keep the tasks they were
    /// seeded with.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateRepositoryError::Persistence`] when the lock is
    /// poisoned.
    pub fn replace(&self, template: TaskTemplate) -> TemplateRepositoryResult<()> {
        let mut guard = self
            .template
            .write()
            .map_err(|err| TemplateRepositoryError::persistence(poisoned(err)))?;
        *guard = template;
        Ok(())
    }
}

#[async_trait]
impl TemplateRepository for InMemoryTemplateRepository {
    async fn load(&self) -> TemplateRepositoryResult<TaskTemplate> {
        let guard = self
            .template
            .read()
            .map_err(|err| TemplateRepositoryError::persistence(poisoned(err)))?;
        Ok(guard.clone())
    }
}
