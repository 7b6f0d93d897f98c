//! Port for reading the default task template.

use crate::checklist::domain::TaskTemplate;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for template repository operations.
pub type TemplateRepositoryResult<T> = Result<T, TemplateRepositoryError>;

/// Read-only access to the template seeded into new checklists.
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Loads the current template in seeding order.
    async fn load(&self) -> TemplateRepositoryResult<TaskTemplate>;
}

/// Errors returned by template repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TemplateRepositoryError {
    /// The template holds no tasks, so seeded checklists could never be
    /// archived.
    #[error("task template has no entries")]
    Empty,
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TemplateRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
