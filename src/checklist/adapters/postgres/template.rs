//! `PostgreSQL` reader for the default task template.

use super::{repository::ChecklistPgPool, schema::default_todos};
use crate::checklist::{
    domain::TaskTemplate,
    ports::{TemplateRepository, TemplateRepositoryError, TemplateRepositoryResult},
};
use async_trait::async_trait;
use diesel::prelude::*;

/// Template repository backed by the `default_todos` table.
#[derive(Debug, Clone)]
pub struct PostgresTemplateRepository {
    pool: ChecklistPgPool,
}

impl PostgresTemplateRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: ChecklistPgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemplateRepository for PostgresTemplateRepository {
    async fn load(&self) -> TemplateRepositoryResult<TaskTemplate> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TemplateRepositoryError::persistence)?;
            let texts = default_todos::table
                .select(default_todos::text)
                .order((default_todos::position.asc(), default_todos::id.asc()))
                .load::<String>(&mut connection)
                .map_err(TemplateRepositoryError::persistence)?;
            TaskTemplate::new(texts).map_err(TemplateRepositoryError::persistence)
        })
        .await
        .map_err(TemplateRepositoryError::persistence)?
    }
}
