//! `PostgreSQL` adapters for checklist persistence.

mod models;
mod repository;
mod schema;
mod template;

pub use repository::{ChecklistPgPool, PostgresChecklistRepository};
pub use template::PostgresTemplateRepository;
