//! Port contracts for checklist management.
//!
//! Ports define infrastructure-agnostic interfaces used by checklist
//! services.

pub mod repository;
pub mod template;

pub use repository::{ChecklistRepository, ChecklistRepositoryError, ChecklistRepositoryResult};
pub use template::{TemplateRepository, TemplateRepositoryError, TemplateRepositoryResult};
