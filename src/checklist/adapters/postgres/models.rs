//! Diesel row models for checklist persistence.

use super::schema::{todo_lists, todos};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// Row for checklist records, used for reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = todo_lists)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ChecklistRow {
    /// Checklist identifier.
    pub id: Uuid,
    /// Source work order.
    pub work_order_id: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Project label.
    pub belongs_to: String,
    /// Owning user.
    pub user_id: Option<i64>,
    /// Archival flag.
    pub is_history: bool,
    /// Creation timestamp.
    pub created: DateTime<Utc>,
}

/// Row for task records, used for reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = todos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TodoRow {
    /// Task identifier.
    pub id: Uuid,
    /// Owning checklist.
    pub todolist_id: Uuid,
    /// Task description.
    pub text: String,
    /// Completion flag.
    pub completed: bool,
    /// Template position.
    pub position: i32,
}
