//! Diesel row models for user persistence.

use super::schema::users;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for user records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// Store-issued identifier.
    pub id: i64,
    /// Identity provider key.
    pub external_id: String,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Organisational role.
    pub role: String,
    /// First sign-in timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest sign-in timestamp.
    pub last_login_at: DateTime<Utc>,
}

/// Insert model for user records; the identifier comes from the sequence.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    /// Identity provider key.
    pub external_id: String,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Organisational role.
    pub role: String,
    /// First sign-in timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest sign-in timestamp.
    pub last_login_at: DateTime<Utc>,
}
