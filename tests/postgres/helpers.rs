//! Shared helpers for `PostgreSQL` integration tests.
//!
//! Each test gets its own schema on the shared embedded cluster, or on the
//! server named by `PUNCHLIST_TEST_DATABASE_URL` when that is set. The
//! schema is dropped when the [`TestDatabase`] goes out of scope.

use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use punchlist::checklist::{
    adapters::postgres::ChecklistPgPool,
    domain::{Checklist, Task, TaskTemplate, WorkOrder},
};
use mockable::DefaultClock;
use rstest::fixture;
use tracing::warn;
use uuid::Uuid;

use crate::postgres::cluster::server_url;

/// Boxed error type for fallible helpers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// SQL creating the full schema.
pub const CREATE_SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-10-01-000000_create_checklists/up.sql");

#[derive(Debug)]
struct SearchPath(String);

impl CustomizeConnection<PgConnection, diesel::r2d2::Error> for SearchPath {
    fn on_acquire(&self, conn: &mut PgConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!("SET search_path TO {}", self.0))
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Isolated, migrated schema with a pool bound to it.
pub struct TestDatabase {
    url: String,
    schema: String,
    pool: ChecklistPgPool,
}

impl TestDatabase {
    /// Creates and migrates a fresh schema.
    ///
    /// # Errors
    ///
    /// Returns an error when the server is unreachable or migration fails.
    pub fn create(url: &str) -> Result<Self, BoxError> {
        let schema = format!("punchlist_test_{}", Uuid::new_v4().simple());
        let mut conn = PgConnection::establish(url)?;
        conn.batch_execute(&format!(
            "CREATE SCHEMA {schema}; SET search_path TO {schema}; {CREATE_SCHEMA_SQL}"
        ))?;
        let pool = Pool::builder()
            .max_size(4)
            .connection_customizer(Box::new(SearchPath(schema.clone())))
            .build(ConnectionManager::<PgConnection>::new(url))?;
        Ok(Self {
            url: url.to_owned(),
            schema,
            pool,
        })
    }

    /// Returns a pool whose connections use this schema.
    #[must_use]
    pub fn pool(&self) -> ChecklistPgPool {
        self.pool.clone()
    }

    /// Runs raw SQL against this schema.
    ///
    /// # Errors
    ///
    /// Returns an error when the statement fails.
    pub fn execute(&self, sql: &str) -> Result<(), BoxError> {
        let mut conn = self.pool.get()?;
        conn.batch_execute(sql)?;
        Ok(())
    }
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        let statement = format!("DROP SCHEMA IF EXISTS {} CASCADE", self.schema);
        let result = PgConnection::establish(&self.url)
            .map_err(BoxError::from)
            .and_then(|mut conn| conn.batch_execute(&statement).map_err(BoxError::from));
        if let Err(err) = result {
            warn!(schema = %self.schema, error = %err, "failed to drop test schema");
        }
    }
}

/// Provides a migrated schema on the test server.
#[fixture]
pub fn database() -> TestDatabase {
    let url = server_url().expect("test PostgreSQL server");
    TestDatabase::create(&url).expect("test database setup")
}

/// Builds a checklist and its seeded tasks for `work_order`.
pub fn seeded_checklist(work_order: &str, name: &str) -> (Checklist, Vec<Task>) {
    let work_order = WorkOrder::new(work_order, name).expect("valid work order");
    let checklist = Checklist::new_from_work_order(&work_order, &DefaultClock);
    let template = TaskTemplate::new(["Inspect", "Clean", "Report"]).expect("valid template");
    let tasks = template.seed(checklist.id());
    (checklist, tasks)
}
