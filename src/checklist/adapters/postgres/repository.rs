//! `PostgreSQL` repository implementation for checklists and their tasks.
//!
//! Multi-statement writes run inside a transaction that locks the
//! checklist row with `SELECT ... FOR UPDATE`, so ownership changes, task
//! toggles, and archival on one checklist are serialized.

use super::{
    models::{ChecklistRow, TodoRow},
    schema::{todo_lists, todos},
};
use crate::checklist::{
    domain::{
        Checklist, ChecklistDetail, ChecklistId, ChecklistQuery, PersistedChecklistData,
        PersistedTaskData, Task, TaskId, WorkOrderId,
    },
    ports::{ChecklistRepository, ChecklistRepositoryError, ChecklistRepositoryResult},
};
use crate::user::domain::UserId;
use async_trait::async_trait;
use diesel::expression_methods::PgTextExpressionMethods;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use std::collections::HashMap;
use uuid::Uuid;

/// `PostgreSQL` connection pool type used by checklist adapters.
pub type ChecklistPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed checklist repository.
#[derive(Debug, Clone)]
pub struct PostgresChecklistRepository {
    pool: ChecklistPgPool,
}

/// Error carried out of a Diesel transaction closure.
#[derive(Debug)]
enum TxError {
    Diesel(DieselError),
    Repository(ChecklistRepositoryError),
}

impl From<DieselError> for TxError {
    fn from(err: DieselError) -> Self {
        Self::Diesel(err)
    }
}

impl From<ChecklistRepositoryError> for TxError {
    fn from(err: ChecklistRepositoryError) -> Self {
        Self::Repository(err)
    }
}

impl From<TxError> for ChecklistRepositoryError {
    fn from(err: TxError) -> Self {
        match err {
            TxError::Diesel(source) => Self::persistence(source),
            TxError::Repository(source) => source,
        }
    }
}

impl PostgresChecklistRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: ChecklistPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ChecklistRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ChecklistRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ChecklistRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ChecklistRepositoryError::persistence)?
    }
}

#[async_trait]
impl ChecklistRepository for PostgresChecklistRepository {
    async fn store_with_tasks(
        &self,
        checklist: &Checklist,
        tasks: &[Task],
    ) -> ChecklistRepositoryResult<()> {
        let checklist_id = checklist.id();
        let work_order_id = checklist.work_order_id().clone();
        let checklist_row = to_checklist_row(checklist);
        let todo_rows = tasks
            .iter()
            .map(to_todo_row)
            .collect::<ChecklistRepositoryResult<Vec<_>>>()?;

        self.run_blocking(move |connection| {
            connection
                .transaction::<_, TxError, _>(|conn| {
                    diesel::insert_into(todo_lists::table)
                        .values(&checklist_row)
                        .execute(conn)
                        .map_err(|err| map_insert_error(err, checklist_id, &work_order_id))?;
                    if !todo_rows.is_empty() {
                        diesel::insert_into(todos::table)
                            .values(&todo_rows)
                            .execute(conn)?;
                    }
                    Ok(())
                })
                .map_err(ChecklistRepositoryError::from)
        })
        .await
    }

    async fn find_by_id(&self, id: ChecklistId) -> ChecklistRepositoryResult<Option<Checklist>> {
        self.run_blocking(move |connection| {
            let row = todo_lists::table
                .filter(todo_lists::id.eq(id.into_inner()))
                .select(ChecklistRow::as_select())
                .first::<ChecklistRow>(connection)
                .optional()
                .map_err(ChecklistRepositoryError::persistence)?;
            row.map(row_to_checklist).transpose()
        })
        .await
    }

    async fn find_by_work_order(
        &self,
        work_order_id: &WorkOrderId,
    ) -> ChecklistRepositoryResult<Option<Checklist>> {
        let lookup = work_order_id.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = todo_lists::table
                .filter(todo_lists::work_order_id.eq(&lookup))
                .select(ChecklistRow::as_select())
                .first::<ChecklistRow>(connection)
                .optional()
                .map_err(ChecklistRepositoryError::persistence)?;
            row.map(row_to_checklist).transpose()
        })
        .await
    }

    async fn search(&self, query: &ChecklistQuery) -> ChecklistRepositoryResult<Vec<Checklist>> {
        let limit = i64::try_from(query.limit()).unwrap_or(i64::MAX);
        if limit == 0 {
            return Ok(Vec::new());
        }
        let include_history = query.include_history();
        let pattern = query.needle().map(like_pattern);

        self.run_blocking(move |connection| {
            let mut statement = todo_lists::table
                .select(ChecklistRow::as_select())
                .into_boxed();
            if !include_history {
                statement = statement.filter(todo_lists::is_history.eq(false));
            }
            if let Some(pattern) = pattern {
                statement = statement.filter(
                    todo_lists::name
                        .ilike(pattern.clone())
                        .or(todo_lists::belongs_to.ilike(pattern.clone()))
                        .or(todo_lists::description.ilike(pattern)),
                );
            }
            let rows = statement
                .order(todo_lists::created.desc())
                .limit(limit)
                .load::<ChecklistRow>(connection)
                .map_err(ChecklistRepositoryError::persistence)?;
            rows.into_iter().map(row_to_checklist).collect()
        })
        .await
    }

    async fn list_owned_by(
        &self,
        owner: UserId,
    ) -> ChecklistRepositoryResult<Vec<ChecklistDetail>> {
        self.run_blocking(move |connection| {
            let checklist_rows = todo_lists::table
                .filter(todo_lists::user_id.eq(owner.value()))
                .filter(todo_lists::is_history.eq(false))
                .order(todo_lists::created.desc())
                .select(ChecklistRow::as_select())
                .load::<ChecklistRow>(connection)
                .map_err(ChecklistRepositoryError::persistence)?;
            if checklist_rows.is_empty() {
                return Ok(Vec::new());
            }

            let ids: Vec<Uuid> = checklist_rows.iter().map(|row| row.id).collect();
            let todo_rows = todos::table
                .filter(todos::todolist_id.eq_any(ids))
                .order(todos::position.asc())
                .select(TodoRow::as_select())
                .load::<TodoRow>(connection)
                .map_err(ChecklistRepositoryError::persistence)?;

            let mut tasks_by_checklist: HashMap<Uuid, Vec<Task>> = HashMap::new();
            for row in todo_rows {
                let key = row.todolist_id;
                tasks_by_checklist
                    .entry(key)
                    .or_default()
                    .push(row_to_task(row)?);
            }

            checklist_rows
                .into_iter()
                .map(|row| {
                    let tasks = tasks_by_checklist.remove(&row.id).unwrap_or_default();
                    Ok(ChecklistDetail::new(row_to_checklist(row)?, tasks))
                })
                .collect()
        })
        .await
    }

    async fn compare_and_set_owner(
        &self,
        id: ChecklistId,
        expected: Option<UserId>,
        owner: Option<UserId>,
    ) -> ChecklistRepositoryResult<Checklist> {
        self.run_blocking(move |connection| {
            connection
                .transaction::<_, TxError, _>(|conn| {
                    let stored = lock_checklist(conn, id)?;
                    if stored.is_history {
                        return Err(ChecklistRepositoryError::ChecklistArchived(id).into());
                    }
                    if stored.user_id != expected.map(UserId::value) {
                        let actual = stored
                            .user_id
                            .map(UserId::new)
                            .transpose()
                            .map_err(ChecklistRepositoryError::persistence)?;
                        return Err(ChecklistRepositoryError::OwnerConflict {
                            checklist_id: id,
                            expected,
                            actual,
                        }
                        .into());
                    }

                    let target = todo_lists::table.filter(todo_lists::id.eq(id.into_inner()));
                    let row = diesel::update(target)
                        .set(todo_lists::user_id.eq(owner.map(UserId::value)))
                        .returning(ChecklistRow::as_returning())
                        .get_result::<ChecklistRow>(conn)
                        .map_err(|err| map_owner_update_error(err, owner))?;
                    row_to_checklist(row).map_err(TxError::from)
                })
                .map_err(ChecklistRepositoryError::from)
        })
        .await
    }

    async fn find_task(&self, id: TaskId) -> ChecklistRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = todos::table
                .filter(todos::id.eq(id.into_inner()))
                .select(TodoRow::as_select())
                .first::<TodoRow>(connection)
                .optional()
                .map_err(ChecklistRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn tasks_for(&self, checklist_id: ChecklistId) -> ChecklistRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = todos::table
                .filter(todos::todolist_id.eq(checklist_id.into_inner()))
                .order((todos::position.asc(), todos::id.asc()))
                .select(TodoRow::as_select())
                .load::<TodoRow>(connection)
                .map_err(ChecklistRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn set_task_completed(
        &self,
        id: TaskId,
        completed: bool,
    ) -> ChecklistRepositoryResult<Task> {
        self.run_blocking(move |connection| {
            connection
                .transaction::<_, TxError, _>(|conn| {
                    let task_row = todos::table
                        .filter(todos::id.eq(id.into_inner()))
                        .select(TodoRow::as_select())
                        .first::<TodoRow>(conn)
                        .optional()?
                        .ok_or(TxError::Repository(ChecklistRepositoryError::TaskNotFound(id)))?;
                    let checklist_id = ChecklistId::from_uuid(task_row.todolist_id);
                    let checklist = lock_checklist(conn, checklist_id)?;
                    if !completed && checklist.is_history {
                        return Err(
                            ChecklistRepositoryError::ChecklistArchived(checklist_id).into()
                        );
                    }

                    let row = diesel::update(todos::table.filter(todos::id.eq(id.into_inner())))
                        .set(todos::completed.eq(completed))
                        .returning(TodoRow::as_returning())
                        .get_result::<TodoRow>(conn)?;
                    row_to_task(row).map_err(TxError::from)
                })
                .map_err(ChecklistRepositoryError::from)
        })
        .await
    }

    async fn mark_archived(&self, id: ChecklistId) -> ChecklistRepositoryResult<Checklist> {
        self.run_blocking(move |connection| {
            connection
                .transaction::<_, TxError, _>(|conn| {
                    let stored = lock_checklist(conn, id)?;
                    if stored.is_history {
                        return row_to_checklist(stored).map_err(TxError::from);
                    }

                    let total: i64 = todos::table
                        .filter(todos::todolist_id.eq(id.into_inner()))
                        .count()
                        .get_result(conn)?;
                    let open: i64 = todos::table
                        .filter(todos::todolist_id.eq(id.into_inner()))
                        .filter(todos::completed.eq(false))
                        .count()
                        .get_result(conn)?;
                    if total == 0 || open > 0 {
                        return Err(ChecklistRepositoryError::IncompleteChecklist(id).into());
                    }

                    let target = todo_lists::table.filter(todo_lists::id.eq(id.into_inner()));
                    let row = diesel::update(target)
                        .set(todo_lists::is_history.eq(true))
                        .returning(ChecklistRow::as_returning())
                        .get_result::<ChecklistRow>(conn)?;
                    row_to_checklist(row).map_err(TxError::from)
                })
                .map_err(ChecklistRepositoryError::from)
        })
        .await
    }
}

fn lock_checklist(conn: &mut PgConnection, id: ChecklistId) -> Result<ChecklistRow, TxError> {
    todo_lists::table
        .filter(todo_lists::id.eq(id.into_inner()))
        .select(ChecklistRow::as_select())
        .for_update()
        .first::<ChecklistRow>(conn)
        .optional()?
        .ok_or(TxError::Repository(
            ChecklistRepositoryError::ChecklistNotFound(id),
        ))
}

/// Escapes `LIKE` wildcards and wraps the needle for substring matching.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn map_insert_error(err: DieselError, id: ChecklistId, work_order_id: &WorkOrderId) -> TxError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if is_work_order_unique_violation(info.as_ref()) =>
        {
            TxError::Repository(ChecklistRepositoryError::DuplicateWorkOrder(
                work_order_id.clone(),
            ))
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            TxError::Repository(ChecklistRepositoryError::DuplicateChecklist(id))
        }
        other => TxError::Diesel(other),
    }
}

fn map_owner_update_error(err: DieselError, owner: Option<UserId>) -> TxError {
    match (err, owner) {
        (DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _), Some(user)) => {
            TxError::Repository(ChecklistRepositoryError::UnknownUser(user))
        }
        (other, _) => TxError::Diesel(other),
    }
}

fn is_work_order_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == "todo_lists_work_order_id_key")
}

fn to_checklist_row(checklist: &Checklist) -> ChecklistRow {
    ChecklistRow {
        id: checklist.id().into_inner(),
        work_order_id: checklist.work_order_id().as_str().to_owned(),
        name: checklist.name().to_owned(),
        description: checklist.description().to_owned(),
        belongs_to: checklist.belongs_to().to_owned(),
        user_id: checklist.owner().map(UserId::value),
        is_history: checklist.is_history(),
        created: checklist.created_at(),
    }
}

fn to_todo_row(task: &Task) -> ChecklistRepositoryResult<TodoRow> {
    Ok(TodoRow {
        id: task.id().into_inner(),
        todolist_id: task.checklist_id().into_inner(),
        text: task.text().to_owned(),
        completed: task.completed(),
        position: i32::try_from(task.position()).map_err(ChecklistRepositoryError::persistence)?,
    })
}

fn row_to_checklist(row: ChecklistRow) -> ChecklistRepositoryResult<Checklist> {
    let ChecklistRow {
        id,
        work_order_id,
        name,
        description,
        belongs_to,
        user_id,
        is_history,
        created,
    } = row;

    let data = PersistedChecklistData {
        id: ChecklistId::from_uuid(id),
        work_order_id: WorkOrderId::new(work_order_id)
            .map_err(ChecklistRepositoryError::persistence)?,
        name,
        description,
        belongs_to,
        owner: user_id
            .map(UserId::new)
            .transpose()
            .map_err(ChecklistRepositoryError::persistence)?,
        is_history,
        created_at: created,
    };
    Ok(Checklist::from_persisted(data))
}

fn row_to_task(row: TodoRow) -> ChecklistRepositoryResult<Task> {
    let TodoRow {
        id,
        todolist_id,
        text,
        completed,
        position,
    } = row;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        checklist_id: ChecklistId::from_uuid(todolist_id),
        position: u32::try_from(position).map_err(ChecklistRepositoryError::persistence)?,
        text,
        completed,
    };
    Ok(Task::from_persisted(data))
}
