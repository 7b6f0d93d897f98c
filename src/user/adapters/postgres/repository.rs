//! `PostgreSQL` repository implementation for the user directory.

use super::{
    models::{NewUserRow, UserRow},
    schema::users,
};
use crate::user::{
    domain::{
        EmailAddress, ExternalIdentity, PersistedUserData, User, UserId, UserProfile, UserRole,
    },
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::upsert::excluded;

/// `PostgreSQL` connection pool type used by user adapters.
pub type UserPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed user repository.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: UserPgPool,
}

impl PostgresUserRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: UserPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> UserRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> UserRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(UserRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(UserRepositoryError::persistence)?
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn upsert_login(
        &self,
        profile: &UserProfile,
        at: DateTime<Utc>,
    ) -> UserRepositoryResult<User> {
        let new_row = NewUserRow {
            external_id: profile.external_id().as_str().to_owned(),
            name: profile.name().to_owned(),
            email: profile.email().as_str().to_owned(),
            role: profile.role().as_str().to_owned(),
            created_at: at,
            last_login_at: at,
        };

        self.run_blocking(move |connection| {
            let row = diesel::insert_into(users::table)
                .values(&new_row)
                .on_conflict(users::external_id)
                .do_update()
                .set(users::last_login_at.eq(excluded(users::last_login_at)))
                .returning(UserRow::as_returning())
                .get_result::<UserRow>(connection)
                .map_err(UserRepositoryError::persistence)?;
            row_to_user(row)
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::id.eq(id.value()))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn find_by_external_id(
        &self,
        external_id: &ExternalIdentity,
    ) -> UserRepositoryResult<Option<User>> {
        let lookup = external_id.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::external_id.eq(&lookup))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }
}

fn row_to_user(row: UserRow) -> UserRepositoryResult<User> {
    let UserRow {
        id,
        external_id,
        name,
        email,
        role,
        created_at,
        last_login_at,
    } = row;

    let data = PersistedUserData {
        id: UserId::new(id).map_err(UserRepositoryError::persistence)?,
        external_id: ExternalIdentity::new(external_id)
            .map_err(UserRepositoryError::persistence)?,
        name,
        email: EmailAddress::new(email).map_err(UserRepositoryError::persistence)?,
        role: UserRole::new(role).map_err(UserRepositoryError::persistence)?,
        created_at,
        last_login_at,
    };
    Ok(User::from_persisted(data))
}
