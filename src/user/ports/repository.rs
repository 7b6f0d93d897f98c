//! Repository port for user persistence.

use crate::user::domain::{ExternalIdentity, User, UserId, UserProfile};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for user repository operations.
pub type UserRepositoryResult<T> = Result<T, UserRepositoryError>;

/// User persistence contract.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user for a first sign-in, or refreshes `last_login_at` when
    /// the external identity is already known.
    ///
    /// The operation is idempotent with respect to identity: repeated calls
    /// for the same external identity always return the same [`UserId`].
    async fn upsert_login(
        &self,
        profile: &UserProfile,
        at: DateTime<Utc>,
    ) -> UserRepositoryResult<User>;

    /// Finds a user by internal identifier.
    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>>;

    /// Finds a user by external identity key.
    async fn find_by_external_id(
        &self,
        external_id: &ExternalIdentity,
    ) -> UserRepositoryResult<Option<User>>;
}

/// Errors returned by user repository implementations.
#[derive(Debug, Clone, Error)]
pub enum UserRepositoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl UserRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
