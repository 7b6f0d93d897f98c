//! Service layer for recording sign-ins and resolving users.

use crate::user::{
    domain::{User, UserDomainError, UserId, UserProfile, UserRole},
    ports::{UserRepository, UserRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Request payload describing a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLoginRequest {
    external_id: String,
    name: String,
    email: String,
    role: Option<String>,
}

impl RecordLoginRequest {
    /// Creates a request with the required identity fields.
    #[must_use]
    pub fn new(
        external_id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            external_id: external_id.into(),
            name: name.into(),
            email: email.into(),
            role: None,
        }
    }

    /// Sets the role reported by the identity provider.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

/// Service-level errors for user directory operations.
#[derive(Debug, Error)]
pub enum UserServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] UserDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),
}

/// Result type for user directory service operations.
pub type UserServiceResult<T> = Result<T, UserServiceError>;

/// User directory orchestration service.
#[derive(Clone)]
pub struct UserDirectoryService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> UserDirectoryService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new user directory service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates the user on first sign-in or refreshes `last_login_at`.
    ///
    /// # Errors
    ///
    /// Returns [`UserServiceError::Domain`] when the profile fails
    /// validation, or [`UserServiceError::Repository`] when persistence
    /// fails.
    pub async fn record_login(&self, request: RecordLoginRequest) -> UserServiceResult<User> {
        let RecordLoginRequest {
            external_id,
            name,
            email,
            role,
        } = request;

        let mut profile = UserProfile::new(external_id, name, email)?;
        if let Some(raw_role) = role.filter(|value| !value.trim().is_empty()) {
            profile = profile.with_role(UserRole::new(raw_role)?);
        }

        let user = self
            .repository
            .upsert_login(&profile, self.clock.utc())
            .await?;
        info!(user_id = %user.id(), external_id = %user.external_id(), "recorded sign-in");
        Ok(user)
    }

    /// Finds a user by internal identifier.
    ///
    /// # Errors
    ///
    /// Returns [`UserServiceError::Repository`] when persistence lookup
    /// fails.
    pub async fn find_by_id(&self, id: UserId) -> UserServiceResult<Option<User>> {
        Ok(self.repository.find_by_id(id).await?)
    }
}
