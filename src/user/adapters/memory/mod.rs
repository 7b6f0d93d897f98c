//! In-memory user directory for tests and local runs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::user::{
    domain::{ExternalIdentity, User, UserId, UserProfile},
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};

/// Thread-safe in-memory user repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    state: Arc<RwLock<InMemoryUserState>>,
}

#[derive(Debug, Default)]
struct InMemoryUserState {
    users: HashMap<UserId, User>,
    identity_index: HashMap<ExternalIdentity, UserId>,
    last_id: i64,
}

impl InMemoryUserRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a user with a known identifier. Identifiers issued by later
    /// first sign-ins continue after the highest one stored.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::Persistence`] when the state lock is
    /// poisoned.
    pub fn insert(&self, user: User) -> UserRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.last_id = state.last_id.max(user.id().value());
        state
            .identity_index
            .insert(user.external_id().clone(), user.id());
        state.users.insert(user.id(), user);
        Ok(())
    }
}

fn poisoned(err: impl std::fmt::Display) -> UserRepositoryError {
    UserRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn upsert_login(
        &self,
        profile: &UserProfile,
        at: DateTime<Utc>,
    ) -> UserRepositoryResult<User> {
        let mut state = self.state.write().map_err(poisoned)?;

        if let Some(existing_id) = state.identity_index.get(profile.external_id()).copied() {
            let user = state
                .users
                .get_mut(&existing_id)
                .ok_or_else(|| poisoned("identity index points at a missing user"))?;
            user.record_login(at);
            return Ok(user.clone());
        }

        let next_id = state.last_id + 1;
        let user_id = UserId::new(next_id).map_err(UserRepositoryError::persistence)?;
        let user = User::first_login(user_id, profile, at);
        state.last_id = next_id;
        state
            .identity_index
            .insert(profile.external_id().clone(), user_id);
        state.users.insert(user_id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_by_external_id(
        &self,
        external_id: &ExternalIdentity,
    ) -> UserRepositoryResult<Option<User>> {
        let state = self.state.read().map_err(poisoned)?;
        let user = state
            .identity_index
            .get(external_id)
            .and_then(|id| state.users.get(id))
            .cloned();
        Ok(user)
    }
}
