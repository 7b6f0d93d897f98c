//! User records and the validated sign-in profile that produces them.

use super::{EmailAddress, ExternalIdentity, UserDomainError, UserId, UserRole};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Validated profile presented by the identity provider at sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    external_id: ExternalIdentity,
    name: String,
    email: EmailAddress,
    role: UserRole,
}

impl UserProfile {
    /// Creates a profile with the default role.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError`] when the identity key, name, or email
    /// fail validation.
    pub fn new(
        external_id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, UserDomainError> {
        let raw_name = name.into();
        let trimmed_name = raw_name.trim();
        if trimmed_name.is_empty() {
            return Err(UserDomainError::EmptyName);
        }
        Ok(Self {
            external_id: ExternalIdentity::new(external_id)?,
            name: trimmed_name.to_owned(),
            email: EmailAddress::new(email)?,
            role: UserRole::default(),
        })
    }

    /// Replaces the default role.
    #[must_use]
    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }

    /// Returns the external identity key.
    #[must_use]
    pub const fn external_id(&self) -> &ExternalIdentity {
        &self.external_id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the role.
    #[must_use]
    pub const fn role(&self) -> &UserRole {
        &self.role
    }
}

/// Stored user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    external_id: ExternalIdentity,
    name: String,
    email: EmailAddress,
    role: UserRole,
    created_at: DateTime<Utc>,
    last_login_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Store-issued identifier.
    pub id: UserId,
    /// Identity provider key.
    pub external_id: ExternalIdentity,
    /// Display name captured at first sign-in.
    pub name: String,
    /// Email captured at first sign-in.
    pub email: EmailAddress,
    /// Role captured at first sign-in.
    pub role: UserRole,
    /// First sign-in timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest sign-in timestamp.
    pub last_login_at: DateTime<Utc>,
}

impl User {
    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            external_id: data.external_id,
            name: data.name,
            email: data.email,
            role: data.role,
            created_at: data.created_at,
            last_login_at: data.last_login_at,
        }
    }

    /// Builds the record for a first sign-in.
    #[must_use]
    pub fn first_login(id: UserId, profile: &UserProfile, at: DateTime<Utc>) -> Self {
        Self {
            id,
            external_id: profile.external_id().clone(),
            name: profile.name().to_owned(),
            email: profile.email().clone(),
            role: profile.role().clone(),
            created_at: at,
            last_login_at: at,
        }
    }

    /// Refreshes the latest sign-in timestamp. Profile fields are kept as
    /// captured at first sign-in.
    pub fn record_login(&mut self, at: DateTime<Utc>) {
        self.last_login_at = at;
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the identity provider key.
    #[must_use]
    pub const fn external_id(&self) -> &ExternalIdentity {
        &self.external_id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the role.
    #[must_use]
    pub const fn role(&self) -> &UserRole {
        &self.role
    }

    /// Returns the first sign-in timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest sign-in timestamp.
    #[must_use]
    pub const fn last_login_at(&self) -> DateTime<Utc> {
        self.last_login_at
    }
}
