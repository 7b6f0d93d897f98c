//! Error types for user domain validation.

use thiserror::Error;

/// Errors returned while constructing user domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserDomainError {
    /// The numeric user identifier is zero or negative.
    #[error("invalid user id {0}, expected a positive integer")]
    InvalidUserId(i64),

    /// The external identity key is empty after trimming.
    #[error("external identity must not be empty")]
    EmptyExternalIdentity,

    /// The display name is empty after trimming.
    #[error("user name must not be empty")]
    EmptyName,

    /// The email address is not of the form `local@domain`.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),

    /// The role is empty after trimming.
    #[error("user role must not be empty")]
    EmptyRole,
}
