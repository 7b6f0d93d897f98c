//! Domain model for the user directory.

mod error;
mod ids;
mod user;

pub use error::UserDomainError;
pub use ids::{EmailAddress, ExternalIdentity, UserId, UserRole};
pub use user::{PersistedUserData, User, UserProfile};
