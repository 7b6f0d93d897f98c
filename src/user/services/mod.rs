//! Application services for the user directory.

mod directory;

pub use directory::{RecordLoginRequest, UserDirectoryService, UserServiceError, UserServiceResult};
