//! External boundary for the checklist service.
//!
//! Requests arrive as loosely typed JSON, are validated into domain values
//! by [`contracts`], and are dispatched through the transport-agnostic
//! [`ChecklistOperations`] trait. The [`router`] maps that trait onto HTTP
//! routes and the [`ApiError`] taxonomy onto status codes.

pub mod contracts;
mod error;
mod operations;
mod routes;

pub use error::{ApiError, ApiResult};
pub use operations::{ChecklistApplication, ChecklistOperations};
pub use routes::{AppState, router};
