//! Application services for checklist management.

mod archival;
mod assignment;
mod completion;
mod error;
mod sync;

pub use archival::{ArchivalGate, ArchivalOutcome};
pub use assignment::{AssignmentConfig, AssignmentService};
pub use completion::{TaskCompletion, TaskCompletionService};
pub use error::{ChecklistServiceError, ChecklistServiceResult};
pub use sync::{ChecklistSyncService, SyncFailure, SyncReport, SyncWorkOrderRequest};
