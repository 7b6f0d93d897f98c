//! Domain model for work-order checklists.
//!
//! The checklist domain covers work-order intake, template seeding, the
//! ownership state machine, and completion progress, while keeping all
//! infrastructure concerns outside of the domain boundary.

mod checklist;
mod detail;
mod error;
mod ids;
mod query;
mod task;
mod template;
mod work_order;

pub use checklist::{Checklist, ChecklistState, ClaimPolicy, PersistedChecklistData};
pub use detail::{ChecklistDetail, ChecklistProgress};
pub use error::{ChecklistDomainError, ParseClaimPolicyError};
pub use ids::{ChecklistId, TaskId, WorkOrderId};
pub use query::ChecklistQuery;
pub use task::{PersistedTaskData, Task};
pub use template::TaskTemplate;
pub use work_order::WorkOrder;
