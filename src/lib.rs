//! Punchlist: work-order checklist service.
//!
//! Every external work order is mirrored by exactly one checklist seeded
//! from a shared task template. Workers claim checklists, tick off tasks,
//! and a checklist is archived once its last task is completed.
//!
//! # Architecture
//!
//! Punchlist follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, memory)
//!
//! # Modules
//!
//! - [`checklist`]: Synchronization, assignment, completion, and archival
//! - [`user`]: Sign-in recording and the user directory
//! - [`api`]: Request contracts, error mapping, and the HTTP router
//! - [`config`]: Environment-driven service configuration
//! - [`telemetry`]: Tracing subscriber setup

pub mod api;
pub mod checklist;
pub mod config;
pub mod telemetry;
pub mod user;
