//! Work-order checklists: synchronization, assignment, completion, and
//! archival.
//!
//! Every external work order maps to at most one checklist. A checklist is
//! seeded from the task template when it is first created, can be claimed
//! and released by workers, and is archived once every task on it has been
//! completed. Archival is terminal. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
