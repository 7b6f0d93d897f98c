//! User directory for checklist assignment.
//!
//! Users are created or refreshed each time they sign in through the
//! external identity provider. The internal numeric identifier issued here
//! is the only user reference the checklist context stores. The module
//! follows hexagonal architecture:
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
