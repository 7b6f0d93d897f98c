//! Step definitions for checklist lifecycle scenarios.

pub mod world;

mod given;
mod then;
