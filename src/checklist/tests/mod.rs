//! Unit tests for checklist management.
