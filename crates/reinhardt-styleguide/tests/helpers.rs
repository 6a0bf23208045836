//! Test helpers for reinhardt-styleguide integration tests.

#[path = "helpers/harness.rs"]
pub mod harness;
