//! Determinism and integration tests for the step loop.
//!
//! - `determinism.rs`: same seed, same run
//! - `integration.rs`: end-to-end combat scenarios and invariants
//! - `helpers.rs`: battlefield setup utilities

mod helpers;
mod integration;

pub use helpers::*;
