//! Encounter data source abstraction
//!
//! This crate provides:
//! - The data source capability consumed by query evaluators
//! - Retrieve requests (cohort + date range)
//! - An in-memory encounter store and a no-op source for tests and the CLI

pub mod memory;
pub mod provider;

pub use memory::{InMemoryEncounterStore, NoOpDataSource};
pub use provider::*;
