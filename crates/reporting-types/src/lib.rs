//! Reporting value types
//!
//! This crate defines the plain data the rest of the workspace is built on:
//! - Patient and encounter identifiers
//! - Cohorts (sets of patient identifiers)
//! - Encounters as delivered by a data source
//! - Calendar-day boundaries and inclusive date ranges
//! - Declared parameters and runtime parameter values

pub mod cohort;
pub mod date;
pub mod encounter;
pub mod ids;
pub mod parameter;

pub use cohort::Cohort;
pub use date::{DateRange, end_of_day, start_of_day};
pub use encounter::Encounter;
pub use ids::{EncounterId, PatientId};
pub use parameter::{Parameter, ParameterType, ParameterValue};
