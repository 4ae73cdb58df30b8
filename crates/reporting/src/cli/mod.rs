//! CLI functionality for the reporting tool
//!
//! - `evaluate`: most recent encounter per patient over an encounter file
//! - `convert`: definition files between JSON and XML
//! - `validate`: deserialize definition files and report diagnostics
//! - Output formatting

pub mod convert;
pub mod evaluate;
pub mod output;
pub mod validate;
