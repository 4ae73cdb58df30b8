//! Reporting diagnostics and error handling
//!
//! This crate provides the error handling infrastructure shared by the
//! evaluation and serialization crates: structured error codes, the
//! top-level [`ReportingError`] and printable [`Diagnostic`]s.

mod error;
mod error_code;

pub use error::*;
pub use error_code::*;

/// Result type for reporting operations
pub type Result<T> = std::result::Result<T, ReportingError>;
