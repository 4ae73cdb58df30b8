//! Clinical reporting core
//!
//! This crate brings the workspace together:
//! - Most-recent-encounter-per-patient queries evaluated over a base cohort
//! - Reporting definitions (cohorts, indicators, dimensions, datasets,
//!   reports) serialized to JSON or XML with shared references preserved
//! - A single [`ReportingError`] the crate-level errors convert into
//!
//! # Example
//!
//! ```ignore
//! use reporting::eval::{EncounterQueryService, EvaluationContext, MostRecentEncounterForPatientQuery};
//! use reporting::model::InMemoryEncounterStore;
//! use reporting::types::Cohort;
//! use std::sync::Arc;
//!
//! let source = Arc::new(InMemoryEncounterStore::from_json_str(&json)?);
//! let service = EncounterQueryService::new(source);
//! let query = MostRecentEncounterForPatientQuery::new().on_or_before(date);
//!
//! let result = service
//!     .evaluate(&query.into(), &EvaluationContext::new(Cohort::of([7, 11])))
//!     .await?;
//! ```

// Re-export all public APIs from internal crates
pub use reporting_diagnostics as diagnostics;
pub use reporting_eval as eval;
pub use reporting_model as model;
pub use reporting_serializer as serializer;
pub use reporting_types as types;

// Convenience re-exports
pub use reporting_diagnostics::{ReportingError, Result};
pub use reporting_eval::{
    EncounterQueryService, EvaluationContext, MostRecentEncounterForPatientQuery,
};
pub use reporting_serializer::{DefinitionStore, ReportingSerializer, SerializerConfig, WireFormat};

// CLI module (only available with cli feature)
#[cfg(feature = "cli")]
pub mod cli;
