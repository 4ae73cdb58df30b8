//! Encounter Query Evaluation Engine
//!
//! This crate evaluates declarative encounter queries against an
//! [`EncounterDataSource`](reporting_model::EncounterDataSource), restricted to
//! the base cohort carried by an [`EvaluationContext`].
//!
//! # Example
//!
//! ```ignore
//! use reporting_eval::{EncounterQueryService, EvaluationContext, MostRecentEncounterForPatientQuery};
//! use reporting_types::Cohort;
//!
//! let service = EncounterQueryService::new(data_source);
//! let ctx = EvaluationContext::new(Cohort::of([7]));
//! let query = MostRecentEncounterForPatientQuery::new().on_or_before(date);
//!
//! let result = service.evaluate(&query.into(), &ctx).await?;
//! ```
//!
//! # Architecture
//!
//! - `EncounterQueryService`: dispatches a query to the evaluator registered for its kind
//! - `EvaluatorRegistry`: maps query kinds to `EncounterQueryEvaluator` implementations
//! - `MostRecentEncounterForPatientQueryEvaluator`: latest qualifying encounter per patient
//! - `EvaluationContext`: base cohort, evaluation date and named parameters

pub mod context;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod most_recent;
pub mod query;
pub mod registry;
pub mod result;

pub use context::{EvaluationContext, EvaluationContextBuilder};
pub use engine::EncounterQueryService;
pub use error::{EvalError, EvalResult};
pub use evaluator::EncounterQueryEvaluator;
pub use most_recent::MostRecentEncounterForPatientQueryEvaluator;
pub use query::{EncounterQuery, MostRecentEncounterForPatientQuery, QueryKind};
pub use registry::EvaluatorRegistry;
pub use result::EncounterQueryResult;
