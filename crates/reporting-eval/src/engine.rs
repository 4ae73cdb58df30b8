//! Encounter query service
//!
//! The entry point callers use: it looks up the evaluator registered for a
//! query's kind and runs it against the evaluation context.

use crate::context::EvaluationContext;
use crate::error::{EvalError, EvalResult};
use crate::query::EncounterQuery;
use crate::registry::EvaluatorRegistry;
use crate::result::EncounterQueryResult;
use reporting_model::EncounterDataSource;
use std::sync::Arc;
use std::time::Instant;

/// Dispatches encounter queries to their evaluators
#[derive(Clone)]
pub struct EncounterQueryService {
    registry: EvaluatorRegistry,
}

impl EncounterQueryService {
    /// Create a service with the built-in evaluators over one data source
    pub fn new(source: Arc<dyn EncounterDataSource>) -> Self {
        Self {
            registry: EvaluatorRegistry::with_standard_evaluators(source),
        }
    }

    /// Create a service with a custom registry
    pub fn with_registry(registry: EvaluatorRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &EvaluatorRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut EvaluatorRegistry {
        &mut self.registry
    }

    /// Evaluate a query against the context
    pub async fn evaluate(
        &self,
        query: &EncounterQuery,
        ctx: &EvaluationContext,
    ) -> EvalResult<EncounterQueryResult> {
        let kind = query.kind();
        let evaluator = self
            .registry
            .get(kind)
            .ok_or_else(|| EvalError::no_evaluator(kind))?;

        let started = Instant::now();
        let result = evaluator.evaluate(query, ctx).await;
        match &result {
            Ok(r) => log::debug!(
                "{} query over {} patients returned {} encounters in {:?}",
                kind,
                ctx.base_cohort.size(),
                r.size(),
                started.elapsed()
            ),
            Err(e) => log::debug!("{} query failed: {}", kind, e),
        }
        result
    }
}
