//! Evaluator registry for the query engine
//!
//! Maps each [`QueryKind`] to the evaluator that handles it.

use crate::evaluator::EncounterQueryEvaluator;
use crate::most_recent::MostRecentEncounterForPatientQueryEvaluator;
use crate::query::QueryKind;
use reporting_model::EncounterDataSource;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of query evaluators
#[derive(Default, Clone)]
pub struct EvaluatorRegistry {
    evaluators: HashMap<QueryKind, Arc<dyn EncounterQueryEvaluator>>,
}

impl EvaluatorRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in evaluators over one data source
    pub fn with_standard_evaluators(source: Arc<dyn EncounterDataSource>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(MostRecentEncounterForPatientQueryEvaluator::new(source)));
        registry
    }

    /// Register an evaluator, replacing any evaluator for the same kind
    pub fn register(&mut self, evaluator: Arc<dyn EncounterQueryEvaluator>) {
        let kind = evaluator.kind();
        if self.evaluators.insert(kind, evaluator).is_some() {
            log::debug!("replaced evaluator for {} queries", kind);
        }
    }

    pub fn get(&self, kind: QueryKind) -> Option<&Arc<dyn EncounterQueryEvaluator>> {
        self.evaluators.get(&kind)
    }

    pub fn contains(&self, kind: QueryKind) -> bool {
        self.evaluators.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.evaluators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.evaluators.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reporting_model::NoOpDataSource;

    #[test]
    fn test_standard_registry() {
        let registry = EvaluatorRegistry::with_standard_evaluators(Arc::new(NoOpDataSource));
        assert!(registry.contains(QueryKind::MostRecentEncounterForPatient));
        assert_eq!(registry.len(), 1);
        assert!(EvaluatorRegistry::new().is_empty());
    }
}
