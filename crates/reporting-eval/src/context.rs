//! Evaluation context for query execution

use chrono::{Local, NaiveDateTime};
use indexmap::IndexMap;
use reporting_types::{Cohort, ParameterValue};

/// Evaluation context for query execution
///
/// Created by the caller and read-only to evaluators. The base cohort is
/// required; an empty cohort is valid and yields empty results.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationContext {
    /// Patients the evaluation is restricted to
    pub base_cohort: Cohort,
    /// The instant the evaluation is considered to run at
    pub evaluation_date: NaiveDateTime,
    /// Parameter values by name
    pub parameters: IndexMap<String, ParameterValue>,
}

impl EvaluationContext {
    /// Create a context over the given base cohort, evaluated now
    pub fn new(base_cohort: Cohort) -> Self {
        Self {
            base_cohort,
            evaluation_date: Local::now().naive_local(),
            parameters: IndexMap::new(),
        }
    }

    pub fn builder(base_cohort: Cohort) -> EvaluationContextBuilder {
        EvaluationContextBuilder::new(base_cohort)
    }

    /// Set a parameter value
    pub fn set_parameter(&mut self, name: impl Into<String>, value: impl Into<ParameterValue>) {
        self.parameters.insert(name.into(), value.into());
    }

    /// Get a parameter value
    pub fn get_parameter(&self, name: &str) -> Option<&ParameterValue> {
        self.parameters.get(name)
    }

    pub fn contains_parameter(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }
}

/// Builder for [`EvaluationContext`]
#[derive(Debug, Clone)]
pub struct EvaluationContextBuilder {
    context: EvaluationContext,
}

impl EvaluationContextBuilder {
    pub fn new(base_cohort: Cohort) -> Self {
        Self {
            context: EvaluationContext::new(base_cohort),
        }
    }

    pub fn evaluation_date(mut self, date: NaiveDateTime) -> Self {
        self.context.evaluation_date = date;
        self
    }

    pub fn parameter(mut self, name: impl Into<String>, value: impl Into<ParameterValue>) -> Self {
        self.context.set_parameter(name, value);
        self
    }

    pub fn build(self) -> EvaluationContext {
        self.context
    }
}
