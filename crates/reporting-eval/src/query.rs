//! Encounter query definitions
//!
//! Queries are plain values. Evaluators look them up by [`QueryKind`] and may
//! complete unset fields from the evaluation context before running them.

use crate::context::EvaluationContext;
use crate::error::{EvalError, EvalResult};
use chrono::NaiveDate;
use reporting_types::{DateRange, Parameter, ParameterType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the parameter bound to `on_or_after`
pub const ON_OR_AFTER: &str = "onOrAfter";
/// Name of the parameter bound to `on_or_before`
pub const ON_OR_BEFORE: &str = "onOrBefore";

/// Kind of an encounter query, used to pick an evaluator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryKind {
    MostRecentEncounterForPatient,
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MostRecentEncounterForPatient => write!(f, "MostRecentEncounterForPatient"),
        }
    }
}

/// An encounter query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EncounterQuery {
    MostRecentEncounterForPatient(MostRecentEncounterForPatientQuery),
}

impl EncounterQuery {
    pub fn kind(&self) -> QueryKind {
        match self {
            Self::MostRecentEncounterForPatient(_) => QueryKind::MostRecentEncounterForPatient,
        }
    }
}

impl From<MostRecentEncounterForPatientQuery> for EncounterQuery {
    fn from(query: MostRecentEncounterForPatientQuery) -> Self {
        Self::MostRecentEncounterForPatient(query)
    }
}

/// The most recent encounter of each patient, optionally within date bounds
///
/// Both bounds are inclusive and date-granular. Parameters declared under the
/// names `onOrAfter` / `onOrBefore` are filled from the evaluation context when
/// the corresponding bound is unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MostRecentEncounterForPatientQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_or_after: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_or_before: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
}

impl MostRecentEncounterForPatientQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn on_or_after(mut self, date: NaiveDate) -> Self {
        self.on_or_after = Some(date);
        self
    }

    pub fn on_or_before(mut self, date: NaiveDate) -> Self {
        self.on_or_before = Some(date);
        self
    }

    /// Declare a parameter on this query
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Declare both date bounds as parameters
    pub fn with_date_parameters(self) -> Self {
        self.with_parameter(
            Parameter::new(ON_OR_AFTER, ParameterType::Date).with_label("On or After"),
        )
        .with_parameter(
            Parameter::new(ON_OR_BEFORE, ParameterType::Date).with_label("On or Before"),
        )
    }

    pub fn date_range(&self) -> DateRange {
        DateRange::new(self.on_or_after, self.on_or_before)
    }

    /// Copy of this query with unset bounds filled from the context
    ///
    /// A declared bound parameter takes the context value of the same name,
    /// falling back to the parameter's default. Null leaves the bound unset.
    pub fn clone_for_evaluation(&self, ctx: &EvaluationContext) -> EvalResult<Self> {
        let mut query = self.clone();
        for parameter in &self.parameters {
            let slot = match parameter.name.as_str() {
                ON_OR_AFTER => &mut query.on_or_after,
                ON_OR_BEFORE => &mut query.on_or_before,
                other => {
                    log::warn!("query declares parameter '{}' with no matching property", other);
                    continue;
                }
            };
            if slot.is_some() {
                continue;
            }
            let Some(value) = ctx
                .get_parameter(&parameter.name)
                .or(parameter.default_value.as_ref())
            else {
                continue;
            };
            if value.is_null() {
                continue;
            }
            let date = value.as_date().ok_or_else(|| {
                EvalError::invalid_parameter(
                    &parameter.name,
                    ParameterType::Date.to_string(),
                    value.kind(),
                )
            })?;
            log::debug!("parameter '{}' bound to {}", parameter.name, date);
            *slot = Some(date);
        }
        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reporting_types::{Cohort, ParameterValue};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    #[test]
    fn test_bounds_from_context() {
        let query = MostRecentEncounterForPatientQuery::new().with_date_parameters();
        let ctx = EvaluationContext::builder(Cohort::of([1]))
            .parameter(ON_OR_AFTER, day(1))
            .parameter(ON_OR_BEFORE, day(30))
            .build();

        let resolved = query.clone_for_evaluation(&ctx).unwrap();
        assert_eq!(resolved.date_range(), DateRange::new(Some(day(1)), Some(day(30))));
    }

    #[test]
    fn test_explicit_bound_wins_over_context() {
        let query = MostRecentEncounterForPatientQuery::new()
            .on_or_after(day(10))
            .with_date_parameters();
        let ctx = EvaluationContext::builder(Cohort::of([1]))
            .parameter(ON_OR_AFTER, day(1))
            .build();

        let resolved = query.clone_for_evaluation(&ctx).unwrap();
        assert_eq!(resolved.on_or_after, Some(day(10)));
        assert_eq!(resolved.on_or_before, None);
    }

    #[test]
    fn test_undeclared_context_values_are_ignored() {
        let query = MostRecentEncounterForPatientQuery::new();
        let ctx = EvaluationContext::builder(Cohort::of([1]))
            .parameter(ON_OR_AFTER, day(1))
            .build();

        assert_eq!(query.clone_for_evaluation(&ctx).unwrap(), query);
    }

    #[test]
    fn test_default_value_used_when_context_missing() {
        let query = MostRecentEncounterForPatientQuery::new().with_parameter(
            Parameter::new(ON_OR_BEFORE, ParameterType::Date)
                .with_default(ParameterValue::Date(day(15))),
        );
        let ctx = EvaluationContext::new(Cohort::of([1]));

        let resolved = query.clone_for_evaluation(&ctx).unwrap();
        assert_eq!(resolved.on_or_before, Some(day(15)));
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let query = MostRecentEncounterForPatientQuery::new().with_date_parameters();
        let ctx = EvaluationContext::builder(Cohort::of([1]))
            .parameter(ON_OR_AFTER, "yesterday")
            .build();

        let err = query.clone_for_evaluation(&ctx).unwrap_err();
        assert!(matches!(err, EvalError::InvalidParameter { ref name, .. } if name == ON_OR_AFTER));
    }

    #[test]
    fn test_query_json_shape() {
        let query: EncounterQuery = MostRecentEncounterForPatientQuery::new()
            .on_or_before(day(2))
            .into();
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "MostRecentEncounterForPatient", "onOrBefore": "2024-04-02"})
        );
    }
}
