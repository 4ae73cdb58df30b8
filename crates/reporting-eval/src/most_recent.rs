//! Most recent encounter per patient
//!
//! Fetches every encounter of the base cohort inside the query's date bounds
//! and keeps, for each patient, the encounter with the latest timestamp. When
//! two encounters share a timestamp the one with the highest identifier is kept.

use crate::context::EvaluationContext;
use crate::error::EvalResult;
use crate::evaluator::EncounterQueryEvaluator;
use crate::query::{EncounterQuery, MostRecentEncounterForPatientQuery, QueryKind};
use crate::result::EncounterQueryResult;
use async_trait::async_trait;
use reporting_model::{EncounterDataSource, EncounterRequest};
use reporting_types::{Encounter, PatientId};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

/// Evaluator for [`MostRecentEncounterForPatientQuery`]
pub struct MostRecentEncounterForPatientQueryEvaluator {
    source: Arc<dyn EncounterDataSource>,
}

impl MostRecentEncounterForPatientQueryEvaluator {
    pub fn new(source: Arc<dyn EncounterDataSource>) -> Self {
        Self { source }
    }

    /// Evaluate the query against the context's base cohort
    pub async fn evaluate_query(
        &self,
        query: &MostRecentEncounterForPatientQuery,
        ctx: &EvaluationContext,
    ) -> EvalResult<EncounterQueryResult> {
        let query = query.clone_for_evaluation(ctx)?;
        let mut result = EncounterQueryResult::new(query.clone().into());

        if ctx.base_cohort.is_empty() {
            log::debug!("base cohort is empty, skipping retrieve");
            return Ok(result);
        }

        let request =
            EncounterRequest::new(ctx.base_cohort.clone()).with_date_range(query.date_range());
        log::debug!(
            "retrieving encounters for {} patients in {} from {}",
            request.cohort.size(),
            request.date_range,
            self.source.source_name()
        );
        let encounters = self.source.encounters(&request).await?;

        for (patient_id, encounter) in most_recent_per_patient(&request, encounters) {
            result.add(patient_id, encounter.id);
        }
        log::debug!("selected {} encounters", result.size());
        Ok(result)
    }
}

/// Keep the most recent encounter per patient among those the request matches
fn most_recent_per_patient(
    request: &EncounterRequest,
    encounters: Vec<Encounter>,
) -> HashMap<PatientId, Encounter> {
    let mut latest: HashMap<PatientId, Encounter> = HashMap::new();
    for encounter in encounters {
        if !request.matches(&encounter) {
            log::trace!("dropping encounter {} outside the request", encounter.id);
            continue;
        }
        match latest.entry(encounter.patient_id) {
            Entry::Vacant(slot) => {
                slot.insert(encounter);
            }
            Entry::Occupied(mut slot) => {
                if encounter.is_more_recent_than(slot.get()) {
                    slot.insert(encounter);
                }
            }
        }
    }
    latest
}

#[async_trait]
impl EncounterQueryEvaluator for MostRecentEncounterForPatientQueryEvaluator {
    fn kind(&self) -> QueryKind {
        QueryKind::MostRecentEncounterForPatient
    }

    async fn evaluate(
        &self,
        query: &EncounterQuery,
        ctx: &EvaluationContext,
    ) -> EvalResult<EncounterQueryResult> {
        match query {
            EncounterQuery::MostRecentEncounterForPatient(q) => self.evaluate_query(q, ctx).await,
        }
    }
}
