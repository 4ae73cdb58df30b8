//! Encounter query results

use crate::query::EncounterQuery;
use reporting_types::{EncounterId, PatientId};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Encounters selected by an encounter query
///
/// Built fresh for each evaluation and handed to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterQueryResult {
    /// The query that produced this result
    pub query: EncounterQuery,
    member_ids: BTreeSet<EncounterId>,
    patient_encounters: BTreeMap<PatientId, EncounterId>,
}

impl EncounterQueryResult {
    /// An empty result for the given query
    pub fn new(query: EncounterQuery) -> Self {
        Self {
            query,
            member_ids: BTreeSet::new(),
            patient_encounters: BTreeMap::new(),
        }
    }

    /// Record the encounter selected for a patient, replacing any earlier choice
    pub fn add(&mut self, patient_id: PatientId, encounter_id: EncounterId) {
        if let Some(previous) = self.patient_encounters.insert(patient_id, encounter_id) {
            self.member_ids.remove(&previous);
        }
        self.member_ids.insert(encounter_id);
    }

    /// Selected encounter identifiers, in ascending order
    pub fn member_ids(&self) -> &BTreeSet<EncounterId> {
        &self.member_ids
    }

    /// Selected encounter per patient
    pub fn patient_encounters(&self) -> &BTreeMap<PatientId, EncounterId> {
        &self.patient_encounters
    }

    pub fn encounter_for(&self, patient_id: PatientId) -> Option<EncounterId> {
        self.patient_encounters.get(&patient_id).copied()
    }

    pub fn contains(&self, encounter_id: EncounterId) -> bool {
        self.member_ids.contains(&encounter_id)
    }

    pub fn size(&self) -> usize {
        self.member_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.member_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MostRecentEncounterForPatientQuery;

    #[test]
    fn test_replacing_patient_choice_drops_old_member() {
        let mut result =
            EncounterQueryResult::new(MostRecentEncounterForPatientQuery::new().into());
        result.add(PatientId(1), EncounterId(10));
        result.add(PatientId(1), EncounterId(11));
        result.add(PatientId(2), EncounterId(20));

        assert_eq!(result.size(), 2);
        assert!(!result.contains(EncounterId(10)));
        assert_eq!(result.encounter_for(PatientId(1)), Some(EncounterId(11)));
        assert_eq!(
            result.member_ids().iter().copied().collect::<Vec<_>>(),
            vec![EncounterId(11), EncounterId(20)]
        );
    }
}
