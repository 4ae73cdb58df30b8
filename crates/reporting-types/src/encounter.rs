//! Encounters as delivered by a data source

use crate::{EncounterId, PatientId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A recorded clinical visit owned by one patient
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Encounter {
    #[serde(alias = "encounterId")]
    pub id: EncounterId,
    pub patient_id: PatientId,
    pub encounter_datetime: NaiveDateTime,
}

impl Encounter {
    pub fn new(id: EncounterId, patient_id: PatientId, encounter_datetime: NaiveDateTime) -> Self {
        Self {
            id,
            patient_id,
            encounter_datetime,
        }
    }

    /// Whether this encounter is more recent than `other`
    ///
    /// Later timestamps win; identical timestamps are ordered by identifier so
    /// the highest id is the most recent.
    pub fn is_more_recent_than(&self, other: &Encounter) -> bool {
        (self.encounter_datetime, self.id) > (other.encounter_datetime, other.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_recency_by_timestamp() {
        let early = Encounter::new(EncounterId(9), PatientId(1), at(8));
        let late = Encounter::new(EncounterId(3), PatientId(1), at(9));
        assert!(late.is_more_recent_than(&early));
        assert!(!early.is_more_recent_than(&late));
    }

    #[test]
    fn test_recency_tie_breaks_on_highest_id() {
        let low = Encounter::new(EncounterId(3), PatientId(1), at(8));
        let high = Encounter::new(EncounterId(4), PatientId(1), at(8));
        assert!(high.is_more_recent_than(&low));
        assert!(!low.is_more_recent_than(&high));
    }

    #[test]
    fn test_json_shape() {
        let json = r#"{"encounterId": 5, "patientId": 7, "encounterDatetime": "2024-05-01T08:00:00"}"#;
        let enc: Encounter = serde_json::from_str(json).unwrap();
        assert_eq!(enc, Encounter::new(EncounterId(5), PatientId(7), at(8)));
    }
}
