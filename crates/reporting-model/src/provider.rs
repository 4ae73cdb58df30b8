//! Data source traits for encounter query evaluation

use async_trait::async_trait;
use reporting_diagnostics::{RPT0200, RPT0201, ReportingError};
use reporting_types::{Cohort, DateRange, Encounter};

/// Trait for providing encounters to query evaluators
///
/// Implementations return every encounter of a patient in the request's cohort
/// whose timestamp falls inside the request's date range. Evaluators call this
/// once per evaluation and do not retry or cache the answer.
#[async_trait]
pub trait EncounterDataSource: Send + Sync {
    async fn encounters(&self, request: &EncounterRequest)
    -> Result<Vec<Encounter>, DataSourceError>;

    /// Name of the source, for logging
    fn source_name(&self) -> &str {
        "encounter-data-source"
    }
}

/// Context for an encounter retrieve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncounterRequest {
    /// Patients whose encounters are wanted
    pub cohort: Cohort,
    /// Inclusive date bounds on the encounter timestamp
    pub date_range: DateRange,
}

impl EncounterRequest {
    pub fn new(cohort: Cohort) -> Self {
        Self {
            cohort,
            date_range: DateRange::unbounded(),
        }
    }

    pub fn with_date_range(mut self, date_range: DateRange) -> Self {
        self.date_range = date_range;
        self
    }

    /// Whether the encounter satisfies both the cohort and the date range
    pub fn matches(&self, encounter: &Encounter) -> bool {
        self.cohort.contains(encounter.patient_id)
            && self.date_range.contains(encounter.encounter_datetime)
    }
}

/// Data source error
#[derive(Debug, thiserror::Error)]
pub enum DataSourceError {
    #[error("Data source unavailable: {0}")]
    Unavailable(String),

    #[error("Retrieve failed: {0}")]
    RetrieveFailed(String),

    #[error("Invalid encounter data: {0}")]
    InvalidData(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<&DataSourceError> for ReportingError {
    fn from(err: &DataSourceError) -> Self {
        let code = match err {
            DataSourceError::Unavailable(_) => RPT0200,
            _ => RPT0201,
        };
        ReportingError::data_source(code, err.to_string())
    }
}

impl From<DataSourceError> for ReportingError {
    fn from(err: DataSourceError) -> Self {
        Self::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use reporting_types::{EncounterId, PatientId, start_of_day};

    #[test]
    fn test_request_matches_cohort_and_range() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let request = EncounterRequest::new(Cohort::of([7]))
            .with_date_range(DateRange::new(Some(day), None));

        let inside = Encounter::new(EncounterId(1), PatientId(7), start_of_day(day));
        let other_patient = Encounter::new(EncounterId(2), PatientId(8), start_of_day(day));
        let too_early = Encounter::new(
            EncounterId(3),
            PatientId(7),
            start_of_day(day.pred_opt().unwrap()),
        );

        assert!(request.matches(&inside));
        assert!(!request.matches(&other_patient));
        assert!(!request.matches(&too_early));
    }

    #[test]
    fn test_error_codes() {
        let err: ReportingError = DataSourceError::Unavailable("db down".into()).into();
        assert_eq!(err.code(), RPT0200);
        let err: ReportingError = DataSourceError::RetrieveFailed("bad query".into()).into();
        assert_eq!(err.code(), RPT0201);
    }
}
