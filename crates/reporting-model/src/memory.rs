//! In-memory encounter sources

use crate::provider::{DataSourceError, EncounterDataSource, EncounterRequest};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use parking_lot::RwLock;
use reporting_types::{Encounter, EncounterId, PatientId};
use std::io::Read;

/// Encounter store held in memory
///
/// Identifiers are assigned sequentially by [`save_encounter`](Self::save_encounter);
/// encounters inserted with an explicit identifier move the sequence past it.
#[derive(Debug, Default)]
pub struct InMemoryEncounterStore {
    encounters: RwLock<Vec<Encounter>>,
}

impl InMemoryEncounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_encounters(encounters: impl IntoIterator<Item = Encounter>) -> Self {
        let store = Self::new();
        for encounter in encounters {
            store.insert(encounter);
        }
        store
    }

    /// Load encounters from a JSON array
    pub fn from_json_str(json: &str) -> Result<Self, DataSourceError> {
        let encounters: Vec<Encounter> = serde_json::from_str(json)
            .map_err(|e| DataSourceError::InvalidData(e.to_string()))?;
        Ok(Self::with_encounters(encounters))
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, DataSourceError> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .map_err(|e| DataSourceError::InvalidData(e.to_string()))?;
        Self::from_json_str(&content)
    }

    /// Record a new encounter and return its assigned identifier
    pub fn save_encounter(
        &self,
        patient_id: PatientId,
        encounter_datetime: NaiveDateTime,
    ) -> EncounterId {
        let mut encounters = self.encounters.write();
        let next = encounters
            .iter()
            .map(|e| e.id.get())
            .max()
            .unwrap_or(0)
            + 1;
        let id = EncounterId(next);
        encounters.push(Encounter::new(id, patient_id, encounter_datetime));
        id
    }

    /// Insert an encounter, replacing any previous encounter with the same id
    pub fn insert(&self, encounter: Encounter) {
        let mut encounters = self.encounters.write();
        encounters.retain(|e| e.id != encounter.id);
        encounters.push(encounter);
    }

    pub fn len(&self) -> usize {
        self.encounters.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.encounters.read().is_empty()
    }
}

#[async_trait]
impl EncounterDataSource for InMemoryEncounterStore {
    async fn encounters(
        &self,
        request: &EncounterRequest,
    ) -> Result<Vec<Encounter>, DataSourceError> {
        let encounters = self.encounters.read();
        let matching: Vec<Encounter> = encounters
            .iter()
            .filter(|e| request.matches(e))
            .cloned()
            .collect();
        log::trace!(
            "in-memory store matched {} of {} encounters for {}",
            matching.len(),
            encounters.len(),
            request.date_range
        );
        Ok(matching)
    }

    fn source_name(&self) -> &str {
        "in-memory"
    }
}

/// Data source that never returns encounters
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpDataSource;

impl NoOpDataSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EncounterDataSource for NoOpDataSource {
    async fn encounters(
        &self,
        _request: &EncounterRequest,
    ) -> Result<Vec<Encounter>, DataSourceError> {
        Ok(vec![])
    }

    fn source_name(&self) -> &str {
        "no-op"
    }
}
