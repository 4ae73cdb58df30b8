//! Cohorts - named sets of patient identifiers

use crate::PatientId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A set of unique patient identifiers, optionally named
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cohort {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub member_ids: BTreeSet<PatientId>,
}

impl Cohort {
    /// Create an empty, unnamed cohort
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cohort from raw patient identifiers
    pub fn of(ids: impl IntoIterator<Item = i64>) -> Self {
        ids.into_iter().map(PatientId).collect()
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn contains(&self, patient_id: PatientId) -> bool {
        self.member_ids.contains(&patient_id)
    }

    pub fn add_member(&mut self, patient_id: PatientId) -> bool {
        self.member_ids.insert(patient_id)
    }

    pub fn size(&self) -> usize {
        self.member_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.member_ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = PatientId> + '_ {
        self.member_ids.iter().copied()
    }

    /// Patients in either cohort
    pub fn union(&self, other: &Cohort) -> Cohort {
        self.member_ids.union(&other.member_ids).copied().collect()
    }

    /// Patients in both cohorts
    pub fn intersect(&self, other: &Cohort) -> Cohort {
        self.member_ids.intersection(&other.member_ids).copied().collect()
    }
}

impl FromIterator<PatientId> for Cohort {
    fn from_iter<I: IntoIterator<Item = PatientId>>(iter: I) -> Self {
        Self {
            name: None,
            member_ids: iter.into_iter().collect(),
        }
    }
}
