//! Cohort definitions

use super::{DefinitionHeader, Mapped};
use crate::sql::query_parameters;
use indexmap::IndexMap;
use reporting_types::{Cohort, PatientId};
use std::sync::Arc;

/// Declarative description of a set of patients
#[derive(Debug, Clone, PartialEq)]
pub enum CohortDefinition {
    Sql(SqlCohortDefinition),
    AllPatients(AllPatientsCohortDefinition),
    Static(StaticCohortDefinition),
    Composition(CompositionCohortDefinition),
}

impl CohortDefinition {
    pub fn header(&self) -> &DefinitionHeader {
        match self {
            Self::Sql(d) => &d.header,
            Self::AllPatients(d) => &d.header,
            Self::Static(d) => &d.header,
            Self::Composition(d) => &d.header,
        }
    }

    pub fn header_mut(&mut self) -> &mut DefinitionHeader {
        match self {
            Self::Sql(d) => &mut d.header,
            Self::AllPatients(d) => &mut d.header,
            Self::Static(d) => &mut d.header,
            Self::Composition(d) => &mut d.header,
        }
    }

    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::Sql(_) => SqlCohortDefinition::TYPE_TAG,
            Self::AllPatients(_) => AllPatientsCohortDefinition::TYPE_TAG,
            Self::Static(_) => StaticCohortDefinition::TYPE_TAG,
            Self::Composition(_) => CompositionCohortDefinition::TYPE_TAG,
        }
    }
}

/// Patients returned by a SQL query
#[derive(Debug, Clone, PartialEq)]
pub struct SqlCohortDefinition {
    pub header: DefinitionHeader,
    pub query: String,
}

impl SqlCohortDefinition {
    pub const TYPE_TAG: &'static str = "SqlCohortDefinition";

    /// Create a definition declaring one parameter per `:name` placeholder in the query
    pub fn new(name: impl Into<String>, query: impl Into<String>) -> Self {
        let query = query.into();
        let mut header = DefinitionHeader::new(name);
        for parameter in query_parameters(&query) {
            header.add_parameter(parameter);
        }
        Self { header, query }
    }
}

/// Every patient known to the system
#[derive(Debug, Clone, PartialEq)]
pub struct AllPatientsCohortDefinition {
    pub header: DefinitionHeader,
}

impl AllPatientsCohortDefinition {
    pub const TYPE_TAG: &'static str = "AllPatientsCohortDefinition";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            header: DefinitionHeader::new(name),
        }
    }
}

/// A fixed list of patients
#[derive(Debug, Clone, PartialEq)]
pub struct StaticCohortDefinition {
    pub header: DefinitionHeader,
    pub cohort: Cohort,
}

impl StaticCohortDefinition {
    pub const TYPE_TAG: &'static str = "StaticCohortDefinition";

    pub fn new(name: impl Into<String>, cohort: Cohort) -> Self {
        Self {
            header: DefinitionHeader::new(name),
            cohort,
        }
    }

    pub fn contains(&self, patient_id: PatientId) -> bool {
        self.cohort.contains(patient_id)
    }
}

/// Boolean combination of named cohort searches, e.g. `1 AND NOT 2`
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionCohortDefinition {
    pub header: DefinitionHeader,
    pub searches: IndexMap<String, Mapped<CohortDefinition>>,
    pub composition: String,
}

impl CompositionCohortDefinition {
    pub const TYPE_TAG: &'static str = "CompositionCohortDefinition";

    pub fn new(name: impl Into<String>, composition: impl Into<String>) -> Self {
        Self {
            header: DefinitionHeader::new(name),
            searches: IndexMap::new(),
            composition: composition.into(),
        }
    }

    pub fn with_search(mut self, key: impl Into<String>, search: Mapped<CohortDefinition>) -> Self {
        self.searches.insert(key.into(), search);
        self
    }

    pub fn search(&self, key: &str) -> Option<&Arc<CohortDefinition>> {
        self.searches.get(key).map(|m| &m.definition)
    }
}

impl From<SqlCohortDefinition> for CohortDefinition {
    fn from(d: SqlCohortDefinition) -> Self {
        Self::Sql(d)
    }
}

impl From<AllPatientsCohortDefinition> for CohortDefinition {
    fn from(d: AllPatientsCohortDefinition) -> Self {
        Self::AllPatients(d)
    }
}

impl From<StaticCohortDefinition> for CohortDefinition {
    fn from(d: StaticCohortDefinition) -> Self {
        Self::Static(d)
    }
}

impl From<CompositionCohortDefinition> for CohortDefinition {
    fn from(d: CompositionCohortDefinition) -> Self {
        Self::Composition(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reporting_types::ParameterType;

    #[test]
    fn test_sql_cohort_declares_placeholders() {
        let definition = SqlCohortDefinition::new(
            "Patient by id",
            "select patient_id from patient where patient_id = :patientId",
        );

        assert_eq!(definition.header.parameters.len(), 1);
        let parameter = &definition.header.parameters[0];
        assert_eq!(parameter.name, "patientId");
        assert_eq!(parameter.parameter_type, ParameterType::Integer);
    }

    #[test]
    fn test_composition_search_lookup() {
        let males = Arc::new(CohortDefinition::from(SqlCohortDefinition::new(
            "Males",
            "select patient_id from person where gender = 'M'",
        )));
        let composition = CompositionCohortDefinition::new("Not male", "NOT 1")
            .with_search("1", Mapped::new(males.clone()));

        assert!(Arc::ptr_eq(composition.search("1").unwrap(), &males));
        assert!(composition.search("2").is_none());
    }
}
