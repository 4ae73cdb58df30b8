//! Report definitions

use super::{CohortDefinition, DataSetDefinition, DefinitionHeader, Mapped};
use indexmap::IndexMap;

/// A named collection of datasets evaluated over an optional base cohort
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDefinition {
    pub header: DefinitionHeader,
    pub base_cohort_definition: Option<Mapped<CohortDefinition>>,
    pub data_set_definitions: IndexMap<String, Mapped<DataSetDefinition>>,
}

impl ReportDefinition {
    pub const TYPE_TAG: &'static str = "ReportDefinition";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            header: DefinitionHeader::new(name),
            base_cohort_definition: None,
            data_set_definitions: IndexMap::new(),
        }
    }

    pub fn header(&self) -> &DefinitionHeader {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut DefinitionHeader {
        &mut self.header
    }

    pub fn type_tag(&self) -> &'static str {
        Self::TYPE_TAG
    }

    pub fn with_base_cohort_definition(mut self, cohort: Mapped<CohortDefinition>) -> Self {
        self.base_cohort_definition = Some(cohort);
        self
    }

    pub fn with_data_set_definition(
        mut self,
        key: impl Into<String>,
        data_set: Mapped<DataSetDefinition>,
    ) -> Self {
        self.data_set_definitions.insert(key.into(), data_set);
        self
    }
}
