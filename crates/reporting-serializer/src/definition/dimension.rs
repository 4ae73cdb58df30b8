//! Dimensions

use super::{CohortDefinition, DefinitionHeader, Mapped};
use indexmap::IndexMap;

/// A way of disaggregating an indicator, e.g. by gender or age group
#[derive(Debug, Clone, PartialEq)]
pub enum Dimension {
    Cohort(CohortDefinitionDimension),
}

impl Dimension {
    pub fn header(&self) -> &DefinitionHeader {
        match self {
            Self::Cohort(d) => &d.header,
        }
    }

    pub fn header_mut(&mut self) -> &mut DefinitionHeader {
        match self {
            Self::Cohort(d) => &mut d.header,
        }
    }

    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::Cohort(_) => CohortDefinitionDimension::TYPE_TAG,
        }
    }

    /// Option keys in declaration order
    pub fn option_keys(&self) -> impl Iterator<Item = &str> {
        match self {
            Self::Cohort(d) => d.options.keys().map(String::as_str),
        }
    }
}

/// Dimension whose options are cohort definitions
#[derive(Debug, Clone, PartialEq)]
pub struct CohortDefinitionDimension {
    pub header: DefinitionHeader,
    pub options: IndexMap<String, Mapped<CohortDefinition>>,
}

impl CohortDefinitionDimension {
    pub const TYPE_TAG: &'static str = "CohortDefinitionDimension";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            header: DefinitionHeader::new(name),
            options: IndexMap::new(),
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, cohort: Mapped<CohortDefinition>) -> Self {
        self.options.insert(key.into(), cohort);
        self
    }
}

impl From<CohortDefinitionDimension> for Dimension {
    fn from(d: CohortDefinitionDimension) -> Self {
        Self::Cohort(d)
    }
}
