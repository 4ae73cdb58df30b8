//! Definition object graph
//!
//! Definitions are declarative, serializable descriptions grouped into
//! families: cohort definitions, indicators, dimensions, dataset definitions
//! and report definitions. A definition refers to another through a
//! [`Mapped`] reference that shares the target behind an `Arc`, so the same
//! sub-definition can appear in several places of one graph.

mod cohort;
mod dataset;
mod dimension;
mod header;
mod indicator;
mod report;

pub use cohort::{
    AllPatientsCohortDefinition, CohortDefinition, CompositionCohortDefinition,
    SqlCohortDefinition, StaticCohortDefinition,
};
pub use dataset::{
    CohortIndicatorColumn, CohortIndicatorDataSetDefinition, DataSetDefinition,
    SqlDataSetDefinition,
};
pub use dimension::{CohortDefinitionDimension, Dimension};
pub use header::DefinitionHeader;
pub use indicator::{CohortIndicator, Indicator, IndicatorType};
pub use report::ReportDefinition;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// The family a definition belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefinitionKind {
    Cohort,
    Indicator,
    Dimension,
    DataSet,
    Report,
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Cohort => "cohort definition",
            Self::Indicator => "indicator",
            Self::Dimension => "dimension",
            Self::DataSet => "dataset definition",
            Self::Report => "report definition",
        };
        f.write_str(name)
    }
}

/// Common behaviour of every definition family
pub trait DefinitionFamily: fmt::Debug + Clone + PartialEq + Send + Sync + 'static {
    const KIND: DefinitionKind;

    fn header(&self) -> &DefinitionHeader;

    fn header_mut(&mut self) -> &mut DefinitionHeader;

    /// Wire type tag of this definition's concrete variant
    fn type_tag(&self) -> &'static str;

    fn wrap(definition: Arc<Self>) -> Definition;

    /// Take the family member out of a definition, `None` on a family mismatch
    fn unwrap(definition: Definition) -> Option<Arc<Self>>;
}

/// A definition of any family
#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    Cohort(Arc<CohortDefinition>),
    Indicator(Arc<Indicator>),
    Dimension(Arc<Dimension>),
    DataSet(Arc<DataSetDefinition>),
    Report(Arc<ReportDefinition>),
}

impl Definition {
    pub fn kind(&self) -> DefinitionKind {
        match self {
            Self::Cohort(_) => DefinitionKind::Cohort,
            Self::Indicator(_) => DefinitionKind::Indicator,
            Self::Dimension(_) => DefinitionKind::Dimension,
            Self::DataSet(_) => DefinitionKind::DataSet,
            Self::Report(_) => DefinitionKind::Report,
        }
    }

    pub fn header(&self) -> &DefinitionHeader {
        match self {
            Self::Cohort(d) => d.header(),
            Self::Indicator(d) => d.header(),
            Self::Dimension(d) => d.header(),
            Self::DataSet(d) => d.header(),
            Self::Report(d) => d.header(),
        }
    }

    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::Cohort(d) => d.type_tag(),
            Self::Indicator(d) => d.type_tag(),
            Self::Dimension(d) => d.type_tag(),
            Self::DataSet(d) => d.type_tag(),
            Self::Report(d) => d.type_tag(),
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.header().uuid
    }

    pub fn name(&self) -> &str {
        &self.header().name
    }

    /// Whether both values point at the same allocation
    pub fn ptr_eq(&self, other: &Definition) -> bool {
        match (self, other) {
            (Self::Cohort(a), Self::Cohort(b)) => Arc::ptr_eq(a, b),
            (Self::Indicator(a), Self::Indicator(b)) => Arc::ptr_eq(a, b),
            (Self::Dimension(a), Self::Dimension(b)) => Arc::ptr_eq(a, b),
            (Self::DataSet(a), Self::DataSet(b)) => Arc::ptr_eq(a, b),
            (Self::Report(a), Self::Report(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<T: DefinitionFamily> From<Arc<T>> for Definition {
    fn from(definition: Arc<T>) -> Self {
        T::wrap(definition)
    }
}

impl From<&Definition> for Definition {
    fn from(definition: &Definition) -> Self {
        definition.clone()
    }
}

/// A reference to a sub-definition plus the mapping of its parameters
///
/// Mapping values are expressions over the parent's parameters, such as
/// `${startDate}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Mapped<T> {
    pub definition: Arc<T>,
    pub parameter_mappings: IndexMap<String, String>,
}

impl<T> Mapped<T> {
    pub fn new(definition: Arc<T>) -> Self {
        Self {
            definition,
            parameter_mappings: IndexMap::new(),
        }
    }

    /// Map one of the target's parameters to an expression over the parent's
    pub fn with_mapping(
        mut self,
        parameter: impl Into<String>,
        expression: impl Into<String>,
    ) -> Self {
        self.parameter_mappings
            .insert(parameter.into(), expression.into());
        self
    }

    /// Map each named parameter straight through to the parent's parameter of the same name
    pub fn straight_through<'a>(mut self, parameters: impl IntoIterator<Item = &'a str>) -> Self {
        for name in parameters {
            self.parameter_mappings
                .insert(name.to_string(), format!("${{{}}}", name));
        }
        self
    }
}

macro_rules! definition_family {
    ($family:ty, $kind:ident) => {
        impl DefinitionFamily for $family {
            const KIND: DefinitionKind = DefinitionKind::$kind;

            fn header(&self) -> &DefinitionHeader {
                self.header()
            }

            fn header_mut(&mut self) -> &mut DefinitionHeader {
                self.header_mut()
            }

            fn type_tag(&self) -> &'static str {
                self.type_tag()
            }

            fn wrap(definition: Arc<Self>) -> Definition {
                Definition::$kind(definition)
            }

            fn unwrap(definition: Definition) -> Option<Arc<Self>> {
                match definition {
                    Definition::$kind(d) => Some(d),
                    _ => None,
                }
            }
        }
    };
}

definition_family!(CohortDefinition, Cohort);
definition_family!(Indicator, Indicator);
definition_family!(Dimension, Dimension);
definition_family!(DataSetDefinition, DataSet);
definition_family!(ReportDefinition, Report);
