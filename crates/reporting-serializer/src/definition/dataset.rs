//! Dataset definitions

use super::{DefinitionHeader, Dimension, Indicator, Mapped};
use crate::sql::query_parameters;
use indexmap::IndexMap;

/// Declarative description of a table of results
#[derive(Debug, Clone, PartialEq)]
pub enum DataSetDefinition {
    Sql(SqlDataSetDefinition),
    CohortIndicator(CohortIndicatorDataSetDefinition),
}

impl DataSetDefinition {
    pub fn header(&self) -> &DefinitionHeader {
        match self {
            Self::Sql(d) => &d.header,
            Self::CohortIndicator(d) => &d.header,
        }
    }

    pub fn header_mut(&mut self) -> &mut DefinitionHeader {
        match self {
            Self::Sql(d) => &mut d.header,
            Self::CohortIndicator(d) => &mut d.header,
        }
    }

    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::Sql(_) => SqlDataSetDefinition::TYPE_TAG,
            Self::CohortIndicator(_) => CohortIndicatorDataSetDefinition::TYPE_TAG,
        }
    }
}

/// Rows returned by a SQL query
#[derive(Debug, Clone, PartialEq)]
pub struct SqlDataSetDefinition {
    pub header: DefinitionHeader,
    pub sql_query: String,
}

impl SqlDataSetDefinition {
    pub const TYPE_TAG: &'static str = "SqlDataSetDefinition";

    /// Create a definition declaring one parameter per `:name` placeholder in the query
    pub fn new(name: impl Into<String>, sql_query: impl Into<String>) -> Self {
        let sql_query = sql_query.into();
        let mut header = DefinitionHeader::new(name);
        for parameter in query_parameters(&sql_query) {
            header.add_parameter(parameter);
        }
        Self { header, sql_query }
    }
}

/// One column of a cohort indicator dataset
#[derive(Debug, Clone, PartialEq)]
pub struct CohortIndicatorColumn {
    /// Column key, e.g. `1.a`
    pub name: String,
    pub label: String,
    pub indicator: Mapped<Indicator>,
    /// Dimension key to option key
    pub dimension_options: IndexMap<String, String>,
}

impl CohortIndicatorColumn {
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        indicator: Mapped<Indicator>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            indicator,
            dimension_options: IndexMap::new(),
        }
    }

    pub fn with_dimension_option(
        mut self,
        dimension: impl Into<String>,
        option: impl Into<String>,
    ) -> Self {
        self.dimension_options
            .insert(dimension.into(), option.into());
        self
    }
}

/// Indicators laid out as columns, optionally disaggregated by dimensions
#[derive(Debug, Clone, PartialEq)]
pub struct CohortIndicatorDataSetDefinition {
    pub header: DefinitionHeader,
    pub dimensions: IndexMap<String, Mapped<Dimension>>,
    pub columns: Vec<CohortIndicatorColumn>,
}

impl CohortIndicatorDataSetDefinition {
    pub const TYPE_TAG: &'static str = "CohortIndicatorDataSetDefinition";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            header: DefinitionHeader::new(name),
            dimensions: IndexMap::new(),
            columns: Vec::new(),
        }
    }

    pub fn with_dimension(mut self, key: impl Into<String>, dimension: Mapped<Dimension>) -> Self {
        self.dimensions.insert(key.into(), dimension);
        self
    }

    pub fn with_column(mut self, column: CohortIndicatorColumn) -> Self {
        self.columns.push(column);
        self
    }

    pub fn column(&self, name: &str) -> Option<&CohortIndicatorColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// First dimension option a column uses that this dataset does not declare
    pub fn undeclared_dimension(&self) -> Option<(&str, &str)> {
        self.columns.iter().find_map(|column| {
            column
                .dimension_options
                .keys()
                .find(|key| !self.dimensions.contains_key(key.as_str()))
                .map(|key| (column.name.as_str(), key.as_str()))
        })
    }
}

impl From<SqlDataSetDefinition> for DataSetDefinition {
    fn from(d: SqlDataSetDefinition) -> Self {
        Self::Sql(d)
    }
}

impl From<CohortIndicatorDataSetDefinition> for DataSetDefinition {
    fn from(d: CohortIndicatorDataSetDefinition) -> Self {
        Self::CohortIndicator(d)
    }
}
