//! Indicators

use super::{CohortDefinition, DefinitionHeader, Mapped};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single figure computed for a report
#[derive(Debug, Clone, PartialEq)]
pub enum Indicator {
    Cohort(CohortIndicator),
}

impl Indicator {
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
            Self::Cohort(_) => CohortIndicator::TYPE_TAG,
        }
    }
}

/// How a cohort indicator turns its cohort into a figure
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndicatorType {
    /// Number of patients in the cohort
    #[default]
    Count,
    /// Share of the denominator cohort that is in the cohort
    Fraction,
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count => f.write_str("COUNT"),
            Self::Fraction => f.write_str("FRACTION"),
        }
    }
}

impl FromStr for IndicatorType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "COUNT" => Ok(Self::Count),
            "FRACTION" => Ok(Self::Fraction),
            other => Err(format!("unknown indicator type '{}'", other)),
        }
    }
}

/// Indicator computed from a cohort definition
#[derive(Debug, Clone, PartialEq)]
pub struct CohortIndicator {
    pub header: DefinitionHeader,
    pub indicator_type: IndicatorType,
    pub cohort_definition: Mapped<CohortDefinition>,
    /// Required for fraction indicators
    pub denominator: Option<Mapped<CohortDefinition>>,
}

impl CohortIndicator {
    pub const TYPE_TAG: &'static str = "CohortIndicator";

    /// Create a count indicator
    pub fn count(name: impl Into<String>, cohort_definition: Mapped<CohortDefinition>) -> Self {
        Self {
            header: DefinitionHeader::new(name),
            indicator_type: IndicatorType::Count,
            cohort_definition,
            denominator: None,
        }
    }

    /// Create a fraction indicator
    pub fn fraction(
        name: impl Into<String>,
        numerator: Mapped<CohortDefinition>,
        denominator: Mapped<CohortDefinition>,
    ) -> Self {
        Self {
            header: DefinitionHeader::new(name),
            indicator_type: IndicatorType::Fraction,
            cohort_definition: numerator,
            denominator: Some(denominator),
        }
    }
}

impl From<CohortIndicator> for Indicator {
    fn from(d: CohortIndicator) -> Self {
        Self::Cohort(d)
    }
}
