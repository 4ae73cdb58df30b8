//! Declared parameters and runtime parameter values

use crate::Cohort;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The declared type of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterType {
    Boolean,
    Integer,
    String,
    Date,
    DateTime,
    Cohort,
}

impl ParameterType {
    /// Infer a type from a parameter name by convention
    ///
    /// `...Date` names are dates, `...Id` names integers, everything else strings.
    pub fn infer_from_name(name: &str) -> Self {
        if name.ends_with("Date") || name == "date" {
            Self::Date
        } else if name.ends_with("Id") || name == "id" {
            Self::Integer
        } else {
            Self::String
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Boolean => "Boolean",
            Self::Integer => "Integer",
            Self::String => "String",
            Self::Date => "Date",
            Self::DateTime => "DateTime",
            Self::Cohort => "Cohort",
        };
        f.write_str(name)
    }
}

/// A parameter declared by a query or definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub parameter_type: ParameterType,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub collection: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<ParameterValue>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, parameter_type: ParameterType) -> Self {
        Self {
            name: name.into(),
            label: None,
            parameter_type,
            collection: false,
            default_value: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_default(mut self, value: ParameterValue) -> Self {
        self.default_value = Some(value);
        self
    }
}

/// A runtime parameter value supplied through an evaluation context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum ParameterValue {
    Null,
    Boolean(bool),
    Integer(i64),
    String(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Cohort(Cohort),
}

impl ParameterValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The declared type this value satisfies, `None` for null
    pub fn parameter_type(&self) -> Option<ParameterType> {
        match self {
            Self::Null => None,
            Self::Boolean(_) => Some(ParameterType::Boolean),
            Self::Integer(_) => Some(ParameterType::Integer),
            Self::String(_) => Some(ParameterType::String),
            Self::Date(_) => Some(ParameterType::Date),
            Self::DateTime(_) => Some(ParameterType::DateTime),
            Self::Cohort(_) => Some(ParameterType::Cohort),
        }
    }

    /// Try to get as a calendar date; date-times are truncated to their day
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            Self::DateTime(dt) => Some(dt.date()),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_cohort(&self) -> Option<&Cohort> {
        match self {
            Self::Cohort(c) => Some(c),
            _ => None,
        }
    }

    /// Short name of the value's kind, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Boolean(_) => "Boolean",
            Self::Integer(_) => "Integer",
            Self::String(_) => "String",
            Self::Date(_) => "Date",
            Self::DateTime(_) => "DateTime",
            Self::Cohort(_) => "Cohort",
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Integer(i) => write!(f, "{}", i),
            Self::String(s) => write!(f, "'{}'", s),
            Self::Date(d) => write!(f, "@{}", d),
            Self::DateTime(dt) => write!(f, "@{}", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
            Self::Cohort(c) => write!(f, "Cohort({} patients)", c.size()),
        }
    }
}

impl From<NaiveDate> for ParameterValue {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<i64> for ParameterValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<&str> for ParameterValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<Cohort> for ParameterValue {
    fn from(c: Cohort) -> Self {
        Self::Cohort(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("startDate", ParameterType::Date)]
    #[case("patientId", ParameterType::Integer)]
    #[case("locationName", ParameterType::String)]
    fn test_infer_from_name(#[case] name: &str, #[case] expected: ParameterType) {
        assert_eq!(ParameterType::infer_from_name(name), expected);
    }

    #[test]
    fn test_datetime_truncates_to_date() {
        let dt = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_opt(13, 30, 0)
            .unwrap();
        let value = ParameterValue::DateTime(dt);
        assert_eq!(value.as_date(), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(value.parameter_type(), Some(ParameterType::DateTime));
    }

    #[test]
    fn test_tagged_json() {
        let value = ParameterValue::from(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json, serde_json::json!({"type": "Date", "value": "2024-01-01"}));
    }

    #[test]
    fn test_parameter_builder() {
        let p = Parameter::new("startDate", ParameterType::Date)
            .with_label("Start Date")
            .with_default(ParameterValue::Null);
        assert_eq!(p.label.as_deref(), Some("Start Date"));
        assert!(p.default_value.as_ref().is_some_and(ParameterValue::is_null));
    }
}
