//! Evaluation errors for the query engine

use crate::QueryKind;
use reporting_diagnostics::{RPT0100, RPT0101, RPT0102, ReportingError};
use reporting_model::DataSourceError;
use thiserror::Error;

/// Result type for evaluation operations
pub type EvalResult<T> = Result<T, EvalError>;

/// Errors that can occur during query evaluation
#[derive(Debug, Error)]
pub enum EvalError {
    /// Failure reported by the data source, passed through unchanged
    #[error(transparent)]
    DataSource(#[from] DataSourceError),

    /// No evaluator registered for the query kind
    #[error("No evaluator registered for {kind} queries")]
    NoEvaluator { kind: QueryKind },

    /// A context parameter did not have the declared type
    #[error("Invalid value for parameter '{name}': expected {expected}, found {found}")]
    InvalidParameter {
        name: String,
        expected: String,
        found: String,
    },

    /// Internal error (should not happen)
    #[error("Internal evaluation error: {message}")]
    Internal { message: String },
}

impl EvalError {
    pub fn no_evaluator(kind: QueryKind) -> Self {
        Self::NoEvaluator { kind }
    }

    pub fn invalid_parameter(
        name: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<EvalError> for ReportingError {
    fn from(err: EvalError) -> Self {
        match &err {
            EvalError::DataSource(source) => ReportingError::from(source),
            EvalError::NoEvaluator { .. } => ReportingError::evaluation(RPT0101, err.to_string()),
            EvalError::InvalidParameter { .. } => {
                ReportingError::evaluation(RPT0102, err.to_string())
            }
            EvalError::Internal { .. } => ReportingError::evaluation(RPT0100, err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reporting_diagnostics::RPT0200;

    #[test]
    fn test_data_source_error_passes_through() {
        let err = EvalError::from(DataSourceError::Unavailable("db down".into()));
        assert_eq!(err.to_string(), "Data source unavailable: db down");
        assert_eq!(ReportingError::from(err).code(), RPT0200);
    }

    #[test]
    fn test_invalid_parameter_message() {
        let err = EvalError::invalid_parameter("onOrAfter", "Date", "String");
        assert_eq!(
            err.to_string(),
            "Invalid value for parameter 'onOrAfter': expected Date, found String"
        );
        assert_eq!(ReportingError::from(err).code(), RPT0102);
    }
}
