//! Reporting error types

use crate::ErrorCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Error - the operation cannot proceed
    Error,
    /// Warning - potential issue but can continue
    Warning,
    /// Information - informational message
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A diagnostic message with an optional pointer into the offending input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: ErrorCode,
    pub message: String,
    /// Path of the offending fragment (e.g. `$.columns[0].indicator`)
    pub fragment: Option<String>,
    /// Additional context or help
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            fragment: None,
            help: None,
        }
    }

    /// Create a new warning diagnostic
    pub fn warning(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            fragment: None,
            help: None,
        }
    }

    pub fn with_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragment = Some(fragment.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Render the diagnostic with terminal colors
    #[cfg(feature = "colored")]
    pub fn render_colored(&self) -> String {
        use colored::Colorize;

        let head = match self.severity {
            Severity::Error => format!("{}[{}]", self.severity, self.code).red().bold(),
            Severity::Warning => format!("{}[{}]", self.severity, self.code).yellow().bold(),
            Severity::Info => format!("{}[{}]", self.severity, self.code).blue().bold(),
        };
        let mut out = format!("{}: {}", head, self.message);
        if let Some(fragment) = &self.fragment {
            out.push_str(&format!("\n  {} {}", "-->".blue(), fragment));
        }
        if let Some(help) = self.help.as_deref().or(self.code.info().help) {
            out.push_str(&format!("\n  {} {}", "help:".cyan(), help));
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} - {}", self.severity, self.code, self.message)?;
        if let Some(fragment) = &self.fragment {
            write!(f, " at {}", fragment)?;
        }
        Ok(())
    }
}

/// Main reporting error type
///
/// Crate-level errors (evaluation, data source, serialization) convert into
/// this type at the facade so callers can handle one error shape.
#[derive(Debug, Clone, Error)]
pub enum ReportingError {
    /// Serialization error
    #[error("{code}: {message}")]
    Serialization {
        code: ErrorCode,
        message: String,
        fragment: Option<String>,
    },

    /// Evaluation error
    #[error("{code}: {message}")]
    Evaluation {
        code: ErrorCode,
        message: String,
        context: Option<String>,
    },

    /// Data source error
    #[error("{code}: {message}")]
    DataSource { code: ErrorCode, message: String },

    /// System error
    #[error("{code}: {message}")]
    System {
        code: ErrorCode,
        message: String,
        context: Option<String>,
    },
}

impl ReportingError {
    pub fn serialization(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Serialization {
            code,
            message: message.into(),
            fragment: None,
        }
    }

    pub fn serialization_at(
        code: ErrorCode,
        message: impl Into<String>,
        fragment: impl Into<String>,
    ) -> Self {
        Self::Serialization {
            code,
            message: message.into(),
            fragment: Some(fragment.into()),
        }
    }

    pub fn evaluation(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Evaluation {
            code,
            message: message.into(),
            context: None,
        }
    }

    pub fn data_source(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::DataSource {
            code,
            message: message.into(),
        }
    }

    pub fn system(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::System {
            code,
            message: message.into(),
            context: None,
        }
    }

    /// Attach context to evaluation and system errors
    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        match &mut self {
            Self::Evaluation { context, .. } | Self::System { context, .. } => {
                *context = Some(ctx.into());
            }
            _ => {}
        }
        self
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Serialization { code, .. }
            | Self::Evaluation { code, .. }
            | Self::DataSource { code, .. }
            | Self::System { code, .. } => *code,
        }
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::Serialization {
                code,
                message,
                fragment,
            } => {
                let diag = Diagnostic::error(*code, message.clone());
                match fragment {
                    Some(fragment) => diag.with_fragment(fragment.clone()),
                    None => diag,
                }
            }
            Self::Evaluation {
                code,
                message,
                context,
            }
            | Self::System {
                code,
                message,
                context,
            } => {
                let diag = Diagnostic::error(*code, message.clone());
                match context {
                    Some(ctx) => diag.with_help(ctx.clone()),
                    None => diag,
                }
            }
            Self::DataSource { code, message } => Diagnostic::error(*code, message.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RPT0002, RPT0100};

    #[test]
    fn test_serialization_error_keeps_fragment() {
        let err = ReportingError::serialization_at(RPT0002, "unknown type 'Foo'", "$.type");

        assert_eq!(err.code(), RPT0002);
        let diag = err.to_diagnostic();
        assert_eq!(diag.fragment.as_deref(), Some("$.type"));
        assert!(diag.to_string().contains("RPT0002"));
        assert!(diag.to_string().contains("at $.type"));
    }

    #[test]
    fn test_context_becomes_help() {
        let err = ReportingError::evaluation(RPT0100, "boom").with_context("while evaluating");
        let diag = err.to_diagnostic();

        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.help.as_deref(), Some("while evaluating"));
    }

    #[test]
    fn test_context_ignored_for_data_source() {
        let err = ReportingError::data_source(crate::RPT0200, "down").with_context("ignored");
        assert!(err.to_diagnostic().help.is_none());
    }
}
