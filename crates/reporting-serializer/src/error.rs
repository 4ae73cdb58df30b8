//! Serialization errors

use crate::definition::DefinitionKind;
use crate::format::WireFormat;
use reporting_diagnostics::{
    RPT0001, RPT0002, RPT0003, RPT0004, RPT0005, RPT0006, RPT0007, RPT0008, RPT0009,
    RPT0300, ReportingError,
};
use thiserror::Error;
use uuid::Uuid;

/// Result type for serializer operations
pub type SerializationResult<T> = Result<T, SerializationError>;

/// Errors raised while writing or reading definitions
///
/// Every read error names the fragment it was raised at as a path from the
/// document root, e.g. `$.columns[0].indicator`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SerializationError {
    #[error("Malformed {format} input: {message}")]
    Malformed { format: WireFormat, message: String },

    #[error("Unknown definition type '{tag}' at {path}")]
    UnknownType { tag: String, path: String },

    #[error("Missing field '{field}' at {path}")]
    MissingField { field: String, path: String },

    #[error("Invalid value at {path}: {message}")]
    InvalidField { path: String, message: String },

    #[error("Unresolved reference to {uuid} at {path}")]
    UnresolvedReference { uuid: Uuid, path: String },

    #[error("Circular reference to {uuid} at {path}")]
    CircularReference { uuid: Uuid, path: String },

    #[error("Expected a {expected} at {path}, found a {found}")]
    UnexpectedFamily {
        expected: DefinitionKind,
        found: DefinitionKind,
        path: String,
    },

    #[error("Two different definitions share UUID {uuid} at {path}")]
    DuplicateUuid { uuid: Uuid, path: String },

    #[error("Definition {uuid} not found")]
    NotFound { uuid: Uuid },

    #[error("Failed to write {format} output: {message}")]
    Write { format: WireFormat, message: String },
}

impl SerializationError {
    pub fn malformed(format: WireFormat, message: impl Into<String>) -> Self {
        Self::Malformed {
            format,
            message: message.into(),
        }
    }

    pub fn unknown_type(tag: impl Into<String>, path: impl Into<String>) -> Self {
        Self::UnknownType {
            tag: tag.into(),
            path: path.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>, path: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
            path: path.into(),
        }
    }

    pub fn invalid_field(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn unresolved(uuid: Uuid, path: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            uuid,
            path: path.into(),
        }
    }

    pub fn circular(uuid: Uuid, path: impl Into<String>) -> Self {
        Self::CircularReference {
            uuid,
            path: path.into(),
        }
    }

    pub fn duplicate_uuid(uuid: Uuid, path: impl Into<String>) -> Self {
        Self::DuplicateUuid {
            uuid,
            path: path.into(),
        }
    }

    pub fn unexpected_family(
        expected: DefinitionKind,
        found: DefinitionKind,
        path: impl Into<String>,
    ) -> Self {
        Self::UnexpectedFamily {
            expected,
            found,
            path: path.into(),
        }
    }

    pub fn write(format: WireFormat, message: impl Into<String>) -> Self {
        Self::Write {
            format,
            message: message.into(),
        }
    }

    /// The document fragment the error was raised at, if any
    pub fn fragment(&self) -> Option<&str> {
        match self {
            Self::UnknownType { path, .. }
            | Self::MissingField { path, .. }
            | Self::InvalidField { path, .. }
            | Self::UnresolvedReference { path, .. }
            | Self::CircularReference { path, .. }
            | Self::UnexpectedFamily { path, .. }
            | Self::DuplicateUuid { path, .. } => Some(path),
            Self::Malformed { .. } | Self::NotFound { .. } | Self::Write { .. } => None,
        }
    }
}

impl From<&SerializationError> for ReportingError {
    fn from(err: &SerializationError) -> Self {
        let code = match err {
            SerializationError::Malformed { .. } => RPT0001,
            SerializationError::UnknownType { .. } => RPT0002,
            SerializationError::MissingField { .. } => RPT0003,
            SerializationError::InvalidField { .. } => RPT0004,
            SerializationError::UnresolvedReference { .. } => RPT0005,
            SerializationError::CircularReference { .. } => RPT0006,
            SerializationError::UnexpectedFamily { .. } => RPT0007,
            SerializationError::NotFound { .. } => RPT0008,
            SerializationError::DuplicateUuid { .. } => RPT0009,
            SerializationError::Write { .. } => {
                return ReportingError::system(RPT0300, err.to_string());
            }
        };
        match err.fragment() {
            Some(fragment) => ReportingError::serialization_at(code, err.to_string(), fragment),
            None => ReportingError::serialization(code, err.to_string()),
        }
    }
}

impl From<SerializationError> for ReportingError {
    fn from(err: SerializationError) -> Self {
        Self::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_and_code() {
        let err = SerializationError::missing_field("query", "$.searches.a.definition");
        assert_eq!(err.fragment(), Some("$.searches.a.definition"));

        let reporting: ReportingError = err.into();
        assert_eq!(reporting.code(), RPT0003);
    }

    #[test]
    fn test_malformed_has_no_fragment() {
        let err = SerializationError::malformed(WireFormat::Json, "EOF while parsing");
        assert_eq!(err.fragment(), None);
        assert_eq!(ReportingError::from(&err).code(), RPT0001);
        assert!(err.to_string().contains("JSON"));
    }

    #[test]
    fn test_duplicate_uuid_code() {
        let err = SerializationError::duplicate_uuid(Uuid::nil(), "$.searches.2.definition");
        assert_eq!(err.fragment(), Some("$.searches.2.definition"));
        assert_eq!(ReportingError::from(&err).code(), RPT0009);
    }
}
