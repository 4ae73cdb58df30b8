//! Reporting definition serialization
//!
//! This crate provides:
//! - The definition object graph (cohort definitions, indicators, dimensions,
//!   dataset definitions, report definitions)
//! - Per-family converters registered by wire type tag
//! - JSON and XML wire formats over one node tree
//! - Shared-reference resolution scoped to a single deserialize call
//! - An in-memory [`DefinitionStore`]
//!
//! # Example
//!
//! ```
//! use reporting_serializer::{CohortDefinition, ReportingSerializer, SqlCohortDefinition};
//! use std::sync::Arc;
//!
//! let definition = Arc::new(CohortDefinition::from(SqlCohortDefinition::new(
//!     "Patient by id",
//!     "select patient_id from patient where patient_id = :patientId",
//! )));
//!
//! let serializer = ReportingSerializer::new();
//! let text = serializer.serialize(definition.clone()).unwrap();
//! let decoded = serializer.deserialize::<CohortDefinition>(&text).unwrap();
//! assert_eq!(decoded, definition);
//! ```

pub mod converter;
pub mod definition;
pub mod error;
pub mod format;
pub mod lookup;
pub mod node;
pub mod scope;
pub mod serializer;
pub mod sql;
pub mod store;
mod xml;

pub use converter::{ConverterRegistry, DefinitionConverter, ReadContext, WriteContext};
pub use definition::{
    AllPatientsCohortDefinition, CohortDefinition, CohortDefinitionDimension, CohortIndicator,
    CohortIndicatorColumn, CohortIndicatorDataSetDefinition, CompositionCohortDefinition,
    DataSetDefinition, Definition, DefinitionFamily, DefinitionHeader, DefinitionKind, Dimension,
    Indicator, IndicatorType, Mapped, ReportDefinition, SqlCohortDefinition, SqlDataSetDefinition,
    StaticCohortDefinition,
};
pub use error::{SerializationError, SerializationResult};
pub use format::WireFormat;
pub use lookup::{DefinitionLookup, NoLookup};
pub use node::NodeReader;
pub use scope::ResolutionScope;
pub use serializer::{ReportingSerializer, SerializerConfig};
pub use store::{DefinitionStore, StoredDefinitionInfo};
