//! Per-family definition converters
//!
//! A converter reads and writes the fields specific to one definition family;
//! the common header and the handling of shared and persisted references live
//! in [`WriteContext`] and [`ReadContext`]. Converters are looked up through a
//! [`ConverterRegistry`] by wire type tag when reading and by family when
//! writing.

mod cohort;
mod context;
mod dataset;
mod dimension;
mod indicator;
mod report;

pub use cohort::CohortDefinitionConverter;
pub use context::{ReadContext, WriteContext};
pub use dataset::DataSetDefinitionConverter;
pub use dimension::DimensionConverter;
pub use indicator::IndicatorConverter;
pub use report::ReportDefinitionConverter;

use crate::definition::{Definition, DefinitionHeader, DefinitionKind};
use crate::error::{SerializationError, SerializationResult};
use crate::node::NodeReader;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Reads and writes the family-specific fields of definitions
pub trait DefinitionConverter: Send + Sync {
    /// The family this converter handles
    fn kind(&self) -> DefinitionKind;

    /// Wire type tags of the family's concrete variants
    fn type_tags(&self) -> &'static [&'static str];

    /// Write the family-specific fields of `definition` into `node`
    fn write(
        &self,
        definition: &Definition,
        node: &mut Map<String, Value>,
        ctx: &mut WriteContext<'_>,
        path: &str,
    ) -> SerializationResult<()>;

    /// Build a definition of variant `tag` from its header and node
    fn read(
        &self,
        tag: &str,
        header: DefinitionHeader,
        node: &NodeReader<'_>,
        ctx: &mut ReadContext<'_>,
    ) -> SerializationResult<Definition>;
}

/// Error for a converter handed a definition of another family
pub(crate) fn wrong_family(
    expected: DefinitionKind,
    definition: &Definition,
    path: &str,
) -> SerializationError {
    SerializationError::unexpected_family(expected, definition.kind(), path)
}

/// Registry of converters keyed by wire type tag and by family
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    by_tag: HashMap<&'static str, Arc<dyn DefinitionConverter>>,
    by_kind: HashMap<DefinitionKind, Arc<dyn DefinitionConverter>>,
}

impl ConverterRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with converters for every built-in family
    pub fn with_standard_converters() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(CohortDefinitionConverter));
        registry.register(Arc::new(IndicatorConverter));
        registry.register(Arc::new(DimensionConverter));
        registry.register(Arc::new(DataSetDefinitionConverter));
        registry.register(Arc::new(ReportDefinitionConverter));
        registry
    }

    /// Register a converter for its family and each of its type tags
    pub fn register(&mut self, converter: Arc<dyn DefinitionConverter>) {
        for &tag in converter.type_tags() {
            if self.by_tag.insert(tag, converter.clone()).is_some() {
                log::debug!("replaced converter for type tag {}", tag);
            }
        }
        self.by_kind.insert(converter.kind(), converter);
    }

    pub fn for_tag(&self, tag: &str) -> Option<&Arc<dyn DefinitionConverter>> {
        self.by_tag.get(tag)
    }

    pub fn for_kind(&self, kind: DefinitionKind) -> Option<&Arc<dyn DefinitionConverter>> {
        self.by_kind.get(&kind)
    }

    /// Registered type tags, sorted
    pub fn type_tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<_> = self.by_tag.keys().copied().collect();
        tags.sort_unstable();
        tags
    }

    pub fn len(&self) -> usize {
        self.by_tag.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_tag.is_empty()
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("type_tags", &self.type_tags())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry_covers_every_family() {
        let registry = ConverterRegistry::with_standard_converters();

        for kind in [
            DefinitionKind::Cohort,
            DefinitionKind::Indicator,
            DefinitionKind::Dimension,
            DefinitionKind::DataSet,
            DefinitionKind::Report,
        ] {
            assert_eq!(registry.for_kind(kind).map(|c| c.kind()), Some(kind));
        }
        assert_eq!(
            registry.for_tag("SqlCohortDefinition").map(|c| c.kind()),
            Some(DefinitionKind::Cohort)
        );
        assert!(registry.for_tag("Unknown").is_none());
        assert_eq!(registry.len(), 9);
    }

    #[test]
    fn test_empty_registry() {
        let registry = ConverterRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.type_tags().is_empty());
    }
}
