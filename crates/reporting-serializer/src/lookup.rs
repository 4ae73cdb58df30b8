//! Access to persisted definitions during serialization

use crate::definition::Definition;
use crate::error::SerializationResult;
use crate::scope::ResolutionScope;
use crate::serializer::ReportingSerializer;
use uuid::Uuid;

/// Source of definitions persisted outside the document being serialized
///
/// When writing, a sub-definition the lookup [`contains`](Self::contains) is
/// written as a persisted reference carrying only its UUID. When reading, a
/// persisted reference is loaded through [`load`](Self::load), which receives
/// the caller's resolution scope so the reentrant deserialize shares it.
pub trait DefinitionLookup: Send + Sync {
    fn contains(&self, uuid: Uuid) -> bool;

    /// Load and deserialize a persisted definition within `scope`
    ///
    /// Returns `Ok(None)` if nothing is stored under `uuid`.
    fn load(
        &self,
        uuid: Uuid,
        serializer: &ReportingSerializer,
        scope: &mut ResolutionScope,
    ) -> SerializationResult<Option<Definition>>;
}

/// Lookup with nothing persisted; every sub-definition is written inline
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLookup;

impl DefinitionLookup for NoLookup {
    fn contains(&self, _uuid: Uuid) -> bool {
        false
    }

    fn load(
        &self,
        _uuid: Uuid,
        _serializer: &ReportingSerializer,
        _scope: &mut ResolutionScope,
    ) -> SerializationResult<Option<Definition>> {
        Ok(None)
    }
}
