//! In-memory store of serialized definitions

use crate::definition::{Definition, DefinitionFamily, DefinitionKind};
use crate::error::{SerializationError, SerializationResult};
use crate::lookup::DefinitionLookup;
use crate::scope::ResolutionScope;
use crate::serializer::ReportingSerializer;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct StoredDefinition {
    kind: DefinitionKind,
    name: String,
    text: String,
}

/// Summary of a stored definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDefinitionInfo {
    pub uuid: Uuid,
    pub kind: DefinitionKind,
    pub name: String,
}

/// Definitions kept as serialized text, keyed by UUID
///
/// Sub-definitions that are themselves stored are written as persisted
/// references, so saving a report after its datasets keeps one copy of each
/// dataset. Reading resolves those references through the store within the
/// same resolution scope.
#[derive(Debug, Default)]
pub struct DefinitionStore {
    serializer: ReportingSerializer,
    definitions: RwLock<IndexMap<Uuid, StoredDefinition>>,
}

impl DefinitionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_serializer(serializer: ReportingSerializer) -> Self {
        Self {
            serializer,
            definitions: RwLock::new(IndexMap::new()),
        }
    }

    pub fn serializer(&self) -> &ReportingSerializer {
        &self.serializer
    }

    /// Serialize and store a definition, replacing any stored under the same UUID
    ///
    /// A definition without a UUID is given a fresh one; the stored
    /// definition is returned.
    pub fn save_definition<T: DefinitionFamily>(
        &self,
        definition: Arc<T>,
    ) -> SerializationResult<Arc<T>> {
        let mut definition = definition;
        if definition.header().uuid.is_nil() {
            Arc::make_mut(&mut definition).header_mut().uuid = Uuid::new_v4();
        }

        let header = definition.header();
        let uuid = header.uuid;
        let text = self.serializer.serialize_with(definition.clone(), self)?;
        let stored = StoredDefinition {
            kind: T::KIND,
            name: header.name.clone(),
            text,
        };
        log::debug!("saving {} '{}' as {}", stored.kind, stored.name, uuid);
        self.definitions.write().insert(uuid, stored);
        Ok(definition)
    }

    /// Load a stored definition of family `T`
    ///
    /// Returns `Ok(None)` if nothing is stored under `uuid` and an error if
    /// the stored definition belongs to another family.
    pub fn get_definition_by_uuid<T: DefinitionFamily>(
        &self,
        uuid: Uuid,
    ) -> SerializationResult<Option<Arc<T>>> {
        let Some(text) = self.text(uuid) else {
            return Ok(None);
        };
        self.serializer.deserialize_with::<T>(&text, self).map(Some)
    }

    /// Load a stored definition of any family
    pub fn get_definition(&self, uuid: Uuid) -> SerializationResult<Definition> {
        let text = self
            .text(uuid)
            .ok_or(SerializationError::NotFound { uuid })?;
        self.serializer.deserialize_definition_with(&text, self)
    }

    /// Load every stored definition of family `T`, in the order they were first saved
    pub fn get_all_definitions<T: DefinitionFamily>(&self) -> SerializationResult<Vec<Arc<T>>> {
        let uuids: Vec<Uuid> = self
            .definitions
            .read()
            .iter()
            .filter(|(_, stored)| stored.kind == T::KIND)
            .map(|(uuid, _)| *uuid)
            .collect();

        let mut definitions = Vec::with_capacity(uuids.len());
        for uuid in uuids {
            if let Some(definition) = self.get_definition_by_uuid::<T>(uuid)? {
                definitions.push(definition);
            }
        }
        Ok(definitions)
    }

    /// Summaries of every stored definition
    pub fn list(&self) -> Vec<StoredDefinitionInfo> {
        self.definitions
            .read()
            .iter()
            .map(|(uuid, stored)| StoredDefinitionInfo {
                uuid: *uuid,
                kind: stored.kind,
                name: stored.name.clone(),
            })
            .collect()
    }

    /// Remove a stored definition; `false` if nothing was stored under `uuid`
    ///
    /// Definitions that reference the purged one as persisted no longer resolve.
    pub fn purge_definition(&self, uuid: Uuid) -> bool {
        let removed = self.definitions.write().shift_remove(&uuid).is_some();
        if removed {
            log::debug!("purged definition {}", uuid);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.definitions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.read().is_empty()
    }

    /// Stored text, copied out so no lock is held while deserializing
    fn text(&self, uuid: Uuid) -> Option<String> {
        self.definitions.read().get(&uuid).map(|s| s.text.clone())
    }
}

impl DefinitionLookup for DefinitionStore {
    fn contains(&self, uuid: Uuid) -> bool {
        self.definitions.read().contains_key(&uuid)
    }

    fn load(
        &self,
        uuid: Uuid,
        serializer: &ReportingSerializer,
        scope: &mut ResolutionScope,
    ) -> SerializationResult<Option<Definition>> {
        let Some(text) = self.text(uuid) else {
            return Ok(None);
        };
        serializer.deserialize_in_scope(&text, self, scope).map(Some)
    }
}
