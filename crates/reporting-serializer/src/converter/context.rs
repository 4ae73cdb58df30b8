//! Shared state of one serialize or deserialize call

use super::ConverterRegistry;
use crate::definition::{Definition, DefinitionFamily, DefinitionHeader, Mapped};
use crate::error::{SerializationError, SerializationResult};
use crate::lookup::DefinitionLookup;
use crate::node::{
    DEFINITION, DESCRIPTION, NAME, NodeReader, PARAMETER_MAPPINGS, PARAMETERS, PERSISTED,
    REFERENCE, TYPE, UUID, field_path,
};
use crate::scope::ResolutionScope;
use crate::serializer::ReportingSerializer;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

// ============================================================================
// Writing
// ============================================================================

/// State of one serialize call
///
/// Remembers which definitions have been written in full so later
/// occurrences of the same UUID become reference nodes. A later occurrence
/// must be the same definition; different content under one UUID is an error.
pub struct WriteContext<'a> {
    registry: &'a ConverterRegistry,
    lookup: &'a dyn DefinitionLookup,
    written: HashMap<Uuid, Definition>,
}

impl<'a> WriteContext<'a> {
    pub(crate) fn new(registry: &'a ConverterRegistry, lookup: &'a dyn DefinitionLookup) -> Self {
        Self {
            registry,
            lookup,
            written: HashMap::new(),
        }
    }

    /// Write the document root, always in full
    pub fn write_root(
        &mut self,
        definition: &Definition,
        path: &str,
    ) -> SerializationResult<Value> {
        self.write_full(definition, path)
    }

    /// Write a nested definition in full, as a reference, or as a persisted reference
    pub fn write_definition(
        &mut self,
        definition: &Definition,
        path: &str,
    ) -> SerializationResult<Value> {
        let uuid = definition.uuid();
        if !uuid.is_nil() {
            if let Some(first) = self.written.get(&uuid) {
                if !first.ptr_eq(definition) && first != definition {
                    return Err(SerializationError::duplicate_uuid(uuid, path));
                }
                log::trace!("{} already written, referencing {}", path, uuid);
                return Ok(reference_node(REFERENCE, uuid));
            }
            if self.lookup.contains(uuid) {
                log::trace!("{} is persisted as {}", path, uuid);
                return Ok(reference_node(PERSISTED, uuid));
            }
        }
        self.write_full(definition, path)
    }

    pub fn write_mapped<T: DefinitionFamily>(
        &mut self,
        mapped: &Mapped<T>,
        path: &str,
    ) -> SerializationResult<Value> {
        let definition = T::wrap(mapped.definition.clone());
        let mut node = Map::new();
        node.insert(
            DEFINITION.to_string(),
            self.write_definition(&definition, &field_path(path, DEFINITION))?,
        );
        if !mapped.parameter_mappings.is_empty() {
            let mappings: Map<String, Value> = mapped
                .parameter_mappings
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();
            node.insert(PARAMETER_MAPPINGS.to_string(), Value::Object(mappings));
        }
        Ok(Value::Object(node))
    }

    /// Write a keyed collection of mapped definitions as an object
    pub fn write_mapped_map<T: DefinitionFamily>(
        &mut self,
        entries: &IndexMap<String, Mapped<T>>,
        path: &str,
    ) -> SerializationResult<Value> {
        let mut node = Map::new();
        for (key, mapped) in entries {
            let value = self.write_mapped(mapped, &field_path(path, key))?;
            node.insert(key.clone(), value);
        }
        Ok(Value::Object(node))
    }

    fn write_full(&mut self, definition: &Definition, path: &str) -> SerializationResult<Value> {
        let converter = self
            .registry
            .for_kind(definition.kind())
            .ok_or_else(|| SerializationError::unknown_type(definition.type_tag(), path))?
            .clone();

        let header = definition.header();
        if header.has_uuid() {
            self.written.insert(header.uuid, definition.clone());
        }

        let mut node = Map::new();
        node.insert(TYPE.to_string(), Value::String(definition.type_tag().to_string()));
        write_header(header, &mut node, path)?;
        converter.write(definition, &mut node, self, path)?;
        Ok(Value::Object(node))
    }
}

fn reference_node(kind: &str, uuid: Uuid) -> Value {
    let mut node = Map::new();
    node.insert(kind.to_string(), Value::String(uuid.to_string()));
    Value::Object(node)
}

fn write_header(
    header: &DefinitionHeader,
    node: &mut Map<String, Value>,
    path: &str,
) -> SerializationResult<()> {
    if header.has_uuid() {
        node.insert(UUID.to_string(), Value::String(header.uuid.to_string()));
    }
    node.insert(NAME.to_string(), Value::String(header.name.clone()));
    if let Some(description) = &header.description {
        node.insert(DESCRIPTION.to_string(), Value::String(description.clone()));
    }
    if !header.parameters.is_empty() {
        let parameters = serde_json::to_value(&header.parameters).map_err(|e| {
            SerializationError::invalid_field(field_path(path, PARAMETERS), e.to_string())
        })?;
        node.insert(PARAMETERS.to_string(), parameters);
    }
    Ok(())
}

fn read_header(node: &NodeReader<'_>) -> SerializationResult<DefinitionHeader> {
    Ok(DefinitionHeader {
        uuid: node.uuid(UUID)?.unwrap_or_else(Uuid::nil),
        name: node.str(NAME)?.to_string(),
        description: node.opt_str(DESCRIPTION)?.map(str::to_string),
        parameters: node.decode(PARAMETERS)?.unwrap_or_default(),
    })
}

// ============================================================================
// Reading
// ============================================================================

/// State of one deserialize call chain
///
/// Borrows the resolution scope of the outermost call; reentrant calls made
/// through the lookup borrow the same scope.
pub struct ReadContext<'a> {
    serializer: &'a ReportingSerializer,
    lookup: &'a dyn DefinitionLookup,
    scope: &'a mut ResolutionScope,
}

impl<'a> ReadContext<'a> {
    pub(crate) fn new(
        serializer: &'a ReportingSerializer,
        lookup: &'a dyn DefinitionLookup,
        scope: &'a mut ResolutionScope,
    ) -> Self {
        Self {
            serializer,
            lookup,
            scope,
        }
    }

    /// Read a definition node: a full definition, a reference, or a persisted reference
    pub fn read_definition(
        &mut self,
        value: &Value,
        path: &str,
    ) -> SerializationResult<Definition> {
        let node = NodeReader::new(value, path)?;

        if let Some(uuid) = node.uuid(REFERENCE)? {
            return self.resolve_reference(uuid, path);
        }
        if let Some(uuid) = node.uuid(PERSISTED)? {
            return self.load_persisted(uuid, path);
        }
        self.read_full(&node)
    }

    /// Read a definition node that must belong to family `T`
    pub fn read_family<T: DefinitionFamily>(
        &mut self,
        value: &Value,
        path: &str,
    ) -> SerializationResult<Arc<T>> {
        let definition = self.read_definition(value, path)?;
        let found = definition.kind();
        T::unwrap(definition)
            .ok_or_else(|| SerializationError::unexpected_family(T::KIND, found, path))
    }

    pub fn read_mapped<T: DefinitionFamily>(
        &mut self,
        value: &Value,
        path: &str,
    ) -> SerializationResult<Mapped<T>> {
        let node = NodeReader::new(value, path)?;
        let definition =
            self.read_family::<T>(node.required(DEFINITION)?, &node.child_path(DEFINITION))?;
        Ok(Mapped {
            definition,
            parameter_mappings: node.string_map(PARAMETER_MAPPINGS)?,
        })
    }

    /// Read a required mapped field
    pub fn read_mapped_field<T: DefinitionFamily>(
        &mut self,
        node: &NodeReader<'_>,
        field: &str,
    ) -> SerializationResult<Mapped<T>> {
        self.read_mapped(node.required(field)?, &node.child_path(field))
    }

    /// Read an optional mapped field
    pub fn read_optional_mapped<T: DefinitionFamily>(
        &mut self,
        node: &NodeReader<'_>,
        field: &str,
    ) -> SerializationResult<Option<Mapped<T>>> {
        node.get(field)
            .map(|value| self.read_mapped(value, &node.child_path(field)))
            .transpose()
    }

    /// Read an optional object of mapped definitions; absent reads as empty
    pub fn read_mapped_map<T: DefinitionFamily>(
        &mut self,
        node: &NodeReader<'_>,
        field: &str,
    ) -> SerializationResult<IndexMap<String, Mapped<T>>> {
        let mut entries = IndexMap::new();
        let Some(object) = node.object(field)? else {
            return Ok(entries);
        };
        for (key, value) in object.entries() {
            let mapped = self.read_mapped(value, &object.child_path(key))?;
            entries.insert(key.clone(), mapped);
        }
        Ok(entries)
    }

    fn resolve_reference(&self, uuid: Uuid, path: &str) -> SerializationResult<Definition> {
        if let Some(definition) = self.scope.get(uuid) {
            return Ok(definition.clone());
        }
        if self.scope.is_in_progress(uuid) {
            return Err(SerializationError::circular(uuid, path));
        }
        Err(SerializationError::unresolved(uuid, path))
    }

    fn load_persisted(&mut self, uuid: Uuid, path: &str) -> SerializationResult<Definition> {
        if let Some(definition) = self.scope.get(uuid) {
            log::trace!("{} resolved from scope", uuid);
            return Ok(definition.clone());
        }
        if self.scope.is_in_progress(uuid) {
            return Err(SerializationError::circular(uuid, path));
        }

        log::debug!("loading persisted definition {} at {}", uuid, path);
        let lookup = self.lookup;
        let serializer = self.serializer;
        let definition = lookup
            .load(uuid, serializer, self.scope)?
            .ok_or_else(|| SerializationError::unresolved(uuid, path))?;
        self.scope.insert(uuid, definition.clone());
        Ok(definition)
    }

    fn read_full(&mut self, node: &NodeReader<'_>) -> SerializationResult<Definition> {
        let serializer = self.serializer;
        let tag = node.str(TYPE)?;
        let converter = serializer
            .converters()
            .for_tag(tag)
            .ok_or_else(|| SerializationError::unknown_type(tag, node.path()))?;
        let header = read_header(node)?;
        let uuid = header.uuid;

        if !uuid.is_nil() {
            if let Some(definition) = self.scope.get(uuid) {
                log::trace!("{} already resolved, reusing", uuid);
                return Ok(definition.clone());
            }
            if !self.scope.begin(uuid) {
                return Err(SerializationError::circular(uuid, node.path()));
            }
        }

        let definition = converter.read(tag, header, node, self)?;
        if definition.kind() != converter.kind() {
            return Err(SerializationError::unexpected_family(
                converter.kind(),
                definition.kind(),
                node.path(),
            ));
        }
        if !uuid.is_nil() {
            self.scope.insert(uuid, definition.clone());
        }
        Ok(definition)
    }
}
