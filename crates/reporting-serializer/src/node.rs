//! Typed access to the node tree converters read from
//!
//! Both wire formats decode to the same `serde_json::Value` tree. A
//! [`NodeReader`] wraps one object node together with its path from the
//! document root so every error names the fragment it was raised at.

use crate::error::{SerializationError, SerializationResult};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use uuid::Uuid;

pub const TYPE: &str = "type";
pub const UUID: &str = "uuid";
pub const NAME: &str = "name";
pub const DESCRIPTION: &str = "description";
pub const PARAMETERS: &str = "parameters";
pub const REFERENCE: &str = "reference";
pub const PERSISTED: &str = "persisted";
pub const DEFINITION: &str = "definition";
pub const PARAMETER_MAPPINGS: &str = "parameterMappings";

/// Path of the document root
pub const ROOT: &str = "$";

/// Path of a field below `path`
pub fn field_path(path: &str, field: &str) -> String {
    format!("{}.{}", path, field)
}

/// Path of an array element below `path`
pub fn index_path(path: &str, index: usize) -> String {
    format!("{}[{}]", path, index)
}

/// Short name of a node's JSON type, for error messages
fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// An object node and its path
#[derive(Debug, Clone)]
pub struct NodeReader<'a> {
    fields: &'a Map<String, Value>,
    path: String,
}

impl<'a> NodeReader<'a> {
    /// Wrap a node, which must be an object
    pub fn new(value: &'a Value, path: impl Into<String>) -> SerializationResult<Self> {
        let path = path.into();
        match value {
            Value::Object(fields) => Ok(Self { fields, path }),
            other => Err(SerializationError::invalid_field(
                path,
                format!("expected an object, found {}", value_kind(other)),
            )),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn child_path(&self, field: &str) -> String {
        field_path(&self.path, field)
    }

    /// A field's value; explicit nulls count as absent
    pub fn get(&self, field: &str) -> Option<&'a Value> {
        self.fields.get(field).filter(|v| !v.is_null())
    }

    pub fn has(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn required(&self, field: &str) -> SerializationResult<&'a Value> {
        self.get(field)
            .ok_or_else(|| SerializationError::missing_field(field, self.path.clone()))
    }

    pub fn str(&self, field: &str) -> SerializationResult<&'a str> {
        let value = self.required(field)?;
        self.as_str(field, value)
    }

    pub fn opt_str(&self, field: &str) -> SerializationResult<Option<&'a str>> {
        self.get(field).map(|v| self.as_str(field, v)).transpose()
    }

    fn as_str(&self, field: &str, value: &'a Value) -> SerializationResult<&'a str> {
        value.as_str().ok_or_else(|| {
            SerializationError::invalid_field(
                self.child_path(field),
                format!("expected a string, found {}", value_kind(value)),
            )
        })
    }

    /// An optional object field as a nested reader
    pub fn object(&self, field: &str) -> SerializationResult<Option<NodeReader<'a>>> {
        self.get(field)
            .map(|v| NodeReader::new(v, self.child_path(field)))
            .transpose()
    }

    /// An optional array field; absent arrays read as empty
    pub fn array(&self, field: &str) -> SerializationResult<&'a [Value]> {
        match self.get(field) {
            None => Ok(&[]),
            Some(Value::Array(items)) => Ok(items.as_slice()),
            Some(other) => Err(SerializationError::invalid_field(
                self.child_path(field),
                format!("expected an array, found {}", value_kind(other)),
            )),
        }
    }

    pub fn uuid(&self, field: &str) -> SerializationResult<Option<Uuid>> {
        self.opt_str(field)?
            .map(|raw| {
                Uuid::parse_str(raw).map_err(|e| {
                    SerializationError::invalid_field(
                        self.child_path(field),
                        format!("invalid UUID '{}': {}", raw, e),
                    )
                })
            })
            .transpose()
    }

    /// Decode an optional field through serde
    pub fn decode<T: DeserializeOwned>(&self, field: &str) -> SerializationResult<Option<T>> {
        self.get(field)
            .map(|v| {
                serde_json::from_value(v.clone()).map_err(|e| {
                    SerializationError::invalid_field(self.child_path(field), e.to_string())
                })
            })
            .transpose()
    }

    /// An optional object of string values, in document order
    pub fn string_map(&self, field: &str) -> SerializationResult<IndexMap<String, String>> {
        let Some(entries) = self.object(field)? else {
            return Ok(IndexMap::new());
        };
        entries
            .entries()
            .map(|(key, value)| {
                value
                    .as_str()
                    .map(|s| (key.clone(), s.to_string()))
                    .ok_or_else(|| {
                        SerializationError::invalid_field(
                            entries.child_path(key),
                            format!("expected a string, found {}", value_kind(value)),
                        )
                    })
            })
            .collect()
    }

    /// Entries of this object in document order
    pub fn entries(&self) -> impl Iterator<Item = (&'a String, &'a Value)> + 'a {
        self.fields.iter()
    }
}
