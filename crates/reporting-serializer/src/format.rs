//! Wire formats
//!
//! Converters produce and consume a `serde_json::Value` node tree; a wire
//! format turns that tree into text and back.

use crate::error::{SerializationError, SerializationResult};
use crate::xml;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Text encoding of a definition document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireFormat {
    #[default]
    Json,
    Xml,
}

impl WireFormat {
    /// Guess the format of a document from its first significant character
    pub fn detect(text: &str) -> Option<Self> {
        match text.trim_start().chars().next() {
            Some('<') => Some(Self::Xml),
            Some('{') | Some('[') => Some(Self::Json),
            _ => None,
        }
    }

    /// Format implied by a file extension
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "xml" => Some(Self::Xml),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }

    pub fn encode(&self, node: &Value, pretty: bool) -> SerializationResult<String> {
        match self {
            Self::Json => {
                let text = if pretty {
                    serde_json::to_string_pretty(node)
                } else {
                    serde_json::to_string(node)
                };
                text.map_err(|e| SerializationError::write(*self, e.to_string()))
            }
            Self::Xml => xml::encode(node, pretty),
        }
    }

    pub fn decode(&self, text: &str) -> SerializationResult<Value> {
        match self {
            Self::Json => serde_json::from_str(text)
                .map_err(|e| SerializationError::malformed(*self, e.to_string())),
            Self::Xml => xml::decode(text),
        }
    }
}

impl fmt::Display for WireFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("JSON"),
            Self::Xml => f.write_str("XML"),
        }
    }
}

impl FromStr for WireFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s).ok_or_else(|| format!("unknown wire format '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("  {\"type\": \"x\"}", Some(WireFormat::Json))]
    #[case("\n<object/>", Some(WireFormat::Xml))]
    #[case("type: x", None)]
    #[case("", None)]
    fn test_detect(#[case] text: &str, #[case] expected: Option<WireFormat>) {
        assert_eq!(WireFormat::detect(text), expected);
    }

    #[test]
    fn test_parse_format_name() {
        assert_eq!("XML".parse::<WireFormat>(), Ok(WireFormat::Xml));
        assert!("yaml".parse::<WireFormat>().is_err());
    }

    #[test]
    fn test_malformed_json() {
        let err = WireFormat::Json.decode("{\"type\": ").unwrap_err();
        assert!(matches!(err, SerializationError::Malformed { format: WireFormat::Json, .. }));
    }
}
