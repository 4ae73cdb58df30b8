//! Self-describing XML encoding of the node tree
//!
//! Each node becomes one element named after its JSON type. Scalars carry
//! their value in a `value` attribute, object members carry their key in a
//! `name` attribute, and array items are unnamed children:
//!
//! ```xml
//! <object>
//!   <string name="type" value="SqlCohortDefinition"/>
//!   <array name="memberIds">
//!     <number value="7"/>
//!   </array>
//!   <null name="description"/>
//! </object>
//! ```

use crate::error::{SerializationError, SerializationResult};
use crate::format::WireFormat;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::{Reader, Writer};
use serde_json::{Map, Number, Value};
use std::borrow::Cow;

const OBJECT: &str = "object";
const ARRAY: &str = "array";
const STRING: &str = "string";
const NUMBER: &str = "number";
const BOOL: &str = "bool";
const NULL: &str = "null";

const NAME_ATTR: &str = "name";
const VALUE_ATTR: &str = "value";

fn malformed(message: impl Into<String>) -> SerializationError {
    SerializationError::malformed(WireFormat::Xml, message)
}

fn write_failed(message: impl Into<String>) -> SerializationError {
    SerializationError::write(WireFormat::Xml, message)
}

// ============================================================================
// Encoding
// ============================================================================

pub fn encode(node: &Value, pretty: bool) -> SerializationResult<String> {
    let mut writer = if pretty {
        Writer::new_with_indent(Vec::new(), b' ', 2)
    } else {
        Writer::new(Vec::new())
    };
    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;
    write_value(&mut writer, None, node)?;
    String::from_utf8(writer.into_inner()).map_err(|e| write_failed(e.to_string()))
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> SerializationResult<()> {
    writer
        .write_event(event)
        .map_err(|e| write_failed(e.to_string()))
}

fn write_value(
    writer: &mut Writer<Vec<u8>>,
    name: Option<&str>,
    value: &Value,
) -> SerializationResult<()> {
    let (tag, scalar) = match value {
        Value::Null => (NULL, None),
        Value::Bool(b) => (BOOL, Some(b.to_string())),
        Value::Number(n) => (NUMBER, Some(n.to_string())),
        Value::String(s) => (STRING, Some(s.clone())),
        Value::Array(_) => (ARRAY, None),
        Value::Object(_) => (OBJECT, None),
    };

    let mut start = BytesStart::new(tag);
    if let Some(name) = name {
        start.push_attribute(attribute(NAME_ATTR, name));
    }
    if let Some(scalar) = &scalar {
        start.push_attribute(attribute(VALUE_ATTR, scalar));
    }

    match value {
        Value::Array(items) if !items.is_empty() => {
            emit(writer, Event::Start(start))?;
            for item in items {
                write_value(writer, None, item)?;
            }
            emit(writer, Event::End(BytesEnd::new(tag)))
        }
        Value::Object(fields) if !fields.is_empty() => {
            emit(writer, Event::Start(start))?;
            for (key, field) in fields {
                write_value(writer, Some(key), field)?;
            }
            emit(writer, Event::End(BytesEnd::new(tag)))
        }
        _ => emit(writer, Event::Empty(start)),
    }
}

/// An attribute whose value is escaped here, including line breaks, so
/// multi-line text survives attribute-value normalization
fn attribute<'a>(key: &'a str, value: &str) -> Attribute<'a> {
    Attribute {
        key: QName(key.as_bytes()),
        value: Cow::Owned(escape_attribute(value).into_bytes()),
    }
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\n' => escaped.push_str("&#10;"),
            '\r' => escaped.push_str("&#13;"),
            '\t' => escaped.push_str("&#9;"),
            c => escaped.push(c),
        }
    }
    escaped
}

// ============================================================================
// Decoding
// ============================================================================

pub fn decode(text: &str) -> SerializationResult<Value> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut root = None;
    loop {
        let event = reader.read_event().map_err(|e| malformed(e.to_string()))?;
        let element = match event {
            Event::Start(e) => read_element(&mut reader, &e, false)?,
            Event::Empty(e) => read_element(&mut reader, &e, true)?,
            Event::Text(_) | Event::CData(_) => {
                return Err(malformed("text outside the root element"));
            }
            Event::Eof => break,
            _ => continue,
        };
        if root.is_some() {
            return Err(malformed("more than one root element"));
        }
        root = Some(element.1);
    }

    root.ok_or_else(|| malformed("document has no root element"))
}

fn read_element<'i>(
    reader: &mut Reader<&'i [u8]>,
    start: &BytesStart<'i>,
    empty: bool,
) -> SerializationResult<(Option<String>, Value)> {
    let (name, scalar) = read_attributes(start)?;
    let tag = start.name();

    let value = match tag.as_ref() {
        b"object" => {
            let mut fields = Map::new();
            if !empty {
                for (key, value) in read_children(reader)? {
                    let key = key.ok_or_else(|| malformed("object member without a name"))?;
                    fields.insert(key, value);
                }
            }
            Value::Object(fields)
        }
        b"array" => {
            let items = if empty {
                Vec::new()
            } else {
                read_children(reader)?.into_iter().map(|(_, v)| v).collect()
            };
            Value::Array(items)
        }
        scalar_tag => {
            let value = read_scalar(scalar_tag, scalar)?;
            if !empty && !read_children(reader)?.is_empty() {
                return Err(malformed("scalar element with children"));
            }
            value
        }
    };

    Ok((name, value))
}

fn read_scalar(tag: &[u8], scalar: Option<String>) -> SerializationResult<Value> {
    let tag_name = String::from_utf8_lossy(tag);
    if tag == NULL.as_bytes() {
        return Ok(Value::Null);
    }
    let raw = scalar.ok_or_else(|| malformed(format!("<{}> without a value", tag_name)))?;
    match tag {
        t if t == STRING.as_bytes() => Ok(Value::String(raw)),
        t if t == NUMBER.as_bytes() => parse_number(&raw),
        t if t == BOOL.as_bytes() => match raw.as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            other => Err(malformed(format!("invalid boolean '{}'", other))),
        },
        _ => Err(malformed(format!("unknown element <{}>", tag_name))),
    }
}

/// Children up to the parent's end tag
fn read_children<'i>(
    reader: &mut Reader<&'i [u8]>,
) -> SerializationResult<Vec<(Option<String>, Value)>> {
    let mut children = Vec::new();
    loop {
        match reader.read_event().map_err(|e| malformed(e.to_string()))? {
            Event::Start(e) => children.push(read_element(reader, &e, false)?),
            Event::Empty(e) => children.push(read_element(reader, &e, true)?),
            Event::End(_) => return Ok(children),
            Event::Text(_) | Event::CData(_) => {
                return Err(malformed("unexpected text content"));
            }
            Event::Eof => return Err(malformed("unexpected end of document")),
            _ => {}
        }
    }
}

fn read_attributes(
    start: &BytesStart<'_>,
) -> SerializationResult<(Option<String>, Option<String>)> {
    let mut name = None;
    let mut value = None;
    for attr in start.attributes() {
        let attr = attr.map_err(|e| malformed(e.to_string()))?;
        let text = attr
            .unescape_value()
            .map_err(|e| malformed(e.to_string()))?
            .into_owned();
        match attr.key.as_ref() {
            b"name" => name = Some(text),
            b"value" => value = Some(text),
            _ => {}
        }
    }
    Ok((name, value))
}

fn parse_number(raw: &str) -> SerializationResult<Value> {
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(Value::from(i));
    }
    if let Ok(u) = raw.parse::<u64>() {
        return Ok(Value::from(u));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| malformed(format!("invalid number '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(false)]
    #[case(true)]
    fn test_round_trip(#[case] pretty: bool) {
        let node = json!({
            "type": "SqlCohortDefinition",
            "query": "select p.patient_id\nfrom patient p\twhere p.name <> 'O\"Brien' & x",
            "empty": {},
            "none": [],
            "nested": [[1, -2], { "flag": true, "ratio": 0.25 }, null],
            "description": null,
            "big": 18446744073709551615u64
        });

        let xml = encode(&node, pretty).unwrap();
        assert_eq!(decode(&xml).unwrap(), node);
    }

    #[test]
    fn test_encoded_shape() {
        let xml = encode(&json!({ "name": "a<b", "n": 3 }), false).unwrap();
        assert!(xml.contains(r#"<string name="name" value="a&lt;b"/>"#));
        assert!(xml.contains(r#"<number name="n" value="3"/>"#));
    }

    #[rstest]
    #[case::unclosed("<object><string name=\"a\" value=\"b\"/>")]
    #[case::unknown_element("<object><date name=\"a\" value=\"2024-01-01\"/></object>")]
    #[case::unnamed_member("<object><string value=\"b\"/></object>")]
    #[case::bad_number("<number value=\"twelve\"/>")]
    #[case::two_roots("<null/><null/>")]
    #[case::no_root("")]
    #[case::text("<object>hello</object>")]
    fn test_malformed(#[case] text: &str) {
        assert!(matches!(
            decode(text),
            Err(SerializationError::Malformed { format: WireFormat::Xml, .. })
        ));
    }
}
