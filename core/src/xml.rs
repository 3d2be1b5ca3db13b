//! Best-effort XML to JSON-shaped value conversion.
//!
//! # Design
//! Mirrors the "parse XML, then treat it like decoded JSON" response path:
//! the root element's *contents* become the result (the root name is
//! dropped), child elements become object keys, repeated sibling names
//! collapse into arrays, attributes land under `"@attributes"`, and
//! text-only elements become plain strings. Anything unparseable yields
//! `None` — this is a convenience view, not a schema-faithful XML model.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

/// Convert an XML document into a JSON-shaped [`Value`].
///
/// Returns `None` when the input is not well-formed XML or has no root
/// element.
pub fn xml_to_value(text: &str) -> Option<Value> {
    let mut reader = Reader::from_str(text);
    loop {
        match reader.read_event().ok()? {
            Event::Start(start) => {
                let start = start.to_owned();
                return element_to_value(&mut reader, &start);
            }
            Event::Empty(start) => return Some(leaf_value(&start, String::new())?),
            Event::Eof => return None,
            // Prolog, comments, whitespace before the root.
            _ => continue,
        }
    }
}

/// Parse the contents of an already-opened element up to its end tag.
fn element_to_value(reader: &mut Reader<&[u8]>, start: &BytesStart) -> Option<Value> {
    let mut children: Map<String, Value> = Map::new();
    let mut text = String::new();

    loop {
        match reader.read_event().ok()? {
            Event::Start(e) => {
                let e = e.to_owned();
                let name = element_name(&e);
                let value = element_to_value(reader, &e)?;
                insert_child(&mut children, name, value);
            }
            Event::Empty(e) => {
                let name = element_name(&e);
                let value = leaf_value(&e, String::new())?;
                insert_child(&mut children, name, value);
            }
            Event::Text(t) => text.push_str(t.unescape().ok()?.trim()),
            Event::CData(t) => text.push_str(&String::from_utf8_lossy(&t)),
            Event::End(_) => break,
            Event::Eof => return None,
            _ => continue,
        }
    }

    if children.is_empty() {
        return leaf_value(start, text);
    }

    let mut object = Map::new();
    if let Some(attributes) = attributes_map(start) {
        object.insert("@attributes".to_string(), Value::Object(attributes));
    }
    object.extend(children);
    if !text.is_empty() {
        object.insert("#text".to_string(), Value::String(text));
    }
    Some(Value::Object(object))
}

/// Value for an element with no child elements: its text, or an object
/// carrying the attributes when it has any.
fn leaf_value(start: &BytesStart, text: String) -> Option<Value> {
    match attributes_map(start) {
        Some(attributes) => {
            let mut object = Map::new();
            object.insert("@attributes".to_string(), Value::Object(attributes));
            if !text.is_empty() {
                object.insert("#text".to_string(), Value::String(text));
            }
            Some(Value::Object(object))
        }
        None => Some(Value::String(text)),
    }
}

fn element_name(start: &BytesStart) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

fn attributes_map(start: &BytesStart) -> Option<Map<String, Value>> {
    let mut attributes = Map::new();
    for attr in start.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().ok()?;
        attributes.insert(key, Value::String(value.into_owned()));
    }
    if attributes.is_empty() {
        None
    } else {
        Some(attributes)
    }
}

/// A repeated sibling name turns the existing entry into an array.
fn insert_child(children: &mut Map<String, Value>, name: String, value: Value) {
    match children.get_mut(&name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            children.insert(name, value);
        }
    }
}
