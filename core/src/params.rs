//! Insertion-ordered request parameter maps.
//!
//! # Design
//! Parameters keep the order the caller supplied them in (predictable bodies
//! make debugging against HTTP fixtures sane) and merge last-write-wins per
//! key, matching the accumulate-then-send setter contract. Values are either
//! a single string or a list of strings; lists expand to repeated pairs in
//! form encoding and to JSON arrays in JSON encoding.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::{Map, Value};

/// Percent-encode everything except RFC 3986 unreserved characters, so a
/// space serializes as `%20` rather than `+`.
const FORM_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// A parameter value: one string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    List(Vec<String>),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        ParamValue::List(values)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(values: Vec<&str>) -> Self {
        ParamValue::List(values.into_iter().map(str::to_string).collect())
    }
}

/// Insertion-ordered string → [`ParamValue`] map with last-write-wins merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamMap {
    entries: Vec<(String, ParamValue)>,
}

impl ParamMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one pair. An existing key keeps its position but takes the
    /// new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Merge `other`'s pairs on top of this map.
    pub fn merge<K, V, I>(&mut self, other: I)
    where
        K: Into<String>,
        V: Into<ParamValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in other {
            self.insert(key, value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Expand to flat `(key, value)` pairs; list values repeat their key.
    pub fn flat_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (key, value) in &self.entries {
            match value {
                ParamValue::Text(v) => pairs.push((key.clone(), v.clone())),
                ParamValue::List(vs) => {
                    pairs.extend(vs.iter().map(|v| (key.clone(), v.clone())));
                }
            }
        }
        pairs
    }

    /// Serialize as a percent-encoded form string (`a=1&b=2`).
    pub fn to_form(&self) -> String {
        self.flat_pairs()
            .iter()
            .map(|(k, v)| {
                format!(
                    "{}={}",
                    utf8_percent_encode(k, FORM_ENCODE),
                    utf8_percent_encode(v, FORM_ENCODE)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Serialize as a JSON object; list values become arrays.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut object = Map::new();
        for (key, value) in &self.entries {
            let json = match value {
                ParamValue::Text(v) => Value::String(v.clone()),
                ParamValue::List(vs) => {
                    Value::Array(vs.iter().cloned().map(Value::String).collect())
                }
            };
            object.insert(key.clone(), json);
        }
        serde_json::to_string(&Value::Object(object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> ParamMap {
        let mut m = ParamMap::new();
        m.merge(pairs.iter().map(|&(k, v)| (k, v)));
        m
    }

    #[test]
    fn insert_preserves_order_and_overrides_in_place() {
        let mut m = map(&[("a", "1"), ("b", "2")]);
        m.insert("a", "3");
        let pairs = m.flat_pairs();
        assert_eq!(
            pairs,
            vec![
                ("a".to_string(), "3".to_string()),
                ("b".to_string(), "2".to_string())
            ]
        );
    }

    #[test]
    fn form_percent_encodes_space_as_hex() {
        let m = map(&[("job", "Zion Resident")]);
        assert_eq!(m.to_form(), "job=Zion%20Resident");
    }

    #[test]
    fn form_encodes_reserved_characters() {
        let m = map(&[("q", "a&b=c"), ("safe", "A-z_0.9~")]);
        assert_eq!(m.to_form(), "q=a%26b%3Dc&safe=A-z_0.9~");
    }

    #[test]
    fn list_values_repeat_their_key_in_form() {
        let mut m = ParamMap::new();
        m.insert("tag", vec!["red", "blue"]);
        assert_eq!(m.to_form(), "tag=red&tag=blue");
    }

    #[test]
    fn json_body_has_exactly_the_given_keys() {
        let m = map(&[("name", "Morpheus"), ("job", "Leader")]);
        let value: Value = serde_json::from_str(&m.to_json().unwrap()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(object["name"], "Morpheus");
        assert_eq!(object["job"], "Leader");
    }

    #[test]
    fn list_values_become_json_arrays() {
        let mut m = ParamMap::new();
        m.insert("tags", vec!["red", "blue"]);
        let value: Value = serde_json::from_str(&m.to_json().unwrap()).unwrap();
        assert_eq!(value["tags"], serde_json::json!(["red", "blue"]));
    }

    #[test]
    fn empty_map_serializes_to_empty_forms() {
        let m = ParamMap::new();
        assert_eq!(m.to_form(), "");
        assert_eq!(m.to_json().unwrap(), "{}");
    }
}
