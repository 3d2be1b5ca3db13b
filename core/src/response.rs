//! Response body decoding.
//!
//! # Design
//! Decoding distinguishes three outcomes instead of overloading one null:
//! an empty body, a successfully decoded structure, and a body that simply
//! is not valid JSON/XML — the last case keeps the raw text so nothing is
//! lost. Decoding is pure and repeatable; it never mutates the stored
//! response.

use serde_json::Value;

use crate::xml::xml_to_value;

/// Requested shape for [`decode`]. JSON covers both array- and
/// object-shaped documents; XML is converted to the same JSON-shaped value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    Json,
    Xml,
}

/// Tagged decoding outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// The response body was empty (or whitespace only).
    Empty,
    /// The body parsed into a JSON-shaped value.
    Json(Value),
    /// The body was present but not valid in the requested format; the raw
    /// text is preserved.
    Undecodable { raw: String },
}

impl Decoded {
    /// The decoded value, when there is one.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Decoded::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Decoded::Empty)
    }
}

/// Decode a raw response body in the requested format.
pub fn decode(raw: &str, format: ResponseFormat) -> Decoded {
    if raw.trim().is_empty() {
        return Decoded::Empty;
    }
    let parsed = match format {
        ResponseFormat::Json => serde_json::from_str(raw).ok(),
        ResponseFormat::Xml => xml_to_value(raw),
    };
    match parsed {
        Some(value) => Decoded::Json(value),
        None => Decoded::Undecodable {
            raw: raw.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_body_decodes_to_empty() {
        assert_eq!(decode("", ResponseFormat::Json), Decoded::Empty);
        assert_eq!(decode("  \n", ResponseFormat::Json), Decoded::Empty);
        assert_eq!(decode("", ResponseFormat::Xml), Decoded::Empty);
    }

    #[test]
    fn json_object_and_array_both_decode() {
        let object = decode(r#"{"page":1}"#, ResponseFormat::Json);
        assert_eq!(object.as_json(), Some(&json!({"page": 1})));

        let array = decode(r#"[1,2,3]"#, ResponseFormat::Json);
        assert_eq!(array.as_json(), Some(&json!([1, 2, 3])));
    }

    #[test]
    fn invalid_json_keeps_the_raw_body() {
        let decoded = decode("<html>oops</html>", ResponseFormat::Json);
        assert_eq!(
            decoded,
            Decoded::Undecodable {
                raw: "<html>oops</html>".to_string()
            }
        );
    }

    #[test]
    fn xml_decodes_through_the_converter() {
        let decoded = decode("<user><name>Neo</name></user>", ResponseFormat::Xml);
        assert_eq!(decoded.as_json(), Some(&json!({"name": "Neo"})));
    }

    #[test]
    fn invalid_xml_keeps_the_raw_body() {
        let decoded = decode("{\"not\": \"xml\"}", ResponseFormat::Xml);
        assert!(matches!(decoded, Decoded::Undecodable { .. }));
    }

    #[test]
    fn decoding_is_repeatable() {
        let raw = r#"{"a":1}"#;
        assert_eq!(
            decode(raw, ResponseFormat::Json),
            decode(raw, ResponseFormat::Json)
        );
    }
}
