//! Request MIME type resolution.
//!
//! # Design
//! Callers pick the body encoding with short tokens (`"form"`, `"json"`) or
//! full MIME strings; both resolve to one canonical variant. Unrecognized
//! input falls back to JSON, the client default, rather than erroring — the
//! MIME type only governs serialization, so a bad token degrades to the most
//! common encoding instead of failing the request.

/// Canonical request content types understood by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MimeType {
    /// `application/x-www-form-urlencoded`
    FormUrlencoded,
    /// `multipart/form-data`
    Multipart,
    /// `application/json` (the default)
    #[default]
    Json,
    /// `application/xml`
    Xml,
    /// `application/binary`
    Binary,
}

impl MimeType {
    /// Resolve a shorthand token or literal MIME string.
    ///
    /// Unrecognized input resolves to [`MimeType::Json`].
    pub fn resolve(token: &str) -> Self {
        match token {
            "form" | "x-www-form-urlencoded" | "application/x-www-form-urlencoded" => {
                MimeType::FormUrlencoded
            }
            "multipart" | "form-data" | "multipart/form-data" => MimeType::Multipart,
            "json" | "application/json" => MimeType::Json,
            "xml" | "application/xml" => MimeType::Xml,
            "binary" | "application/binary" => MimeType::Binary,
            _ => MimeType::Json,
        }
    }

    /// The canonical MIME string.
    pub fn as_str(self) -> &'static str {
        match self {
            MimeType::FormUrlencoded => "application/x-www-form-urlencoded",
            MimeType::Multipart => "multipart/form-data",
            MimeType::Json => "application/json",
            MimeType::Xml => "application/xml",
            MimeType::Binary => "application/binary",
        }
    }

    /// Content-Type header value, with the charset suffix when UTF-8 is
    /// requested.
    pub fn content_type(self, utf8: bool) -> String {
        if utf8 {
            format!("{}; charset=utf-8", self.as_str())
        } else {
            self.as_str().to_string()
        }
    }
}
