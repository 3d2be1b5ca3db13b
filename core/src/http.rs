//! HTTP request/response data types shared with the transport layer.
//!
//! # Design
//! The client assembles an [`HttpRequest`] as plain data, then hands it to a
//! [`Transport`](crate::transport::Transport) for the actual round-trip.
//! Keeping the request a value keeps assembly deterministic and unit-testable
//! without any network, and lets tests substitute a recording transport.
//! All fields use owned types so requests can be moved around freely.

use std::path::{Path, PathBuf};

/// HTTP verb for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// Where a multipart part's payload comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartData {
    /// Read the file at transport time.
    File(PathBuf),
    /// In-memory payload.
    Bytes(Vec<u8>),
}

/// One part of a `multipart/form-data` body: a payload plus the declared
/// MIME type and display name. The transport does the actual encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Form field name.
    pub field: String,
    /// File name reported to the server.
    pub file_name: String,
    /// Declared MIME type of the payload.
    pub mime: String,
    pub data: PartData,
}

impl Part {
    /// Build a part from a local file. The MIME type is guessed from the
    /// extension (falling back to `application/octet-stream`) and the
    /// display name is the file's base name. The file itself is read only
    /// when the request executes.
    pub fn from_path(field: impl Into<String>, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            field: field.into(),
            file_name,
            mime: mime.essence_str().to_string(),
            data: PartData::File(path.to_path_buf()),
        }
    }

    /// Build a part from an in-memory payload.
    pub fn from_bytes(
        field: impl Into<String>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            mime: mime.into(),
            data: PartData::Bytes(bytes),
        }
    }
}

/// Request body prepared by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// A serialized payload with its Content-Type value.
    Text { content: String, content_type: String },
    /// Plain fields plus file parts; the transport chooses the boundary and
    /// sets the Content-Type header itself.
    Multipart {
        fields: Vec<(String, String)>,
        parts: Vec<Part>,
    },
}

/// A fully assembled HTTP request, ready for one transport round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Final URL, query parameters already merged in.
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

/// What the transport brought back.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}
