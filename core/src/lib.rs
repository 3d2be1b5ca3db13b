//! Fluent, configurable blocking HTTP client.
//!
//! # Overview
//! `HttpClient` accumulates request intent — URL, query and body parameters,
//! headers, MIME encoding, file attachments — through chained setters, then
//! issues one blocking request and exposes the response body, status code,
//! and optional wire diagnostics. The HTTP verb is implied by which
//! parameter setter was used (with an explicit override available), the
//! configured query parameters merge into the URL's existing query string,
//! and responses decode as JSON or XML into a tagged result that never
//! confuses "empty" with "undecodable".
//!
//! # Design
//! - Request assembly is pure data: `build_request` produces an
//!   [`HttpRequest`] without touching the network, and the [`Transport`]
//!   trait is the seam where I/O happens (ureq by default).
//! - Each execution acquires a fresh transport session; a client instance
//!   performs exactly one request unless explicitly `reset`.
//! - Transfer failures are recorded for post-call inspection; only
//!   configuration and encoding problems make `execute` return `Err`.

pub mod client;
pub mod error;
pub mod headers;
pub mod http;
pub mod mime;
pub mod params;
pub mod query;
pub mod response;
pub mod status;
pub mod transport;
pub mod xml;

pub use client::{DebugReport, HttpClient};
pub use error::{Error, TransportError, TransportErrorKind};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Part, PartData, RequestBody};
pub use mime::MimeType;
pub use params::{ParamMap, ParamValue};
pub use response::{Decoded, ResponseFormat};
pub use status::parse_code;
pub use transport::{
    Diagnostics, Transport, TransportOption, TransportOptions, UreqTransport,
    DEFAULT_TIMEOUT, DEFAULT_USER_AGENT,
};
