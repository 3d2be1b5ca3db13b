//! Error types for the fluent HTTP client.
//!
//! # Design
//! Only configuration and encoding problems are surfaced as `Err` from
//! `execute` — they mean no sensible request could be built, and they abort
//! before any network I/O. Transport-level failures (DNS, connect, timeout)
//! are *recorded* on the client instead and inspected after the call, so a
//! failed transfer and a 500 response are handled through the same accessors.

use thiserror::Error;

/// Hard failures raised by [`HttpClient`](crate::HttpClient) methods.
#[derive(Debug, Error)]
pub enum Error {
    /// `execute` was called without a configured URL.
    #[error("no URL configured")]
    MissingUrl,

    /// The configured URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The outbound body could not be serialized to JSON. Raised from
    /// `execute` before any network I/O happens.
    #[error("JSON encoding error: {message}")]
    Encoding { message: String },

    /// The instance already performed its one request. Build a new client
    /// or call `reset` for another round-trip.
    #[error("client already executed; create a new instance or call reset()")]
    AlreadyExecuted,

    /// A result accessor was called before `execute`.
    #[error("request not yet executed")]
    NotExecuted,
}

/// Classification of a low-level transfer failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Host name resolution failed.
    Dns,
    /// TCP connection could not be established.
    Connect,
    /// The whole-call or connect timeout expired.
    Timeout,
    /// Redirect chain exceeded the configured limit.
    TooManyRedirects,
    /// I/O error while sending the request or reading the response.
    Io,
    /// Anything the transport reported that fits no bucket above.
    Other,
}

impl TransportErrorKind {
    /// Numeric code for the failure, matching libcurl's errno values where
    /// an equivalent exists so callers migrating from curl-based tooling
    /// can keep their checks.
    pub fn code(self) -> u32 {
        match self {
            TransportErrorKind::Dns => 6,
            TransportErrorKind::Connect => 7,
            TransportErrorKind::Timeout => 28,
            TransportErrorKind::TooManyRedirects => 47,
            TransportErrorKind::Io => 56,
            TransportErrorKind::Other => 2,
        }
    }
}

/// A transfer failure recorded by `execute` rather than raised.
///
/// Present on the client after execution when the transport could not
/// complete the round-trip. A non-2xx status is *not* a transport error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// curl-style errno for this failure.
    pub fn errno(&self) -> u32 {
        self.kind.code()
    }
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "transport error {}: {}", self.errno(), self.message)
    }
}
