//! Blocking transport layer backed by ureq.
//!
//! # Design
//! Each call builds a fresh `ureq::Agent` so every execution owns its own
//! scoped transport session with nothing carried over between requests.
//! Status codes are returned as data (`http_status_as_error(false)`), so a
//! 404 is a response, not an error — only failures to complete the
//! round-trip at all become [`TransportError`]s. The [`Transport`] trait is
//! the seam that lets unit tests substitute a recording implementation.

use std::time::{Duration, Instant};

use crate::error::{TransportError, TransportErrorKind};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Part, PartData, RequestBody};

/// Fixed default user agent, overridable through [`TransportOption::UserAgent`].
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/80.0.3987.132 Safari/537.36";

/// Default whole-call timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport-level tuning knobs, applied per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportOptions {
    pub user_agent: String,
    /// Whole-call timeout covering connect, send, and receive.
    pub timeout: Duration,
    pub connect_timeout: Option<Duration>,
    pub follow_redirects: bool,
    pub max_redirects: u32,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: None,
            follow_redirects: true,
            max_redirects: 10,
        }
    }
}

/// One pass-through tuning knob for [`TransportOptions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportOption {
    Timeout(Duration),
    ConnectTimeout(Duration),
    UserAgent(String),
    FollowRedirects(bool),
    MaxRedirects(u32),
}

impl TransportOptions {
    pub fn apply(&mut self, option: TransportOption) {
        match option {
            TransportOption::Timeout(d) => self.timeout = d,
            TransportOption::ConnectTimeout(d) => self.connect_timeout = Some(d),
            TransportOption::UserAgent(ua) => self.user_agent = ua,
            TransportOption::FollowRedirects(follow) => self.follow_redirects = follow,
            TransportOption::MaxRedirects(n) => self.max_redirects = n,
        }
    }
}

/// Diagnostics captured around one round-trip when debug mode is on.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    /// Serialized request line and headers as handed to the transport.
    pub request_headers: String,
    /// Size of the outbound body in bytes.
    pub request_body_bytes: usize,
    /// Approximate size of the received response headers in bytes.
    pub response_header_bytes: usize,
    pub elapsed: Duration,
}

/// Successful round-trip: the response plus optional diagnostics.
#[derive(Debug, Clone)]
pub struct TransportReply {
    pub response: HttpResponse,
    pub diagnostics: Option<Diagnostics>,
}

/// A blocking HTTP executor.
pub trait Transport {
    /// Perform one round-trip. `capture_diagnostics` asks the transport to
    /// fill [`TransportReply::diagnostics`].
    fn send(
        &self,
        request: &HttpRequest,
        options: &TransportOptions,
        capture_diagnostics: bool,
    ) -> Result<TransportReply, TransportError>;
}

/// Default [`Transport`] implementation on top of ureq.
#[derive(Debug, Default, Clone, Copy)]
pub struct UreqTransport;

impl Transport for UreqTransport {
    fn send(
        &self,
        request: &HttpRequest,
        options: &TransportOptions,
        capture_diagnostics: bool,
    ) -> Result<TransportReply, TransportError> {
        let mut headers = request.headers.clone();

        // Multipart encoding happens here: the boundary is per-request, so
        // the Content-Type header can only be finalized at send time.
        let payload: Option<Vec<u8>> = match &request.body {
            None => None,
            Some(RequestBody::Text { content, .. }) => Some(content.clone().into_bytes()),
            Some(RequestBody::Multipart { fields, parts }) => {
                let boundary = uuid::Uuid::new_v4().simple().to_string();
                set_multipart_content_type(&mut headers, &boundary);
                Some(encode_multipart(fields, parts, &boundary)?)
            }
        };

        let mut config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(options.timeout))
            .user_agent(options.user_agent.as_str())
            .max_redirects(if options.follow_redirects {
                options.max_redirects
            } else {
                0
            });
        if let Some(connect) = options.connect_timeout {
            config = config.timeout_connect(Some(connect));
        }
        let agent = config.build().new_agent();

        let started = Instant::now();
        let call_result = match (request.method, &payload) {
            (HttpMethod::Get, _) => apply_headers(agent.get(&request.url), &headers).call(),
            (HttpMethod::Post, Some(bytes)) => {
                apply_headers(agent.post(&request.url), &headers).send(&bytes[..])
            }
            (HttpMethod::Post, None) => {
                apply_headers(agent.post(&request.url), &headers).send_empty()
            }
            (HttpMethod::Put, Some(bytes)) => {
                apply_headers(agent.put(&request.url), &headers).send(&bytes[..])
            }
            (HttpMethod::Put, None) => apply_headers(agent.put(&request.url), &headers).send_empty(),
            (HttpMethod::Delete, Some(bytes)) => {
                apply_headers(agent.delete(&request.url), &headers)
                    .force_send_body()
                    .send(&bytes[..])
            }
            (HttpMethod::Delete, None) => {
                apply_headers(agent.delete(&request.url), &headers).call()
            }
        };

        let mut response = call_result.map_err(to_transport_error)?;

        let status = response.status().as_u16();
        let mut response_headers = Vec::new();
        let mut response_header_bytes = 0usize;
        for (name, value) in response.headers() {
            let value = value.to_str().unwrap_or_default().to_string();
            // "Name: value\r\n"
            response_header_bytes += name.as_str().len() + value.len() + 4;
            response_headers.push((name.as_str().to_string(), value));
        }

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(to_transport_error)?;

        let diagnostics = capture_diagnostics.then(|| Diagnostics {
            request_headers: format_request_head(request, &headers, options),
            request_body_bytes: payload.as_ref().map_or(0, Vec::len),
            response_header_bytes,
            elapsed: started.elapsed(),
        });

        Ok(TransportReply {
            response: HttpResponse {
                status,
                headers: response_headers,
                body,
            },
            diagnostics,
        })
    }
}

fn apply_headers<Any>(
    mut builder: ureq::RequestBuilder<Any>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<Any> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

/// Serialize the request line and headers the way they go on the wire, for
/// the debug snapshot.
fn format_request_head(
    request: &HttpRequest,
    headers: &[(String, String)],
    options: &TransportOptions,
) -> String {
    let mut head = format!("{} {}\r\n", request.method.as_str(), request.url);
    head.push_str(&format!("User-Agent: {}\r\n", options.user_agent));
    for (name, value) in headers {
        head.push_str(&format!("{name}: {value}\r\n"));
    }
    head
}

/// Replace any caller-supplied Content-Type with the boundary-carrying one.
/// Only the encoder knows the boundary, so its header must win.
fn set_multipart_content_type(headers: &mut Vec<(String, String)>, boundary: &str) {
    headers.retain(|(name, _)| !name.eq_ignore_ascii_case("content-type"));
    headers.push((
        "Content-Type".to_string(),
        format!("multipart/form-data; boundary={boundary}"),
    ));
}

/// Encode fields and parts as a `multipart/form-data` body. File parts are
/// read from disk here, at send time.
fn encode_multipart(
    fields: &[(String, String)],
    parts: &[Part],
    boundary: &str,
) -> Result<Vec<u8>, TransportError> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!("--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                .as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    for part in parts {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                part.field, part.file_name, part.mime
            )
            .as_bytes(),
        );
        match &part.data {
            PartData::Bytes(bytes) => body.extend_from_slice(bytes),
            PartData::File(path) => {
                let bytes = std::fs::read(path).map_err(|e| {
                    TransportError::new(
                        TransportErrorKind::Io,
                        format!("reading {}: {e}", path.display()),
                    )
                })?;
                body.extend_from_slice(&bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    Ok(body)
}

fn to_transport_error(err: ureq::Error) -> TransportError {
    let kind = match &err {
        ureq::Error::Timeout(_) => TransportErrorKind::Timeout,
        ureq::Error::HostNotFound => TransportErrorKind::Dns,
        ureq::Error::ConnectionFailed => TransportErrorKind::Connect,
        ureq::Error::TooManyRedirects => TransportErrorKind::TooManyRedirects,
        ureq::Error::Io(_) => TransportErrorKind::Io,
        _ => TransportErrorKind::Other,
    };
    TransportError::new(kind, err.to_string())
}
