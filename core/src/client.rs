//! Fluent, single-shot HTTP client.
//!
//! # Design
//! `HttpClient` accumulates request intent through chained setters, then
//! `execute` assembles one [`HttpRequest`] and performs one blocking
//! round-trip through the [`Transport`] seam. Configuration is write-only
//! until execution; the result accessors are empty until then. One instance
//! corresponds to exactly one execution — a second `execute` is an error,
//! and `reset` wipes both configuration and results for deliberate reuse.
//!
//! The HTTP verb is normally implied by which parameter setter was used
//! (POST data beats PUT data beats DELETE data, default GET), with
//! `set_method` available as the explicit override.

use std::path::Path;

use crate::error::{Error, TransportError};
use crate::headers::HeaderMap;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Part, RequestBody};
use crate::mime::MimeType;
use crate::params::{ParamMap, ParamValue};
use crate::query;
use crate::response::{decode, Decoded, ResponseFormat};
use crate::status;
use crate::transport::{
    Diagnostics, Transport, TransportOption, TransportOptions, UreqTransport,
};

/// Everything `execute` leaves behind.
struct Outcome {
    response: HttpResponse,
    transport_error: Option<TransportError>,
    diagnostics: Option<Diagnostics>,
}

/// Post-execution debug snapshot, in one place.
#[derive(Debug, Clone)]
pub struct DebugReport {
    /// HTTP status of the last transfer; 0 when the transfer itself failed.
    pub code: u16,
    /// curl-style errno of the transport failure; 0 when none.
    pub errno: u32,
    /// Transport failure message, when the transfer failed.
    pub error: Option<String>,
    /// Wire-level capture, present when debug mode was enabled.
    pub diagnostics: Option<Diagnostics>,
}

/// Builder-style blocking HTTP client for one request/response cycle.
///
/// ```no_run
/// use httpfluent_core::HttpClient;
///
/// let mut client = HttpClient::new();
/// client
///     .set_url("https://api.example.com/users?page=1")
///     .set_mime("json");
/// client.execute()?;
/// let (is_error, message) = client.parse_code()?;
/// # Ok::<(), httpfluent_core::Error>(())
/// ```
pub struct HttpClient {
    transport: Box<dyn Transport>,
    url: Option<String>,
    mime: MimeType,
    utf8: bool,
    headers: HeaderMap,
    options: TransportOptions,
    method_override: Option<HttpMethod>,
    get_params: ParamMap,
    post_params: ParamMap,
    put_params: ParamMap,
    delete_params: ParamMap,
    post_raw: Option<String>,
    parts: Vec<Part>,
    encode_failure: Option<String>,
    debug_enabled: bool,
    outcome: Option<Outcome>,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Client backed by the default ureq transport.
    pub fn new() -> Self {
        Self::with_transport(Box::new(UreqTransport))
    }

    /// Client backed by a caller-supplied transport. Used by tests and by
    /// embedders that bring their own HTTP engine.
    pub fn with_transport(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            url: None,
            mime: MimeType::default(),
            utf8: false,
            headers: HeaderMap::new(),
            options: TransportOptions::default(),
            method_override: None,
            get_params: ParamMap::new(),
            put_params: ParamMap::new(),
            post_params: ParamMap::new(),
            delete_params: ParamMap::new(),
            post_raw: None,
            parts: Vec::new(),
            encode_failure: None,
            debug_enabled: false,
            outcome: None,
        }
    }

    // --- configuration -----------------------------------------------------

    pub fn set_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.url = Some(url.into());
        self
    }

    /// Select the body encoding by shorthand token or literal MIME string;
    /// unrecognized input falls back to JSON.
    pub fn set_mime(&mut self, token: &str) -> &mut Self {
        self.mime = MimeType::resolve(token);
        self
    }

    /// Append `; charset=utf-8` to the Content-Type header.
    pub fn set_utf8(&mut self) -> &mut Self {
        self.utf8 = true;
        self
    }

    /// Capture wire-level diagnostics during execution.
    pub fn set_debug(&mut self) -> &mut Self {
        self.debug_enabled = true;
        self
    }

    /// Explicitly pick the HTTP verb, overriding the which-setter-was-used
    /// resolution.
    pub fn set_method(&mut self, method: HttpMethod) -> &mut Self {
        self.method_override = Some(method);
        self
    }

    /// Merge headers, normalizing names to Proper-Case.
    pub fn set_headers<K, V, I>(&mut self, headers: I) -> &mut Self
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (name, value) in headers {
            self.headers.set(name.as_ref(), value);
        }
        self
    }

    /// Merge headers without normalizing their names.
    pub fn set_headers_raw<K, V, I>(&mut self, headers: I) -> &mut Self
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (name, value) in headers {
            self.headers.set_raw(name.as_ref(), value);
        }
        self
    }

    /// Add a repeated header without replacing existing entries of the same
    /// name.
    pub fn append_header(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        self.headers.append(name, value);
        self
    }

    /// Apply one transport tuning knob.
    pub fn set_option(&mut self, option: TransportOption) -> &mut Self {
        self.options.apply(option);
        self
    }

    /// Apply several transport tuning knobs.
    pub fn set_options(&mut self, options: impl IntoIterator<Item = TransportOption>) -> &mut Self {
        for option in options {
            self.options.apply(option);
        }
        self
    }

    /// Supply a pre-serialized body verbatim. Implies POST and overrides
    /// structured body parameters.
    pub fn set_post_raw(&mut self, raw: impl Into<String>) -> &mut Self {
        self.post_raw = Some(raw.into());
        self
    }

    /// Serialize an arbitrary structure as the JSON request body. A
    /// serialization failure is remembered and surfaces as
    /// [`Error::Encoding`] from `execute`, before any network I/O.
    pub fn set_post_json<T: serde::Serialize + ?Sized>(&mut self, body: &T) -> &mut Self {
        match serde_json::to_string(body) {
            Ok(serialized) => self.post_raw = Some(serialized),
            Err(e) => self.encode_failure = Some(e.to_string()),
        }
        self
    }

    /// Merge POST body parameters. Implies POST.
    pub fn set_post_params<K, V, I>(&mut self, params: I) -> &mut Self
    where
        K: Into<String>,
        V: Into<ParamValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.post_params.merge(params);
        self
    }

    /// Attach local files as multipart parts, with MIME type and display
    /// name taken from the file itself. Field names are the attachment
    /// index. Implies POST with `multipart/form-data`.
    pub fn set_post_files<I>(&mut self, paths: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: AsRef<Path>,
    {
        for path in paths {
            let field = self.parts.len().to_string();
            self.parts.push(Part::from_path(field, path));
        }
        self.mime = MimeType::Multipart;
        self
    }

    /// Attach one explicitly constructed multipart part. Implies POST with
    /// `multipart/form-data`.
    pub fn add_part(&mut self, part: Part) -> &mut Self {
        self.parts.push(part);
        self.mime = MimeType::Multipart;
        self
    }

    /// Merge URL query parameters. Applied to every verb.
    pub fn set_get_params<K, V, I>(&mut self, params: I) -> &mut Self
    where
        K: Into<String>,
        V: Into<ParamValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.get_params.merge(params);
        self
    }

    /// Merge PUT body parameters. Implies PUT unless POST data is present.
    pub fn set_put_params<K, V, I>(&mut self, params: I) -> &mut Self
    where
        K: Into<String>,
        V: Into<ParamValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.put_params.merge(params);
        self
    }

    /// Merge DELETE body parameters. Lowest verb precedence.
    pub fn set_delete_params<K, V, I>(&mut self, params: I) -> &mut Self
    where
        K: Into<String>,
        V: Into<ParamValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.delete_params.merge(params);
        self
    }

    // --- assembly and execution --------------------------------------------

    /// The verb this configuration resolves to.
    pub fn resolve_method(&self) -> HttpMethod {
        if let Some(method) = self.method_override {
            return method;
        }
        if self.post_raw.is_some() || !self.post_params.is_empty() || !self.parts.is_empty() {
            HttpMethod::Post
        } else if !self.put_params.is_empty() {
            HttpMethod::Put
        } else if !self.delete_params.is_empty() {
            HttpMethod::Delete
        } else {
            HttpMethod::Get
        }
    }

    /// Assemble the outbound request without executing it.
    pub fn build_request(&self) -> Result<HttpRequest, Error> {
        let base = self.url.as_deref().ok_or(Error::MissingUrl)?;
        let url = query::merge_query(base, &self.get_params)?;
        let method = self.resolve_method();
        let body = self.prepare_body(method)?;

        let mut headers = self.headers.clone();
        if let Some(RequestBody::Text { content_type, .. }) = &body {
            headers.set("Content-Type", content_type.clone());
        }
        // Multipart leaves Content-Type to the transport, which owns the
        // boundary.

        Ok(HttpRequest {
            method,
            url,
            headers: headers.into_entries(),
            body,
        })
    }

    fn prepare_body(&self, method: HttpMethod) -> Result<Option<RequestBody>, Error> {
        if method == HttpMethod::Get {
            return Ok(None);
        }
        // A raw body wins for every verb that carries one, including an
        // explicit override to PUT or DELETE.
        if let Some(raw) = &self.post_raw {
            return Ok(Some(RequestBody::Text {
                content: raw.clone(),
                content_type: self.mime.content_type(self.utf8),
            }));
        }
        let params = match method {
            HttpMethod::Get => return Ok(None),
            HttpMethod::Post => {
                if !self.parts.is_empty() || self.mime == MimeType::Multipart {
                    return Ok(Some(RequestBody::Multipart {
                        fields: self.post_params.flat_pairs(),
                        parts: self.parts.clone(),
                    }));
                }
                &self.post_params
            }
            HttpMethod::Put => &self.put_params,
            HttpMethod::Delete => &self.delete_params,
        };

        let content = if self.mime == MimeType::Json {
            params.to_json().map_err(|e| Error::Encoding {
                message: e.to_string(),
            })?
        } else {
            params.to_form()
        };
        Ok(Some(RequestBody::Text {
            content,
            content_type: self.mime.content_type(self.utf8),
        }))
    }

    /// Perform the one blocking round-trip.
    ///
    /// Returns `Err` only for configuration and encoding problems, all
    /// detected before any network I/O. A transfer that fails on the wire
    /// returns `Ok` with the failure recorded for [`transport_error`] and
    /// [`debug`](Self::debug); a non-2xx status is a normal response.
    ///
    /// [`transport_error`]: Self::transport_error
    pub fn execute(&mut self) -> Result<(), Error> {
        if self.outcome.is_some() {
            return Err(Error::AlreadyExecuted);
        }
        if let Some(message) = &self.encode_failure {
            return Err(Error::Encoding {
                message: message.clone(),
            });
        }

        let request = self.build_request()?;
        log::debug!("{} {}", request.method.as_str(), request.url);

        match self
            .transport
            .send(&request, &self.options, self.debug_enabled)
        {
            Ok(reply) => {
                log::debug!("{} <- {}", reply.response.status, request.url);
                self.outcome = Some(Outcome {
                    response: reply.response,
                    transport_error: None,
                    diagnostics: reply.diagnostics,
                });
            }
            Err(error) => {
                log::warn!("transport failure for {}: {error}", request.url);
                self.outcome = Some(Outcome {
                    response: HttpResponse {
                        status: 0,
                        headers: Vec::new(),
                        body: String::new(),
                    },
                    transport_error: Some(error),
                    diagnostics: None,
                });
            }
        }
        Ok(())
    }

    /// Clear configuration and results, keeping the transport, for a fresh
    /// request on the same instance.
    pub fn reset(&mut self) -> &mut Self {
        self.url = None;
        self.mime = MimeType::default();
        self.utf8 = false;
        self.headers = HeaderMap::new();
        self.options = TransportOptions::default();
        self.method_override = None;
        self.get_params = ParamMap::new();
        self.post_params = ParamMap::new();
        self.put_params = ParamMap::new();
        self.delete_params = ParamMap::new();
        self.post_raw = None;
        self.parts = Vec::new();
        self.encode_failure = None;
        self.debug_enabled = false;
        self.outcome = None;
        self
    }

    // --- results -----------------------------------------------------------

    /// HTTP status of the last transfer. 0 when the transfer itself failed,
    /// `None` before execution.
    pub fn http_code(&self) -> Option<u16> {
        self.outcome.as_ref().map(|o| o.response.status)
    }

    /// Raw response body.
    pub fn raw_body(&self) -> Option<&str> {
        self.outcome.as_ref().map(|o| o.response.body.as_str())
    }

    /// Response headers as received.
    pub fn response_headers(&self) -> Option<&[(String, String)]> {
        self.outcome.as_ref().map(|o| o.response.headers.as_slice())
    }

    /// The recorded transport failure, if the last transfer had one.
    pub fn transport_error(&self) -> Option<&TransportError> {
        self.outcome.as_ref().and_then(|o| o.transport_error.as_ref())
    }

    /// Classify the captured status code as `(is_error, message)`.
    pub fn parse_code(&self) -> Result<(bool, String), Error> {
        let outcome = self.outcome.as_ref().ok_or(Error::NotExecuted)?;
        Ok(status::parse_code(outcome.response.status))
    }

    /// Decode the response body in the requested format. Repeatable and
    /// side-effect-free.
    pub fn response(&self, format: ResponseFormat) -> Result<Decoded, Error> {
        let outcome = self.outcome.as_ref().ok_or(Error::NotExecuted)?;
        Ok(decode(&outcome.response.body, format))
    }

    /// Debug snapshot of the last execution.
    pub fn debug(&self) -> Result<DebugReport, Error> {
        let outcome = self.outcome.as_ref().ok_or(Error::NotExecuted)?;
        Ok(DebugReport {
            code: outcome.response.status,
            errno: outcome
                .transport_error
                .as_ref()
                .map_or(0, TransportError::errno),
            error: outcome.transport_error.as_ref().map(|e| e.message.clone()),
            diagnostics: outcome.diagnostics.clone(),
        })
    }
}
