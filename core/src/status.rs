//! HTTP status interpretation.
//!
//! One data-driven table instead of per-call-site switch statements, so the
//! reason phrases cannot drift between uses.

/// Well-known status codes and their reason phrases. Sorted by code.
const STATUS_MESSAGES: &[(u16, &str)] = &[
    (100, "Continue"),
    (101, "Switching Protocols"),
    (200, "OK"),
    (201, "Created"),
    (202, "Accepted"),
    (203, "Non-Authoritative Information"),
    (204, "No Content"),
    (205, "Reset Content"),
    (206, "Partial Content"),
    (300, "Multiple Choices"),
    (301, "Moved Permanently"),
    (302, "Moved Temporarily"),
    (303, "See Other"),
    (304, "Not Modified"),
    (305, "Use Proxy"),
    (400, "Bad Request"),
    (401, "Unauthorized"),
    (402, "Payment Required"),
    (403, "Forbidden"),
    (404, "Not Found"),
    (405, "Method Not Allowed"),
    (406, "Not Acceptable"),
    (407, "Proxy Authentication Required"),
    (408, "Request Time-out"),
    (409, "Conflict"),
    (410, "Gone"),
    (411, "Length Required"),
    (412, "Precondition Failed"),
    (413, "Request Entity Too Large"),
    (414, "Request-URI Too Large"),
    (415, "Unsupported Media Type"),
    (500, "Internal Server Error"),
    (501, "Not Implemented"),
    (502, "Bad Gateway"),
    (503, "Service Unavailable"),
    (504, "Gateway Time-out"),
    (505, "HTTP Version not supported"),
];

/// Classify a status code as `(is_error, message)`.
///
/// Codes in `[200, 300)` are non-errors; everything else, including 1xx and
/// 3xx, is reported as an error. Unmapped codes get a generated message.
pub fn parse_code(code: u16) -> (bool, String) {
    let is_error = !(200..300).contains(&code);
    let message = match STATUS_MESSAGES.binary_search_by_key(&code, |&(c, _)| c) {
        Ok(idx) => STATUS_MESSAGES[idx].1.to_string(),
        Err(_) => format!("Unknown http status code {code}"),
    };
    (is_error, message)
}
