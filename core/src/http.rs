//! Plain-data HTTP request/response types.
//!
//! # Design
//! The client builds `HttpRequest` values and parses `HttpResponse` values
//! as pure data; the transport module is the only place that touches the
//! network. This keeps request shaping and response handling deterministic
//! and testable without a server.
//!
//! All fields use owned types (`String`, `Vec`) so values can be moved
//! freely between the build, execute, and parse stages.

/// HTTP method for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

/// An HTTP request described as plain data.
///
/// Built by `EtoileClient::build_*` methods and executed by the transport,
/// or by an embedding host that performs its own I/O.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// Produced by the transport (or the embedding host) and consumed by
/// `EtoileClient::parse_*` methods.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// True when the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
