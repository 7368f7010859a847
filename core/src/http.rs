//! HTTP transport boundary.
//!
//! # Design
//! Requests and responses are described as plain data. The client builds
//! `HttpRequest` values and interprets `HttpResponse` values; the actual
//! round-trip is performed by a [`Transport`] implementation injected into
//! each service at construction. `HttpRequest.path` is server-relative and
//! already carries any query string — the transport only resolves it against
//! its configured base URL.
//!
//! Transports return non-2xx responses as data rather than errors; status
//! interpretation belongs to the parsing layer. All fields use owned types
//! (`String`, `Vec`) so values can be recorded and replayed in tests.

use crate::error::PodioError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Request carrying a JSON body and the matching content-type header.
    pub fn with_json_body(method: HttpMethod, path: impl Into<String>, body: String) -> Self {
        Self {
            method,
            path: path.into(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        }
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// The external collaborator that executes HTTP round-trips.
///
/// Implementations own the base URL, connection handling, and any
/// authentication. Connect-level failures surface as
/// [`PodioError::Transport`]; non-success statuses come back as data.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, PodioError>;

    fn get(&self, path: &str) -> Result<HttpResponse, PodioError> {
        tracing::debug!(path, "GET");
        self.execute(HttpRequest::new(HttpMethod::Get, path))
    }

    fn post(&self, path: &str, body: Option<String>) -> Result<HttpResponse, PodioError> {
        tracing::debug!(path, "POST");
        match body {
            Some(body) => self.execute(HttpRequest::with_json_body(HttpMethod::Post, path, body)),
            None => self.execute(HttpRequest::new(HttpMethod::Post, path)),
        }
    }

    fn put(&self, path: &str, body: Option<String>) -> Result<HttpResponse, PodioError> {
        tracing::debug!(path, "PUT");
        match body {
            Some(body) => self.execute(HttpRequest::with_json_body(HttpMethod::Put, path, body)),
            None => self.execute(HttpRequest::new(HttpMethod::Put, path)),
        }
    }

    fn delete(&self, path: &str) -> Result<HttpResponse, PodioError> {
        tracing::debug!(path, "DELETE");
        self.execute(HttpRequest::new(HttpMethod::Delete, path))
    }
}
