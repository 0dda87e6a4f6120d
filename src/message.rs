//! HTTP message types.
//!
//! Provides [`Method`], [`Request`], [`Response`], and the keyed composite
//! forms [`MultiRequest`] / [`MultiResponse`] used by the multiplexer.
//!
//! Header collections are ordered `(name, value)` pairs: insertion order and
//! duplicate names survive a round trip through the wire untouched.

use std::fmt;

use crate::error::ConfigError;

/// HTTP request method.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// HEAD
    Head,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
    /// CONNECT
    Connect,
    /// OPTIONS
    Options,
    /// TRACE
    Trace,
    /// PATCH
    Patch,
    /// Extension method not covered by the standard set.
    Extension(String),
}

impl Method {
    /// Parse a method from its ASCII representation.
    #[must_use]
    pub fn from_bytes(src: &[u8]) -> Option<Self> {
        match src {
            b"GET" => Some(Self::Get),
            b"HEAD" => Some(Self::Head),
            b"POST" => Some(Self::Post),
            b"PUT" => Some(Self::Put),
            b"DELETE" => Some(Self::Delete),
            b"CONNECT" => Some(Self::Connect),
            b"OPTIONS" => Some(Self::Options),
            b"TRACE" => Some(Self::Trace),
            b"PATCH" => Some(Self::Patch),
            other => std::str::from_utf8(other)
                .ok()
                .map(|s| Self::Extension(s.to_owned())),
        }
    }

    /// Returns the method as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Connect => "CONNECT",
            Self::Options => "OPTIONS",
            Self::Trace => "TRACE",
            Self::Patch => "PATCH",
            Self::Extension(s) => s,
        }
    }

    /// Returns true for methods that carry no request body on the wire.
    #[must_use]
    pub fn is_bodyless(&self) -> bool {
        matches!(self, Self::Get | Self::Head)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An abstract HTTP request, owned by the caller and read-only to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// HTTP method (GET, POST, etc.).
    pub method: Method,
    /// Target URI (absolute, e.g. `https://example.test/path`).
    pub uri: String,
    /// Request headers as ordered name-value pairs.
    pub headers: Vec<(String, String)>,
    /// Request body bytes.
    pub body: Vec<u8>,
}

impl Request {
    /// Create a request with the given method and target URI.
    #[must_use]
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Append a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the request body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }
}

/// Caller-chosen key identifying one request inside a [`MultiRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RequestKey {
    /// Positional key.
    Ordinal(usize),
    /// Named key.
    Name(String),
}

impl From<usize> for RequestKey {
    fn from(index: usize) -> Self {
        Self::Ordinal(index)
    }
}

impl From<&str> for RequestKey {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for RequestKey {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ordinal(index) => write!(f, "{index}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// A non-empty keyed set of requests executed concurrently.
///
/// Keys are preserved through execution: the resulting [`MultiResponse`]
/// carries exactly the same key set.
#[derive(Debug, Clone)]
pub struct MultiRequest {
    entries: Vec<(RequestKey, Request)>,
}

impl MultiRequest {
    /// Create a multi-request from keyed entries.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyMultiRequest`] if `entries` is empty.
    pub fn new(entries: Vec<(RequestKey, Request)>) -> Result<Self, ConfigError> {
        if entries.is_empty() {
            return Err(ConfigError::EmptyMultiRequest);
        }
        Ok(Self { entries })
    }

    /// Create a multi-request from requests keyed by position.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyMultiRequest`] if `requests` is empty.
    pub fn from_requests(requests: Vec<Request>) -> Result<Self, ConfigError> {
        Self::new(
            requests
                .into_iter()
                .enumerate()
                .map(|(index, request)| (RequestKey::Ordinal(index), request))
                .collect(),
        )
    }

    /// Number of entries; never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; kept for API symmetry with collections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&RequestKey, &Request)> {
        self.entries.iter().map(|(key, request)| (key, request))
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &RequestKey> {
        self.entries.iter().map(|(key, _)| key)
    }

    /// Look up a request by key.
    #[must_use]
    pub fn get(&self, key: &RequestKey) -> Option<&Request> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, request)| request)
    }
}

/// A structured HTTP response.
///
/// Every successful transfer also carries the synthetic
/// `X-Request-Time: <millis, 3 decimals> ms` header recording the elapsed
/// transfer time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status code (e.g. 200, 404). Never zero for an engine-built response.
    pub status: u16,
    /// Response headers as ordered name-value pairs.
    pub headers: Vec<(String, String)>,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl Response {
    /// Create an empty response with the given status code.
    #[must_use]
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Append a header, preserving any existing values for the same name.
    pub fn push_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    /// All values for a header name, in order (case-insensitive lookup).
    #[must_use]
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
            .collect()
    }

    /// First value for a header name, if present (case-insensitive lookup).
    #[must_use]
    pub fn first_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Responses for a [`MultiRequest`], keyed identically to the input.
#[derive(Debug, Clone)]
pub struct MultiResponse {
    entries: Vec<(RequestKey, Response)>,
}

impl MultiResponse {
    pub(crate) fn new(entries: Vec<(RequestKey, Response)>) -> Self {
        debug_assert!(!entries.is_empty());
        Self { entries }
    }

    /// Number of entries; equals the originating request count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; a multi-response mirrors a non-empty multi-request.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate entries in completion-reap order.
    pub fn iter(&self) -> impl Iterator<Item = (&RequestKey, &Response)> {
        self.entries.iter().map(|(key, response)| (key, response))
    }

    /// Keys in reap order.
    pub fn keys(&self) -> impl Iterator<Item = &RequestKey> {
        self.entries.iter().map(|(key, _)| key)
    }

    /// Look up a response by key.
    #[must_use]
    pub fn get(&self, key: &RequestKey) -> Option<&Response> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, response)| response)
    }
}

/// A dispatchable payload: one request or a keyed group.
///
/// The executor branches on the variant, keeping the single and multiplexed
/// paths statically distinguishable.
#[derive(Debug, Clone)]
pub enum Outbound {
    /// One request, executed synchronously.
    Single(Request),
    /// A keyed group, executed concurrently.
    Multi(MultiRequest),
}

/// The result shape matching an [`Outbound`] payload.
#[derive(Debug, Clone)]
pub enum Inbound {
    /// Response to [`Outbound::Single`].
    Single(Response),
    /// Responses to [`Outbound::Multi`].
    Multi(MultiResponse),
}
