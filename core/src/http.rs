//! HTTP transport boundary for the notification client.
//!
//! # Design
//! Requests and responses are described as plain data. The core builds
//! `HttpRequest` values and interprets `HttpResponse` values without ever
//! touching the network — actual I/O happens behind the [`Transport`]
//! trait, which is injected at client construction. A test can substitute
//! a recording fake and assert on the exact requests the client produced.
//!
//! All fields use owned types (`String`, `Vec`) so values can be captured
//! and compared freely in tests.

use std::fmt;

/// HTTP method for a request. The notification API only issues GETs and
/// POSTs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// An outbound HTTP request described as plain data.
///
/// Built by the client per call. Header order is the order the client
/// declared them in; a transport should send them as given.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// Constructed by the transport after executing an `HttpRequest`, then
/// handed back to the client for interpretation.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// A connectivity failure: no HTTP status was received at all.
///
/// The wrapped message is the underlying failure's text, unmodified.
#[derive(Debug)]
pub struct TransportError(pub String);

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for TransportError {}

/// The injected network capability: a single round trip.
///
/// Implementations perform exactly one send per call and return whatever
/// the wire produced — non-2xx statuses come back as data, not errors.
/// Retries, timeouts, and cancellation, if wanted, belong to the
/// implementation; the core never adds them.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}
