//! Where responses are written.
//!
//! The helpers in [`JsonIo`](crate::JsonIo) need three things from a
//! transport: set a header, write the status line, append body bytes. That is
//! [`ResponseSink`]. Two implementations ship with the crate:
//!
//! - [`Response`], a buffered response that turns into a hyper-ready
//!   `http::Response<Full<Bytes>>` via [`Response::into_inner`];
//! - `http::Response<Vec<u8>>`, for code that already speaks `http` types.

use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::StatusCode;
use http_body_util::Full;
use tracing::warn;

// ── ResponseSink ──────────────────────────────────────────────────────────────

/// The write side of an HTTP exchange.
pub trait ResponseSink {
    /// Set a header, replacing any previous value for `name`.
    fn set_header(&mut self, name: HeaderName, value: HeaderValue);

    /// Write the status line.
    fn write_status(&mut self, status: StatusCode);

    /// Append bytes to the body.
    fn write_body(&mut self, bytes: &[u8]);
}

// ── Response ─────────────────────────────────────────────────────────────────

/// A buffered outgoing response.
///
/// Starts out as an empty `200 OK`. The status line can be written once;
/// later writes are dropped with a warning, the same way a streaming server
/// ignores a status that arrives after the head went out.
///
/// ```rust
/// use jsonwire::{JsonIo, Response};
/// use http::StatusCode;
///
/// let mut res = Response::new();
/// JsonIo::default().write_ok(&mut res, &["a", "b"]);
///
/// assert_eq!(res.status(), StatusCode::OK);
/// assert_eq!(res.body(), b"[\n  \"a\",\n  \"b\"\n]\n");
/// ```
#[derive(Debug, Default)]
pub struct Response {
    body: Vec<u8>,
    headers: HeaderMap,
    status: StatusCode,
    status_written: bool,
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> StatusCode { self.status }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup. `None` for missing or non-visible-ASCII values.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// Converts into the type hyper's `service_fn` expects.
    pub fn into_inner(self) -> http::Response<Full<Bytes>> {
        let mut res = http::Response::new(Full::new(Bytes::from(self.body)));
        *res.status_mut() = self.status;
        *res.headers_mut() = self.headers;
        res
    }
}

impl ResponseSink for Response {
    fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    fn write_status(&mut self, status: StatusCode) {
        if self.status_written {
            warn!(
                current = %self.status,
                ignored = %status,
                "status line already written"
            );
            return;
        }
        self.status = status;
        self.status_written = true;
    }

    fn write_body(&mut self, bytes: &[u8]) {
        self.body.extend_from_slice(bytes);
    }
}

impl From<Response> for http::Response<Full<Bytes>> {
    fn from(res: Response) -> Self { res.into_inner() }
}

// ── http::Response ────────────────────────────────────────────────────────────

impl ResponseSink for http::Response<Vec<u8>> {
    fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers_mut().insert(name, value);
    }

    fn write_status(&mut self, status: StatusCode) {
        *self.status_mut() = status;
    }

    fn write_body(&mut self, bytes: &[u8]) {
        self.body_mut().extend_from_slice(bytes);
    }
}
