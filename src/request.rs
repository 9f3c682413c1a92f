//! Incoming HTTP request, with its body fully buffered.

use bytes::Bytes;
use http::header::HeaderMap;
use http::request::Parts;
use http::Method;
use http_body_util::BodyExt;

use crate::error::BufferError;

/// An incoming request whose body has been read into memory.
///
/// [`body`](Request::body) is what you hand to
/// [`JsonIo::read_json`](crate::JsonIo::read_json): `&[u8]` is a byte stream.
pub struct Request {
    parts: Parts,
    body: Bytes,
}

impl Request {
    /// Reads the whole body of `req`.
    ///
    /// Works with anything hyper can serve, `hyper::body::Incoming` included.
    /// There is no size cap; put one in front of the server if you need it.
    pub async fn buffer<B>(req: http::Request<B>) -> Result<Self, BufferError>
    where
        B: hyper::body::Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let (parts, body) = req.into_parts();
        let body = body
            .collect()
            .await
            .map_err(|e| BufferError(e.into()))?
            .to_bytes();
        Ok(Self { parts, body })
    }

    pub fn from_parts(parts: Parts, body: Bytes) -> Self {
        Self { parts, body }
    }

    pub fn method(&self) -> &Method { &self.parts.method }
    pub fn path(&self) -> &str { self.parts.uri.path() }
    pub fn headers(&self) -> &HeaderMap { &self.parts.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.parts.headers.get(name)?.to_str().ok()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use http_body_util::Full;
    use hyper::body::Frame;

    use super::*;

    /// A body that yields pre-baked chunks, or an error, one frame per poll.
    struct Chunks(VecDeque<std::io::Result<Bytes>>);

    impl hyper::body::Body for Chunks {
        type Data = Bytes;
        type Error = std::io::Error;

        fn poll_frame(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
        ) -> Poll<Option<Result<Frame<Bytes>, Self::Error>>> {
            Poll::Ready(self.0.pop_front().map(|chunk| chunk.map(Frame::data)))
        }
    }

    #[tokio::test]
    async fn buffers_head_and_body() {
        let req = http::Request::post("/users?page=2")
            .header("Content-Type", "application/json")
            .body(Full::new(Bytes::from_static(br#"{"name":"alice"}"#)))
            .unwrap();

        let req = Request::buffer(req).await.unwrap();
        assert_eq!(req.method(), &Method::POST);
        assert_eq!(req.path(), "/users");
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.body(), br#"{"name":"alice"}"#);
    }

    #[tokio::test]
    async fn joins_chunked_bodies() {
        let chunks = ["[1,", "2,", "3]"]
            .into_iter()
            .map(|c| Ok(Bytes::from_static(c.as_bytes())))
            .collect();
        let req = http::Request::put("/numbers").body(Chunks(chunks)).unwrap();

        let req = Request::buffer(req).await.unwrap();
        assert_eq!(req.body(), b"[1,2,3]");
    }

    #[tokio::test]
    async fn body_failure_is_a_buffer_error() {
        let chunks = VecDeque::from([
            Ok(Bytes::from_static(b"[1,")),
            Err(std::io::Error::other("connection reset")),
        ]);
        let req = http::Request::post("/").body(Chunks(chunks)).unwrap();

        let err = Request::buffer(req).await.err().unwrap();
        assert_eq!(err.to_string(), "failed to buffer the request body");
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "connection reset");
    }

    #[test]
    fn from_parts_keeps_the_body() {
        let (parts, ()) = http::Request::get("/healthz").body(()).unwrap().into_parts();
        let req = Request::from_parts(parts, Bytes::from_static(b"null"));
        assert_eq!(req.path(), "/healthz");
        assert_eq!(req.body(), b"null");
    }
}
