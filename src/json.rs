//! JSON in, JSON out.
//!
//! Every payload that crosses the boundary goes through [`JsonIo`], so every
//! payload also shows up in the debug log, in one place and in one format.
//!
//! ```rust
//! use jsonwire::{JsonIo, Response};
//! use http::StatusCode;
//!
//! #[derive(serde::Deserialize, serde::Serialize, Default)]
//! struct User { id: u32, name: String }
//!
//! let json = JsonIo::default();
//!
//! let mut user = User::default();
//! json.read_json(&br#"{"id": 7, "name": "alice"}"#[..], &mut user).unwrap();
//!
//! let res = json.respond(StatusCode::CREATED, &user);
//! assert_eq!(res.status(), StatusCode::CREATED);
//! assert_eq!(res.header("content-type"), Some("application/json; charset=utf-8"));
//! ```

use std::io::Read;
use std::sync::Arc;

use http::header::{CONTENT_TYPE, HeaderValue};
use http::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::DecodeError;
use crate::log::{Log, TracingLog};
use crate::payload::JsonPayload;
use crate::response::{Response, ResponseSink};

const JSON_UTF8: &str = "application/json; charset=utf-8";
const TEXT_UTF8: &str = "text/plain; charset=utf-8";

/// Response writers and the request decoder, bound to one [`Log`].
///
/// Cheap to clone: the log sits behind an `Arc`. Build one at startup and
/// share it with every handler.
#[derive(Clone)]
pub struct JsonIo {
    log: Arc<dyn Log>,
}

impl JsonIo {
    pub fn new(log: Arc<dyn Log>) -> Self {
        Self { log }
    }

    pub fn log(&self) -> &dyn Log {
        self.log.as_ref()
    }

    /// Writes `value` as pretty JSON with the given status.
    ///
    /// On success the sink receives, in order: `Content-Type: application/json;
    /// charset=utf-8`, `status`, the JSON, and one `\n`. The value is also
    /// submitted to the debug log.
    ///
    /// If `value` cannot be serialized, nothing is logged, `status` is
    /// dropped, and the sink gets a `text/plain` `500` whose body is the
    /// error message.
    pub fn write_response<S, T>(&self, sink: &mut S, status: StatusCode, value: &T)
    where
        S: ResponseSink + ?Sized,
        T: Serialize + ?Sized,
    {
        let payload = JsonPayload::new(value, self.log());

        let out = match payload.serialize_pretty() {
            Ok(out) => out,
            Err(e) => {
                sink.set_header(CONTENT_TYPE, HeaderValue::from_static(TEXT_UTF8));
                sink.write_status(StatusCode::INTERNAL_SERVER_ERROR);
                sink.write_body(e.to_string().as_bytes());
                return;
            }
        };

        self.log.debug(&payload);

        sink.set_header(CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8));
        sink.write_status(status);
        sink.write_body(&out);
        sink.write_body(b"\n");
    }

    /// `200 OK`.
    pub fn write_ok<S, T>(&self, sink: &mut S, value: &T)
    where
        S: ResponseSink + ?Sized,
        T: Serialize + ?Sized,
    {
        self.write_response(sink, StatusCode::OK, value);
    }

    /// `400 Bad Request`, for errors the client caused.
    pub fn write_user_error<S, T>(&self, sink: &mut S, value: &T)
    where
        S: ResponseSink + ?Sized,
        T: Serialize + ?Sized,
    {
        self.write_response(sink, StatusCode::BAD_REQUEST, value);
    }

    /// `500 Internal Server Error`.
    pub fn write_internal_error<S, T>(&self, sink: &mut S, value: &T)
    where
        S: ResponseSink + ?Sized,
        T: Serialize + ?Sized,
    {
        self.write_response(sink, StatusCode::INTERNAL_SERVER_ERROR, value);
    }

    /// [`write_response`](Self::write_response) into a fresh [`Response`].
    pub fn respond<T>(&self, status: StatusCode, value: &T) -> Response
    where
        T: Serialize + ?Sized,
    {
        let mut res = Response::new();
        self.write_response(&mut res, status, value);
        res
    }

    /// [`respond`](Self::respond) with `200 OK`.
    pub fn ok<T>(&self, value: &T) -> Response
    where
        T: Serialize + ?Sized,
    {
        self.respond(StatusCode::OK, value)
    }

    /// Decodes one JSON value from `source` into `destination`.
    ///
    /// Reading stops after the first complete value; whatever follows it in
    /// the stream is left unread. An empty stream is an error.
    ///
    /// The outcome itself, not the decoded value, goes to the debug log:
    /// `null` on success, the error message on failure. `destination` is only
    /// assigned on success.
    pub fn read_json<R, T>(&self, source: R, destination: &mut T) -> Result<(), DecodeError>
    where
        R: Read,
        T: DeserializeOwned,
    {
        let mut de = serde_json::Deserializer::from_reader(source);
        let outcome = serde_path_to_error::deserialize::<_, T>(&mut de)
            .map(|value| *destination = value)
            .map_err(DecodeError::new);

        self.log.debug(&JsonPayload::new(&outcome.as_ref().err(), self.log()));

        outcome
    }
}

impl Default for JsonIo {
    fn default() -> Self {
        Self::new(Arc::new(TracingLog))
    }
}

impl std::fmt::Debug for JsonIo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonIo").finish_non_exhaustive()
    }
}
