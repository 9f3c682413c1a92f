//! # jsonwire
//!
//! JSON at the edge of an HTTP service, written the same way every time.
//!
//! Handlers should not each decide how to pretty-print a body, what to do
//! when serialization blows up, or whether to log what they sent. jsonwire
//! decides once:
//!
//! - **Responses** are two-space indented JSON, `application/json;
//!   charset=utf-8`, with a trailing newline.
//! - **A value that cannot be serialized** becomes a plain-text `500` carrying
//!   the error message. The status you asked for is dropped.
//! - **Request bodies** decode into a destination you own; the decode error,
//!   if any, comes back to you.
//! - **Every payload**, both directions, goes to a debug log through one
//!   injected [`Log`]. By default that is [`tracing`].
//!
//! What jsonwire leaves to you: routing, authentication, content
//! negotiation and body-size limits.
//!
//! ## Quick start
//!
//! ```rust
//! use jsonwire::{JsonIo, Request, Response};
//!
//! #[derive(serde::Deserialize, serde::Serialize, Default)]
//! struct NewUser { name: String }
//!
//! fn create_user(json: &JsonIo, req: &Request) -> Response {
//!     let mut input = NewUser::default();
//!     if let Err(e) = json.read_json(req.body(), &mut input) {
//!         let mut res = Response::new();
//!         json.write_user_error(&mut res, &serde_json::json!({ "error": e.to_string() }));
//!         return res;
//!     }
//!     json.ok(&input)
//! }
//! ```
//!
//! Any transport works as long as it implements [`ResponseSink`];
//! [`Response`] is the buffered one that converts into a hyper response.

mod error;
mod finite;
mod json;
mod log;
mod payload;
mod request;
mod response;

pub use error::{BufferError, DecodeError, DecodeErrorKind, SerializationError};
pub use json::JsonIo;
pub use log::{Log, TracingLog};
pub use payload::{JsonPayload, Loggable};
pub use request::Request;
pub use response::{Response, ResponseSink};
