//! Error types for the JSON boundary.
//!
//! None of these are fatal. A [`SerializationError`] turns into a `500` body,
//! a [`DecodeError`] is handed back to the handler that asked for the body,
//! and a [`BufferError`] means the transport gave up before the body was read.

use serde::{Serialize, Serializer};
use serde_json::error::Category;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A value could not be encoded as JSON.
///
/// Typical causes: a map whose keys are not strings, or a `Serialize` impl
/// that bails out with a custom error.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct SerializationError(#[from] serde_json::Error);

/// A request body could not be decoded into the requested type.
#[derive(Debug, thiserror::Error)]
#[error("failed to decode the body as a JSON document: {source}")]
pub struct DecodeError {
    #[source]
    source: serde_path_to_error::Error<serde_json::Error>,
}

/// What went wrong while decoding, as reported by `serde_json`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum DecodeErrorKind {
    /// The source stream itself failed.
    Io,
    /// The input is not syntactically valid JSON.
    Syntax,
    /// Valid JSON, but the wrong shape for the destination type.
    Data,
    /// The input ended before a complete value was read. Empty bodies land here.
    Eof,
}

impl DecodeError {
    pub(crate) fn new(source: serde_path_to_error::Error<serde_json::Error>) -> Self {
        Self { source }
    }

    pub fn kind(&self) -> DecodeErrorKind {
        match self.source.inner().classify() {
            Category::Io     => DecodeErrorKind::Io,
            Category::Syntax => DecodeErrorKind::Syntax,
            Category::Data   => DecodeErrorKind::Data,
            Category::Eof    => DecodeErrorKind::Eof,
        }
    }

    /// Dotted path to the field that failed, e.g. `user.tags[2]`. `.` for the root.
    pub fn path(&self) -> String {
        self.source.path().to_string()
    }
}

/// Logged as its description, so a decode outcome reads as a plain string.
impl Serialize for DecodeError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The request body stream failed before it was fully buffered.
#[derive(Debug, thiserror::Error)]
#[error("failed to buffer the request body")]
pub struct BufferError(#[source] pub(crate) BoxError);
