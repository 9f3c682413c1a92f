//! Self-describing payloads.
//!
//! A [`JsonPayload`] is built right before a value crosses the boundary and
//! dropped right after. It can render the value twice over, with two
//! different failure policies:
//!
//! | Method | Used for | On failure |
//! |---|---|---|
//! | [`serialize_compact`](Loggable::serialize_compact) | debug log | warning + `""` |
//! | [`serialize_pretty`](JsonPayload::serialize_pretty) | HTTP body | `Err` to the caller |
//!
//! Losing a log line is fine. Losing a response body is not.

use serde::Serialize;

use crate::error::SerializationError;
use crate::finite::Finite;
use crate::log::Log;

/// Something a [`Log`] can accept.
///
/// Loggers receive `&dyn Loggable` and ask [`is_loggable`](Loggable::is_loggable)
/// before rendering, so a variant that must stay out of the logs (a
/// credentials payload, say) can opt out without touching any call site.
pub trait Loggable {
    /// Whether this payload may appear in a debug record.
    fn is_loggable(&self) -> bool;

    /// Single-line JSON rendering. Never fails; see the implementor for what
    /// happens to errors.
    fn serialize_compact(&self) -> String;
}

/// A borrowed value paired with the log that hears about its failures.
pub struct JsonPayload<'a, T: ?Sized> {
    value: &'a T,
    log: &'a dyn Log,
}

impl<'a, T> JsonPayload<'a, T>
where
    T: Serialize + ?Sized,
{
    pub fn new(value: &'a T, log: &'a dyn Log) -> Self {
        Self { value, log }
    }

    /// Two-space indented JSON. NaN and infinities are errors, not `null`.
    pub fn serialize_pretty(&self) -> Result<Vec<u8>, SerializationError> {
        Ok(serde_json::to_vec_pretty(&Finite(self.value))?)
    }
}

impl<T> Loggable for JsonPayload<'_, T>
where
    T: Serialize + ?Sized,
{
    fn is_loggable(&self) -> bool {
        true
    }

    /// Compact JSON. Errors go to [`Log::warning`] and yield an empty string.
    fn serialize_compact(&self) -> String {
        match serde_json::to_string(&Finite(self.value)) {
            Ok(out) => out,
            Err(e) => {
                self.log.warning(&SerializationError::from(e));
                String::new()
            }
        }
    }
}
