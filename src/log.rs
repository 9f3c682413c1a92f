//! The logging port.
//!
//! jsonwire does not own a logger. It talks to one through [`Log`], which has
//! exactly two one-way entry points: "here is a payload at debug level" and
//! "here is a recoverable error". Neither returns anything, so a slow or
//! broken logger can never fail a request.
//!
//! [`TracingLog`] is the default and forwards to [`tracing`]. Install a
//! subscriber in your binary to see the records:
//!
//! ```rust,ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("jsonwire=debug")
//!     .init();
//! ```

use std::error::Error;

use tracing::{Level, debug, warn};

use crate::payload::Loggable;

/// Sink for payloads and recoverable errors.
///
/// Implement this to route boundary traffic somewhere other than `tracing`:
/// an audit trail, a test recorder, a sampler. Implementations must not
/// block for long; callers do not wait on any outcome.
pub trait Log: Send + Sync + 'static {
    /// Submit a payload at debug level.
    fn debug(&self, payload: &dyn Loggable);

    /// Report an error that was handled locally.
    fn warning(&self, error: &(dyn Error + 'static));
}

/// [`Log`] backed by the `tracing` macros.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLog;

impl Log for TracingLog {
    fn debug(&self, payload: &dyn Loggable) {
        // Serializing is the expensive part; skip it when nobody listens.
        if !payload.is_loggable() || !tracing::enabled!(Level::DEBUG) {
            return;
        }
        debug!(payload = %payload.serialize_compact(), "json payload");
    }

    fn warning(&self, error: &(dyn Error + 'static)) {
        warn!(error = %error, "recoverable error");
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use serde::ser::{Error as _, Serializer};

    use super::*;
    use crate::payload::JsonPayload;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn capture(level: Level, f: impl FnOnce()) -> String {
        let out = Captured::default();
        let writer = out.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        out.text()
    }

    struct Secret;

    impl Loggable for Secret {
        fn is_loggable(&self) -> bool {
            false
        }

        fn serialize_compact(&self) -> String {
            panic!("a payload that is not loggable must not be rendered")
        }
    }

    struct Refuses;

    impl serde::Serialize for Refuses {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("refused"))
        }
    }

    #[test]
    fn debug_records_the_compact_payload() {
        let out = capture(Level::DEBUG, || {
            let value = serde_json::json!({"id": 1});
            TracingLog.debug(&JsonPayload::new(&value, &TracingLog));
        });
        assert!(out.contains("DEBUG"), "{out}");
        assert!(out.contains(r#"payload={"id":1}"#), "{out}");
    }

    #[test]
    fn debug_is_skipped_above_debug_level() {
        let out = capture(Level::INFO, || {
            TracingLog.debug(&JsonPayload::new(&Refuses, &TracingLog));
        });
        assert!(out.is_empty(), "{out}");
    }

    #[test]
    fn payloads_that_opt_out_are_not_rendered() {
        let out = capture(Level::DEBUG, || TracingLog.debug(&Secret));
        assert!(out.is_empty(), "{out}");
    }

    #[test]
    fn compact_failure_surfaces_as_a_warning() {
        let out = capture(Level::DEBUG, || {
            TracingLog.debug(&JsonPayload::new(&Refuses, &TracingLog));
        });
        assert!(out.contains("WARN"), "{out}");
        assert!(out.contains("error=refused"), "{out}");
    }
}
