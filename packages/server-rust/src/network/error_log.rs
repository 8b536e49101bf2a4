//! Transport-level error reporting.
//!
//! Transports report failures that never reach the service (undecodable
//! requests, unknown methods, unencodable responses) through an
//! [`ErrorLogger`]. Domain errors are not reported here: they travel back
//! to the caller inside the response.

use std::fmt;

use stringsvc_core::TransportError;
use tracing::warn;

/// Sink for transport-level failures.
pub trait ErrorLogger: Send + Sync + fmt::Debug {
    /// Records one failure observed by `transport` (`"HTTP"` or `"RPC"`).
    fn log(&self, transport: &'static str, err: &TransportError) {
        warn!(transport, err = %err, "transport error");
    }
}

/// Error logger that emits a `tracing` warning per failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorLogger;

impl ErrorLogger for TracingErrorLogger {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::LogCapture;

    #[test]
    fn tracing_logger_writes_transport_and_error() {
        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());

        TracingErrorLogger.log("HTTP", &TransportError::DecodeRequest("eof".into()));

        let records = capture.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["level"], "WARN");
        assert_eq!(records[0]["fields"]["transport"], "HTTP");
        assert!(records[0]["fields"]["err"]
            .as_str()
            .unwrap()
            .contains("eof"));
    }
}
