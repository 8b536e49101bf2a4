//! Error taxonomy shared by the service, its endpoints and every transport.
//!
//! Two failure channels exist and are kept apart on the server side:
//! - [`ServiceError`] is what a `StringService` call returns. `EmptyInput` is a
//!   business precondition failure and travels inside response payloads.
//! - [`TransportError`] is a call-level failure raised by codecs and
//!   connections. It is the only error an `Endpoint` returns.
//!
//! The client stub collapses both channels back into `ServiceError`.

use std::time::Duration;

/// Errors returned by `StringService` operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// The operation was invoked on an empty string.
    #[error("empty string")]
    EmptyInput,
    /// A domain error reported by a remote service that has no local variant.
    #[error("{0}")]
    Domain(String),
    /// The call failed below the business layer.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ServiceError {
    /// Rebuilds a domain error from the message embedded in a response.
    #[must_use]
    pub fn from_message(message: &str) -> Self {
        if message == Self::EmptyInput.to_string() {
            Self::EmptyInput
        } else {
            Self::Domain(message.to_string())
        }
    }

    /// Returns `true` for business precondition failures.
    #[must_use]
    pub fn is_domain(&self) -> bool {
        matches!(self, Self::EmptyInput | Self::Domain(_))
    }
}

/// Call-level failures produced by codecs and connections.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("decode request: {0}")]
    DecodeRequest(String),
    #[error("encode request: {0}")]
    EncodeRequest(String),
    #[error("decode response: {0}")]
    DecodeResponse(String),
    #[error("encode response: {0}")]
    EncodeResponse(String),
    #[error("unknown method {service}/{method}")]
    UnknownMethod { service: String, method: String },
    #[error("unexpected status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("remote error: {0}")]
    Remote(String),
    #[error("connection: {0}")]
    Connection(String),
    #[error("dial timed out after {0:?}")]
    DialTimeout(Duration),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_message_matches_wire_text() {
        assert_eq!(ServiceError::EmptyInput.to_string(), "empty string");
    }

    #[test]
    fn from_message_recovers_empty_input() {
        assert_eq!(ServiceError::from_message("empty string"), ServiceError::EmptyInput);
        assert_eq!(
            ServiceError::from_message("something else"),
            ServiceError::Domain("something else".to_string())
        );
    }

    #[test]
    fn transport_errors_are_not_domain_errors() {
        let err = ServiceError::from(TransportError::Connection("reset".into()));
        assert!(!err.is_domain());
        assert_eq!(err.to_string(), "connection: reset");
        assert!(ServiceError::EmptyInput.is_domain());
    }
}
