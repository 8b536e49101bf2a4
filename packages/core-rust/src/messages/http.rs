//! HTTP transport schema pieces shared by the server binding and the client.

use serde::{Deserialize, Serialize};

/// Route serving the Prometheus text exposition.
pub const METRICS_ROUTE: &str = "/metrics";

/// Body of every non-success HTTP response.
///
/// Domain errors never use this shape; they are embedded in a `200 OK`
/// response body instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_wire_shape() {
        let body = ErrorBody::new("decode request: EOF");
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"error":"decode request: EOF"}"#
        );
    }
}
