//! Instrumenting middleware for the string service.
//!
//! Counts requests and records latency per `(method, error)` into
//! [`ServiceMetrics`]. Count results and the number of bytes removed by
//! `remove_whitespace` are recorded on every call, including failed ones;
//! on the failure path the removed count is computed against an empty
//! output.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use stringsvc_core::{Method, ServiceError, StringService};
use tower::Layer;

use crate::service::metrics::ServiceMetrics;

// ---------------------------------------------------------------------------
// InstrumentingLayer
// ---------------------------------------------------------------------------

/// Tower layer that wraps a `StringService` in [`InstrumentingMiddleware`].
#[derive(Debug, Clone)]
pub struct InstrumentingLayer {
    metrics: Arc<ServiceMetrics>,
}

impl InstrumentingLayer {
    #[must_use]
    pub fn new(metrics: Arc<ServiceMetrics>) -> Self {
        Self { metrics }
    }
}

impl<S> Layer<S> for InstrumentingLayer {
    type Service = InstrumentingMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        InstrumentingMiddleware::new(inner, Arc::clone(&self.metrics))
    }
}

// ---------------------------------------------------------------------------
// InstrumentingMiddleware
// ---------------------------------------------------------------------------

/// `StringService` decorator that records metrics for every call.
#[derive(Debug, Clone)]
pub struct InstrumentingMiddleware<S> {
    next: S,
    metrics: Arc<ServiceMetrics>,
}

impl<S> InstrumentingMiddleware<S> {
    #[must_use]
    pub fn new(next: S, metrics: Arc<ServiceMetrics>) -> Self {
        Self { next, metrics }
    }
}

#[async_trait]
impl<S: StringService> StringService for InstrumentingMiddleware<S> {
    async fn title_case(&self, s: &str) -> Result<String, ServiceError> {
        let begin = Instant::now();
        let output = self.next.title_case(s).await;
        self.metrics.record_request(Method::TitleCase, output.is_err(), begin.elapsed());
        output
    }

    async fn remove_whitespace(&self, s: &str) -> Result<String, ServiceError> {
        let begin = Instant::now();
        let output = self.next.remove_whitespace(s).await;
        let removed = s.len().saturating_sub(output.as_ref().map_or(0, String::len));
        self.metrics.record_request(Method::RemoveWhitespace, output.is_err(), begin.elapsed());
        self.metrics.record_chars_removed(removed);
        output
    }

    async fn count(&self, s: &str) -> usize {
        let begin = Instant::now();
        let n = self.next.count(s).await;
        self.metrics.record_request(Method::Count, false, begin.elapsed());
        self.metrics.record_count_result(n);
        n
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use stringsvc_core::BasicService;

    use super::*;
    use crate::service::metrics::REQUEST_COUNT;
    use crate::testing::{local_metrics, sample};

    #[tokio::test]
    async fn counts_requests_by_outcome() {
        let (metrics, handle) = local_metrics();
        let svc = InstrumentingLayer::new(metrics).layer(BasicService::new());

        svc.title_case("hello").await.unwrap();
        svc.title_case("world").await.unwrap();
        svc.title_case("").await.unwrap_err();

        let rendered = handle.render();
        let ok = [("method", "title_case"), ("error", "false")];
        let failed = [("method", "title_case"), ("error", "true")];
        assert_eq!(sample(&rendered, REQUEST_COUNT, &ok), Some(2.0), "{rendered}");
        assert_eq!(sample(&rendered, REQUEST_COUNT, &failed), Some(1.0), "{rendered}");
        assert_eq!(
            sample(&rendered, "string_service_request_latency_seconds_count", &ok),
            Some(2.0),
            "{rendered}"
        );
    }

    #[tokio::test]
    async fn records_chars_removed() {
        let (metrics, handle) = local_metrics();
        let svc = InstrumentingMiddleware::new(BasicService::new(), metrics);

        assert_eq!(svc.remove_whitespace("a b\tc\n").await.unwrap(), "abc");

        let rendered = handle.render();
        assert_eq!(sample(&rendered, "string_service_chars_removed_sum", &[]), Some(3.0));
    }

    #[tokio::test]
    async fn chars_removed_is_recorded_on_the_error_path() {
        let (metrics, handle) = local_metrics();
        let svc = InstrumentingMiddleware::new(BasicService::new(), metrics);

        svc.remove_whitespace("").await.unwrap_err();

        let rendered = handle.render();
        assert_eq!(sample(&rendered, "string_service_chars_removed_count", &[]), Some(1.0));
        let failed = [("method", "remove_whitespace"), ("error", "true")];
        assert_eq!(sample(&rendered, REQUEST_COUNT, &failed), Some(1.0));
    }

    #[tokio::test]
    async fn records_count_results() {
        let (metrics, handle) = local_metrics();
        let svc = InstrumentingMiddleware::new(BasicService::new(), metrics);

        assert_eq!(svc.count("hello").await, 5);
        assert_eq!(svc.count("").await, 0);

        let rendered = handle.render();
        assert_eq!(sample(&rendered, "string_service_count_result_sum", &[]), Some(5.0));
        assert_eq!(sample(&rendered, "string_service_count_result_count", &[]), Some(2.0));
        let ok = [("method", "count"), ("error", "false")];
        assert_eq!(sample(&rendered, REQUEST_COUNT, &ok), Some(2.0));
    }
}
