//! Process-wide metrics state for the string service.
//!
//! Handles are resolved once against the recorder that is current when
//! [`ServiceMetrics::register`] runs, so the hot path never looks metrics up
//! by name. Every handle is atomic; the struct is shared through an `Arc`
//! by all concurrent requests.

use std::fmt;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram, Counter, Histogram, Unit};
use stringsvc_core::Method;

pub const REQUEST_COUNT: &str = "string_service_request_count";
pub const REQUEST_LATENCY: &str = "string_service_request_latency_seconds";
pub const COUNT_RESULT: &str = "string_service_count_result";
pub const CHARS_REMOVED: &str = "string_service_chars_removed";

/// Counter and latency histogram pair for one `(method, error)` label set.
#[derive(Clone)]
struct Outcome {
    requests: Counter,
    latency: Histogram,
}

impl Outcome {
    fn register(method: Method, error: &'static str) -> Self {
        let method = method.as_str();
        Self {
            requests: counter!(REQUEST_COUNT, "method" => method, "error" => error),
            latency: histogram!(REQUEST_LATENCY, "method" => method, "error" => error),
        }
    }
}

#[derive(Clone)]
struct MethodMetrics {
    ok: Outcome,
    failed: Outcome,
}

impl MethodMetrics {
    fn register(method: Method) -> Self {
        Self {
            ok: Outcome::register(method, "false"),
            failed: Outcome::register(method, "true"),
        }
    }
}

/// Request counters and histograms, created once at startup and never reset.
#[derive(Clone)]
pub struct ServiceMetrics {
    title_case: MethodMetrics,
    remove_whitespace: MethodMetrics,
    count: MethodMetrics,
    count_result: Histogram,
    chars_removed: Histogram,
}

impl ServiceMetrics {
    /// Describes and registers every series with the current recorder.
    ///
    /// Call after the global recorder is installed, or inside
    /// `metrics::with_local_recorder` in tests.
    #[must_use]
    pub fn register() -> Self {
        describe_counter!(REQUEST_COUNT, "Number of requests received.");
        describe_histogram!(
            REQUEST_LATENCY,
            Unit::Seconds,
            "Total duration of requests in seconds."
        );
        describe_histogram!(COUNT_RESULT, "The result of each count method.");
        describe_histogram!(
            CHARS_REMOVED,
            "The number of chars removed by whitespace remover."
        );

        Self {
            title_case: MethodMetrics::register(Method::TitleCase),
            remove_whitespace: MethodMetrics::register(Method::RemoveWhitespace),
            count: MethodMetrics::register(Method::Count),
            count_result: histogram!(COUNT_RESULT),
            chars_removed: histogram!(CHARS_REMOVED),
        }
    }

    fn method(&self, method: Method) -> &MethodMetrics {
        match method {
            Method::TitleCase => &self.title_case,
            Method::RemoveWhitespace => &self.remove_whitespace,
            Method::Count => &self.count,
        }
    }

    /// Counts one request and records its latency.
    pub fn record_request(&self, method: Method, failed: bool, elapsed: Duration) {
        let metrics = self.method(method);
        let outcome = if failed { &metrics.failed } else { &metrics.ok };
        outcome.requests.increment(1);
        outcome.latency.record(elapsed);
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn record_count_result(&self, n: usize) {
        self.count_result.record(n as f64);
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn record_chars_removed(&self, n: usize) {
        self.chars_removed.record(n as f64);
    }
}

impl fmt::Debug for ServiceMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceMetrics").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{local_metrics, sample};

    #[test]
    fn request_counter_is_labelled_by_method_and_error() {
        let (metrics, handle) = local_metrics();
        metrics.record_request(Method::TitleCase, false, Duration::from_millis(2));
        metrics.record_request(Method::TitleCase, true, Duration::from_millis(1));
        metrics.record_request(Method::TitleCase, true, Duration::from_millis(1));

        let rendered = handle.render();
        let ok = [("method", "title_case"), ("error", "false")];
        let failed = [("method", "title_case"), ("error", "true")];
        assert_eq!(sample(&rendered, REQUEST_COUNT, &ok), Some(1.0), "{rendered}");
        assert_eq!(sample(&rendered, REQUEST_COUNT, &failed), Some(2.0), "{rendered}");
    }

    #[test]
    fn distributions_are_recorded() {
        let (metrics, handle) = local_metrics();
        metrics.record_count_result(5);
        metrics.record_chars_removed(3);

        let rendered = handle.render();
        assert_eq!(sample(&rendered, "string_service_count_result_sum", &[]), Some(5.0));
        assert_eq!(sample(&rendered, "string_service_count_result_count", &[]), Some(1.0));
        assert_eq!(sample(&rendered, "string_service_chars_removed_sum", &[]), Some(3.0));
    }

    #[test]
    fn help_text_is_exposed() {
        let (metrics, handle) = local_metrics();
        metrics.record_request(Method::Count, false, Duration::ZERO);
        let rendered = handle.render();
        assert!(
            rendered.contains("# HELP string_service_request_count Number of requests received."),
            "{rendered}"
        );
    }
}
