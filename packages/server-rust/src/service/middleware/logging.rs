//! Logging middleware for the string service.
//!
//! Emits exactly one structured `tracing` event per call, after the wrapped
//! service returns, carrying the method, the input, the output or error, and
//! the elapsed wall-clock time.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use stringsvc_core::{Method, ServiceError, StringService};
use tower::Layer;
use tracing::info;

// ---------------------------------------------------------------------------
// LoggingLayer
// ---------------------------------------------------------------------------

/// Tower layer that wraps a `StringService` in [`LoggingMiddleware`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer;

impl<S> Layer<S> for LoggingLayer {
    type Service = LoggingMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LoggingMiddleware::new(inner)
    }
}

// ---------------------------------------------------------------------------
// LoggingMiddleware
// ---------------------------------------------------------------------------

/// `StringService` decorator that logs every call.
#[derive(Debug, Clone)]
pub struct LoggingMiddleware<S> {
    next: S,
}

impl<S> LoggingMiddleware<S> {
    #[must_use]
    pub fn new(next: S) -> Self {
        Self { next }
    }
}

fn micros(took: Duration) -> u64 {
    u64::try_from(took.as_micros()).unwrap_or(u64::MAX)
}

fn log_string_call(
    method: Method,
    input: &str,
    output: &Result<String, ServiceError>,
    took: Duration,
) {
    let took_us = micros(took);
    match output {
        Ok(output) => info!(
            method = method.as_str(),
            input,
            output = output.as_str(),
            took_us,
            took = ?took,
            "call complete"
        ),
        Err(err) => info!(
            method = method.as_str(),
            input,
            output = "",
            err = %err,
            took_us,
            took = ?took,
            "call complete"
        ),
    }
}

#[async_trait]
impl<S: StringService> StringService for LoggingMiddleware<S> {
    async fn title_case(&self, s: &str) -> Result<String, ServiceError> {
        let begin = Instant::now();
        let output = self.next.title_case(s).await;
        log_string_call(Method::TitleCase, s, &output, begin.elapsed());
        output
    }

    async fn remove_whitespace(&self, s: &str) -> Result<String, ServiceError> {
        let begin = Instant::now();
        let output = self.next.remove_whitespace(s).await;
        log_string_call(Method::RemoveWhitespace, s, &output, begin.elapsed());
        output
    }

    async fn count(&self, s: &str) -> usize {
        let begin = Instant::now();
        let n = self.next.count(s).await;
        let took = begin.elapsed();
        info!(
            method = Method::Count.as_str(),
            input = s,
            n,
            took_us = micros(took),
            took = ?took,
            "call complete"
        );
        n
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
