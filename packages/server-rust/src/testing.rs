//! Test utilities for metrics and log assertions.

use std::io::Write;
use std::sync::{Arc, Mutex};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::fmt::MakeWriter;

use stringsvc_core::TransportError;

use crate::network::ErrorLogger;
use crate::service::ServiceMetrics;

/// Registers a fresh `ServiceMetrics` against a private Prometheus recorder.
///
/// The global recorder is left untouched, so tests stay independent.
pub(crate) fn local_metrics() -> (Arc<ServiceMetrics>, PrometheusHandle) {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    let metrics = metrics::with_local_recorder(&recorder, ServiceMetrics::register);
    (Arc::new(metrics), handle)
}

/// Finds the value of the first sample named `name` carrying all `labels`.
pub(crate) fn sample(rendered: &str, name: &str, labels: &[(&str, &str)]) -> Option<f64> {
    rendered
        .lines()
        .filter(|line| !line.starts_with('#'))
        .find(|line| {
            let series = line.split(' ').next().unwrap_or_default();
            let series_name = series.split('{').next().unwrap_or_default();
            series_name == name
                && labels
                    .iter()
                    .all(|(k, v)| series.contains(&format!("{k}=\"{v}\"")))
        })
        .and_then(|line| line.rsplit(' ').next())
        .and_then(|value| value.parse().ok())
}

/// Captures JSON-formatted log records for inspection.
#[derive(Debug, Clone, Default)]
pub(crate) struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a subscriber writing to this buffer. Use with `set_default()`.
    pub fn subscriber(&self) -> impl tracing::Subscriber {
        tracing_subscriber::fmt()
            .json()
            .with_writer(self.clone())
            .with_ansi(false)
            .finish()
    }

    /// Every captured record, parsed.
    pub fn records(&self) -> Vec<serde_json::Value> {
        let buffer = self.buffer.lock().unwrap();
        String::from_utf8_lossy(&buffer)
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }

    /// The `fields` object of every record whose `fields.method` is set.
    pub fn call_records(&self) -> Vec<serde_json::Value> {
        self.records()
            .into_iter()
            .filter_map(|record| record.get("fields").cloned())
            .filter(|fields| fields.get("method").is_some())
            .collect()
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogCaptureWriter {
            buffer: Arc::clone(&self.buffer),
        }
    }
}

/// Writer that appends to a shared buffer.
pub(crate) struct LogCaptureWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Write for LogCaptureWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Error logger that keeps every reported failure for later assertions.
#[derive(Debug, Default)]
pub(crate) struct RecordingErrorLogger {
    seen: Mutex<Vec<(&'static str, TransportError)>>,
}

impl RecordingErrorLogger {
    pub fn seen(&self) -> Vec<(&'static str, TransportError)> {
        self.seen.lock().unwrap().clone()
    }
}

impl ErrorLogger for RecordingErrorLogger {
    fn log(&self, transport: &'static str, err: &TransportError) {
        self.seen.lock().unwrap().push((transport, err.clone()));
    }
}
