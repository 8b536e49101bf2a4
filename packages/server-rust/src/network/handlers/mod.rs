//! HTTP handler definitions for the string service.
//!
//! This module defines `AppState` (the shared state carried through axum
//! extractors) and re-exports all handler functions for building the router.

pub mod metrics;
pub mod string;

pub use self::metrics::metrics_handler;
pub use string::{count_handler, remove_whitespace_handler, title_case_handler};

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use stringsvc_core::EndpointSet;

use super::ErrorLogger;

/// Shared application state passed to all axum handlers via `State` extraction.
///
/// Holds `Arc` references and handles, so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Server-side endpoints over the decorated service.
    pub endpoints: EndpointSet,
    /// Renders the process-wide metrics for `GET /metrics`.
    pub metrics: PrometheusHandle,
    /// Receives decode and encode failures.
    pub errors: Arc<dyn ErrorLogger>,
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use metrics_exporter_prometheus::PrometheusBuilder;
    use stringsvc_core::{BasicService, EndpointSet};

    use super::AppState;
    use crate::testing::RecordingErrorLogger;

    /// State over the undecorated core service and a private recorder.
    pub fn test_state() -> (AppState, Arc<RecordingErrorLogger>) {
        let errors = Arc::new(RecordingErrorLogger::default());
        let state = AppState {
            endpoints: EndpointSet::from_service(Arc::new(BasicService::new())),
            metrics: PrometheusBuilder::new().build_recorder().handle(),
            errors: Arc::clone(&errors) as Arc<dyn crate::network::ErrorLogger>,
        };
        (state, errors)
    }
}
