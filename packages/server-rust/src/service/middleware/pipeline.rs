//! Pipeline composition: wraps the core service with every middleware layer.

use std::sync::Arc;

use stringsvc_core::{BasicService, StringService};
use tower::ServiceBuilder;

use super::instrumenting::InstrumentingLayer;
use super::logging::LoggingLayer;
use crate::service::metrics::ServiceMetrics;

/// Decorates `core` with the middleware stack.
///
/// Layer order (outermost to innermost):
/// 1. `InstrumentingLayer` -- counts the call and times it, including logging overhead
/// 2. `LoggingLayer` -- one record per call, timed around the core only
///
/// The result is built once at startup and shared by every endpoint.
pub fn decorate<S>(core: S, metrics: Arc<ServiceMetrics>) -> Arc<dyn StringService>
where
    S: StringService + 'static,
{
    let svc = ServiceBuilder::new()
        .layer(InstrumentingLayer::new(metrics))
        .layer(LoggingLayer)
        .service(core);
    Arc::new(svc)
}

/// Builds the production service: `BasicService` behind the full middleware stack.
#[must_use]
pub fn build_service_pipeline(metrics: Arc<ServiceMetrics>) -> Arc<dyn StringService> {
    decorate(BasicService::new(), metrics)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
