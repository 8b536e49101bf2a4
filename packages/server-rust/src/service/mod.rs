//! Service-side composition.
//!
//! 1. **Metrics state** (`metrics`): process-wide counters and histograms
//! 2. **Middleware** (`middleware`): logging and instrumenting decorators
//!
//! Endpoints built over the decorated service come from
//! `stringsvc_core::EndpointSet::from_service`.

pub mod metrics;
pub mod middleware;

pub use self::metrics::ServiceMetrics;
pub use middleware::{build_service_pipeline, decorate};
