//! `StringService` decorators and their tower layers.
//!
//! - [`instrumenting`]: request counts, latency and result distributions
//! - [`logging`]: one structured `tracing` record per call
//! - [`pipeline`]: composes the layers around the core service

pub mod instrumenting;
pub mod logging;
pub mod pipeline;

pub use instrumenting::{InstrumentingLayer, InstrumentingMiddleware};
pub use logging::{LoggingLayer, LoggingMiddleware};
pub use pipeline::{build_service_pipeline, decorate};
