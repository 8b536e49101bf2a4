//! Transport bindings, configuration, middleware and lifecycle.

pub mod config;
pub mod error_log;
pub mod handlers;
pub mod middleware;
pub mod module;
pub mod rpc;
pub mod shutdown;

pub use config::*;
pub use error_log::{ErrorLogger, TracingErrorLogger};
pub use handlers::AppState;
pub use module::{build_router, BoundAddrs, NetworkModule};
pub use rpc::RpcServer;
pub use shutdown::*;
