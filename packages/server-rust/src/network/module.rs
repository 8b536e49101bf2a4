//! Network module with deferred startup lifecycle.
//!
//! `new()` gathers the endpoints and handles, `start()` binds both TCP
//! listeners, and `serve()` runs the HTTP and RPC transports until the
//! first exit event. Binding separately from serving lets callers learn the
//! OS-assigned ports before any traffic flows.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context as _;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use stringsvc_core::messages::http::METRICS_ROUTE;
use stringsvc_core::{EndpointSet, Method};
use tokio::net::TcpListener;
use tokio::task::JoinError;
use tracing::info;

use super::config::{listen_addr, NetworkConfig};
use super::handlers::{
    count_handler, metrics_handler, remove_whitespace_handler, title_case_handler, AppState,
};
use super::middleware::build_http_layers;
use super::rpc::RpcServer;
use super::shutdown::ExitReason;
use super::{ErrorLogger, TracingErrorLogger};

/// Addresses the transports actually bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundAddrs {
    pub http: SocketAddr,
    pub rpc: SocketAddr,
}

struct Listeners {
    http: TcpListener,
    rpc: TcpListener,
}

/// Assembles the axum router with all routes and middleware.
///
/// Routes:
/// - `POST /tc`, `POST /rw`, `POST /c` -- the string service endpoints
/// - `GET /metrics` -- Prometheus exposition
#[must_use]
pub fn build_router(state: AppState, config: &NetworkConfig) -> Router {
    Router::new()
        .route(Method::TitleCase.http_route(), post(title_case_handler))
        .route(
            Method::RemoveWhitespace.http_route(),
            post(remove_whitespace_handler),
        )
        .route(Method::Count.http_route(), post(count_handler))
        .route(METRICS_ROUTE, get(metrics_handler))
        .layer(build_http_layers(config))
        .with_state(state)
}

/// Runs the HTTP and RPC transports over one [`EndpointSet`].
///
/// Follows the deferred startup pattern:
/// 1. `new()` -- captures configuration, endpoints and the metrics handle
/// 2. `start()` -- binds both listeners
/// 3. `serve()` -- serves until a transport fails or shutdown resolves
pub struct NetworkModule {
    config: NetworkConfig,
    endpoints: EndpointSet,
    metrics: PrometheusHandle,
    errors: Arc<dyn ErrorLogger>,
    listeners: Option<Listeners>,
}

impl NetworkModule {
    /// Creates a new network module without binding any port.
    #[must_use]
    pub fn new(config: NetworkConfig, endpoints: EndpointSet, metrics: PrometheusHandle) -> Self {
        Self {
            config,
            endpoints,
            metrics,
            errors: Arc::new(TracingErrorLogger),
            listeners: None,
        }
    }

    /// Replaces the transport error logger attached to both bindings.
    #[must_use]
    pub fn with_error_logger(mut self, errors: Arc<dyn ErrorLogger>) -> Self {
        self.errors = errors;
        self
    }

    /// Binds the HTTP and RPC listeners.
    ///
    /// Returns the bound addresses, which differ from the configured ones
    /// when port 0 is used.
    ///
    /// # Errors
    ///
    /// Returns an error if either address cannot be bound (e.g., port in use).
    pub async fn start(&mut self) -> anyhow::Result<BoundAddrs> {
        let http_addr = listen_addr(&self.config.http_addr);
        let http = TcpListener::bind(&http_addr)
            .await
            .with_context(|| format!("bind HTTP listener on {http_addr}"))?;
        let rpc_addr = listen_addr(&self.config.rpc_addr);
        let rpc = TcpListener::bind(&rpc_addr)
            .await
            .with_context(|| format!("bind RPC listener on {rpc_addr}"))?;

        let bound = BoundAddrs {
            http: http.local_addr()?,
            rpc: rpc.local_addr()?,
        };
        info!(transport = "HTTP", addr = %bound.http, "listener bound");
        info!(transport = "RPC", addr = %bound.rpc, "listener bound");

        self.listeners = Some(Listeners { http, rpc });
        Ok(bound)
    }

    /// Serves both transports until the first exit event and returns it.
    ///
    /// Consumes `self` because the listeners move into the transport tasks.
    /// When the first event arrives, the other transport is aborted without
    /// draining in-flight requests.
    ///
    /// # Errors
    ///
    /// Returns an error if `start()` was not called first.
    pub async fn serve(
        self,
        shutdown: impl Future<Output = ExitReason> + Send,
    ) -> anyhow::Result<ExitReason> {
        let Listeners { http, rpc } = self
            .listeners
            .context("start() must be called before serve()")?;

        let state = AppState {
            endpoints: self.endpoints.clone(),
            metrics: self.metrics,
            errors: Arc::clone(&self.errors),
        };
        let router = build_router(state, &self.config);
        let rpc_server = RpcServer::new(self.endpoints, self.errors, self.config.rpc);

        let mut http_task = tokio::spawn(async move { axum::serve(http, router).await });
        let mut rpc_task = tokio::spawn(rpc_server.serve(rpc));

        let reason = tokio::select! {
            res = &mut http_task => transport_exit("HTTP", res),
            res = &mut rpc_task => transport_exit("RPC", res),
            reason = shutdown => reason,
        };

        http_task.abort();
        rpc_task.abort();
        Ok(reason)
    }
}

fn transport_exit(transport: &'static str, res: Result<io::Result<()>, JoinError>) -> ExitReason {
    let error = match res {
        Ok(Ok(())) => "stopped unexpectedly".to_string(),
        Ok(Err(e)) => e.to_string(),
        Err(join) => format!("task failed: {join}"),
    };
    ExitReason::TransportFailed { transport, error }
}
