//! `stringsvc` server: serves the string service over HTTP and RPC.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use stringsvc_core::EndpointSet;
use stringsvc_server::network::{shutdown_signal, NetworkConfig, NetworkModule};
use stringsvc_server::service::{build_service_pipeline, ServiceMetrics};
use stringsvc_server::telemetry::{init_tracing, LogFormat};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "stringsvc", about = "String service over HTTP/JSON and binary RPC")]
struct Args {
    /// HTTP listen address; `:port` binds all interfaces
    #[arg(long, env = "STRINGSVC_HTTP_ADDR", default_value = "0.0.0.0:8080")]
    http_addr: String,
    /// RPC listen address; `:port` binds all interfaces
    #[arg(long, env = "STRINGSVC_RPC_ADDR", default_value = "0.0.0.0:8081")]
    rpc_addr: String,
    /// Upper bound for one HTTP request, in seconds
    #[arg(long, env = "STRINGSVC_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    request_timeout_secs: u64,
    /// Log output format: text or json
    #[arg(long, env = "STRINGSVC_LOG_FORMAT", default_value = "text")]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_format);

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("install metrics recorder")?;
    let metrics = Arc::new(ServiceMetrics::register());
    let endpoints = EndpointSet::from_service(build_service_pipeline(metrics));

    let config = NetworkConfig {
        http_addr: args.http_addr,
        rpc_addr: args.rpc_addr,
        request_timeout: Duration::from_secs(args.request_timeout_secs),
        ..NetworkConfig::default()
    };

    let mut network = NetworkModule::new(config, endpoints, handle);
    let bound = network.start().await?;
    info!(http = %bound.http, rpc = %bound.rpc, "hello");

    let reason = network.serve(shutdown_signal()).await?;
    if reason.is_failure() {
        error!(%reason, "exit");
        std::process::exit(1);
    }
    info!(%reason, "exit");
    Ok(())
}
