//! `stringsvc-cli`: runs `<op> <argument>` pairs against a remote string service.
//!
//! Ops: `tc` (title case), `rw` (remove whitespace), `c` (count).

use std::io;
use std::time::Duration;

use clap::{ArgGroup, Parser};
use stringsvc_server::cli::run_commands;
use stringsvc_server::client::{connect, ClientConfig, Transport};

#[derive(Parser)]
#[command(
    name = "stringsvc-cli",
    about = "Call the string service over HTTP or RPC",
    group(ArgGroup::new("transport").required(true).args(["http_addr", "rpc_addr"]))
)]
struct Args {
    /// HTTP address of the server; `:port` dials localhost
    #[arg(long, env = "STRINGSVC_CLI_HTTP_ADDR")]
    http_addr: Option<String>,
    /// RPC address of the server; `:port` dials localhost
    #[arg(long, env = "STRINGSVC_CLI_RPC_ADDR")]
    rpc_addr: Option<String>,
    /// Connection timeout in milliseconds
    #[arg(long, env = "STRINGSVC_CLI_DIAL_TIMEOUT_MS", default_value_t = 1000)]
    dial_timeout_ms: u64,
    /// Commands: `<op> <argument>` pairs
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    commands: Vec<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let Some(transport) = args
        .http_addr
        .map(Transport::Http)
        .or_else(|| args.rpc_addr.map(Transport::Rpc))
    else {
        eprintln!("one of --http-addr or --rpc-addr is required");
        std::process::exit(2);
    };
    let config = ClientConfig {
        dial_timeout: Duration::from_millis(args.dial_timeout_ms),
        ..ClientConfig::default()
    };

    let svc = match connect(transport, &config).await {
        Ok(svc) => svc,
        Err(err) => {
            eprintln!("dial error: {err}");
            std::process::exit(1);
        }
    };

    let result = run_commands(
        &svc,
        &args.commands,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    )
    .await;

    if let Err(err) = result {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
