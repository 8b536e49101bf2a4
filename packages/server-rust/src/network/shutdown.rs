//! Process exit coordination.
//!
//! The server stops at the first of: the HTTP transport failing, the RPC
//! transport failing, or a termination signal. Whichever happens first
//! becomes the [`ExitReason`]; in-flight requests are not drained.

use std::fmt;

/// Why the server stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitReason {
    /// A termination signal was received (`"interrupt"` or `"terminated"`).
    Signal(&'static str),
    /// A transport stopped serving. `error` is its failure message.
    TransportFailed {
        transport: &'static str,
        error: String,
    },
}

impl ExitReason {
    /// Returns `true` unless the server was asked to stop.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::TransportFailed { .. })
    }
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signal(name) => f.write_str(name),
            Self::TransportFailed { transport, error } => write!(f, "{transport}: {error}"),
        }
    }
}

/// Resolves when SIGINT (Ctrl-C) or, on Unix, SIGTERM is received.
///
/// If a handler cannot be installed, that signal is never reported and the
/// other one still is.
pub async fn shutdown_signal() -> ExitReason {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => ExitReason::Signal("interrupt"),
        () = terminate => ExitReason::Signal("terminated"),
    }
}
