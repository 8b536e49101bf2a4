//! Remote clients for the string service.
//!
//! Both transports are reduced to an [`EndpointSet`], which implements
//! `StringService` itself. Callers pick a [`Transport`] and call [`connect`];
//! everything after that is transport-agnostic.

pub mod http;
pub mod rpc;

use std::sync::Arc;
use std::time::Duration;

use stringsvc_core::{EndpointSet, TransportError};

use crate::network::RpcConfig;

pub use self::http::HttpClient;
pub use self::rpc::RpcClient;

/// Which binding to talk to, and where.
///
/// Addresses of the form `:port` dial the loopback interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    Http(String),
    Rpc(String),
}

/// Client-side settings shared by both transports.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Upper bound for establishing a connection.
    pub dial_timeout: Duration,
    /// RPC framing settings; must match the server's.
    pub rpc: RpcConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            dial_timeout: Duration::from_secs(1),
            rpc: RpcConfig::default(),
        }
    }
}

/// Builds client endpoints for `transport`.
///
/// The RPC transport dials eagerly; the HTTP transport connects per request.
///
/// # Errors
///
/// Returns `TransportError::DialTimeout` or `TransportError::Connection` when
/// the RPC connection cannot be established, and `TransportError::Connection`
/// when the HTTP client cannot be built.
pub async fn connect(
    transport: Transport,
    config: &ClientConfig,
) -> Result<EndpointSet, TransportError> {
    match transport {
        Transport::Http(addr) => Ok(http::endpoints(HttpClient::new(&addr, config)?)),
        Transport::Rpc(addr) => {
            let client = RpcClient::connect(&addr, config).await?;
            Ok(rpc::endpoints(Arc::new(client)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_config_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.dial_timeout, Duration::from_secs(1));
        assert_eq!(config.rpc.max_frame_length, 1024 * 1024);
    }

    #[tokio::test]
    async fn rpc_connect_to_a_closed_port_fails() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);

        let err = connect(Transport::Rpc(addr), &ClientConfig::default())
            .await
            .unwrap_err();
        assert!(
            matches!(err, TransportError::Connection(_) | TransportError::DialTimeout(_)),
            "{err}"
        );
    }

    #[tokio::test]
    async fn http_connect_is_lazy() {
        let endpoints = connect(Transport::Http(":1".into()), &ClientConfig::default()).await;
        assert!(endpoints.is_ok());
    }
}
