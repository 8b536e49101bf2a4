//! Network configuration types for the string service.

use std::time::Duration;

use stringsvc_core::messages::rpc::DEFAULT_MAX_FRAME_LENGTH;

/// Top-level network configuration for the server.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Listen address of the HTTP/JSON transport. `:port` binds all interfaces.
    pub http_addr: String,
    /// Listen address of the RPC transport. `:port` binds all interfaces.
    pub rpc_addr: String,
    /// Maximum time the HTTP middleware waits for a request to complete.
    pub request_timeout: Duration,
    /// RPC transport settings.
    pub rpc: RpcConfig,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            http_addr: "0.0.0.0:8080".to_string(),
            rpc_addr: "0.0.0.0:8081".to_string(),
            request_timeout: Duration::from_secs(30),
            rpc: RpcConfig::default(),
        }
    }
}

/// RPC framing settings, shared by the server and the client.
#[derive(Debug, Clone)]
pub struct RpcConfig {
    /// Largest frame accepted on a connection, in bytes.
    pub max_frame_length: usize,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            max_frame_length: DEFAULT_MAX_FRAME_LENGTH,
        }
    }
}

/// Expands a `:port` listen address to bind all interfaces.
#[must_use]
pub fn listen_addr(addr: &str) -> String {
    if addr.starts_with(':') {
        format!("0.0.0.0{addr}")
    } else {
        addr.to_string()
    }
}

/// Expands a `:port` dial address to the loopback interface.
#[must_use]
pub fn dial_addr(addr: &str) -> String {
    if addr.starts_with(':') {
        format!("127.0.0.1{addr}")
    } else {
        addr.to_string()
    }
}
