//! Binary RPC client for the string service.
//!
//! One TCP connection carries every call, one call at a time. Each request
//! frame gets a fresh id; replies with any other id belong to calls that
//! were cancelled while waiting and are skipped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use stringsvc_core::messages::rpc::{self as wire, RequestFrame, ResponseFrame, SERVICE_NAME};
use stringsvc_core::messages::{CountResponse, RemoveWhitespaceResponse, TitleCaseResponse};
use stringsvc_core::{Endpoint, EndpointSet, Method, TransportError};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_util::codec::{Framed, LengthDelimitedCodec};
use tracing::debug;

use super::ClientConfig;
use crate::network::dial_addr;
use crate::network::rpc::frame_codec;

fn connection_error(e: impl std::fmt::Display) -> TransportError {
    TransportError::Connection(e.to_string())
}

/// A connected RPC client. Share it through an `Arc`.
#[derive(Debug)]
pub struct RpcClient {
    conn: Mutex<Framed<TcpStream, LengthDelimitedCodec>>,
    next_id: AtomicU64,
}

impl RpcClient {
    /// Dials `addr`, giving up after `config.dial_timeout`.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::DialTimeout` when the timeout elapses and
    /// `TransportError::Connection` when the connection is refused.
    pub async fn connect(addr: &str, config: &ClientConfig) -> Result<Self, TransportError> {
        let addr = dial_addr(addr);
        let stream = tokio::time::timeout(config.dial_timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| TransportError::DialTimeout(config.dial_timeout))?
            .map_err(connection_error)?;
        Ok(Self::from_stream(stream, config))
    }

    fn from_stream(stream: TcpStream, config: &ClientConfig) -> Self {
        Self {
            conn: Mutex::new(Framed::new(stream, frame_codec(&config.rpc))),
            next_id: AtomicU64::new(1),
        }
    }

    /// Sends one call and waits for its reply.
    ///
    /// # Errors
    ///
    /// Returns a codec error for unencodable requests or undecodable replies,
    /// `TransportError::Connection` on I/O failure, and the error carried by
    /// a non-`Ok` response frame.
    pub async fn invoke<Req, Reply>(
        &self,
        method: Method,
        req: &Req,
    ) -> Result<Reply, TransportError>
    where
        Req: Serialize,
        Reply: DeserializeOwned,
    {
        let encode_err = |e: rmp_serde::encode::Error| TransportError::EncodeRequest(e.to_string());
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let frame = wire::encode(&RequestFrame {
            id,
            service: SERVICE_NAME.to_string(),
            method: method.rpc_name().to_string(),
            payload: wire::encode(req).map_err(encode_err)?,
        })
        .map_err(encode_err)?;

        let mut conn = self.conn.lock().await;
        conn.send(Bytes::from(frame)).await.map_err(connection_error)?;

        loop {
            let bytes = conn
                .next()
                .await
                .ok_or_else(|| connection_error("connection closed by peer"))?
                .map_err(connection_error)?;
            let response: ResponseFrame = wire::decode(&bytes)
                .map_err(|e| TransportError::DecodeResponse(e.to_string()))?;

            // Id 0 answers a frame the server could not read.
            if response.id != id && response.id != 0 {
                debug!(transport = "RPC", stale = response.id, expected = id, "skipping reply");
                continue;
            }

            let payload = response.into_payload(method.rpc_name())?;
            return wire::decode(&payload)
                .map_err(|e| TransportError::DecodeResponse(e.to_string()));
        }
    }
}

fn endpoint<Req, W, R, Resp>(
    client: Arc<RpcClient>,
    method: Method,
    convert: fn(R) -> Result<Resp, TransportError>,
) -> Endpoint<Req, Resp>
where
    Req: Into<W> + Send + 'static,
    W: Serialize + Send + Sync + 'static,
    R: DeserializeOwned + Send + 'static,
    Resp: Send + 'static,
{
    Endpoint::new(move |req: Req| {
        let client = Arc::clone(&client);
        async move {
            let request: W = req.into();
            let reply: R = client.invoke(method, &request).await?;
            convert(reply)
        }
    })
}

/// Client endpoints that call the RPC binding through `client`.
#[must_use]
pub fn endpoints(client: Arc<RpcClient>) -> EndpointSet {
    let remove_whitespace =
        endpoint::<_, wire::RemoveWhitespaceRequest, wire::RemoveWhitespaceReply, _>(
            Arc::clone(&client),
            Method::RemoveWhitespace,
            |reply| Ok(RemoveWhitespaceResponse::from(reply)),
        );
    EndpointSet {
        title_case: endpoint::<_, wire::TitleCaseRequest, wire::TitleCaseReply, _>(
            Arc::clone(&client),
            Method::TitleCase,
            |reply| Ok(TitleCaseResponse::from(reply)),
        ),
        remove_whitespace,
        count: endpoint::<_, wire::CountRequest, wire::CountReply, _>(
            client,
            Method::Count,
            CountResponse::try_from,
        ),
    }
}
