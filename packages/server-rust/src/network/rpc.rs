//! Binary RPC binding of the endpoints.
//!
//! Each accepted TCP connection runs in its own task and carries any number
//! of sequential calls. A call is one length-delimited `MsgPack`
//! [`RequestFrame`]; the server answers with exactly one [`ResponseFrame`]
//! before reading the next frame.
//!
//! Frames that fail to decode, and calls naming an unknown service or method,
//! are answered with an error frame and the connection stays open. So is a
//! reply that would exceed the frame limit. The connection closes on I/O
//! errors, oversize request frames and peer disconnect.

use std::io;
use std::sync::Arc;

use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use stringsvc_core::messages::rpc::{self, FrameStatus, RequestFrame, ResponseFrame, SERVICE_NAME};
use stringsvc_core::{Endpoint, EndpointSet, Method, TransportError};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::codec::{Framed, LengthDelimitedCodec};
use tracing::{debug, info};

use super::config::RpcConfig;
use super::ErrorLogger;

const TRANSPORT: &str = "RPC";

/// Builds the frame codec shared by the server and the client.
#[must_use]
pub fn frame_codec(config: &RpcConfig) -> LengthDelimitedCodec {
    LengthDelimitedCodec::builder()
        .max_frame_length(config.max_frame_length)
        .new_codec()
}

/// Serves the string service endpoints over framed TCP.
pub struct RpcServer {
    endpoints: EndpointSet,
    errors: Arc<dyn ErrorLogger>,
    config: RpcConfig,
}

impl RpcServer {
    #[must_use]
    pub fn new(endpoints: EndpointSet, errors: Arc<dyn ErrorLogger>, config: RpcConfig) -> Self {
        Self {
            endpoints,
            errors,
            config,
        }
    }

    /// Accepts connections until the listener fails.
    ///
    /// Only returns on an accept error; per-connection failures are logged
    /// and never stop the loop.
    ///
    /// # Errors
    ///
    /// Returns the I/O error reported by `accept()`.
    pub async fn serve(self, listener: TcpListener) -> io::Result<()> {
        let server = Arc::new(self);
        loop {
            let (stream, peer) = listener.accept().await?;
            let server = Arc::clone(&server);
            tokio::spawn(async move {
                debug!(transport = TRANSPORT, %peer, "connection opened");
                if let Err(e) = server.handle_connection(stream).await {
                    info!(transport = TRANSPORT, %peer, "connection closed: {e}");
                } else {
                    debug!(transport = TRANSPORT, %peer, "connection closed");
                }
            });
        }
    }

    async fn handle_connection(&self, stream: TcpStream) -> io::Result<()> {
        let mut framed = Framed::new(stream, frame_codec(&self.config));
        while let Some(frame) = framed.next().await {
            let frame = frame?;
            let response = self.dispatch(&frame).await;
            framed.send(self.encode_response(&response)?).await?;
        }
        Ok(())
    }

    /// Encodes `response`, replacing it with an `Internal` error frame when it
    /// does not fit in one frame.
    fn encode_response(&self, response: &ResponseFrame) -> io::Result<Bytes> {
        let limit = self.config.max_frame_length;
        let result = rpc::encode(response)
            .map_err(|e| TransportError::EncodeResponse(e.to_string()))
            .and_then(|bytes| {
                if bytes.len() > limit {
                    Err(TransportError::EncodeResponse(format!(
                        "reply of {} bytes exceeds frame limit {limit}",
                        bytes.len()
                    )))
                } else {
                    Ok(bytes)
                }
            });
        let bytes = match result {
            Ok(bytes) => bytes,
            Err(err) => {
                self.errors.log(TRANSPORT, &err);
                let fallback =
                    ResponseFrame::error(response.id, FrameStatus::Internal, err.to_string());
                rpc::encode(&fallback).map_err(io::Error::other)?
            }
        };
        Ok(Bytes::from(bytes))
    }

    /// Turns one raw request frame into its response frame.
    async fn dispatch(&self, bytes: &[u8]) -> ResponseFrame {
        let frame: RequestFrame = match rpc::decode(bytes) {
            Ok(frame) => frame,
            Err(e) => {
                let err = TransportError::DecodeRequest(e.to_string());
                self.errors.log(TRANSPORT, &err);
                return ResponseFrame::error(0, FrameStatus::InvalidArgument, err.to_string());
            }
        };

        let method = Some(frame.method.as_str())
            .filter(|_| frame.service == SERVICE_NAME)
            .and_then(Method::from_rpc_name);
        let Some(method) = method else {
            let err = TransportError::UnknownMethod {
                service: frame.service,
                method: frame.method,
            };
            self.errors.log(TRANSPORT, &err);
            return ResponseFrame::error(frame.id, FrameStatus::Unimplemented, err.to_string());
        };

        let endpoints = &self.endpoints;
        let result = match method {
            Method::TitleCase => {
                unary::<rpc::TitleCaseRequest, _, _, rpc::TitleCaseReply>(
                    &endpoints.title_case,
                    &frame.payload,
                )
                .await
            }
            Method::RemoveWhitespace => {
                unary::<rpc::RemoveWhitespaceRequest, _, _, rpc::RemoveWhitespaceReply>(
                    &endpoints.remove_whitespace,
                    &frame.payload,
                )
                .await
            }
            Method::Count => {
                unary::<rpc::CountRequest, _, _, rpc::CountReply>(&endpoints.count, &frame.payload)
                    .await
            }
        };

        match result {
            Ok(payload) => ResponseFrame::ok(frame.id, payload),
            Err(err) => {
                self.errors.log(TRANSPORT, &err);
                let status = match err {
                    TransportError::DecodeRequest(_) => FrameStatus::InvalidArgument,
                    _ => FrameStatus::Internal,
                };
                ResponseFrame::error(frame.id, status, err.to_string())
            }
        }
    }
}

/// Decodes the wire request `W`, calls `endpoint`, and encodes the wire reply `R`.
async fn unary<W, Req, Resp, R>(
    endpoint: &Endpoint<Req, Resp>,
    payload: &[u8],
) -> Result<Vec<u8>, TransportError>
where
    W: DeserializeOwned + Into<Req>,
    Req: 'static,
    Resp: 'static,
    R: From<Resp> + Serialize,
{
    let wire: W =
        rpc::decode(payload).map_err(|e| TransportError::DecodeRequest(e.to_string()))?;
    let resp = endpoint.call(wire.into()).await?;
    rpc::encode(&R::from(resp)).map_err(|e| TransportError::EncodeResponse(e.to_string()))
}
