//! Binary RPC wire schemas.
//!
//! Every frame on an RPC connection is a named `MsgPack` map produced by
//! `rmp_serde::to_vec_named()`. A call is a [`RequestFrame`] whose `payload`
//! holds one of the per-method request messages; the answer is a
//! [`ResponseFrame`] with the same `id` whose `payload` holds the matching
//! reply message when `status` is [`FrameStatus::Ok`].
//!
//! The per-method messages mirror the domain types field for field (`s`, `v`,
//! `err`), except that `err` is a plain string that is empty when absent and
//! the count result is a signed 64-bit integer.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::domain;
use crate::error::TransportError;

/// Name of the one service exposed over RPC.
pub const SERVICE_NAME: &str = "stringsvc.String";

/// Default upper bound for a single frame, in bytes.
pub const DEFAULT_MAX_FRAME_LENGTH: usize = 1024 * 1024;

// ---------------------------------------------------------------------------
// Framing
// ---------------------------------------------------------------------------

/// Outcome of an RPC call at the transport level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameStatus {
    Ok,
    InvalidArgument,
    Unimplemented,
    Internal,
}

/// A call from client to server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestFrame {
    /// Client-chosen correlation id, echoed back in the response.
    pub id: u64,
    pub service: String,
    pub method: String,
    #[serde(with = "serde_bytes")]
    pub payload: Vec<u8>,
}

/// The server's answer to one [`RequestFrame`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseFrame {
    pub id: u64,
    pub status: FrameStatus,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
    #[serde(with = "serde_bytes", default)]
    pub payload: Vec<u8>,
}

impl ResponseFrame {
    #[must_use]
    pub fn ok(id: u64, payload: Vec<u8>) -> Self {
        Self {
            id,
            status: FrameStatus::Ok,
            message: None,
            payload,
        }
    }

    #[must_use]
    pub fn error(id: u64, status: FrameStatus, message: impl Into<String>) -> Self {
        Self {
            id,
            status,
            message: Some(message.into()),
            payload: Vec::new(),
        }
    }

    /// Converts a non-`Ok` frame into the matching transport error and
    /// returns the payload otherwise.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::UnknownMethod` for `Unimplemented` frames and
    /// `TransportError::Remote` for every other failure status.
    pub fn into_payload(self, method: &str) -> Result<Vec<u8>, TransportError> {
        match self.status {
            FrameStatus::Ok => Ok(self.payload),
            FrameStatus::Unimplemented => Err(TransportError::UnknownMethod {
                service: SERVICE_NAME.to_string(),
                method: method.to_string(),
            }),
            FrameStatus::InvalidArgument | FrameStatus::Internal => Err(TransportError::Remote(
                self.message.unwrap_or_else(|| format!("{:?}", self.status)),
            )),
        }
    }
}

/// Serializes a frame or message as a named `MsgPack` map.
///
/// # Errors
///
/// Returns the `rmp_serde` encoding error, which only happens for values
/// that cannot be represented in `MsgPack`.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, rmp_serde::encode::Error> {
    rmp_serde::to_vec_named(value)
}

/// Deserializes a frame or message from `MsgPack` bytes.
///
/// # Errors
///
/// Returns the `rmp_serde` decoding error for truncated or mistyped input.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, rmp_serde::decode::Error> {
    rmp_serde::from_slice(bytes)
}

// ---------------------------------------------------------------------------
// Per-method messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleCaseRequest {
    pub s: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleCaseReply {
    pub v: String,
    #[serde(default)]
    pub err: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveWhitespaceRequest {
    pub s: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveWhitespaceReply {
    pub v: String,
    #[serde(default)]
    pub err: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRequest {
    pub s: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountReply {
    pub v: i64,
}

// ---------------------------------------------------------------------------
// Wire <-> domain conversions
// ---------------------------------------------------------------------------

fn non_empty(err: String) -> Option<String> {
    Some(err).filter(|e| !e.is_empty())
}

impl From<domain::TitleCaseRequest> for TitleCaseRequest {
    fn from(req: domain::TitleCaseRequest) -> Self {
        Self { s: req.s }
    }
}

impl From<TitleCaseRequest> for domain::TitleCaseRequest {
    fn from(req: TitleCaseRequest) -> Self {
        Self { s: req.s }
    }
}

impl From<domain::TitleCaseResponse> for TitleCaseReply {
    fn from(resp: domain::TitleCaseResponse) -> Self {
        Self {
            v: resp.v,
            err: resp.err.unwrap_or_default(),
        }
    }
}

impl From<TitleCaseReply> for domain::TitleCaseResponse {
    fn from(reply: TitleCaseReply) -> Self {
        Self {
            v: reply.v,
            err: non_empty(reply.err),
        }
    }
}

impl From<domain::RemoveWhitespaceRequest> for RemoveWhitespaceRequest {
    fn from(req: domain::RemoveWhitespaceRequest) -> Self {
        Self { s: req.s }
    }
}

impl From<RemoveWhitespaceRequest> for domain::RemoveWhitespaceRequest {
    fn from(req: RemoveWhitespaceRequest) -> Self {
        Self { s: req.s }
    }
}

impl From<domain::RemoveWhitespaceResponse> for RemoveWhitespaceReply {
    fn from(resp: domain::RemoveWhitespaceResponse) -> Self {
        Self {
            v: resp.v,
            err: resp.err.unwrap_or_default(),
        }
    }
}

impl From<RemoveWhitespaceReply> for domain::RemoveWhitespaceResponse {
    fn from(reply: RemoveWhitespaceReply) -> Self {
        Self {
            v: reply.v,
            err: non_empty(reply.err),
        }
    }
}

impl From<domain::CountRequest> for CountRequest {
    fn from(req: domain::CountRequest) -> Self {
        Self { s: req.s }
    }
}

impl From<CountRequest> for domain::CountRequest {
    fn from(req: CountRequest) -> Self {
        Self { s: req.s }
    }
}

impl From<domain::CountResponse> for CountReply {
    fn from(resp: domain::CountResponse) -> Self {
        // Saturates; no string the service accepts comes close to i64::MAX bytes.
        Self {
            v: i64::try_from(resp.v).unwrap_or(i64::MAX),
        }
    }
}

impl TryFrom<CountReply> for domain::CountResponse {
    type Error = TransportError;

    fn try_from(reply: CountReply) -> Result<Self, Self::Error> {
        usize::try_from(reply.v)
            .map(|v| Self { v })
            .map_err(|_| TransportError::DecodeResponse(format!("negative count {}", reply.v)))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
