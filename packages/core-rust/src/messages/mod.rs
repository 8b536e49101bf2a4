//! Message schemas for both transports.
//!
//! - [`domain`]: endpoint request/response types, also the HTTP JSON bodies
//! - [`http`]: HTTP error body and the metrics route
//! - [`rpc`]: `MsgPack` frames and per-method wire messages for the RPC transport

pub mod domain;
pub mod http;
pub mod rpc;

pub use domain::{
    CountRequest, CountResponse, RemoveWhitespaceRequest, RemoveWhitespaceResponse,
    TitleCaseRequest, TitleCaseResponse,
};
pub use http::ErrorBody;
pub use rpc::{FrameStatus, RequestFrame, ResponseFrame};
