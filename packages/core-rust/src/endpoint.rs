//! Endpoints: one uniform request → response function per operation.
//!
//! An [`Endpoint`] is the seam between the service and the transports. On the
//! server side it wraps a `StringService` call; on the client side it wraps
//! encode → network round trip → decode. Either way it has the same shape, so
//! an [`EndpointSet`] can be served by any transport binding or turned back
//! into a `StringService` by the client stub.
//!
//! Failure contract:
//! - a business precondition failure (`EmptyInput`) is placed in the
//!   response's `err` field and the endpoint returns `Ok`;
//! - only codec and connection defects make an endpoint return `Err`.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use async_trait::async_trait;

use crate::error::{ServiceError, TransportError};
use crate::messages::{
    CountRequest, CountResponse, RemoveWhitespaceRequest, RemoveWhitespaceResponse,
    TitleCaseRequest, TitleCaseResponse,
};
use crate::service::StringService;

// ---------------------------------------------------------------------------
// Endpoint
// ---------------------------------------------------------------------------

/// Boxed future returned by an endpoint call.
pub type EndpointFuture<Resp> = Pin<Box<dyn Future<Output = Result<Resp, TransportError>> + Send>>;

type EndpointFn<Req, Resp> = dyn Fn(Req) -> EndpointFuture<Resp> + Send + Sync;

/// A cloneable, type-erased async function from `Req` to `Resp`.
///
/// Cloning is cheap (one `Arc`), and the endpoint is `Send + Sync`, so a single
/// instance is shared by every concurrent request. It also implements
/// `tower::Service` for use with tower utilities.
pub struct Endpoint<Req, Resp> {
    inner: Arc<EndpointFn<Req, Resp>>,
}

impl<Req: 'static, Resp: 'static> Endpoint<Req, Resp> {
    /// Wraps an async function as an endpoint.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Resp, TransportError>> + Send + 'static,
    {
        Self {
            inner: Arc::new(move |req| Box::pin(f(req))),
        }
    }

    /// Invokes the endpoint.
    pub fn call(&self, req: Req) -> EndpointFuture<Resp> {
        (self.inner)(req)
    }
}

impl<Req, Resp> Clone for Endpoint<Req, Resp> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<Req, Resp> fmt::Debug for Endpoint<Req, Resp> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint").finish_non_exhaustive()
    }
}

impl<Req: 'static, Resp: 'static> tower::Service<Req> for Endpoint<Req, Resp> {
    type Response = Resp;
    type Error = TransportError;
    type Future = EndpointFuture<Resp>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Req) -> Self::Future {
        (self.inner)(req)
    }
}

// ---------------------------------------------------------------------------
// Server-side endpoint constructors
// ---------------------------------------------------------------------------

/// Builds the title-case endpoint over `svc`.
pub fn make_title_case_endpoint(
    svc: Arc<dyn StringService>,
) -> Endpoint<TitleCaseRequest, TitleCaseResponse> {
    Endpoint::new(move |req: TitleCaseRequest| {
        let svc = Arc::clone(&svc);
        async move {
            Ok(match svc.title_case(&req.s).await {
                Ok(v) => TitleCaseResponse { v, err: None },
                Err(err) => TitleCaseResponse {
                    v: String::new(),
                    err: Some(err.to_string()),
                },
            })
        }
    })
}

/// Builds the remove-whitespace endpoint over `svc`.
pub fn make_remove_whitespace_endpoint(
    svc: Arc<dyn StringService>,
) -> Endpoint<RemoveWhitespaceRequest, RemoveWhitespaceResponse> {
    Endpoint::new(move |req: RemoveWhitespaceRequest| {
        let svc = Arc::clone(&svc);
        async move {
            Ok(match svc.remove_whitespace(&req.s).await {
                Ok(v) => RemoveWhitespaceResponse { v, err: None },
                Err(err) => RemoveWhitespaceResponse {
                    v: String::new(),
                    err: Some(err.to_string()),
                },
            })
        }
    })
}

/// Builds the count endpoint over `svc`.
pub fn make_count_endpoint(svc: Arc<dyn StringService>) -> Endpoint<CountRequest, CountResponse> {
    Endpoint::new(move |req: CountRequest| {
        let svc = Arc::clone(&svc);
        async move {
            Ok(CountResponse {
                v: svc.count(&req.s).await,
            })
        }
    })
}

// ---------------------------------------------------------------------------
// EndpointSet
// ---------------------------------------------------------------------------

/// One endpoint per operation. Built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct EndpointSet {
    pub title_case: Endpoint<TitleCaseRequest, TitleCaseResponse>,
    pub remove_whitespace: Endpoint<RemoveWhitespaceRequest, RemoveWhitespaceResponse>,
    pub count: Endpoint<CountRequest, CountResponse>,
}

impl EndpointSet {
    /// Builds all three server-side endpoints over the same service.
    #[must_use]
    pub fn from_service(svc: Arc<dyn StringService>) -> Self {
        Self {
            title_case: make_title_case_endpoint(Arc::clone(&svc)),
            remove_whitespace: make_remove_whitespace_endpoint(Arc::clone(&svc)),
            count: make_count_endpoint(svc),
        }
    }
}

/// Client stub: an `EndpointSet` bound to a transport is itself a
/// `StringService`.
///
/// Domain errors embedded in responses and transport failures both surface as
/// the call's `Err`. `count` is the exception: its signature cannot fail, so a
/// transport failure is swallowed and reported as `0`. Callers that need to
/// tell "empty input" from "unreachable server" must not rely on `count`.
#[async_trait]
impl StringService for EndpointSet {
    async fn title_case(&self, s: &str) -> Result<String, ServiceError> {
        let resp = self
            .title_case
            .call(TitleCaseRequest { s: s.to_string() })
            .await?;
        match resp.err {
            Some(err) => Err(ServiceError::from_message(&err)),
            None => Ok(resp.v),
        }
    }

    async fn remove_whitespace(&self, s: &str) -> Result<String, ServiceError> {
        let resp = self
            .remove_whitespace
            .call(RemoveWhitespaceRequest { s: s.to_string() })
            .await?;
        match resp.err {
            Some(err) => Err(ServiceError::from_message(&err)),
            None => Ok(resp.v),
        }
    }

    async fn count(&self, s: &str) -> usize {
        match self.count.call(CountRequest { s: s.to_string() }).await {
            Ok(resp) => resp.v,
            Err(err) => {
                tracing::debug!(error = %err, "count endpoint failed; reporting 0");
                0
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
