//! HTTP/JSON client for the string service.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use stringsvc_core::messages::ErrorBody;
use stringsvc_core::{Endpoint, EndpointSet, Method, TransportError};

use super::ClientConfig;
use crate::network::dial_addr;

/// Turns a configured address into a base URL.
///
/// `:port` dials the loopback interface and a missing scheme means `http`.
fn base_url(addr: &str) -> String {
    let addr = dial_addr(addr);
    let url = if addr.starts_with("http://") || addr.starts_with("https://") {
        addr
    } else {
        format!("http://{addr}")
    };
    url.trim_end_matches('/').to_string()
}

/// Thin JSON-over-HTTP client; cheap to clone.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base: String,
    dial_timeout: Duration,
}

impl HttpClient {
    /// # Errors
    ///
    /// Returns `TransportError::Connection` if the underlying client cannot be
    /// built (e.g., no TLS backend).
    pub fn new(addr: &str, config: &ClientConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.dial_timeout)
            .build()
            .map_err(|e| TransportError::Connection(e.to_string()))?;
        Ok(Self {
            client,
            base: base_url(addr),
            dial_timeout: config.dial_timeout,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn request_error(&self, e: &reqwest::Error) -> TransportError {
        if e.is_builder() {
            TransportError::EncodeRequest(e.to_string())
        } else if e.is_connect() && e.is_timeout() {
            TransportError::DialTimeout(self.dial_timeout)
        } else {
            TransportError::Connection(e.to_string())
        }
    }

    /// POSTs `req` as JSON to `route` and decodes the JSON answer.
    ///
    /// Non-success statuses are decoded as an [`ErrorBody`] when possible.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Status` for a non-2xx answer and the matching
    /// codec or connection error otherwise.
    pub async fn post<Req, Resp>(&self, route: &str, req: &Req) -> Result<Resp, TransportError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}{route}", self.base))
            .json(req)
            .send()
            .await
            .map_err(|e| self.request_error(&e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
            return Err(TransportError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&body).map_err(|e| TransportError::DecodeResponse(e.to_string()))
    }
}

fn endpoint<Req, Resp>(client: HttpClient, method: Method) -> Endpoint<Req, Resp>
where
    Req: Serialize + Send + Sync + 'static,
    Resp: DeserializeOwned + Send + 'static,
{
    Endpoint::new(move |req: Req| {
        let client = client.clone();
        async move { client.post(method.http_route(), &req).await }
    })
}

/// Client endpoints that call the HTTP binding through `client`.
#[must_use]
pub fn endpoints(client: HttpClient) -> EndpointSet {
    EndpointSet {
        title_case: endpoint(client.clone(), Method::TitleCase),
        remove_whitespace: endpoint(client.clone(), Method::RemoveWhitespace),
        count: endpoint(client, Method::Count),
    }
}
