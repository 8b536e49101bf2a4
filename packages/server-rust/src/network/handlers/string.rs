//! `POST /tc`, `POST /rw` and `POST /c`: the JSON binding of the endpoints.
//!
//! Each handler decodes `{"s": ...}` from the raw body, calls its endpoint
//! and encodes the domain response with `200 OK`. Domain errors ride inside
//! that `200` body. A body that does not decode never reaches the endpoint
//! and is answered with `400` and an [`ErrorBody`].

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Serialize;
use stringsvc_core::messages::ErrorBody;
use stringsvc_core::{Endpoint, TransportError};

use super::AppState;
use crate::network::ErrorLogger;

const TRANSPORT: &str = "HTTP";

fn decode_request<Req: DeserializeOwned>(body: &[u8]) -> Result<Req, TransportError> {
    serde_json::from_slice(body).map_err(|e| TransportError::DecodeRequest(e.to_string()))
}

fn encode_response<Resp: Serialize>(resp: &Resp) -> Result<Vec<u8>, TransportError> {
    serde_json::to_vec(resp).map_err(|e| TransportError::EncodeResponse(e.to_string()))
}

fn error_response(status: StatusCode, err: &TransportError) -> Response {
    (status, Json(ErrorBody::new(err.to_string()))).into_response()
}

/// Decodes, invokes and encodes one call against `endpoint`.
async fn serve_endpoint<Req, Resp>(
    endpoint: &Endpoint<Req, Resp>,
    errors: &dyn ErrorLogger,
    body: &[u8],
) -> Response
where
    Req: DeserializeOwned + 'static,
    Resp: Serialize + 'static,
{
    let req = match decode_request::<Req>(body) {
        Ok(req) => req,
        Err(err) => {
            errors.log(TRANSPORT, &err);
            return error_response(StatusCode::BAD_REQUEST, &err);
        }
    };

    match endpoint.call(req).await.and_then(|resp| encode_response(&resp)) {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            bytes,
        )
            .into_response(),
        Err(err) => {
            errors.log(TRANSPORT, &err);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &err)
        }
    }
}

/// `POST /tc`
pub async fn title_case_handler(State(state): State<AppState>, body: Bytes) -> Response {
    serve_endpoint(&state.endpoints.title_case, state.errors.as_ref(), &body).await
}

/// `POST /rw`
pub async fn remove_whitespace_handler(State(state): State<AppState>, body: Bytes) -> Response {
    serve_endpoint(&state.endpoints.remove_whitespace, state.errors.as_ref(), &body).await
}

/// `POST /c`
pub async fn count_handler(State(state): State<AppState>, body: Bytes) -> Response {
    serve_endpoint(&state.endpoints.count, state.errors.as_ref(), &body).await
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use axum::Router;
    use tower::ServiceExt;

    use super::*;
    use crate::network::handlers::test_support::test_state;
    use crate::network::module::build_router;
    use crate::network::NetworkConfig;

    async fn call(
        router: Router,
        method: Method,
        uri: &str,
        body: &'static str,
    ) -> (StatusCode, String) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn router() -> Router {
        build_router(test_state().0, &NetworkConfig::default())
    }

    #[tokio::test]
    async fn title_case_over_json() {
        let (status, body) = call(router(), Method::POST, "/tc", r#"{"s":"hello world"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"v":"Hello World"}"#);
    }

    #[tokio::test]
    async fn remove_whitespace_over_json() {
        let (status, body) = call(router(), Method::POST, "/rw", r#"{"s":"a b\tc\n"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"v":"abc"}"#);
    }

    #[tokio::test]
    async fn count_over_json() {
        let (status, body) = call(router(), Method::POST, "/c", r#"{"s":"hello"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"v":5}"#);
    }

    #[tokio::test]
    async fn domain_error_is_a_200_with_err() {
        let (status, body) = call(router(), Method::POST, "/tc", r#"{"s":""}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"v":"","err":"empty string"}"#);
    }

    #[tokio::test]
    async fn malformed_body_is_a_400_and_is_logged() {
        let (state, errors) = test_state();
        let router = build_router(state, &NetworkConfig::default());

        let (status, body) = call(router, Method::POST, "/tc", "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: ErrorBody = serde_json::from_str(&body).unwrap();
        assert!(body.error.starts_with("decode request:"), "{}", body.error);

        let seen = errors.seen();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "HTTP");
        assert!(matches!(seen[0].1, TransportError::DecodeRequest(_)));
    }

    #[tokio::test]
    async fn empty_body_and_missing_field_are_decode_failures() {
        let (status, _) = call(router(), Method::POST, "/rw", "").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(router(), Method::POST, "/c", "{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn other_methods_are_rejected() {
        let (status, _) = call(router(), Method::GET, "/tc", "").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

        let (status, _) = call(router(), Method::PUT, "/c", r#"{"s":"x"}"#).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let (status, _) = call(router(), Method::POST, "/upper", r#"{"s":"x"}"#).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
