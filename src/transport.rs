// src/transport.rs
//! HTTP/JSON binding for the endpoints.
//!
//! Each endpoint gets a `POST` route that decodes the JSON body, calls the
//! endpoint with a [`CallContext`] derived from the server's shutdown token,
//! and encodes the response as JSON. Decode failures are answered here with
//! `400` and never reach the service.

use crate::constants::{
    COUNT_ROUTE, HEALTH_ROUTE, METRICS_CONTENT_TYPE, METRICS_ROUTE, UPPERCASE_ROUTE,
};
use crate::endpoint::{make_count_endpoint, make_uppercase_endpoint, CallContext, Endpoint};
use crate::error::{DecodeError, EndpointError};
use crate::metrics::Registry;
use crate::service::StringService;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, MethodRouter};
use axum::{Json, Router};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Builds the full route table: both endpoints, metrics and health.
pub fn build_router(
    svc: Arc<dyn StringService>,
    registry: Arc<Registry>,
    shutdown: CancellationToken,
) -> Router {
    Router::new()
        .route(
            UPPERCASE_ROUTE,
            endpoint_route(make_uppercase_endpoint(Arc::clone(&svc)), shutdown.clone()),
        )
        .route(COUNT_ROUTE, endpoint_route(make_count_endpoint(svc), shutdown))
        .route(METRICS_ROUTE, get(metrics_handler).with_state(registry))
        .route(HEALTH_ROUTE, get(health_handler))
}

/// Exposes one endpoint as a `POST` route.
pub fn endpoint_route<E: Endpoint>(endpoint: E, shutdown: CancellationToken) -> MethodRouter {
    post(serve_endpoint::<E>).with_state(HttpEndpoint {
        endpoint: Arc::new(endpoint),
        shutdown,
    })
}

struct HttpEndpoint<E> {
    endpoint: Arc<E>,
    shutdown: CancellationToken,
}

impl<E> Clone for HttpEndpoint<E> {
    fn clone(&self) -> Self {
        Self {
            endpoint: Arc::clone(&self.endpoint),
            shutdown: self.shutdown.clone(),
        }
    }
}

async fn serve_endpoint<E: Endpoint>(
    State(handler): State<HttpEndpoint<E>>,
    body: Bytes,
) -> Response {
    let request: E::Request = match decode_request(&body) {
        Ok(request) => request,
        Err(err) => {
            log::warn!("{}: {}", handler.endpoint.name(), err);
            return err.into_response();
        }
    };

    let ctx = CallContext::with_cancellation(handler.shutdown.child_token());
    match handler.endpoint.call(&ctx, request).await {
        Ok(response) => encode_response(&response),
        Err(err) => {
            log::error!("{}", err);
            err.into_response()
        }
    }
}

/// Decodes a JSON request body.
pub fn decode_request<T: DeserializeOwned>(body: &[u8]) -> Result<T, DecodeError> {
    Ok(serde_json::from_slice(body)?)
}

/// Encodes a response value as a `200` JSON reply.
pub fn encode_response<T: Serialize>(response: &T) -> Response {
    Json(response).into_response()
}

impl IntoResponse for DecodeError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

impl IntoResponse for EndpointError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

async fn metrics_handler(State(registry): State<Arc<Registry>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, METRICS_CONTENT_TYPE)],
        registry.gather(),
    )
}

async fn health_handler() -> &'static str {
    "OK"
}
