// src/endpoint.rs
//! Endpoints: one transport-agnostic callable per service operation.
//!
//! An [`Endpoint`] turns a decoded request into a business call and the
//! call's result into a response value. The transport only ever sees this
//! uniform shape, never the service trait.
//!
//! Domain errors are folded into the response body; they are not endpoint
//! failures. A client asking to uppercase `""` gets a normal response whose
//! `err` field says why, while [`EndpointError`] is reserved for the adapter
//! itself breaking.

use crate::error::EndpointError;
use crate::service::StringService;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Per-request context handed from the transport to an endpoint.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    cancellation: CancellationToken,
}

impl CallContext {
    /// A context that is never cancelled.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_cancellation(cancellation: CancellationToken) -> Self {
        Self { cancellation }
    }

    /// Whether the caller has given up on this request.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}

/// A single RPC.
#[async_trait]
pub trait Endpoint: Send + Sync + 'static {
    type Request: DeserializeOwned + Send + 'static;
    type Response: Serialize + Send + 'static;

    /// Stable name used in logs.
    fn name(&self) -> &'static str;

    async fn call(
        &self,
        ctx: &CallContext,
        request: Self::Request,
    ) -> Result<Self::Response, EndpointError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UppercaseRequest {
    #[serde(default)]
    pub s: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UppercaseResponse {
    pub v: String,
    /// Domain error message, empty when the call succeeded.
    pub err: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CountRequest {
    #[serde(default)]
    pub s: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResponse {
    pub v: usize,
}

/// Adapts [`StringService::uppercase`].
pub struct UppercaseEndpoint {
    svc: Arc<dyn StringService>,
}

/// Adapts [`StringService::count`].
pub struct CountEndpoint {
    svc: Arc<dyn StringService>,
}

pub fn make_uppercase_endpoint(svc: Arc<dyn StringService>) -> UppercaseEndpoint {
    UppercaseEndpoint { svc }
}

pub fn make_count_endpoint(svc: Arc<dyn StringService>) -> CountEndpoint {
    CountEndpoint { svc }
}

#[async_trait]
impl Endpoint for UppercaseEndpoint {
    type Request = UppercaseRequest;
    type Response = UppercaseResponse;

    fn name(&self) -> &'static str {
        "uppercase"
    }

    async fn call(
        &self,
        _ctx: &CallContext,
        request: UppercaseRequest,
    ) -> Result<UppercaseResponse, EndpointError> {
        let response = match self.svc.uppercase(&request.s).await {
            Ok(v) => UppercaseResponse { v, err: String::new() },
            Err(err) => UppercaseResponse {
                v: String::new(),
                err: err.to_string(),
            },
        };
        Ok(response)
    }
}

#[async_trait]
impl Endpoint for CountEndpoint {
    type Request = CountRequest;
    type Response = CountResponse;

    fn name(&self) -> &'static str {
        "count"
    }

    async fn call(
        &self,
        _ctx: &CallContext,
        request: CountRequest,
    ) -> Result<CountResponse, EndpointError> {
        let v = self.svc.count(&request.s).await;
        Ok(CountResponse { v })
    }
}
