// src/lib.rs
//! stringsvc library, a small string service exposed over HTTP/JSON.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `ServiceError`, `EndpointError`, `DecodeError`
//! - **Configuration**: `CommandLineInput`, `ServerConfig`
//! - **Service**: `StringService` and its logging/instrumenting middleware
//! - **Endpoints**: `Endpoint`, request/response types, adapters
//! - **Metrics**: `Registry`, `CounterVec`, `SummaryVec`
//! - **Transport and server**: `build_router`, `StringServer`, `serve`

pub mod config;
pub mod constants;
pub mod endpoint;
pub mod error;
pub mod metrics;
pub mod server;
pub mod service;
pub mod transport;
pub mod types;

// --- Error Handling ---
pub use crate::error::{AppError, DecodeError, EndpointError, ServiceError};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, ServerConfig};

// --- Domain Types ---
pub use crate::types::{ListenAddr, MetricName};

// --- Service ---
pub use crate::service::{
    BasicStringService, CallLogger, CallRecord, InstrumentingMiddleware, LogfmtLogger,
    LoggingMiddleware, Method, ServiceMetrics, StringService,
};

// --- Endpoints ---
pub use crate::endpoint::{
    make_count_endpoint, make_uppercase_endpoint, CallContext, CountEndpoint, CountRequest,
    CountResponse, Endpoint, UppercaseEndpoint, UppercaseRequest, UppercaseResponse,
};

// --- Metrics ---
pub use crate::metrics::{Collector, CounterVec, Registry, SummarySnapshot, SummaryVec};

// --- Transport and Server ---
pub use crate::server::{assemble_service, StringServer};
pub use crate::transport::build_router;
