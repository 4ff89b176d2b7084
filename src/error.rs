// src/error.rs
//! Error types, split by the layer that owns each failure.
//!
//! Domain errors belong to the service and travel inside response bodies.
//! Decode and endpoint errors belong to the transport and decide the HTTP
//! status. Application errors only ever reach `main`.

use thiserror::Error;

/// Business-level failure of a [`StringService`](crate::service::StringService) call.
///
/// Middleware observes these and passes them through untouched; the endpoint
/// layer folds them into the response payload instead of failing the request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The input to `uppercase` had zero length.
    #[error("Empty string")]
    EmptyInput,
}

/// A request body that could not be decoded into the endpoint's request type.
///
/// Raised and answered by the transport; the service never sees the request.
#[derive(Error, Debug)]
#[error("Malformed request body: {0}")]
pub struct DecodeError(#[from] pub serde_json::Error);

/// Failure of an endpoint adapter that is not a domain error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EndpointError {
    #[error("Endpoint {endpoint} failed: {message}")]
    Failed {
        endpoint: &'static str,
        message: String,
    },
}

/// Process-level error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Failed to bind listener on {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error(transparent)]
    Validation(#[from] crate::types::ValidationError),
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;
