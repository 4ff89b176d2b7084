// src/service/mod.rs
//! The string service capability and its middleware.
//!
//! [`StringService`] is the single capability every layer implements. The
//! core implementation does the work; middleware wraps another
//! `StringService` and adds a side effect without touching results:
//!
//! ```text
//! InstrumentingMiddleware      (metrics, outermost: latency covers everything below)
//!         ↓
//! LoggingMiddleware            (one record per call)
//!         ↓
//! BasicStringService           (business logic)
//! ```
//!
//! # Laws
//!
//! Every implementation, decorated or not, must satisfy:
//!
//! - **L1 (Empty input)**: `uppercase("") == Err(ServiceError::EmptyInput)`.
//! - **L2 (Uppercase)**: for non-empty `s`, `uppercase(s) == Ok(s.to_uppercase())`,
//!   and uppercasing the result again yields the same string.
//! - **L3 (Count)**: `count(s) == s.chars().count()`; `count("") == 0`.
//! - **L4 (Transparency)**: wrapping in middleware, in any order, returns
//!   exactly what the wrapped service returns.

mod basic;
pub mod instrumentation;
pub mod logging;

pub use basic::BasicStringService;
pub use instrumentation::{InstrumentingMiddleware, ServiceMetrics};
pub use logging::{CallLogger, CallRecord, LogfmtLogger, LoggingMiddleware};

use crate::error::ServiceError;
use async_trait::async_trait;
use std::fmt;

/// Operations on strings, modeled as a remotely callable service.
///
/// This trait is **object-safe**; layers hold the next link as
/// `Arc<dyn StringService>`.
#[async_trait]
pub trait StringService: Send + Sync {
    /// Uppercases `s`, failing on empty input.
    async fn uppercase(&self, s: &str) -> Result<String, ServiceError>;

    /// Counts the characters (Unicode scalar values) of `s`.
    async fn count(&self, s: &str) -> usize;
}

/// Name of a service operation, as it appears in log records and metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Uppercase,
    Count,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uppercase => "uppercase",
            Self::Count => "count",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
