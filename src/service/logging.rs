// src/service/logging.rs
//! Per-call structured logging as a [`StringService`] decorator.
//!
//! Each call produces exactly one [`CallRecord`]. The record is emitted from a
//! drop guard, so it is written on every exit path: a normal return, a domain
//! error, a panic in the wrapped service, or the caller dropping the future
//! before it completes.

use super::{Method, StringService};
use crate::constants::CALL_LOG_TARGET;
use crate::error::ServiceError;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Error text recorded when a call never produced a result.
pub const ABANDONED_CALL: &str = "call abandoned";

/// One logged service call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRecord {
    pub method: Method,
    pub input: String,
    /// The returned value; `None` when the call failed or never completed.
    pub output: Option<String>,
    pub error: Option<String>,
    pub took: Duration,
}

impl fmt::Display for CallRecord {
    /// Renders the record as a single logfmt line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "method={} input={} output={} err={} took={:?}",
            self.method,
            logfmt_value(&self.input),
            self.output.as_deref().map_or("null".into(), logfmt_value),
            self.error.as_deref().map_or("null".into(), logfmt_value),
            self.took
        )
    }
}

/// Quotes a logfmt value when it would otherwise be ambiguous.
fn logfmt_value(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c == ' ' || c == '=' || c == '"' || c == '\\' || c.is_control());
    if !needs_quotes {
        return value.to_string();
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Destination for call records.
pub trait CallLogger: Send + Sync {
    fn log(&self, record: CallRecord);
}

/// Writes call records as logfmt lines through the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogfmtLogger;

impl CallLogger for LogfmtLogger {
    fn log(&self, record: CallRecord) {
        log::info!(target: CALL_LOG_TARGET, "{}", record);
    }
}

/// Logs every call made through it, then returns the wrapped result untouched.
pub struct LoggingMiddleware {
    logger: Arc<dyn CallLogger>,
    next: Arc<dyn StringService>,
}

impl LoggingMiddleware {
    pub fn new(logger: Arc<dyn CallLogger>, next: Arc<dyn StringService>) -> Self {
        Self { logger, next }
    }
}

/// Emits the call record when dropped.
struct CallScope<'a> {
    logger: &'a dyn CallLogger,
    method: Method,
    input: &'a str,
    begin: Instant,
    outcome: Option<(Option<String>, Option<String>)>,
}

impl<'a> CallScope<'a> {
    fn begin(logger: &'a dyn CallLogger, method: Method, input: &'a str) -> Self {
        Self {
            logger,
            method,
            input,
            begin: Instant::now(),
            outcome: None,
        }
    }

    fn finish(&mut self, output: Option<String>, error: Option<String>) {
        self.outcome = Some((output, error));
    }
}

impl Drop for CallScope<'_> {
    fn drop(&mut self) {
        let (output, error) = self
            .outcome
            .take()
            .unwrap_or_else(|| (None, Some(ABANDONED_CALL.to_string())));
        self.logger.log(CallRecord {
            method: self.method,
            input: self.input.to_string(),
            output,
            error,
            took: self.begin.elapsed(),
        });
    }
}

#[async_trait]
impl StringService for LoggingMiddleware {
    async fn uppercase(&self, s: &str) -> Result<String, ServiceError> {
        let mut scope = CallScope::begin(self.logger.as_ref(), Method::Uppercase, s);
        let result = self.next.uppercase(s).await;
        match &result {
            Ok(output) => scope.finish(Some(output.clone()), None),
            Err(err) => scope.finish(None, Some(err.to_string())),
        }
        result
    }

    async fn count(&self, s: &str) -> usize {
        let mut scope = CallScope::begin(self.logger.as_ref(), Method::Count, s);
        let n = self.next.count(s).await;
        scope.finish(Some(n.to_string()), None);
        n
    }
}
