// src/constants.rs
//! Operational constants of the string service.
//!
//! Each constant is named for the concept it fixes, not its technical role.
//! Reading them should tell you how the service presents itself on the wire
//! and to a metrics scraper.

// ---------------------------------------------------------------------------
// Wire surface
// ---------------------------------------------------------------------------

/// Listen address used when none is given. A leading `:` binds all interfaces.
pub const DEFAULT_LISTEN_ADDR: &str = ":8080";

/// Route for the uppercase operation.
pub const UPPERCASE_ROUTE: &str = "/uppercase";

/// Route for the count operation.
pub const COUNT_ROUTE: &str = "/count";

/// Route scraped by Prometheus.
pub const METRICS_ROUTE: &str = "/metrics";

/// Liveness probe route.
pub const HEALTH_ROUTE: &str = "/health";

/// Content type of the Prometheus text exposition format.
pub const METRICS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

// ---------------------------------------------------------------------------
// Metric naming
// ---------------------------------------------------------------------------

/// Default metrics namespace (the first segment of every metric name).
pub const DEFAULT_METRICS_NAMESPACE: &str = "my_group";

/// Default metrics subsystem (the second segment of every metric name).
pub const DEFAULT_METRICS_SUBSYSTEM: &str = "string_service";

/// Label keys shared by the request counter and the latency summary.
pub const REQUEST_LABELS: [&str; 2] = ["method", "error"];

// ---------------------------------------------------------------------------
// Summary sampling
// ---------------------------------------------------------------------------

/// How many recent observations a summary keeps for quantile estimation.
///
/// Count and sum are exact over the whole process lifetime; only quantiles
/// are computed over this sliding window.
pub const SUMMARY_WINDOW: usize = 1024;

/// Quantiles exported for every summary.
pub const SUMMARY_QUANTILES: [f64; 3] = [0.5, 0.9, 0.99];

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// `log` target for per-call records emitted by the logging middleware.
pub const CALL_LOG_TARGET: &str = "stringsvc::calls";
