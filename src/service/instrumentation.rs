// src/service/instrumentation.rs
//! Request metrics as a [`StringService`] decorator.

use super::{Method, StringService};
use crate::constants::REQUEST_LABELS;
use crate::error::ServiceError;
use crate::metrics::{CounterVec, Registry, SummaryVec};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

/// The metric families recorded by [`InstrumentingMiddleware`].
#[derive(Clone)]
pub struct ServiceMetrics {
    /// `request_count{method, error}`
    pub request_count: Arc<CounterVec>,
    /// `request_latency_microseconds{method, error}`
    pub request_latency: Arc<SummaryVec>,
    /// `count_result`, unlabeled
    pub count_result: Arc<SummaryVec>,
}

impl ServiceMetrics {
    /// Registers the service's families in `registry`.
    pub fn register(registry: &Registry) -> Self {
        Self {
            request_count: registry.counter_vec(
                "request_count",
                "Number of requests received.",
                &REQUEST_LABELS,
            ),
            request_latency: registry.summary_vec(
                "request_latency_microseconds",
                "Total duration of requests in microseconds.",
                &REQUEST_LABELS,
            ),
            count_result: registry.summary_vec(
                "count_result",
                "The result of each count method.",
                &[],
            ),
        }
    }
}

/// Counts requests and observes latency for every call made through it.
///
/// Latency is measured around the whole wrapped chain, so place this
/// middleware outermost to cover every inner layer.
pub struct InstrumentingMiddleware {
    metrics: ServiceMetrics,
    next: Arc<dyn StringService>,
}

impl InstrumentingMiddleware {
    pub fn new(metrics: ServiceMetrics, next: Arc<dyn StringService>) -> Self {
        Self { metrics, next }
    }
}

/// Records one call's metrics when dropped. A call that never finished is
/// recorded as an error.
struct ObservedCall<'a> {
    metrics: &'a ServiceMetrics,
    method: Method,
    begin: Instant,
    failed: bool,
    finished: bool,
    count_result: Option<usize>,
}

impl<'a> ObservedCall<'a> {
    fn begin(metrics: &'a ServiceMetrics, method: Method) -> Self {
        Self {
            metrics,
            method,
            begin: Instant::now(),
            failed: false,
            finished: false,
            count_result: None,
        }
    }

    fn finish(&mut self, failed: bool) {
        self.failed = failed;
        self.finished = true;
    }
}

impl Drop for ObservedCall<'_> {
    fn drop(&mut self) {
        let error = if self.failed || !self.finished {
            "true"
        } else {
            "false"
        };
        let labels = [self.method.as_str(), error];
        let micros = self.begin.elapsed().as_secs_f64() * 1_000_000.0;

        self.metrics.request_count.inc(&labels);
        self.metrics.request_latency.observe(&labels, micros);
        if let Some(n) = self.count_result {
            self.metrics.count_result.observe(&[], n as f64);
        }
    }
}

#[async_trait]
impl StringService for InstrumentingMiddleware {
    async fn uppercase(&self, s: &str) -> Result<String, ServiceError> {
        let mut call = ObservedCall::begin(&self.metrics, Method::Uppercase);
        let result = self.next.uppercase(s).await;
        call.finish(result.is_err());
        result
    }

    async fn count(&self, s: &str) -> usize {
        let mut call = ObservedCall::begin(&self.metrics, Method::Count);
        let n = self.next.count(s).await;
        call.count_result = Some(n);
        call.finish(false);
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::BasicStringService;
    use crate::types::MetricName;
    use std::time::Duration;

    fn instrumented(next: Arc<dyn StringService>) -> (ServiceMetrics, InstrumentingMiddleware) {
        let registry = Registry::new(
            MetricName::new("test").unwrap(),
            MetricName::new("strings").unwrap(),
        );
        let metrics = ServiceMetrics::register(&registry);
        let middleware = InstrumentingMiddleware::new(metrics.clone(), next);
        (metrics, middleware)
    }

    struct Stalled;

    #[async_trait]
    impl StringService for Stalled {
        async fn uppercase(&self, _s: &str) -> Result<String, ServiceError> {
            std::future::pending().await
        }

        async fn count(&self, _s: &str) -> usize {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn counts_successes_and_failures_separately() {
        let (metrics, svc) = instrumented(Arc::new(BasicStringService));

        assert_eq!(svc.uppercase("a").await, Ok("A".to_string()));
        assert_eq!(svc.uppercase("b").await, Ok("B".to_string()));
        assert_eq!(svc.uppercase("").await, Err(ServiceError::EmptyInput));

        assert_eq!(metrics.request_count.get(&["uppercase", "false"]), 2);
        assert_eq!(metrics.request_count.get(&["uppercase", "true"]), 1);
        assert_eq!(
            metrics
                .request_latency
                .snapshot(&["uppercase", "false"])
                .unwrap()
                .count,
            2
        );
        assert!(metrics.count_result.snapshot(&[]).is_none());
    }

    #[tokio::test]
    async fn observes_count_results() {
        let (metrics, svc) = instrumented(Arc::new(BasicStringService));

        assert_eq!(svc.count("hello").await, 5);
        assert_eq!(svc.count("").await, 0);

        assert_eq!(metrics.request_count.get(&["count", "false"]), 2);
        let results = metrics.count_result.snapshot(&[]).unwrap();
        assert_eq!(results.count, 2);
        assert_eq!(results.sum, 5.0);
    }

    #[tokio::test]
    async fn abandoned_call_counts_as_error() {
        let (metrics, svc) = instrumented(Arc::new(Stalled));

        let timed_out = tokio::time::timeout(Duration::from_millis(10), svc.count("hello")).await;
        assert!(timed_out.is_err());

        assert_eq!(metrics.request_count.get(&["count", "true"]), 1);
        assert_eq!(metrics.request_count.get(&["count", "false"]), 0);
        assert!(metrics.count_result.snapshot(&[]).is_none());
    }

    #[tokio::test]
    async fn latency_covers_the_wrapped_call() {
        struct Slow;

        #[async_trait]
        impl StringService for Slow {
            async fn uppercase(&self, s: &str) -> Result<String, ServiceError> {
                tokio::time::sleep(Duration::from_millis(5)).await;
                Ok(s.to_uppercase())
            }

            async fn count(&self, s: &str) -> usize {
                s.chars().count()
            }
        }

        let (metrics, svc) = instrumented(Arc::new(Slow));
        svc.uppercase("slow").await.unwrap();

        let latency = metrics
            .request_latency
            .snapshot(&["uppercase", "false"])
            .unwrap();
        assert!(latency.sum >= 5_000.0, "latency {}µs below sleep", latency.sum);
    }
}
