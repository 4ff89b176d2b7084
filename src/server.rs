// src/server.rs
//! Service assembly and the HTTP server lifecycle.

use crate::config::ServerConfig;
use crate::error::{AppError, Result};
use crate::metrics::Registry;
use crate::service::{
    BasicStringService, CallLogger, InstrumentingMiddleware, LoggingMiddleware, ServiceMetrics,
    StringService,
};
use crate::transport;
use crate::types::ListenAddr;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Wraps the core service: instrumentation → logging → core.
///
/// Instrumentation sits outermost so its latency covers the logging layer too.
pub fn assemble_service(
    logger: Arc<dyn CallLogger>,
    metrics: ServiceMetrics,
) -> Arc<dyn StringService> {
    let svc: Arc<dyn StringService> = Arc::new(BasicStringService);
    let svc: Arc<dyn StringService> = Arc::new(LoggingMiddleware::new(logger, svc));
    Arc::new(InstrumentingMiddleware::new(metrics, svc))
}

/// A fully wired application: its router and the registry it records into.
pub struct StringServer {
    pub router: Router,
    pub registry: Arc<Registry>,
}

impl StringServer {
    /// Builds a fresh registry, the decorated service and the routes.
    pub fn new(config: &ServerConfig, logger: Arc<dyn CallLogger>, shutdown: CancellationToken) -> Self {
        let registry = Arc::new(Registry::new(
            config.namespace.clone(),
            config.subsystem.clone(),
        ));
        let metrics = ServiceMetrics::register(&registry);
        let svc = assemble_service(logger, metrics);
        let router = transport::build_router(svc, Arc::clone(&registry), shutdown);
        Self { router, registry }
    }
}

/// Binds the listener for `addr`.
pub async fn bind(addr: ListenAddr) -> Result<TcpListener> {
    let socket_addr = addr.socket_addr();
    TcpListener::bind(socket_addr)
        .await
        .map_err(|source| AppError::Bind {
            addr: socket_addr,
            source,
        })
}

/// Serves `router` on `listener` until `shutdown` is cancelled, then drains
/// in-flight requests.
pub async fn serve(listener: TcpListener, router: Router, shutdown: CancellationToken) -> Result<()> {
    let addr = listener.local_addr()?;
    log::info!("msg=HTTP addr={}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    log::info!("msg=\"server stopped\" addr={}", addr);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{CallRecord, Method};
    use crate::types::MetricName;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<CallRecord>>);

    impl CallLogger for Recorder {
        fn log(&self, record: CallRecord) {
            self.0.lock().push(record);
        }
    }

    #[tokio::test]
    async fn assembled_chain_logs_and_counts_each_call() {
        let registry = Registry::new(
            MetricName::new("test").unwrap(),
            MetricName::new("chain").unwrap(),
        );
        let metrics = ServiceMetrics::register(&registry);
        let recorder = Arc::new(Recorder::default());
        let svc = assemble_service(recorder.clone(), metrics.clone());

        assert_eq!(svc.uppercase("abc").await.unwrap(), "ABC");
        assert_eq!(svc.count("abc").await, 3);

        let records = recorder.0.lock();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].method, Method::Uppercase);
        assert_eq!(records[1].method, Method::Count);
        assert_eq!(metrics.request_count.total(), 2);
    }

    #[tokio::test]
    async fn serve_stops_on_shutdown() {
        let listener = bind(ListenAddr::parse("127.0.0.1:0").unwrap()).await.unwrap();
        let shutdown = CancellationToken::new();
        let server = StringServer::new(
            &ServerConfig::default(),
            Arc::new(Recorder::default()),
            shutdown.clone(),
        );

        let handle = tokio::spawn(serve(listener, server.router, shutdown.clone()));
        shutdown.cancel();

        let result = tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .expect("server did not stop")
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn bind_reports_address_in_use() {
        let first = bind(ListenAddr::parse("127.0.0.1:0").unwrap()).await.unwrap();
        let taken = ListenAddr::parse(&first.local_addr().unwrap().to_string()).unwrap();

        let err = bind(taken).await.unwrap_err();
        assert!(matches!(err, AppError::Bind { .. }));
    }
}
