//! Prometheus metrics for observability and monitoring.
//!
//! This module provides metric collection for:
//! - Open event streams and emitted events
//! - Catalog reads
//! - Gateway outcomes (rejected / dispatched)
//!
//! # Example
//!
//! ```rust,no_run
//! use fluxflix_runtime::metrics::MetricsServer;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut server = MetricsServer::new("0.0.0.0:9090".parse()?);
//! server.start()?;
//!
//! // Rendered text for a /metrics endpoint
//! let body = server.render().unwrap_or_default();
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

// Re-export metrics macros for use in other modules
pub use metrics::{counter, gauge, histogram};

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Prometheus recorder plus the address its scrape endpoint is served on.
///
/// Installing the recorder is all this type does; the binary serves
/// [`render`](Self::render) over HTTP.
pub struct MetricsServer {
    addr: SocketAddr,
    handle: Option<PrometheusHandle>,
}

impl MetricsServer {
    /// Create a new metrics server.
    #[must_use]
    pub const fn new(addr: SocketAddr) -> Self {
        Self { addr, handle: None }
    }

    /// Address the scrape endpoint should bind to.
    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Register metric descriptions and install the Prometheus recorder.
    ///
    /// # Errors
    ///
    /// Returns error if the exporter cannot be built or installed.
    ///
    /// # Note
    ///
    /// If a recorder is already installed (e.g., in tests), this logs a
    /// warning and succeeds without a handle.
    pub fn start(&mut self) -> Result<(), MetricsError> {
        register_metrics();

        let builder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        match builder.install_recorder() {
            Ok(handle) => {
                self.handle = Some(handle);
                tracing::info!(addr = %self.addr, "Metrics recorder installed");
                Ok(())
            }
            Err(e) => {
                let err_msg = e.to_string();
                if err_msg.contains("already initialized") {
                    tracing::warn!("Metrics recorder already initialized, skipping re-initialization");
                    Ok(())
                } else {
                    Err(MetricsError::Install(err_msg))
                }
            }
        }
    }

    /// Get the metrics handle for rendering.
    #[must_use]
    pub const fn handle(&self) -> Option<&PrometheusHandle> {
        self.handle.as_ref()
    }

    /// Render current metrics in Prometheus format.
    ///
    /// Returns `None` if the recorder wasn't installed by this instance.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

/// Register all metric descriptions.
fn register_metrics() {
    // Event stream metrics
    describe_gauge!("movie_streams_active", "Number of open movie event streams");
    describe_counter!(
        "movie_stream_events_total",
        "Total number of movie events handed to subscribers"
    );
    describe_counter!(
        "movie_streams_completed_total",
        "Total number of movie event streams that ended, by reason"
    );

    // Catalog metrics
    describe_counter!(
        "catalog_requests_total",
        "Total number of catalog operations, by operation"
    );
    describe_counter!(
        "catalog_errors_total",
        "Total number of catalog operations that failed, by operation"
    );
    describe_histogram!(
        "catalog_request_duration_seconds",
        "Time taken by catalog operations"
    );

    // Gateway metrics
    describe_counter!(
        "gateway_requests_total",
        "Total number of requests through the gateway, by outcome and route"
    );
}

/// Event stream metrics recorder.
pub struct StreamMetrics;

impl StreamMetrics {
    /// Record a stream producer starting.
    pub fn record_started() {
        gauge!("movie_streams_active").increment(1.0);
    }

    /// Record one event handed to a subscriber.
    pub fn record_event() {
        counter!("movie_stream_events_total").increment(1);
    }

    /// Record a stream producer stopping.
    pub fn record_completed(reason: &'static str) {
        gauge!("movie_streams_active").decrement(1.0);
        counter!("movie_streams_completed_total", "reason" => reason).increment(1);
    }
}

/// Catalog metrics recorder.
pub struct CatalogMetrics;

impl CatalogMetrics {
    /// Record a completed catalog operation.
    pub fn record_request(operation: &'static str, duration: Duration) {
        counter!("catalog_requests_total", "operation" => operation).increment(1);
        histogram!("catalog_request_duration_seconds", "operation" => operation)
            .record(duration.as_secs_f64());
    }

    /// Record a failed catalog operation.
    pub fn record_error(operation: &'static str) {
        counter!("catalog_errors_total", "operation" => operation).increment(1);
    }
}

/// Gateway metrics recorder.
pub struct GatewayMetrics;

impl GatewayMetrics {
    /// Record a request outcome (`dispatched`, `unauthorized`, `forbidden`)
    /// for the route it targeted.
    pub fn record_outcome(outcome: &'static str, route: &'static str) {
        counter!("gateway_requests_total", "outcome" => outcome, "route" => route).increment(1);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_metrics_server_creation() {
        let addr = "127.0.0.1:0".parse().unwrap();
        let server = MetricsServer::new(addr);
        assert!(server.handle().is_none());
        assert_eq!(server.addr(), addr);
    }

    #[tokio::test]
    async fn test_metrics_server_render() {
        let addr = "127.0.0.1:0".parse().unwrap();
        let mut server = MetricsServer::new(addr);
        server.start().unwrap();

        StreamMetrics::record_started();
        StreamMetrics::record_event();
        StreamMetrics::record_completed("cancelled");
        CatalogMetrics::record_request("all", Duration::from_millis(3));
        GatewayMetrics::record_outcome("dispatched", "list");

        // Another test may have installed the recorder first; metrics are
        // still recorded globally in that case.
        if let Some(rendered) = server.render() {
            assert!(rendered.contains("movie_stream_events_total"));
            assert!(rendered.contains("catalog_requests_total"));
            assert!(rendered.contains("gateway_requests_total"));
        }
    }
}
