//! Ops listener: Prometheus scrape endpoint and liveness probe.
//!
//! Bound to its own address and not behind the gateway.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use fluxflix_runtime::metrics::MetricsServer;
use fluxflix_web::handlers::health_check;
use std::sync::Arc;

/// Build the ops router.
///
/// # Routes
///
/// - `GET /metrics` - Prometheus text format
/// - `GET /health` - liveness
pub fn ops_router(metrics: Arc<MetricsServer>) -> Router {
    Router::new()
        .route("/metrics", get(render_metrics))
        .route("/health", get(health_check))
        .with_state(metrics)
}

async fn render_metrics(State(metrics): State<Arc<MetricsServer>>) -> Response {
    match metrics.render() {
        Some(body) => (StatusCode::OK, body).into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "metrics recorder not installed").into_response(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn metrics() -> Arc<MetricsServer> {
        Arc::new(MetricsServer::new("127.0.0.1:0".parse().unwrap()))
    }

    #[tokio::test]
    async fn health_needs_no_credentials() {
        let response = ops_router(metrics())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_without_recorder_is_unavailable() {
        let response = ops_router(metrics())
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
