//! Axum middleware for request tracking and access control.
//!
//! This module provides:
//! - **Correlation ID tracking**: extract or generate a correlation ID per
//!   request, echo it in the response
//! - **Gateway**: [`authorize_request`], which authenticates Basic
//!   credentials and asks the [`AuthorizationEngine`] before any handler runs
//!
//! # Flow
//!
//! ```text
//! received ──allow──> authorized ──> dispatched (handler runs)
//!     │
//!     └──deny──> rejected (401 / 403, handler never runs)
//! ```
//!
//! [`AuthorizationEngine`]: fluxflix_auth::AuthorizationEngine

use crate::error::AppError;
use crate::router::RouteKind;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use fluxflix_auth::{AuthError, BasicCredentials, UserDirectory};
use fluxflix_core::principal::Principal;
use fluxflix_runtime::metrics::GatewayMetrics;
use std::fmt;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::Instrument;
use uuid::Uuid;

/// Header name for correlation ID.
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-ID";

/// Challenge sent with every 401.
pub const WWW_AUTHENTICATE_CHALLENGE: &str = r#"Basic realm="fluxflix""#;

/// Create a layer that adds correlation ID tracking to all requests.
///
/// This layer:
/// - Extracts correlation ID from request header or generates new UUID
/// - Stores correlation ID in request extensions
/// - Creates tracing span with `correlation_id` field
/// - Injects correlation ID into response header
#[must_use]
pub const fn correlation_id_layer() -> CorrelationIdLayer {
    CorrelationIdLayer
}

/// Layer for correlation ID tracking.
#[derive(Clone, Debug)]
pub struct CorrelationIdLayer;

impl<S> Layer<S> for CorrelationIdLayer {
    type Service = CorrelationIdMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CorrelationIdMiddleware { inner }
    }
}

/// Middleware service for correlation ID tracking.
#[derive(Clone, Debug)]
pub struct CorrelationIdMiddleware<S> {
    inner: S,
}

impl<S> Service<Request> for CorrelationIdMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let correlation_id = req
            .headers()
            .get(CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4);

        req.extensions_mut().insert(correlation_id);

        let span = tracing::info_span!(
            "http_request",
            correlation_id = %correlation_id,
            method = %req.method(),
            uri = %req.uri(),
        );

        let fut = self.inner.call(req);

        Box::pin(async move {
            let mut response = fut.instrument(span).await?;

            if let Ok(header_value) = HeaderValue::from_str(&correlation_id.to_string()) {
                response
                    .headers_mut()
                    .insert(CORRELATION_ID_HEADER, header_value);
            }

            Ok(response)
        })
    }
}

/// Terminal state of one request at the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayOutcome {
    /// Authorized and handed to a handler.
    Dispatched,
    /// Rejected: no valid principal.
    Unauthenticated,
    /// Rejected: principal lacks the required role.
    Forbidden,
}

impl GatewayOutcome {
    /// Stable label for logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dispatched => "dispatched",
            Self::Unauthenticated => "unauthorized",
            Self::Forbidden => "forbidden",
        }
    }

    /// Whether the request stopped at the gateway.
    #[must_use]
    pub const fn is_rejected(self) -> bool {
        !matches!(self, Self::Dispatched)
    }
}

impl fmt::Display for GatewayOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gateway middleware: authenticate, authorize, then dispatch or reject.
///
/// Install with `axum::middleware::from_fn_with_state`. On success the
/// [`Principal`] is placed in the request extensions, where
/// [`AuthenticatedPrincipal`](crate::extractors::AuthenticatedPrincipal)
/// picks it up. A rejected request never reaches a handler, so the catalog
/// is never consulted for it.
pub async fn authorize_request(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_owned();
    let route = RouteKind::label_for(req.method(), &path);

    let principal = match authenticate(&state.directory, req.headers()) {
        Ok(principal) => Some(principal),
        Err(err) => {
            tracing::debug!(path = %path, reason = %err, "Authentication failed");
            None
        }
    };

    if let Err(err) = state.engine.check(principal.as_ref(), &path) {
        let outcome = if err.is_unauthenticated() {
            GatewayOutcome::Unauthenticated
        } else {
            GatewayOutcome::Forbidden
        };
        GatewayMetrics::record_outcome(outcome.as_str(), route);
        tracing::debug!(
            path = %path,
            route,
            user = principal.as_ref().map(|p| p.username.as_str()),
            outcome = %outcome,
            "Request rejected"
        );
        return reject(err);
    }

    GatewayMetrics::record_outcome(GatewayOutcome::Dispatched.as_str(), route);
    if let Some(principal) = principal {
        tracing::debug!(
            path = %path,
            route,
            user = %principal.username,
            outcome = %GatewayOutcome::Dispatched,
            "Request authorized"
        );
        req.extensions_mut().insert(principal);
    }

    next.run(req).await
}

/// Resolve the `Authorization` header to a principal.
///
/// # Errors
///
/// - `AuthError::MissingCredentials` if the header is absent
/// - `AuthError::MalformedCredentials` if it is not valid Basic auth
/// - `AuthError::InvalidCredentials` if the directory rejects it
pub fn authenticate(directory: &UserDirectory, headers: &HeaderMap) -> Result<Principal, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::MalformedCredentials {
            reason: "header is not ASCII".to_string(),
        })?;

    let credentials = BasicCredentials::from_authorization_header(value)?;
    directory
        .authenticate(&credentials)
        .ok_or(AuthError::InvalidCredentials)
}

fn reject(err: AuthError) -> Response {
    let challenge = err.is_unauthenticated();
    let mut response = AppError::from(err).into_response();
    if challenge {
        response.headers_mut().insert(
            header::WWW_AUTHENTICATE,
            HeaderValue::from_static(WWW_AUTHENTICATE_CHALLENGE),
        );
    }
    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::extractors::CorrelationId;
    use axum::{Router, body::Body, http::StatusCode, routing::get};
    use fluxflix_core::principal::Role;
    use tower::ServiceExt;

    fn directory() -> UserDirectory {
        UserDirectory::builder()
            .user("rwinch", "password", [Role::stream()])
            .build()
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[tokio::test]
    async fn test_correlation_id_generated_if_missing() {
        let app = Router::new()
            .route("/test", get(|| async { "ok" }))
            .layer(correlation_id_layer());

        let request = axum::http::Request::builder().uri("/test").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        let correlation_id = response
            .headers()
            .get(CORRELATION_ID_HEADER)
            .expect("Correlation ID header should be present");
        assert!(Uuid::parse_str(correlation_id.to_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn test_correlation_id_preserved_from_request() {
        let app = Router::new()
            .route("/test", get(|| async { "ok" }))
            .layer(correlation_id_layer());

        let request_uuid = Uuid::new_v4();
        let request = axum::http::Request::builder()
            .uri("/test")
            .header(CORRELATION_ID_HEADER, request_uuid.to_string())
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let response_id = response
            .headers()
            .get(CORRELATION_ID_HEADER)
            .expect("Correlation ID header should be present")
            .to_str()
            .unwrap();

        assert_eq!(response_id, request_uuid.to_string());
    }

    #[tokio::test]
    async fn test_correlation_id_reaches_handler_and_response() {
        async fn handler(id: CorrelationId) -> String {
            id.0.to_string()
        }

        let app = Router::new()
            .route("/test", get(handler))
            .layer(correlation_id_layer());

        let request = axum::http::Request::builder().uri("/test").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let echoed = response.headers().get(CORRELATION_ID_HEADER).unwrap().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], echoed.as_bytes());
    }

    #[test]
    fn authenticate_accepts_known_user() {
        let credentials = BasicCredentials::new("rwinch", "password");
        let principal =
            authenticate(&directory(), &headers_with(&credentials.to_header_value())).unwrap();
        assert_eq!(principal.username, "rwinch");
    }

    #[test]
    fn authenticate_reports_why_it_failed() {
        assert_eq!(
            authenticate(&directory(), &HeaderMap::new()),
            Err(AuthError::MissingCredentials)
        );
        assert!(matches!(
            authenticate(&directory(), &headers_with("Bearer abc")),
            Err(AuthError::MalformedCredentials { .. })
        ));
        let wrong = BasicCredentials::new("rwinch", "nope");
        assert_eq!(
            authenticate(&directory(), &headers_with(&wrong.to_header_value())),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn rejection_challenges_only_unauthenticated() {
        let unauthorized = reject(AuthError::MissingCredentials);
        assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            unauthorized.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            WWW_AUTHENTICATE_CHALLENGE
        );

        let forbidden = reject(AuthError::InsufficientPermissions {
            required: "stream".to_string(),
        });
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
        assert!(forbidden.headers().get(header::WWW_AUTHENTICATE).is_none());
    }

    #[test]
    fn outcome_labels() {
        assert_eq!(GatewayOutcome::Dispatched.to_string(), "dispatched");
        assert!(GatewayOutcome::Forbidden.is_rejected());
        assert!(!GatewayOutcome::Dispatched.is_rejected());
    }
}
